//! Channel and synthesis configuration.
//!
//! Channel parameters come from a YAML file of named `{value, unit}`
//! entries and feed the default rate formula. Synthesis parameters are a
//! fully-typed struct; there is no dynamic key/value configuration
//! anywhere in the pipeline.

use std::path::Path;

use color_eyre::eyre::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::topology::TreeMode;

/// One named channel parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelParam {
    pub value: f64,
    /// Unit label, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ChannelParam {
    fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: Some(unit.to_string()),
        }
    }
}

/// Channel parameters consumed by the default Shannon-capacity formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel bandwidth in Hz.
    pub bandwidth: ChannelParam,
    /// Noise power spectral density in dBm/Hz.
    pub noise_coefficient: ChannelParam,
    /// Transmit power in dBm.
    pub tx_power: ChannelParam,
    /// Carrier frequency in GHz.
    pub carrier_frequency: ChannelParam,
    /// Interference floor in watts.
    pub interference: ChannelParam,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        // mmWave numbers typical for IAB deployments.
        Self {
            bandwidth: ChannelParam::new(400e6, "Hz"),
            noise_coefficient: ChannelParam::new(-174.0, "dBm/Hz"),
            tx_power: ChannelParam::new(30.0, "dBm"),
            carrier_frequency: ChannelParam::new(28.0, "GHz"),
            interference: ChannelParam::new(0.0, "W"),
        }
    }
}

impl ChannelConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let named = [
            ("bandwidth", &self.bandwidth),
            ("noise_coefficient", &self.noise_coefficient),
            ("tx_power", &self.tx_power),
            ("carrier_frequency", &self.carrier_frequency),
            ("interference", &self.interference),
        ];
        for (name, param) in named {
            if !param.value.is_finite() {
                return Err(ValidationError::InvalidChannel(format!(
                    "{} must be finite, got {}",
                    name, param.value
                )));
            }
        }
        if self.bandwidth.value <= 0.0 {
            return Err(ValidationError::InvalidChannel(format!(
                "bandwidth must be positive, got {}",
                self.bandwidth.value
            )));
        }
        if self.carrier_frequency.value <= 0.0 {
            return Err(ValidationError::InvalidChannel(format!(
                "carrier_frequency must be positive, got {}",
                self.carrier_frequency.value
            )));
        }
        if self.interference.value < 0.0 {
            return Err(ValidationError::InvalidChannel(format!(
                "interference must not be negative, got {}",
                self.interference.value
            )));
        }
        Ok(())
    }
}

/// Load and validate a channel configuration from a YAML file.
pub fn load_channel_config<P: AsRef<Path>>(path: P) -> Result<ChannelConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read channel config {:?}", path))?;
    let config: ChannelConfig = serde_yaml::from_str(&contents)
        .wrap_err_with(|| format!("failed to parse channel config {:?}", path))?;
    config.validate()?;
    info!("loaded channel config from {:?}", path);
    Ok(config)
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid channel configuration: {0}")]
    InvalidChannel(String),
    #[error("Invalid synthesis configuration: {0}")]
    InvalidSynthesis(String),
}

/// Parameters of one topology synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Grid rows and columns.
    pub grid_size: usize,
    /// Minimum candidate placements attempted per row.
    pub min_nodes_per_row: usize,
    /// Maximum candidate placements attempted per row.
    pub max_nodes_per_row: usize,
    /// Placement exclusion radius, in rows/columns.
    pub connection_radius: usize,
    pub tree_mode: TreeMode,
    /// Physical length of one grid cell, in meters.
    pub grid_cell_length_m: f64,
    /// Euclidean attachment gate in cell units. Defaults to
    /// `connection_radius * sqrt(2)`, the diagonal of the exclusion
    /// rectangle, so every placed cell stays attachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connect_distance: Option<f64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            min_nodes_per_row: 2,
            max_nodes_per_row: 4,
            connection_radius: 2,
            tree_mode: TreeMode::Dag,
            grid_cell_length_m: 10.0,
            max_connect_distance: None,
        }
    }
}

impl SynthesisConfig {
    /// The attachment gate actually used by the graph builder.
    pub fn effective_connect_distance(&self) -> f64 {
        self.max_connect_distance
            .unwrap_or(self.connection_radius as f64 * std::f64::consts::SQRT_2)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.grid_cell_length_m.is_finite() && self.grid_cell_length_m > 0.0) {
            return Err(ValidationError::InvalidSynthesis(format!(
                "grid_cell_length_m must be positive, got {}",
                self.grid_cell_length_m
            )));
        }
        let connect = self.effective_connect_distance();
        if !(connect.is_finite() && connect > 0.0) {
            return Err(ValidationError::InvalidSynthesis(format!(
                "max_connect_distance must be positive, got {}",
                connect
            )));
        }
        Ok(())
    }
}
