//! Distance-to-rate capability and the default channel model.
//!
//! The synthesis pipeline only ever sees a [`RateFormula`]: something that
//! turns a link length in meters into an achievable rate in bits per
//! second. The default implementation is the Shannon capacity under a
//! closed-form path loss model, parameterized by [`ChannelConfig`].

use crate::config::ChannelConfig;

/// Anything that can rate a link by its physical length.
///
/// Closures of type `Fn(f64) -> f64` implement this, so tests and callers
/// can plug in fixed or synthetic formulas.
pub trait RateFormula {
    /// Achievable data rate in bits per second at the given distance.
    fn rate_bps(&self, distance_m: f64) -> f64;
}

impl<F> RateFormula for F
where
    F: Fn(f64) -> f64,
{
    fn rate_bps(&self, distance_m: f64) -> f64 {
        self(distance_m)
    }
}

/// Shannon capacity over a closed-form urban path loss model.
///
/// Receive power is `tx_power - path_loss + 40 - 7` dBm, where the fixed
/// terms are the combined antenna gains and implementation losses. Path
/// loss follows `32.4 + 21*log10(d_m) + 20*log10(f_GHz)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShannonCapacity {
    bandwidth_hz: f64,
    tx_power_dbm: f64,
    carrier_frequency_ghz: f64,
    /// Thermal noise over the whole band, in watts.
    noise_w: f64,
    interference_w: f64,
}

impl ShannonCapacity {
    pub fn from_config(config: &ChannelConfig) -> Self {
        let bandwidth_hz = config.bandwidth.value;
        Self {
            bandwidth_hz,
            tx_power_dbm: config.tx_power.value,
            carrier_frequency_ghz: config.carrier_frequency.value,
            noise_w: dbm_to_watt(config.noise_coefficient.value) * bandwidth_hz,
            interference_w: config.interference.value,
        }
    }

    fn path_loss_db(&self, distance_m: f64) -> f64 {
        32.4 + 21.0 * distance_m.log10() + 20.0 * self.carrier_frequency_ghz.log10()
    }

    fn rx_power_dbm(&self, distance_m: f64) -> f64 {
        self.tx_power_dbm - self.path_loss_db(distance_m) + 40.0 - 7.0
    }

    fn sinr(&self, distance_m: f64) -> f64 {
        dbm_to_watt(self.rx_power_dbm(distance_m)) / (self.noise_w + self.interference_w)
    }
}

impl RateFormula for ShannonCapacity {
    fn rate_bps(&self, distance_m: f64) -> f64 {
        self.bandwidth_hz * (1.0 + self.sinr(distance_m)).log2()
    }
}

fn dbm_to_watt(dbm: f64) -> f64 {
    10f64.powf(dbm / 10.0) / 1000.0
}
