//! # IabSim - Topology synthesis for IAB-style wireless backhaul networks
//!
//! This library synthesizes, analyzes and simulates multi-hop wireless
//! backhaul topologies: a single donor plus relay nodes placed on a 2-D
//! grid, wired into a rooted DAG or tree.
//!
//! ## Overview
//!
//! Synthesis answers three questions: where relays may be placed so they
//! are neither isolated nor clustered (radius-based placement exclusion),
//! how the placed nodes connect and which of them physically conflict
//! (half-duplex constraint), and how information moves hop by hop through
//! the result over discrete time steps.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: Typed channel and synthesis configuration, YAML parsing
//! - `channel`: Distance-to-rate capability and the Shannon-capacity default
//! - `topology`: Grid generation, graph building, links, conflicts, paths
//! - `simulation`: Hop-synchronous propagation over a finalized topology
//! - `report`: Read-only human-readable topology dumps
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use iabsim::channel::ShannonCapacity;
//! use iabsim::config::{ChannelConfig, SynthesisConfig};
//! use iabsim::{report, topology};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let formula = ShannonCapacity::from_config(&ChannelConfig::default());
//! let mut rng = StdRng::seed_from_u64(7);
//! let topo = topology::generate(&SynthesisConfig::default(), &formula, &mut rng)?;
//! println!("{}", report::render_topology(&topo));
//! # Ok::<(), iabsim::topology::TopologyError>(())
//! ```
//!
//! ## Error Handling
//!
//! Validation failures are typed `thiserror` enums per pipeline stage,
//! collected under `topology::TopologyError`. Construction either fully
//! succeeds or fails atomically at the violated precondition; the binary
//! wraps everything in `color_eyre` for reporting.

pub mod channel;
pub mod config;
pub mod report;
pub mod simulation;
pub mod topology;
