//! Discrete-time simulation over a synthesized topology.

pub mod propagation;

pub use propagation::{advance, send_at, PropagationRecord, SimulationError, RETENTION_WINDOW};
