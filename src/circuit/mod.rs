//! Circuit description for the fixed ZVS driver topology.
//!
//! Unlike a general netlist, the driver has one hard-wired topology, so the
//! whole circuit is described by a single [`CircuitParameters`] value.

mod params;
mod validate;

pub use params::CircuitParameters;
pub use validate::validate_parameters;
