//! Component models for the ZVS driver.
//!
//! The driver's passive parts are folded directly into the mesh equations of
//! the integrator; only the switches need a model of their own:
//! - [`SwitchResistance`]: a MOSFET approximated by a periodic resistor

mod switch;

pub use switch::{SwitchPhase, SwitchResistance};
