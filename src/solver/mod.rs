//! Transient solver for the ZVS driver.
//!
//! This module provides the numerical engine of the simulator.
//!
//! ## Mesh Equations
//!
//! The driver is described by four mesh currents:
//! - `I1`: source, damping inductor L1 and the first primary half
//! - `I2`: source, damping inductor L1 and the second primary half
//! - `I3`: the resonant capacitor loop
//! - `I4`: the secondary and its load
//!
//! The two primary halves are coupled to the secondary through
//! `M24 = √(L2·L4)`. The loop equations are solved for the derivatives in a
//! fixed order (I1, I2, I3, I4), each using the freshest values of the
//! others, and every current is advanced with a trapezoidal correction:
//!
//! ```text
//! I += I'·Δt + ½·Δt·(I' − I'_prev)
//! ```
//!
//! The capacitor voltage is recovered from the running integral of `I3`.
//!
//! ## Divergence and Retries
//!
//! The scheme is explicit, so a damping inductor that is too small or a time
//! step that is too large makes the currents blow up. [`Integrator::simulate`]
//! reports this as a flag and [`RetryController`] relaxes L1 and the time
//! step until a run completes.

mod integrator;
mod retry;
mod sample;

pub use integrator::{Integrator, MeshState, SimulationReport};
pub use retry::{next_retry, RetryController, RetryOutcome, RetryPolicy, RetryRule, RetryStep};
pub use sample::{NullSink, Sample, SimulationSink, Waveforms};

/// Magnitude of I1 above which a run is considered diverged (A).
pub const DIVERGENCE_LIMIT: f64 = 1e10;

/// L1 below which retries double the damping inductance (H).
pub const L1_DOUBLING_LIMIT: f64 = 1.0;

/// Increment applied to L1 once it has reached the doubling limit (H).
pub const L1_INCREMENT: f64 = 2.0;

/// Time steps at or below this are fine enough to grow L1 instead (s).
pub const FINE_TIME_STEP: f64 = 100e-9;

/// Give-up threshold on L1 (H).
pub const GIVE_UP_L1: f64 = 20.0;

/// Give-up threshold on the time step (s).
pub const GIVE_UP_TIME_STEP: f64 = 0.01e-9;

/// Default cap on the number of attempts in one retry loop.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;
