//! # ZVS Core
//!
//! A time-domain simulator for ZVS Mazzilli driver circuits.
//!
//! This library provides:
//! - A periodic resistance model of the two driver MOSFETs
//! - An explicit, trapezoidal-corrected integrator of the four mesh currents
//! - A retry loop that relaxes the damping inductor and the time step until
//!   the explicit scheme stays stable
//! - A small parameter file language and `.dat` waveform output (CLI only)
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Circuit parameters and their validation
//! - [`components`] - Switch resistance model
//! - [`solver`] - Mesh-current integrator and retry policy
//! - [`dsl`] - Parser for parameter files
//! - [`output`] - Waveform files, console reporting and prompts (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! zvssim driver.zvs --output-dir results
//! gnuplot -e "plot 'results/VC.dat' with lines"
//! ```
//!
//! Without a parameter file the program asks for each value on stdin.
//!
//! ### Library
//!
//! ```no_run
//! use zvs_core::{CircuitParameters, RetryController, Waveforms};
//!
//! let mut waves = Waveforms::new();
//! let outcome = RetryController::new()
//!     .run(CircuitParameters::default(), &mut waves)
//!     .expect("in-memory sink does not fail");
//! assert!(outcome.converged);
//! println!("{} samples of capacitor voltage", waves.capacitor_voltage.len());
//! ```
//!
//! ## Circuit Simulation Method
//!
//! For each time step Δt:
//!
//! 1. Evaluate the switch resistances R1(t) and R2 = R − R1(t)
//! 2. Solve the loop equations for the mesh-current derivatives in a fixed
//!    order, reusing the values computed earlier in the same step
//! 3. Advance each current with a trapezoidal correction of the derivative
//! 4. Integrate I3 to obtain the capacitor charge
//!
//! A run whose first mesh current leaves the finite range is reported as
//! diverged and retried with a larger L1 or a smaller Δt.

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

#[cfg(feature = "cli")]
pub mod output;

// Re-export main types for convenience
pub use circuit::CircuitParameters;
pub use error::{Result, ZvsError};
pub use solver::{Integrator, RetryController, Waveforms};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmZvsSim;
