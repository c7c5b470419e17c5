//! WASM bindings for ZVS Core.
//!
//! This module exposes the retry loop and the in-memory waveforms to
//! JavaScript, so a web page can simulate a driver and plot the results.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmZvsSim } from 'zvs_core';
//!
//! await init();
//!
//! const sim = new WasmZvsSim(`
//!   L1 = 0.1
//!   L2 = 100u
//!   L4 = 10u
//!   V = 12
//!   C = 10n
//!   delta_t = 1n
//!   t_total = 100u
//!   slope_R = 0.0001
//!   R = 100M
//!   R_Sec = 50
//!   last_points = 1000
//! `);
//!
//! sim.run();
//! plot(sim.times(), sim.capacitor_voltage());
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::CircuitParameters;
use crate::dsl;
use crate::error::ZvsError;
use crate::solver::{RetryController, RetryOutcome, RetryPolicy, Waveforms};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: ZvsError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-compatible ZVS driver simulator.
#[wasm_bindgen]
pub struct WasmZvsSim {
    params: CircuitParameters,
    controller: RetryController,
    waves: Waveforms,
    outcome: Option<RetryOutcome>,
}

#[wasm_bindgen]
impl WasmZvsSim {
    /// Create a simulator from parameter file text.
    #[wasm_bindgen(constructor)]
    pub fn new(parameters: &str) -> Result<WasmZvsSim, JsValue> {
        Self::with_max_attempts(parameters, crate::solver::DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a simulator with a custom attempt cap.
    #[wasm_bindgen]
    pub fn with_max_attempts(parameters: &str, max_attempts: usize) -> Result<WasmZvsSim, JsValue> {
        let params = dsl::parse_parameters(parameters).map_err(to_js)?;
        let controller =
            RetryController::with_policy(RetryPolicy::new().with_max_attempts(max_attempts));
        Ok(WasmZvsSim {
            params,
            controller,
            waves: Waveforms::new(),
            outcome: None,
        })
    }

    /// Run the retry loop. Returns whether the final attempt converged.
    #[wasm_bindgen]
    pub fn run(&mut self) -> Result<bool, JsValue> {
        let outcome = self
            .controller
            .run(self.params, &mut self.waves)
            .map_err(to_js)?;
        self.outcome = Some(outcome);
        Ok(outcome.converged)
    }

    fn outcome(&self) -> Result<&RetryOutcome, JsValue> {
        self.outcome.as_ref().ok_or_else(|| {
            to_js(ZvsError::WasmError {
                message: "run() has not been called".to_string(),
            })
        })
    }

    /// Whether the last run converged.
    #[wasm_bindgen(getter)]
    pub fn converged(&self) -> bool {
        self.outcome.map(|o| o.converged).unwrap_or(false)
    }

    /// Number of attempts of the last run.
    #[wasm_bindgen]
    pub fn attempts(&self) -> Result<usize, JsValue> {
        Ok(self.outcome()?.attempts)
    }

    /// Damping inductance after the last run.
    #[wasm_bindgen]
    pub fn l1(&self) -> Result<f64, JsValue> {
        Ok(self.outcome()?.parameters.l1)
    }

    /// Time step after the last run.
    #[wasm_bindgen]
    pub fn delta_t(&self) -> Result<f64, JsValue> {
        Ok(self.outcome()?.parameters.delta_t)
    }

    /// Sample times.
    #[wasm_bindgen]
    pub fn times(&self) -> Vec<f64> {
        self.waves.t.clone()
    }

    /// Secondary voltage samples.
    #[wasm_bindgen]
    pub fn secondary_voltage(&self) -> Vec<f64> {
        self.waves.secondary_voltage.clone()
    }

    /// Capacitor voltage samples.
    #[wasm_bindgen]
    pub fn capacitor_voltage(&self) -> Vec<f64> {
        self.waves.capacitor_voltage.clone()
    }

    /// Primary-half current samples.
    #[wasm_bindgen]
    pub fn primary_current(&self) -> Vec<f64> {
        self.waves.primary_current.clone()
    }

    /// Source current samples.
    #[wasm_bindgen]
    pub fn source_current(&self) -> Vec<f64> {
        self.waves.source_current.clone()
    }

    /// Capacitor current samples.
    #[wasm_bindgen]
    pub fn capacitor_current(&self) -> Vec<f64> {
        self.waves.capacitor_current.clone()
    }

    /// Resonant frequency of the configured tank (Hz).
    #[wasm_bindgen(getter)]
    pub fn frequency(&self) -> f64 {
        self.params.frequency()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
