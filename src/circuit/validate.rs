//! Parameter validation.

use crate::error::{Result, ZvsError};

use super::CircuitParameters;

/// Validate parameters before a simulation run.
///
/// Checks:
/// - Inductances, capacitance and resistances are positive and finite
/// - The time step is positive and smaller than the resonant period
/// - The recorded percentage lies in (0, 100]
/// - The switch slope is positive
///
/// The integrator itself never calls this; it is applied by input layers
/// (parameter files, prompts, bindings).
pub fn validate_parameters(params: &CircuitParameters) -> Result<()> {
    let positive = [
        ("L1", params.l1),
        ("L2", params.l2),
        ("L4", params.l4),
        ("C", params.c),
        ("R", params.r_max),
        ("R_Sec", params.r_sec),
        ("slope_R", params.slope_r),
        ("t_total", params.t_total),
        ("delta_t", params.delta_t),
    ];

    for (name, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(ZvsError::invalid_parameter(
                name,
                format!("must be a positive number, got {}", value),
            ));
        }
    }

    if !params.v.is_finite() {
        return Err(ZvsError::invalid_parameter("V", "must be finite"));
    }

    let period = params.period();
    if params.delta_t >= period {
        return Err(ZvsError::invalid_parameter(
            "delta_t",
            format!(
                "time step {} must be much smaller than the resonant period {:.3e}",
                params.delta_t, period
            ),
        ));
    }

    if !(params.last_perc > 0.0 && params.last_perc <= 100.0) {
        return Err(ZvsError::invalid_parameter(
            "last_perc",
            format!("must be in (0, 100], got {}", params.last_perc),
        ));
    }

    Ok(())
}
