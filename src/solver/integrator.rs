//! Explicit mesh-current integrator.

use log::debug;

use crate::circuit::CircuitParameters;
use crate::components::SwitchResistance;
use crate::error::Result;

use super::sample::{Sample, SimulationSink};
use super::DIVERGENCE_LIMIT;

/// Mesh currents and their derivatives during one attempt.
///
/// Index 0..4 corresponds to the mesh currents I1..I4.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshState {
    /// Mesh currents (A)
    pub current: [f64; 4],
    /// Derivatives of the last completed step (A/s)
    pub derivative: [f64; 4],
    /// Running integral of I3 (C)
    pub charge: f64,
}

impl MeshState {
    /// Advance mesh current `k` with the trapezoidal correction.
    fn advance(&mut self, k: usize, derivative: f64, dt: f64) {
        self.current[k] += derivative * dt + 0.5 * dt * (derivative - self.derivative[k]);
        self.derivative[k] = derivative;
    }

    /// Whether I1 has blown up.
    pub fn is_diverged(&self) -> bool {
        let i1 = self.current[0];
        !i1.is_finite() || i1.abs() > DIVERGENCE_LIMIT
    }

    /// The five tracked quantities at time `t`.
    pub fn sample(&self, t: f64, params: &CircuitParameters) -> Sample {
        let [i1, i2, i3, i4] = self.current;
        Sample {
            t,
            secondary_voltage: i4 * params.r_sec,
            capacitor_voltage: self.charge / params.c,
            primary_current: i3 - i2,
            source_current: i1 - i2,
            capacitor_current: i3,
        }
    }
}

/// Summary of one attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationReport {
    /// Whether the run was stopped by divergence
    pub convergence_error: bool,
    /// Number of time steps taken
    pub steps: usize,
    /// Number of samples handed to the sink
    pub recorded: usize,
    /// Time of the last step taken (s)
    pub final_time: f64,
    /// State after the last step
    pub final_state: MeshState,
}

/// Integrator for the ZVS driver mesh equations.
#[derive(Debug, Clone)]
pub struct Integrator {
    /// Parameters of this attempt
    params: CircuitParameters,
    /// Resonant period (s)
    period: f64,
    /// Resonant frequency (Hz)
    frequency: f64,
    /// Primary-secondary mutual inductance (H)
    m24: f64,
    /// Model of the first switch; the second is its complement
    switch: SwitchResistance,
}

impl Integrator {
    /// Configure an integrator for the given parameters.
    pub fn new(params: CircuitParameters) -> Self {
        let period = params.period();
        let switch = SwitchResistance::new(period, params.slope_r, params.r_max);
        Self {
            params,
            period,
            frequency: 1.0 / period,
            m24: params.mutual_inductance(),
            switch,
        }
    }

    /// Parameters of this integrator.
    pub fn params(&self) -> &CircuitParameters {
        &self.params
    }

    /// Resonant period (s).
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Resonant frequency (Hz).
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Switch model in use.
    pub fn switch(&self) -> &SwitchResistance {
        &self.switch
    }

    /// Advance the state by one time step taken at time `t`.
    ///
    /// The derivatives are evaluated in the order I1, I2, I3, I4, each one
    /// using the values already updated earlier in the same step. Reordering
    /// changes the results.
    pub fn step(&self, state: &mut MeshState, t: f64) {
        let p = &self.params;
        let (l1, l2, l4) = (p.l1, p.l2, p.l4);
        let (v, c, dt, m24) = (p.v, p.c, p.delta_t, self.m24);

        let r1 = self.switch.value(t);
        let r2 = self.switch.complement(t);

        // Derivatives of the previous step
        let d = state.derivative;
        let i1d = (v + l1 * d[1] - l2 * d[1] + 2.0 * l2 * d[2] + m24 * d[3]
            - r2 * state.current[0])
            / (l1 + l2);
        state.advance(0, i1d, dt);

        let i2d = -1.0
            * (v + r1 * state.current[1] + l2 * (i1d - 2.0 * d[2]) - l1 * i1d - m24 * d[3])
            / (l2 + l1);
        state.advance(1, i2d, dt);

        let i3d = -1.0 * (state.charge / c - 2.0 * l2 * (i1d + i2d) + 2.0 * m24 * d[3])
            / (4.0 * l2);
        state.advance(2, i3d, dt);

        let i4d = -1.0 * (p.r_sec * state.current[3] + m24 * (2.0 * i3d - i1d - i2d)) / l4;
        state.advance(3, i4d, dt);

        state.charge += state.current[2] * dt;
    }

    /// Run one attempt from a zero state.
    ///
    /// Samples whose time lies after the recording start are passed to
    /// `sink`. The run stops early, with `convergence_error` set, as soon as
    /// I1 is non-finite or exceeds [`DIVERGENCE_LIMIT`].
    pub fn simulate<S: SimulationSink + ?Sized>(&self, sink: &mut S) -> Result<SimulationReport> {
        let p = &self.params;
        let recording_start = p.recording_start();

        debug!(
            "Simulating {:.0} steps: T = {:.4e} s, f = {:.1} Hz, M24 = {:.4e} H, recording after {:.4e} s",
            p.step_count(),
            self.period,
            self.frequency,
            self.m24,
            recording_start
        );

        sink.begin_attempt(p)?;

        let mut state = MeshState::default();
        let mut t = 0.0;
        let mut final_time = 0.0;
        let mut steps = 0;
        let mut recorded = 0;
        let mut recording = false;
        let mut last_percent = 0u32;
        let mut convergence_error = false;

        while t < p.t_total {
            self.step(&mut state, t);
            steps += 1;
            final_time = t;

            if t > recording_start {
                if !recording {
                    sink.recording_started(t);
                    recording = true;
                }
                sink.record(&state.sample(t, p))?;
                recorded += 1;
            }

            let percent = (100.0 * t / p.t_total).floor() as u32;
            if percent > last_percent {
                sink.progress(percent);
            }

            if state.is_diverged() {
                convergence_error = true;
                break;
            }
            last_percent = percent;

            t += p.delta_t;
        }

        sink.end_attempt(convergence_error)?;

        debug!(
            "Attempt finished after {} steps at t = {:.4e} s ({} samples, diverged: {})",
            steps, final_time, recorded, convergence_error
        );

        Ok(SimulationReport {
            convergence_error,
            steps,
            recorded,
            final_time,
            final_state: state,
        })
    }
}
