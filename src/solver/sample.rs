//! Recorded samples and the sink interface the integrator writes through.

use crate::circuit::CircuitParameters;
use crate::error::Result;

use super::RetryStep;

/// One recorded point of the five tracked quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Simulation time (s)
    pub t: f64,
    /// Secondary voltage, `I4·R_Sec` (V)
    pub secondary_voltage: f64,
    /// Capacitor voltage, `∫I3/C` (V)
    pub capacitor_voltage: f64,
    /// Current in a primary half, `I3 − I2` (A)
    pub primary_current: f64,
    /// Source current, `I1 − I2` (A)
    pub source_current: f64,
    /// Capacitor current, `I3` (A)
    pub capacitor_current: f64,
}

/// Receiver of everything a simulation run produces.
///
/// The integrator and the retry controller never perform I/O themselves;
/// files, console output and in-memory buffers are all implementations of
/// this trait. Only [`record`](Self::record) is required.
pub trait SimulationSink {
    /// Called before each attempt. Data from a previous attempt must be
    /// discarded.
    fn begin_attempt(&mut self, _params: &CircuitParameters) -> Result<()> {
        Ok(())
    }

    /// Store one sample from the recording window.
    fn record(&mut self, sample: &Sample) -> Result<()>;

    /// Called once when the first sample of an attempt is about to be
    /// recorded.
    fn recording_started(&mut self, _t: f64) {}

    /// Called whenever the whole-percent progress of an attempt increases.
    fn progress(&mut self, _percent: u32) {}

    /// Called after each attempt, diverged or not.
    fn end_attempt(&mut self, _diverged: bool) -> Result<()> {
        Ok(())
    }

    /// Called when the retry controller relaxes the parameters.
    fn retry(&mut self, _step: &RetryStep) {}

    /// Called when the retry controller stops without a converged run.
    fn gave_up(&mut self, _params: &CircuitParameters) {}
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SimulationSink for NullSink {
    fn record(&mut self, _sample: &Sample) -> Result<()> {
        Ok(())
    }
}

/// In-memory sample sequences of the last attempt.
#[derive(Debug, Default, Clone)]
pub struct Waveforms {
    /// Sample times
    pub t: Vec<f64>,
    /// Secondary voltage
    pub secondary_voltage: Vec<f64>,
    /// Capacitor voltage
    pub capacitor_voltage: Vec<f64>,
    /// Primary-half current
    pub primary_current: Vec<f64>,
    /// Source current
    pub source_current: Vec<f64>,
    /// Capacitor current
    pub capacitor_current: Vec<f64>,
}

impl Waveforms {
    /// Create empty waveforms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.t.clear();
        self.secondary_voltage.clear();
        self.capacitor_voltage.clear();
        self.primary_current.clear();
        self.source_current.clear();
        self.capacitor_current.clear();
    }

    /// Reassemble the `i`-th sample.
    pub fn sample(&self, i: usize) -> Option<Sample> {
        Some(Sample {
            t: *self.t.get(i)?,
            secondary_voltage: self.secondary_voltage[i],
            capacitor_voltage: self.capacitor_voltage[i],
            primary_current: self.primary_current[i],
            source_current: self.source_current[i],
            capacitor_current: self.capacitor_current[i],
        })
    }

    /// Peak-to-peak span of a series, 0 when empty.
    pub fn peak_to_peak(series: &[f64]) -> f64 {
        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if series.is_empty() {
            0.0
        } else {
            max - min
        }
    }
}

impl SimulationSink for Waveforms {
    fn begin_attempt(&mut self, _params: &CircuitParameters) -> Result<()> {
        self.clear();
        Ok(())
    }

    fn record(&mut self, sample: &Sample) -> Result<()> {
        self.t.push(sample.t);
        self.secondary_voltage.push(sample.secondary_voltage);
        self.capacitor_voltage.push(sample.capacitor_voltage);
        self.primary_current.push(sample.primary_current);
        self.source_current.push(sample.source_current);
        self.capacitor_current.push(sample.capacitor_current);
        Ok(())
    }
}
