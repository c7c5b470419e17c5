//! Circuit parameters for the ZVS driver topology.

use std::f64::consts::PI;
use std::fmt;

/// Parameters of one ZVS Mazzilli driver simulation.
///
/// The topology is fixed: a source with a series damping inductor `L1`
/// feeding a center-tapped primary (two halves of `L2`), a resonant capacitor
/// `C` across the primary, a secondary `L4` loaded by `r_sec`, and two
/// switches modeled as periodic resistors of maximum value `r_max`.
///
/// The value is immutable per attempt. Retries derive a new value through
/// [`with_l1`](Self::with_l1) and [`with_delta_t`](Self::with_delta_t).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircuitParameters {
    /// Damping inductance after the source (H)
    pub l1: f64,
    /// Inductance of one primary half (H)
    pub l2: f64,
    /// Secondary inductance (H)
    pub l4: f64,
    /// Resonant capacitance (F)
    pub c: f64,
    /// Source voltage (V)
    pub v: f64,
    /// Maximum switch resistance (ohms)
    pub r_max: f64,
    /// Integration time step (s)
    pub delta_t: f64,
    /// Total simulated time (s)
    pub t_total: f64,
    /// Switch transition slope, in percent of the period
    pub slope_r: f64,
    /// Secondary load resistance (ohms)
    pub r_sec: f64,
    /// Trailing percentage of `t_total` that is recorded
    pub last_perc: f64,
}

impl Default for CircuitParameters {
    /// A small driver that converges at the recommended settings.
    fn default() -> Self {
        Self {
            l1: 0.1,
            l2: 100e-6,
            l4: 10e-6,
            c: 10e-9,
            v: 12.0,
            r_max: 100e6,
            delta_t: 1e-9,
            t_total: 100e-6,
            slope_r: 0.0001,
            r_sec: 50.0,
            last_perc: 1.0,
        }
    }
}

impl CircuitParameters {
    /// Resonant period of the primary tank: 2π√(4·L2·C).
    pub fn period(&self) -> f64 {
        2.0 * PI * (4.0 * self.l2 * self.c).sqrt()
    }

    /// Resonant frequency (Hz).
    pub fn frequency(&self) -> f64 {
        1.0 / self.period()
    }

    /// Mutual inductance between a primary half and the secondary.
    pub fn mutual_inductance(&self) -> f64 {
        (self.l2 * self.l4).sqrt()
    }

    /// Time after which samples are recorded.
    pub fn recording_start(&self) -> f64 {
        self.t_total * (1.0 - self.last_perc / 100.0)
    }

    /// Approximate number of integration steps in one attempt.
    pub fn step_count(&self) -> f64 {
        self.t_total / self.delta_t
    }

    /// Convert a count of trailing points into a recorded percentage.
    pub fn last_perc_from_points(points: f64, t_total: f64, delta_t: f64) -> f64 {
        100.0 * points / (t_total / delta_t)
    }

    /// Copy with a different damping inductance.
    pub fn with_l1(mut self, l1: f64) -> Self {
        self.l1 = l1;
        self
    }

    /// Copy with a different time step.
    pub fn with_delta_t(mut self, delta_t: f64) -> Self {
        self.delta_t = delta_t;
        self
    }

    /// Copy with a different total time.
    pub fn with_t_total(mut self, t_total: f64) -> Self {
        self.t_total = t_total;
        self
    }

    /// Copy with a different recorded percentage.
    pub fn with_last_perc(mut self, last_perc: f64) -> Self {
        self.last_perc = last_perc;
        self
    }

    /// Copy with a different source voltage.
    pub fn with_voltage(mut self, v: f64) -> Self {
        self.v = v;
        self
    }
}

impl fmt::Display for CircuitParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "L1={} L2={} L4={} V={} C={} dt={} t_total={} slope={} R={} R_sec={} last={}%",
            self.l1,
            self.l2,
            self.l4,
            self.v,
            self.c,
            self.delta_t,
            self.t_total,
            self.slope_r,
            self.r_max,
            self.r_sec,
            self.last_perc
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_period_and_frequency() {
        let params = CircuitParameters::default();
        // 2π·√(4·100µ·10n) = 2π·2µ
        assert_relative_eq!(params.period(), 4.0 * PI * 1e-6, max_relative = 1e-12);
        assert_relative_eq!(params.frequency() * params.period(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_mutual_inductance() {
        let params = CircuitParameters::default();
        assert_relative_eq!(params.mutual_inductance(), (1e-9f64).sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_recording_start() {
        let params = CircuitParameters::default();
        assert_relative_eq!(params.recording_start(), 99e-6, max_relative = 1e-12);

        let all = params.with_last_perc(100.0);
        assert_eq!(all.recording_start(), 0.0);
    }

    #[test]
    fn test_last_perc_from_points() {
        // 1000 points out of 100k steps is 1%
        let perc = CircuitParameters::last_perc_from_points(1000.0, 100e-6, 1e-9);
        assert_relative_eq!(perc, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_builders_leave_original_untouched() {
        let params = CircuitParameters::default();
        let retried = params.with_l1(0.2).with_delta_t(0.5e-9);
        assert_eq!(params.l1, 0.1);
        assert_eq!(retried.l1, 0.2);
        assert_eq!(retried.delta_t, 0.5e-9);
        assert_eq!(retried.l2, params.l2);
    }
}
