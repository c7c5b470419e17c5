//! Periodic switch resistance.
//!
//! Each MOSFET of the driver is modeled as a resistor whose value follows the
//! resonant period. Within one period the switch ramps off, stays off, ramps
//! on and stays on:
//!
//! ```text
//!   R ─    ┌────────────┐
//!         /│            │\
//!        / │            │ \
//!   0 ─ /  │            │  \──────────
//!      0   p1           p2  p3        T
//! ```
//!
//! A slope near zero approximates an ideal switch; larger slopes smooth the
//! transitions and help the explicit integrator stay stable.

/// Region of the switching cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    /// Resistance rising from 0 to the maximum
    TurningOff,
    /// Resistance at the maximum
    Off,
    /// Resistance falling from the maximum to 0
    TurningOn,
    /// Resistance at 0
    On,
}

/// Piecewise-linear periodic resistance of one switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchResistance {
    /// End of the turning-off ramp
    p1: f64,
    /// End of the off plateau
    p2: f64,
    /// End of the turning-on ramp
    p3: f64,
    /// End of the period
    p4: f64,
    /// Switching period (s)
    period: f64,
    /// Resistance when fully off (ohms)
    max_resistance: f64,
}

impl SwitchResistance {
    /// Derive the breakpoints for a period, a slope and a maximum resistance.
    ///
    /// # Arguments
    /// * `period` - Resonant period T in seconds
    /// * `slope_percent` - Transition length in percent of the period
    /// * `max_resistance` - Resistance of a fully open switch
    pub fn new(period: f64, slope_percent: f64, max_resistance: f64) -> Self {
        let slope = slope_percent / 100.0;
        Self {
            p1: period * slope,
            p2: period / 2.0 - period * slope / 2.0,
            p3: period / 2.0 + period * slope / 2.0,
            p4: period,
            period,
            max_resistance,
        }
    }

    /// The four breakpoints `[p1, p2, p3, p4]` within one period.
    pub fn breakpoints(&self) -> [f64; 4] {
        [self.p1, self.p2, self.p3, self.p4]
    }

    /// Switching period.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Resistance of a fully open switch.
    pub fn max_resistance(&self) -> f64 {
        self.max_resistance
    }

    /// Map a time onto `[0, T)`.
    fn reduce(&self, t: f64) -> f64 {
        if (0.0..self.period).contains(&t) {
            return t;
        }
        let tau = self.period * (t / self.period).fract();
        if tau < 0.0 {
            tau + self.period
        } else {
            tau
        }
    }

    /// Resistance at time `t`.
    pub fn value(&self, t: f64) -> f64 {
        self.value_in_period(self.reduce(t))
    }

    /// Resistance of the complementary switch, `R - value(t)`.
    pub fn complement(&self, t: f64) -> f64 {
        self.max_resistance - self.value(t)
    }

    /// Resistance at a time already reduced to `[0, T)`.
    pub fn value_in_period(&self, tau: f64) -> f64 {
        match self.phase_in_period(tau) {
            SwitchPhase::TurningOff => self.max_resistance * (tau / self.p1),
            SwitchPhase::Off => self.max_resistance,
            SwitchPhase::TurningOn => {
                self.max_resistance * (1.0 - ((tau - self.p2) / (self.p3 - self.p2)))
            }
            SwitchPhase::On => 0.0,
        }
    }

    /// Phase of the cycle at time `t`.
    pub fn phase(&self, t: f64) -> SwitchPhase {
        self.phase_in_period(self.reduce(t))
    }

    fn phase_in_period(&self, tau: f64) -> SwitchPhase {
        if tau <= self.p1 {
            SwitchPhase::TurningOff
        } else if tau <= self.p2 {
            SwitchPhase::Off
        } else if tau <= self.p3 {
            SwitchPhase::TurningOn
        } else {
            SwitchPhase::On
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn switch() -> SwitchResistance {
        SwitchResistance::new(1e-5, 2.0, 1e6)
    }

    #[test]
    fn test_breakpoints() {
        let sw = switch();
        let [p1, p2, p3, p4] = sw.breakpoints();
        assert_relative_eq!(p1, 2e-7, max_relative = 1e-12);
        assert_relative_eq!(p2, 5e-6 - 1e-7, max_relative = 1e-12);
        assert_relative_eq!(p3, 5e-6 + 1e-7, max_relative = 1e-12);
        assert_eq!(p4, 1e-5);
    }

    #[test]
    fn test_exact_boundary_values() {
        // 2π√(4·100µ·10n), the reference driver's tank
        let reference = 2.0 * std::f64::consts::PI * (4.0 * 100e-6 * 10e-9f64).sqrt();
        let cases = [
            (1e-5, 2.0, 1e6),
            (1.2566e-5, 0.0001, 100e6),
            (reference, 0.0001, 100e6),
            (3.0, 20.0, 7.5),
        ];
        for (period, slope, r) in cases {
            let sw = SwitchResistance::new(period, slope, r);
            let [p1, p2, p3, _] = sw.breakpoints();
            let evaluators: [fn(&SwitchResistance, f64) -> f64; 2] =
                [SwitchResistance::value, SwitchResistance::value_in_period];
            for value in evaluators {
                assert_eq!(value(&sw, 0.0), 0.0);
                assert_eq!(value(&sw, p1), r, "value(p1), T = {}", period);
                assert_eq!(value(&sw, p2), r, "value(p2), T = {}", period);
                assert_eq!(value(&sw, p3), 0.0, "value(p3), T = {}", period);
                assert_eq!(value(&sw, 0.5 * (p3 + period)), 0.0);
            }
        }
    }

    #[test]
    fn test_time_inside_first_period_is_not_reduced() {
        let sw = switch();
        let [p1, p2, p3, _] = sw.breakpoints();
        for t in [0.0, p1 / 3.0, p1, p2, 0.5 * (p2 + p3), p3] {
            assert_eq!(sw.value(t), sw.value_in_period(t));
        }
    }

    #[test]
    fn test_ramps_are_linear() {
        let sw = switch();
        let [p1, p2, p3, _] = sw.breakpoints();
        assert_relative_eq!(sw.value(p1 / 2.0), 0.5e6, max_relative = 1e-9);
        assert_relative_eq!(sw.value(p2 + (p3 - p2) / 4.0), 0.75e6, max_relative = 1e-6);
    }

    #[test]
    fn test_periodicity() {
        let sw = switch();
        let period = sw.period();
        for i in 0..200 {
            let t = i as f64 * period / 173.0;
            for k in [1.0, 2.0, 17.0] {
                assert_abs_diff_eq!(sw.value(t), sw.value(t + k * period), epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_negative_time_wraps() {
        let sw = switch();
        let t = 3e-6;
        assert_abs_diff_eq!(sw.value(t - sw.period()), sw.value(t), epsilon = 1e-3);
    }

    #[test]
    fn test_complement_sums_to_max() {
        let sw = switch();
        for i in 0..50 {
            let t = i as f64 * 3.7e-7;
            assert_relative_eq!(sw.value(t) + sw.complement(t), 1e6, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_phases() {
        let sw = switch();
        assert_eq!(sw.phase(1e-7), SwitchPhase::TurningOff);
        assert_eq!(sw.phase(2e-6), SwitchPhase::Off);
        assert_eq!(sw.phase(5e-6), SwitchPhase::TurningOn);
        assert_eq!(sw.phase(8e-6), SwitchPhase::On);
        assert_eq!(sw.phase(1.01e-5), SwitchPhase::TurningOff);
    }
}
