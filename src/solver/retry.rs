//! Retry policy for diverging runs.
//!
//! When an attempt diverges, exactly one rule relaxes the parameters, the
//! first that matches:
//!
//! | Rule | Condition | Action |
//! |------|-----------|--------|
//! | [`RetryRule::DoubleL1`] | L1 < 1 | L1 ×= 2 |
//! | [`RetryRule::IncrementL1`] | L1 ≥ 1 and Δt ≤ 100 ns | L1 += 2 |
//! | [`RetryRule::HalveTimeStep`] | L1 ≥ 1 and Δt > 100 ns | Δt /= 2 |
//!
//! The relaxed values are then checked against the give-up thresholds
//! (L1 > 20 and Δt < 0.01 ns).

use log::{info, warn};

use crate::circuit::CircuitParameters;
use crate::error::Result;

use super::integrator::{Integrator, SimulationReport};
use super::sample::SimulationSink;
use super::{
    DEFAULT_MAX_ATTEMPTS, FINE_TIME_STEP, GIVE_UP_L1, GIVE_UP_TIME_STEP, L1_DOUBLING_LIMIT,
    L1_INCREMENT,
};

/// Rule applied after a diverged attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryRule {
    /// Double the damping inductance
    DoubleL1,
    /// Add a fixed amount to the damping inductance
    IncrementL1,
    /// Halve the time step
    HalveTimeStep,
}

/// Outcome of one retry decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryStep {
    /// Rule that fired
    pub rule: RetryRule,
    /// Damping inductance for the next attempt
    pub l1: f64,
    /// Time step for the next attempt
    pub delta_t: f64,
    /// Whether retrying should stop
    pub gave_up: bool,
}

impl RetryStep {
    /// Whether the rule changed the time step.
    pub fn changed_time_step(&self) -> bool {
        self.rule == RetryRule::HalveTimeStep
    }
}

/// Thresholds of the retry decision table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// L1 below which it is doubled
    pub l1_doubling_limit: f64,
    /// Amount added to L1 above the doubling limit
    pub l1_increment: f64,
    /// Time steps at or below this grow L1 instead of being halved
    pub fine_time_step: f64,
    /// Give up once L1 exceeds this...
    pub give_up_l1: f64,
    /// ...and the time step is below this
    pub give_up_time_step: f64,
    /// Give up after this many attempts
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            l1_doubling_limit: L1_DOUBLING_LIMIT,
            l1_increment: L1_INCREMENT,
            fine_time_step: FINE_TIME_STEP,
            give_up_l1: GIVE_UP_L1,
            give_up_time_step: GIVE_UP_TIME_STEP,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt cap.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Decide how to relax `(l1, delta_t)` after a diverged attempt.
    pub fn next(&self, l1: f64, delta_t: f64) -> RetryStep {
        let (rule, l1, delta_t) = if l1 < self.l1_doubling_limit {
            (RetryRule::DoubleL1, l1 * 2.0, delta_t)
        } else if delta_t <= self.fine_time_step {
            (RetryRule::IncrementL1, l1 + self.l1_increment, delta_t)
        } else {
            (RetryRule::HalveTimeStep, l1, delta_t / 2.0)
        };

        RetryStep {
            rule,
            l1,
            delta_t,
            gave_up: l1 > self.give_up_l1 && delta_t < self.give_up_time_step,
        }
    }
}

/// Apply the default decision table to a diverged `(l1, delta_t)`.
pub fn next_retry(l1: f64, delta_t: f64) -> RetryStep {
    RetryPolicy::default().next(l1, delta_t)
}

/// Result of a complete retry loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryOutcome {
    /// Parameters after the last decision
    pub parameters: CircuitParameters,
    /// Number of attempts run
    pub attempts: usize,
    /// Whether the last attempt completed without divergence
    pub converged: bool,
    /// Whether the loop stopped on a give-up threshold or the attempt cap
    pub gave_up: bool,
    /// Report of the last attempt
    pub last_report: SimulationReport,
}

/// Runs attempts until one converges or the policy gives up.
#[derive(Debug, Clone, Default)]
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    /// Create a controller with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller with a custom policy.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Policy in use.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Simulate `params`, relaxing them after every diverged attempt.
    ///
    /// Each attempt starts from a fresh state; the sink is told to discard
    /// the previous attempt's samples.
    pub fn run<S: SimulationSink + ?Sized>(
        &self,
        params: CircuitParameters,
        sink: &mut S,
    ) -> Result<RetryOutcome> {
        let mut params = params;
        let mut attempts = 0;

        loop {
            attempts += 1;
            let report = Integrator::new(params).simulate(sink)?;

            if !report.convergence_error {
                info!("Converged on attempt {} with {}", attempts, params);
                return Ok(RetryOutcome {
                    parameters: params,
                    attempts,
                    converged: true,
                    gave_up: false,
                    last_report: report,
                });
            }

            let step = self.policy.next(params.l1, params.delta_t);
            params = params.with_l1(step.l1).with_delta_t(step.delta_t);
            info!(
                "Attempt {} diverged at t = {:.4e} s, {:?}: L1 = {}, delta_t = {}",
                attempts, report.final_time, step.rule, step.l1, step.delta_t
            );
            sink.retry(&step);

            if step.gave_up || attempts >= self.policy.max_attempts {
                warn!(
                    "Giving up after {} attempts (L1 = {}, delta_t = {})",
                    attempts, params.l1, params.delta_t
                );
                sink.gave_up(&params);
                return Ok(RetryOutcome {
                    parameters: params,
                    attempts,
                    converged: false,
                    gave_up: true,
                    last_report: report,
                });
            }
        }
    }
}
