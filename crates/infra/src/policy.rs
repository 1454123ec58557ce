//! Pluggable processing outcome policy.
//!
//! The worker drives each photo through the policy between the Processing
//! and Completed/Failed transitions. Real image processing would implement
//! [`ProcessingPolicy`]; the default [`SimulatedPolicy`] stands in with a
//! bounded random delay and a fixed success probability.

use std::thread;
use std::time::Duration;

use rand::Rng;

use photoflow_photos::Photo;

/// Outcome of running the processing step for one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    Success,
    Failure(String),
}

/// Processing step interface.
///
/// `run` may take time and may fail; it must eventually return — a policy
/// that never completes stalls the single worker, which has no built-in
/// timeout for stuck work.
pub trait ProcessingPolicy: Send + Sync {
    fn run(&self, photo: &Photo) -> PolicyOutcome;
}

impl<F> ProcessingPolicy for F
where
    F: Fn(&Photo) -> PolicyOutcome + Send + Sync,
{
    fn run(&self, photo: &Photo) -> PolicyOutcome {
        self(photo)
    }
}

/// Simulated processing: sleep a random bounded delay, then succeed with a
/// fixed probability.
#[derive(Debug, Clone)]
pub struct SimulatedPolicy {
    pub success_rate: f64,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for SimulatedPolicy {
    fn default() -> Self {
        Self {
            success_rate: 0.9,
            min_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(3000),
        }
    }
}

impl SimulatedPolicy {
    /// Fast variant for tests: no delay, deterministic outcome.
    pub fn instant(success_rate: f64) -> Self {
        Self {
            success_rate,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

impl ProcessingPolicy for SimulatedPolicy {
    fn run(&self, _photo: &Photo) -> PolicyOutcome {
        let mut rng = rand::thread_rng();

        if self.max_delay > self.min_delay {
            let delay = rng.gen_range(self.min_delay..self.max_delay);
            thread::sleep(delay);
        } else if !self.min_delay.is_zero() {
            thread::sleep(self.min_delay);
        }

        if rng.r#gen::<f64>() < self.success_rate {
            PolicyOutcome::Success
        } else {
            PolicyOutcome::Failure("Processing failed: simulated error".to_string())
        }
    }
}
