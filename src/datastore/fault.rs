//! Induced fault strategies for the datastore client.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// Decides whether a datastore call fails before it touches storage.
#[derive(Debug, Default)]
pub enum FaultPolicy {
    /// Every call succeeds.
    #[default]
    Never,
    /// Each call fails independently with `probability`.
    Random {
        probability: f64,
        rng: Mutex<StdRng>,
    },
    /// Calls whose zero-based attempt number is listed fail.
    OnAttempts(BTreeSet<usize>),
}

impl FaultPolicy {
    /// Random faults; a seed makes the failure sequence reproducible.
    pub fn random(probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        FaultPolicy::Random {
            probability: if probability.is_nan() {
                0.0
            } else {
                probability.clamp(0.0, 1.0)
            },
            rng: Mutex::new(rng),
        }
    }

    pub fn on_attempts(attempts: impl IntoIterator<Item = usize>) -> Self {
        FaultPolicy::OnAttempts(attempts.into_iter().collect())
    }

    pub fn should_fail(&self, attempt: usize) -> bool {
        match self {
            FaultPolicy::Never => false,
            FaultPolicy::Random { probability, rng } => rng.lock().gen_bool(*probability),
            FaultPolicy::OnAttempts(attempts) => attempts.contains(&attempt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_does_not_fail() {
        let policy = FaultPolicy::Never;
        assert!((0..100).all(|attempt| !policy.should_fail(attempt)));
    }

    #[test]
    fn test_on_attempts_fails_only_listed_calls() {
        let policy = FaultPolicy::on_attempts([1, 3]);
        let outcomes: Vec<bool> = (0..5).map(|attempt| policy.should_fail(attempt)).collect();
        assert_eq!(outcomes, vec![false, true, false, true, false]);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let first = FaultPolicy::random(0.5, Some(7));
        let second = FaultPolicy::random(0.5, Some(7));
        let a: Vec<bool> = (0..32).map(|i| first.should_fail(i)).collect();
        let b: Vec<bool> = (0..32).map(|i| second.should_fail(i)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_probability_bounds() {
        let always = FaultPolicy::random(1.0, Some(1));
        let never = FaultPolicy::random(0.0, Some(1));
        assert!((0..20).all(|i| always.should_fail(i)));
        assert!((0..20).all(|i| !never.should_fail(i)));
    }
}
