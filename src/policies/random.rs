use super::{Policy, PolicyError};
use crate::spaces::SampleSpace;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;

/// A policy that always acts uniformly at random.
///
/// The action space is supplied explicitly at construction.
#[derive(Debug, Clone)]
pub struct RandomPolicy<AS> {
    action_space: AS,
    rng: StdRng,
}

impl<AS: SampleSpace> RandomPolicy<AS> {
    pub fn new(action_space: AS, seed: u64) -> Self {
        Self {
            action_space,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub const fn action_space(&self) -> &AS {
        &self.action_space
    }
}

impl<O: ?Sized, AS: SampleSpace> Policy<O, AS::Element> for RandomPolicy<AS> {
    fn act(&mut self, _observation: &O) -> Result<AS::Element, PolicyError> {
        Ok(self.action_space.sample(&mut self.rng))
    }
}

impl<AS: fmt::Display> fmt::Display for RandomPolicy<AS> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RandomPolicy({})", self.action_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaces::IndexSpace;

    #[test]
    fn actions_in_space() {
        let mut policy = RandomPolicy::new(IndexSpace::new(6), 0);
        for _ in 0..100 {
            let action: usize = policy.act(&()).unwrap();
            assert!(action < 6);
        }
    }

    #[test]
    fn same_seed_same_actions() {
        let mut a = RandomPolicy::new(IndexSpace::new(10), 7);
        let mut b = RandomPolicy::new(IndexSpace::new(10), 7);
        let xs: Vec<usize> = (0..20).map(|_| a.act(&()).unwrap()).collect();
        let ys: Vec<usize> = (0..20).map(|_| b.act(&()).unwrap()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn covers_all_actions() {
        let mut policy = RandomPolicy::new(IndexSpace::new(3), 1);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let action: usize = policy.act(&0_u8).unwrap();
            seen[action] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn display() {
        let policy = RandomPolicy::new(IndexSpace::new(3), 1);
        assert_eq!(policy.to_string(), "RandomPolicy(IndexSpace(3))");
    }
}
