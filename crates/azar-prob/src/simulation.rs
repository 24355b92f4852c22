//! Monte Carlo estimation of event probabilities.
//!
//! Repeating an experiment many times and counting how often an event occurs
//! gives its relative frequency, which approaches the exact probability as the
//! number of trials grows. A [`Simulation`] runs such experiments on an
//! equally likely sample space with a seeded generator, so every estimate is
//! reproducible.
//!
//! # Examples
//!
//! ```
//! use azar_prob::{Event, SampleSpace, simulation::{Simulation, SimulationSeed}};
//!
//! let die = SampleSpace::new(1..=6);
//! let five = Event::new([5]);
//!
//! let seed = SimulationSeed::from_bytes([7; 16]);
//! let estimate = Simulation::with_seed(seed).estimate(&five, &die, 60_000).unwrap();
//! assert!((estimate - 1.0 / 6.0).abs() < 0.02);
//! ```

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    probability::ProbabilityError,
    space::{Event, SampleSpace},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum SimulationError {
    #[display("at least one trial is required")]
    #[from(ignore)]
    NoTrials,
    #[display("{_0}")]
    Probability(ProbabilityError),
}

/// A 128-bit seed for reproducible simulations.
///
/// Serialized as a 32-character lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSeed([u8; 16]);

impl SimulationSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Parses a 32-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, String> {
        if hex_str.len() != 32 {
            return Err(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            ));
        }
        let num = u128::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex: {hex_str} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for SimulationSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SimulationSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<SimulationSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SimulationSeed(seed)
    }
}

/// Draws outcomes uniformly at random, with replacement, from a sample space.
#[derive(Debug, Clone)]
pub struct Simulation {
    seed: SimulationSeed,
    rng: Pcg32,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates a simulation with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but deterministic.
    #[must_use]
    pub fn with_seed(seed: SimulationSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    #[must_use]
    pub fn seed(&self) -> SimulationSeed {
        self.seed
    }

    /// Draws one outcome, or `None` if the space is empty.
    pub fn sample<'a, T>(&mut self, space: &'a SampleSpace<T>) -> Option<&'a T>
    where
        T: Ord,
    {
        if space.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..space.len());
        space.iter().nth(index)
    }

    /// Counts how many of `trials` draws from `space` land in `event`.
    pub fn count_hits<T>(
        &mut self,
        event: &Event<T>,
        space: &SampleSpace<T>,
        trials: u64,
    ) -> Result<u64, SimulationError>
    where
        T: Ord,
    {
        if trials == 0 {
            return Err(SimulationError::NoTrials);
        }
        if space.is_empty() {
            return Err(ProbabilityError::DivisionByZero.into());
        }
        // index once so each draw is O(1)
        let outcomes = space.iter().collect::<Vec<_>>();
        let mut hits = 0;
        for _ in 0..trials {
            let outcome = outcomes[self.rng.random_range(0..outcomes.len())];
            if event.contains(outcome) {
                hits += 1;
            }
        }
        tracing::debug!(trials, hits, seed = %self.seed.to_hex(), "simulation finished");
        Ok(hits)
    }

    /// Relative frequency of `event` over `trials` draws from `space`.
    pub fn estimate<T>(
        &mut self,
        event: &Event<T>,
        space: &SampleSpace<T>,
        trials: u64,
    ) -> Result<f64, SimulationError>
    where
        T: Ord,
    {
        let hits = self.count_hits(event, space, trials)?;
        Ok(relative_frequency(hits, trials))
    }
}

/// `hits / trials` as a float, the estimate reported for a run of
/// [`Simulation::count_hits`].
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn relative_frequency(hits: u64, trials: u64) -> f64 {
    hits as f64 / trials as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_estimate() {
        let space = SampleSpace::new(1..=6).power(2);
        let seven = space.filter(|roll| roll.iter().sum::<u32>() == 7);
        let seed = SimulationSeed::from_bytes([42; 16]);
        let a = Simulation::with_seed(seed)
            .count_hits(&seven, &space, 5_000)
            .unwrap();
        let b = Simulation::with_seed(seed)
            .count_hits(&seven, &space, 5_000)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_estimate_converges() {
        let space = SampleSpace::new(1..=6).power(2);
        let five_or_six = space.filter(|roll| matches!(roll.iter().sum::<u32>(), 5 | 6));
        let estimate = Simulation::with_seed(SimulationSeed::from_bytes([1; 16]))
            .estimate(&five_or_six, &space, 100_000)
            .unwrap();
        assert!((estimate - 0.25).abs() < 0.01, "estimate {estimate}");
    }

    #[test]
    fn test_certain_and_impossible_events() {
        let space = SampleSpace::new(['a', 'b', 'c']);
        let mut sim = Simulation::with_seed(SimulationSeed::from_bytes([0; 16]));
        assert_eq!(sim.estimate(&space.certain_event(), &space, 100).unwrap(), 1.0);
        assert_eq!(sim.estimate(&Event::new(['z']), &space, 100).unwrap(), 0.0);
    }

    #[test]
    fn test_errors() {
        let mut sim = Simulation::new();
        let space = SampleSpace::new([1]);
        assert_eq!(
            sim.estimate(&Event::new([1]), &space, 0),
            Err(SimulationError::NoTrials)
        );
        let empty = SampleSpace::<i32>::new([]);
        assert_eq!(
            sim.estimate(&Event::new([1]), &empty, 10),
            Err(SimulationError::Probability(ProbabilityError::DivisionByZero))
        );
        assert_eq!(sim.sample(&empty), None);
        assert_eq!(sim.sample(&space), Some(&1));
    }

    #[test]
    fn test_seed_hex_format() {
        let seed = SimulationSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        let deserialized: SimulationSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
        assert_eq!(SimulationSeed::from_bytes([0; 16]).to_hex(), "0".repeat(32));
        assert_eq!(
            SimulationSeed::from_bytes([0xFF; 16]).to_hex(),
            "f".repeat(32)
        );
        assert!(SimulationSeed::from_hex("abc").is_err());
        assert!(SimulationSeed::from_hex("zz23456789abcdeffedcba9876543210").is_err());
    }
}
