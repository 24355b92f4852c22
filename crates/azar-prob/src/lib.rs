//! Exact probability over finite sample spaces.
//!
//! The central operation is the probability of an event in an equally likely
//! sample space, `P(E) = |E ∩ S| / |S|`, computed as an exact fraction. All
//! the rules of elementary probability (complement, union, conditional
//! probability, independence) are derived from it in [`evaluator`].
//!
//! # Modules
//!
//! - [`space`]: sample spaces and events as immutable sets of outcomes
//! - [`probability`]: exact probability values in lowest terms
//! - [`evaluator`]: the probability of events and the rules derived from it
//! - [`urn`]: sequential draws without replacement
//! - [`tree`]: probability tree diagrams, total probability and Bayes' rule
//! - [`contingency`]: joint, marginal and conditional probabilities from
//!   two-way tables of counts
//! - [`simulation`]: seeded Monte Carlo estimates of event probabilities
//!
//! # Examples
//!
//! ```
//! use azar_prob::{Event, Probability, SampleSpace, evaluator};
//!
//! let die = SampleSpace::new(1..=6);
//! let five_or_six = Event::new([5, 6]);
//!
//! let p = evaluator::probability(&five_or_six, &die).unwrap();
//! assert_eq!(p, Probability::new(1, 3).unwrap());
//! assert_eq!(evaluator::complement(&five_or_six, &die).unwrap().to_string(), "2/3");
//! ```

pub use self::{
    probability::{ParseProbabilityError, Probability, ProbabilityError},
    space::{Event, SampleSpace},
};

pub mod contingency;
pub mod evaluator;
pub mod probability;
pub mod simulation;
pub mod space;
pub mod tree;
pub mod urn;
