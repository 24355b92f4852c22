//! Sequential draws without replacement.
//!
//! An [`Urn`] is an inventory of items grouped by category. Every draw removes
//! one item, so the probability of each later draw is conditional on the
//! earlier ones.
//!
//! # Examples
//!
//! ```
//! use azar_prob::urn::Urn;
//!
//! // 2500 chips from supplier 1, 7500 from supplier 2
//! let mut chips = Urn::new([(1, 2500), (2, 7500)]);
//! chips.draw_sequence([1, 1]).unwrap();
//!
//! let third = chips.probability_of(&1).unwrap();
//! assert_eq!(third.to_string(), "1249/4999"); // 2498/9998
//! ```

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::probability::{Probability, ProbabilityError, count_total};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum UrnError {
    #[display("unknown category '{category}'")]
    #[from(ignore)]
    UnknownCategory { category: String },
    #[display("no items of category '{category}' left")]
    #[from(ignore)]
    Exhausted { category: String },
    #[display("{_0}")]
    Probability(ProbabilityError),
}

/// A finite inventory of items by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K> Urn<K>
where
    K: Ord + Clone + fmt::Display,
{
    pub fn new<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
    {
        Self {
            counts: counts.into_iter().collect(),
        }
    }

    /// Number of items of `category` still in the urn.
    #[must_use]
    pub fn count(&self, category: &K) -> Option<u64> {
        self.counts.get(category).copied()
    }

    /// Number of items left in the urn.
    pub fn total(&self) -> Result<u64, ProbabilityError> {
        count_total(self.counts.values().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// Probability that the next draw is of `category`.
    ///
    /// # Errors
    ///
    /// [`UrnError::UnknownCategory`] for a category the urn never held, and
    /// [`ProbabilityError::DivisionByZero`] when the urn is empty.
    pub fn probability_of(&self, category: &K) -> Result<Probability, UrnError> {
        let count = self.count(category).ok_or_else(|| UrnError::UnknownCategory {
            category: category.to_string(),
        })?;
        Ok(Probability::new(count, self.total()?)?)
    }

    /// Removes one item of `category`.
    pub fn draw(&mut self, category: &K) -> Result<(), UrnError> {
        let count = self
            .counts
            .get_mut(category)
            .ok_or_else(|| UrnError::UnknownCategory {
                category: category.to_string(),
            })?;
        if *count == 0 {
            return Err(UrnError::Exhausted {
                category: category.to_string(),
            });
        }
        *count -= 1;
        tracing::trace!(%category, remaining = *count, "drew item");
        Ok(())
    }

    /// Removes one item per category in `sequence`, in order.
    ///
    /// Stops at the first failing draw; the draws before it stay applied.
    pub fn draw_sequence<I>(&mut self, sequence: I) -> Result<(), UrnError>
    where
        I: IntoIterator<Item = K>,
    {
        for category in sequence {
            self.draw(&category)?;
        }
        Ok(())
    }

    /// Probability of drawing exactly `sequence`, in order, from the urn as it
    /// is now.
    ///
    /// This is the product of the branch probabilities along one path of the
    /// tree diagram, `P(E1) · P(E2 | E1) · P(E3 | E1 ∩ E2) · ...`. The urn
    /// itself is left untouched. A sequence that asks for more items than
    /// are left has probability zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use azar_prob::urn::Urn;
    ///
    /// let students = Urn::new([("left", 4), ("right", 24)]);
    /// let both_left = students.sequence_probability(["left", "left"]).unwrap();
    /// assert_eq!(both_left.to_string(), "1/63"); // 4/28 · 3/27
    /// ```
    pub fn sequence_probability<I>(&self, sequence: I) -> Result<Probability, UrnError>
    where
        I: IntoIterator<Item = K>,
    {
        let mut scratch = self.clone();
        let mut joint = Probability::ONE;
        for category in sequence {
            match scratch.count(&category) {
                None => {
                    return Err(UrnError::UnknownCategory {
                        category: category.to_string(),
                    });
                }
                Some(0) => return Ok(Probability::ZERO),
                Some(_) => {}
            }
            let step = scratch.probability_of(&category)?;
            joint = joint.checked_mul(step)?;
            scratch.draw(&category)?;
        }
        Ok(joint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Probability {
        s.parse().unwrap()
    }

    fn chips() -> Urn<u8> {
        Urn::new([(1, 2500), (2, 7500)])
    }

    #[test]
    fn test_third_chip_after_two_from_supplier_one() {
        let mut urn = chips();
        assert_eq!(urn.probability_of(&1).unwrap(), p("1/4"));
        urn.draw_sequence([1, 1]).unwrap();
        assert_eq!(urn.count(&1), Some(2498));
        assert_eq!(urn.total(), Ok(9998));
        assert_eq!(urn.probability_of(&1).unwrap(), p("2498/9998"));
        assert_eq!(format!("{:.5}", urn.probability_of(&1).unwrap()), "0.24985");
    }

    #[test]
    fn test_third_chip_after_two_from_supplier_two() {
        let mut urn = chips();
        urn.draw_sequence([2, 2]).unwrap();
        assert_eq!(urn.probability_of(&1).unwrap(), p("2500/9998"));
    }

    #[test]
    fn test_sequence_probability_leaves_urn_unchanged() {
        let urn = chips();
        let joint = urn.sequence_probability([1, 1, 1]).unwrap();
        let expected = p("2500/10000")
            .checked_mul(p("2499/9999"))
            .unwrap()
            .checked_mul(p("2498/9998"))
            .unwrap();
        assert_eq!(joint, expected);
        assert_eq!(urn, chips());
    }

    #[test]
    fn test_handedness_tree_branches() {
        let students = Urn::new([('L', 4), ('R', 24)]);
        let paths = [['L', 'L'], ['L', 'R'], ['R', 'L'], ['R', 'R']];
        let total = paths
            .iter()
            .map(|path| students.sequence_probability(*path).unwrap())
            .try_fold(Probability::ZERO, Probability::checked_add)
            .unwrap();
        assert_eq!(total, Probability::ONE);
        assert_eq!(
            students.sequence_probability(['R', 'L']).unwrap(),
            p("24/28").checked_mul(p("4/27")).unwrap()
        );
    }

    #[test]
    fn test_total_that_overflows_is_an_error() {
        let urn = Urn::new([(1, u64::MAX), (2, 1)]);
        assert_eq!(urn.total(), Err(ProbabilityError::Overflow));
        assert_eq!(
            urn.probability_of(&2),
            Err(UrnError::Probability(ProbabilityError::Overflow))
        );
        assert_eq!(
            urn.sequence_probability([2]),
            Err(UrnError::Probability(ProbabilityError::Overflow))
        );
    }

    #[test]
    fn test_errors() {
        let mut urn = Urn::new([("a", 1), ("b", 0)]);
        assert_eq!(
            urn.draw(&"c"),
            Err(UrnError::UnknownCategory {
                category: "c".to_owned()
            })
        );
        assert_eq!(
            urn.draw(&"b"),
            Err(UrnError::Exhausted {
                category: "b".to_owned()
            })
        );
        urn.draw(&"a").unwrap();
        assert_eq!(
            urn.probability_of(&"a"),
            Err(UrnError::Probability(ProbabilityError::DivisionByZero))
        );
        assert_eq!(
            Urn::new([("a", 1)]).sequence_probability(["a", "a"]).unwrap(),
            Probability::ZERO
        );
    }
}
