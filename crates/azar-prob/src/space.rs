//! Finite sample spaces and events.
//!
//! Both types are immutable sets of outcomes backed by a [`BTreeSet`], so
//! duplicates collapse on construction and iteration is always in sorted
//! order. Sorting only affects display; probabilities depend on counts alone.
//!
//! # Examples
//!
//! ```
//! use azar_prob::{Event, SampleSpace};
//!
//! let die = SampleSpace::new(1..=6);
//! let even = die.filter(|n| n % 2 == 0);
//! let prime = Event::new([2, 3, 5]);
//!
//! assert_eq!(&even & &prime, Event::new([2]));
//! assert_eq!((&even | &prime).len(), 5);
//! assert_eq!(even.complement_in(&die), Event::new([1, 3, 5]));
//! ```

use std::{
    collections::{BTreeSet, btree_set},
    ops::{BitAnd, BitOr, Sub},
};

use serde::{Deserialize, Serialize};

/// The finite set of all possible outcomes of a random experiment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSpace<T: Ord> {
    outcomes: BTreeSet<T>,
}

impl<T> SampleSpace<T>
where
    T: Ord,
{
    /// Builds a sample space from outcomes; repeated outcomes count once.
    pub fn new<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, outcome: &T) -> bool {
        self.outcomes.contains(outcome)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.outcomes.iter()
    }

    #[must_use]
    pub fn as_set(&self) -> &BTreeSet<T> {
        &self.outcomes
    }

    /// The event containing every outcome of the space.
    #[must_use]
    pub fn certain_event(&self) -> Event<T>
    where
        T: Clone,
    {
        Event {
            outcomes: self.outcomes.clone(),
        }
    }

    /// The event of the outcomes satisfying `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Event<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        Event::new(self.outcomes.iter().filter(|o| predicate(o)).cloned())
    }

    /// The cartesian product `self × other`, e.g. the coordinate pairs
    /// `{1,2,3} × {2,3,4}`.
    #[must_use]
    pub fn product<U>(&self, other: &SampleSpace<U>) -> SampleSpace<(T, U)>
    where
        T: Clone,
        U: Ord + Clone,
    {
        SampleSpace::new(
            self.outcomes
                .iter()
                .flat_map(|a| other.outcomes.iter().map(move |b| (a.clone(), b.clone()))),
        )
    }

    /// The space of ordered sequences of `n` outcomes, e.g. two dice rolled
    /// together is `die.power(2)`.
    #[must_use]
    pub fn power(&self, n: usize) -> SampleSpace<Vec<T>>
    where
        T: Clone,
    {
        let mut sequences = vec![vec![]];
        for _ in 0..n {
            sequences = sequences
                .into_iter()
                .flat_map(|prefix: Vec<T>| {
                    self.outcomes.iter().map(move |outcome| {
                        let mut next = prefix.clone();
                        next.push(outcome.clone());
                        next
                    })
                })
                .collect();
        }
        SampleSpace::new(sequences)
    }
}

impl<T> FromIterator<T> for SampleSpace<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a, T> IntoIterator for &'a SampleSpace<T>
where
    T: Ord,
{
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// A subset of outcomes.
///
/// An event is not tied to a particular space. When it is evaluated against
/// one, outcomes outside that space are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event<T: Ord> {
    outcomes: BTreeSet<T>,
}

impl<T> Default for Event<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Event<T>
where
    T: Ord,
{
    pub fn new<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    /// The impossible event.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            outcomes: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, outcome: &T) -> bool {
        self.outcomes.contains(outcome)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.outcomes.iter()
    }

    #[must_use]
    pub fn as_set(&self) -> &BTreeSet<T> {
        &self.outcomes
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        Self {
            outcomes: self.outcomes.intersection(&other.outcomes).cloned().collect(),
        }
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        Self {
            outcomes: self.outcomes.union(&other.outcomes).cloned().collect(),
        }
    }

    #[must_use]
    pub fn difference(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        Self {
            outcomes: self.outcomes.difference(&other.outcomes).cloned().collect(),
        }
    }

    /// The outcomes of `space` that are not in this event (`E'`).
    #[must_use]
    pub fn complement_in(&self, space: &SampleSpace<T>) -> Self
    where
        T: Clone,
    {
        Self {
            outcomes: space.outcomes.difference(&self.outcomes).cloned().collect(),
        }
    }

    /// The outcomes of this event that belong to `space`.
    #[must_use]
    pub fn restricted_to(&self, space: &SampleSpace<T>) -> Self
    where
        T: Clone,
    {
        Self {
            outcomes: self.outcomes.intersection(&space.outcomes).cloned().collect(),
        }
    }

    /// Number of outcomes shared with `space`, the favorable cases.
    #[must_use]
    pub fn count_in(&self, space: &SampleSpace<T>) -> usize {
        // iterate over the smaller set
        if self.outcomes.len() <= space.outcomes.len() {
            self.outcomes.iter().filter(|o| space.contains(o)).count()
        } else {
            space.outcomes.iter().filter(|o| self.contains(o)).count()
        }
    }

    #[must_use]
    pub fn is_subset_of(&self, space: &SampleSpace<T>) -> bool {
        self.outcomes.is_subset(&space.outcomes)
    }

    /// Whether the two events cannot occur together.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.outcomes.is_disjoint(&other.outcomes)
    }
}

impl<T> FromIterator<T> for Event<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a, T> IntoIterator for &'a Event<T>
where
    T: Ord,
{
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

impl<T> BitAnd for &Event<T>
where
    T: Ord + Clone,
{
    type Output = Event<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl<T> BitOr for &Event<T>
where
    T: Ord + Clone,
{
    type Output = Event<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl<T> Sub for &Event<T>
where
    T: Ord + Clone,
{
    type Output = Event<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let space = SampleSpace::new([3, 1, 3, 2, 1]);
        assert_eq!(space.len(), 3);
        assert_eq!(space.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_product_of_coordinates() {
        let x = SampleSpace::new(1..=3);
        let y = SampleSpace::new(2..=4);
        let pairs = x.product(&y);
        assert_eq!(pairs.len(), 9);
        assert!(pairs.contains(&(1, 2)));
        assert!(pairs.contains(&(3, 4)));
        assert!(!pairs.contains(&(4, 1)));
    }

    #[test]
    fn test_power_of_die() {
        let die = SampleSpace::new(1..=6);
        let two_dice = die.power(2);
        assert_eq!(two_dice.len(), 36);
        let sum_five = two_dice.filter(|roll| roll.iter().sum::<i32>() == 5);
        assert_eq!(sum_five.len(), 4);
        assert_eq!(die.power(0).len(), 1);
    }

    #[test]
    fn test_set_operators() {
        let a = Event::new([1, 2, 3]);
        let b = Event::new([3, 4]);
        assert_eq!(&a & &b, Event::new([3]));
        assert_eq!(&a | &b, Event::new([1, 2, 3, 4]));
        assert_eq!(&a - &b, Event::new([1, 2]));
        assert!(!a.is_disjoint(&b));
        assert!(Event::new([1]).is_disjoint(&Event::new([2])));
    }

    #[test]
    fn test_count_in_ignores_stray_outcomes() {
        let space = SampleSpace::new(1..=6);
        let event = Event::new([5, 6, 7, 8]);
        assert_eq!(event.count_in(&space), 2);
        assert!(!event.is_subset_of(&space));
        assert_eq!(event.restricted_to(&space), Event::new([5, 6]));
    }

    #[test]
    fn test_complement() {
        let space = SampleSpace::new(["a", "b", "c"]);
        let event = Event::new(["b", "z"]);
        assert_eq!(event.complement_in(&space), Event::new(["a", "c"]));
        assert_eq!(
            Event::empty().complement_in(&space),
            space.certain_event()
        );
    }

    #[test]
    fn test_serializes_as_sorted_array() {
        let space = SampleSpace::new(["hearts", "clubs", "spades"]);
        let json = serde_json::to_string(&space).unwrap();
        assert_eq!(json, r#"["clubs","hearts","spades"]"#);
        let event: Event<u32> = serde_json::from_str("[5, 1, 5]").unwrap();
        assert_eq!(event, Event::new([1, 5]));
    }
}
