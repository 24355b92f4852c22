//! Exact probabilities of events over a finite, equally likely sample space.
//!
//! Every function here is built on one primitive,
//!
//! ```text
//! P(E) = |E ∩ S| / |S|
//! ```
//!
//! which fails only when `S` is empty. Outcomes of an event that are not in
//! the sample space are ignored.
//!
//! # Examples
//!
//! ```
//! use azar_prob::{Probability, SampleSpace, evaluator};
//!
//! let x = SampleSpace::new(1..=3);
//! let y = SampleSpace::new(2..=4);
//! let space = x.product(&y);
//!
//! let even_sum = space.filter(|(i, j)| (i + j) % 2 == 0);
//! let prime_first = space.filter(|(i, _)| [2, 3].contains(i));
//!
//! let p = |s: &str| s.parse::<Probability>().unwrap();
//! assert_eq!(evaluator::probability(&even_sum, &space).unwrap(), p("4/9"));
//! assert_eq!(evaluator::union(&even_sum, &prime_first, &space).unwrap(), p("7/9"));
//! assert_eq!(evaluator::conditional(&even_sum, &prime_first, &space).unwrap(), p("1/2"));
//! assert_eq!(evaluator::conditional(&prime_first, &even_sum, &space).unwrap(), p("3/4"));
//! ```

use crate::{
    probability::{Probability, ProbabilityError},
    space::{Event, SampleSpace},
};

/// The probability of `event` in `space`.
///
/// # Errors
///
/// Returns [`ProbabilityError::DivisionByZero`] if `space` is empty.
pub fn probability<T>(
    event: &Event<T>,
    space: &SampleSpace<T>,
) -> Result<Probability, ProbabilityError>
where
    T: Ord,
{
    Probability::from_counts(event.count_in(space), space.len())
}

/// `P(E') = 1 - P(E)`.
pub fn complement<T>(
    event: &Event<T>,
    space: &SampleSpace<T>,
) -> Result<Probability, ProbabilityError>
where
    T: Ord,
{
    Ok(probability(event, space)?.complement())
}

/// `P(A ∩ B)`.
pub fn intersection<T>(
    a: &Event<T>,
    b: &Event<T>,
    space: &SampleSpace<T>,
) -> Result<Probability, ProbabilityError>
where
    T: Ord + Clone,
{
    probability(&(a & b), space)
}

/// `P(A ∪ B) = P(A) + P(B) - P(A ∩ B)`.
pub fn union<T>(
    a: &Event<T>,
    b: &Event<T>,
    space: &SampleSpace<T>,
) -> Result<Probability, ProbabilityError>
where
    T: Ord + Clone,
{
    let both = intersection(a, b, space)?;
    // subtract first so the running value never leaves [0, 1]
    probability(a, space)?
        .checked_sub(both)?
        .checked_add(probability(b, space)?)
}

/// `P(A ∪ B) = P(A) + P(B)` for mutually exclusive events.
///
/// # Panics
///
/// Panics if `a` and `b` share an outcome of `space`; use [`union`] for
/// events that may overlap.
pub fn union_exclusive<T>(
    a: &Event<T>,
    b: &Event<T>,
    space: &SampleSpace<T>,
) -> Result<Probability, ProbabilityError>
where
    T: Ord + Clone,
{
    assert!(
        (a & b).count_in(space) == 0,
        "events must be mutually exclusive"
    );
    probability(a, space)?.checked_add(probability(b, space)?)
}

/// `P(A | B) = P(A ∩ B) / P(B)`.
///
/// # Errors
///
/// Returns [`ProbabilityError::DivisionByZero`] if `space` is empty or if
/// `P(B) = 0`.
pub fn conditional<T>(
    a: &Event<T>,
    b: &Event<T>,
    space: &SampleSpace<T>,
) -> Result<Probability, ProbabilityError>
where
    T: Ord + Clone,
{
    let given = probability(b, space)?;
    let both = intersection(a, b, space)?;
    let result = both.checked_div(given);
    tracing::trace!(%both, %given, ok = result.is_ok(), "conditional probability");
    result
}

/// Whether `a` and `b` are mutually exclusive within `space`.
#[must_use]
pub fn are_mutually_exclusive<T>(a: &Event<T>, b: &Event<T>, space: &SampleSpace<T>) -> bool
where
    T: Ord + Clone,
{
    (a & b).count_in(space) == 0
}

/// Whether `a` and `b` are independent: `P(A ∩ B) = P(A) · P(B)`.
///
/// The comparison is exact, so no tolerance is involved. When `P(B) > 0` this
/// is the same as `P(A | B) = P(A)`.
pub fn are_independent<T>(
    a: &Event<T>,
    b: &Event<T>,
    space: &SampleSpace<T>,
) -> Result<bool, ProbabilityError>
where
    T: Ord + Clone,
{
    let product = probability(a, space)?.checked_mul(probability(b, space)?)?;
    Ok(intersection(a, b, space)? == product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Probability {
        s.parse().unwrap()
    }

    fn is_prime(n: u32) -> bool {
        n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    fn die() -> SampleSpace<u32> {
        SampleSpace::new(1..=6)
    }

    #[test]
    fn test_single_die() {
        let space = die();
        assert_eq!(probability(&Event::new([5]), &space).unwrap(), p("1/6"));
        assert_eq!(probability(&Event::new([5, 6]), &space).unwrap(), p("1/3"));
        assert_eq!(
            probability(&space.filter(|n| n % 2 == 0), &space).unwrap(),
            p("1/2")
        );
    }

    #[test]
    fn test_empty_space_is_division_by_zero() {
        let space = SampleSpace::<u32>::new([]);
        assert_eq!(
            probability(&Event::new([1]), &space),
            Err(ProbabilityError::DivisionByZero)
        );
        assert_eq!(
            complement(&Event::empty(), &space),
            Err(ProbabilityError::DivisionByZero)
        );
    }

    #[test]
    fn test_no_overlap_is_zero_and_superset_is_one() {
        let space = die();
        assert_eq!(
            probability(&Event::new([7, 8]), &space).unwrap(),
            Probability::ZERO
        );
        assert_eq!(
            probability(&Event::new(0..=10), &space).unwrap(),
            Probability::ONE
        );
    }

    #[test]
    fn test_coordinate_pairs() {
        let space = SampleSpace::new(1..=3).product(&SampleSpace::new(2..=4));
        let a = space.filter(|(i, j)| (i + j) % 2 == 0);
        let b = space.filter(|(i, _)| is_prime(*i));

        assert_eq!(a, Event::new([(1, 3), (2, 2), (2, 4), (3, 3)]));
        assert_eq!(
            b,
            Event::new([(2, 2), (2, 3), (2, 4), (3, 2), (3, 3), (3, 4)])
        );
        assert_eq!(probability(&a, &space).unwrap(), p("4/9"));
        assert_eq!(probability(&b, &space).unwrap(), p("2/3"));
        assert_eq!(intersection(&a, &b, &space).unwrap(), p("1/3"));
        assert_eq!(union(&a, &b, &space).unwrap(), p("7/9"));
        assert_eq!(conditional(&a, &b, &space).unwrap(), p("1/2"));
        assert_eq!(conditional(&b, &a, &space).unwrap(), p("3/4"));
        assert_eq!(complement(&b, &space).unwrap(), p("1/3"));
        assert!(!are_independent(&a, &b, &space).unwrap());
    }

    #[test]
    fn test_two_dice_sums() {
        let space = die().power(2);
        let sum_is = |n: u32| space.filter(move |roll| roll.iter().sum::<u32>() == n);
        let five = sum_is(5);
        let six = sum_is(6);

        assert_eq!(five.len(), 4);
        assert_eq!(six.len(), 5);
        assert_eq!(probability(&five, &space).unwrap(), p("1/9"));
        assert_eq!(probability(&six, &space).unwrap(), p("5/36"));
        assert!(are_mutually_exclusive(&five, &six, &space));
        assert_eq!(union_exclusive(&five, &six, &space).unwrap(), p("1/4"));
        assert_eq!(union(&five, &six, &space).unwrap(), p("1/4"));
    }

    #[test]
    #[should_panic(expected = "mutually exclusive")]
    fn test_union_exclusive_rejects_overlap() {
        let space = die();
        let _ = union_exclusive(&Event::new([1, 2]), &Event::new([2, 3]), &space);
    }

    #[test]
    fn test_conditioning_on_impossible_event() {
        let space = die();
        assert_eq!(
            conditional(&Event::new([1]), &Event::new([9]), &space),
            Err(ProbabilityError::DivisionByZero)
        );
    }

    #[test]
    fn test_independence_on_die() {
        let space = die();
        let even = Event::new([2, 4, 6]);
        let low = Event::new([1, 2]);
        let prime = Event::new([2, 3, 5]);
        // P(even ∩ low) = 1/6 = 1/2 · 1/3
        assert!(are_independent(&even, &low, &space).unwrap());
        assert_eq!(
            conditional(&even, &low, &space).unwrap(),
            probability(&even, &space).unwrap()
        );
        assert!(!are_independent(&even, &prime, &space).unwrap());
        assert_eq!(conditional(&prime, &even, &space).unwrap(), p("1/3"));
    }

    #[test]
    fn test_card_deck() {
        let suits = ['♥', '♠', '♦', '♣'];
        let ranks = ["K", "Q", "J", "10", "9", "8", "7", "6", "5", "4", "3", "2", "1"];
        let deck = SampleSpace::new(
            ranks
                .iter()
                .flat_map(|r| suits.iter().map(move |s| format!("{r}{s}"))),
        );
        assert_eq!(deck.len(), 52);

        let black = deck.filter(|card| card.ends_with(['♠', '♣']));
        let red = black.complement_in(&deck);
        let p_black = probability(&black, &deck).unwrap();
        let p_red = probability(&red, &deck).unwrap();
        assert_eq!(p_black, p("1/2"));

        // at least one black card in two draws with replacement
        let direct = p_black
            .checked_mul(p_red)
            .unwrap()
            .checked_add(p_red.checked_mul(p_black).unwrap())
            .unwrap()
            .checked_add(p_black.checked_mul(p_black).unwrap())
            .unwrap();
        let via_complement = p_red.checked_mul(p_red).unwrap().complement();
        assert_eq!(direct, p("3/4"));
        assert_eq!(direct, via_complement);
    }
}
