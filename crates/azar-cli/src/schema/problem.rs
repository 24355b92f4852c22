//! Probability problem files.
//!
//! A problem file names a sample space and any number of events:
//!
//! ```json
//! {
//!   "space": { "product": [{ "from": 1, "to": 3 }, { "from": 2, "to": 4 }] },
//!   "events": {
//!     "A": { "sum_multiple_of": 2 },
//!     "B": { "component": { "index": 0, "values": [2, 3] } },
//!     "C": [[1, 2], [1, 3]]
//!   }
//! }
//! ```

use std::{collections::BTreeMap, fmt};

use azar_prob::{Event, SampleSpace};
use serde::{Deserialize, Serialize};

/// A single outcome: an integer, a text label, or a tuple of outcomes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum Outcome {
    Int(i64),
    Text(String),
    Tuple(Vec<Outcome>),
}

impl Outcome {
    /// Sum of the integers in the outcome, `None` if any part is text or the
    /// sum overflows.
    pub(crate) fn sum(&self) -> Option<i64> {
        match self {
            Outcome::Int(n) => Some(*n),
            Outcome::Text(_) => None,
            Outcome::Tuple(parts) => parts
                .iter()
                .try_fold(0_i64, |acc, part| acc.checked_add(part.sum()?)),
        }
    }

    /// Component `index` of a tuple outcome.
    pub(crate) fn component(&self, index: usize) -> Option<&Outcome> {
        match self {
            Outcome::Tuple(parts) => parts.get(index),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Int(n) => write!(f, "{n}"),
            Outcome::Text(s) => write!(f, "{s}"),
            Outcome::Tuple(parts) => {
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{part}")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn one() -> usize {
    1
}

/// How a sample space is written in a problem file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum SpaceSpec {
    /// An explicit list of outcomes.
    Outcomes(Vec<Outcome>),
    /// The integers `from..=to`, or ordered `repeat`-tuples of them.
    Range {
        from: i64,
        to: i64,
        #[serde(default = "one")]
        repeat: usize,
    },
    /// The cartesian product of several spaces, as tuples.
    Product { product: Vec<SpaceSpec> },
}

impl SpaceSpec {
    pub(crate) fn build(&self) -> SampleSpace<Outcome> {
        match self {
            SpaceSpec::Outcomes(outcomes) => SampleSpace::new(outcomes.iter().cloned()),
            SpaceSpec::Range { from, to, repeat } => {
                let base = SampleSpace::new((*from..=*to).map(Outcome::Int));
                if *repeat == 1 {
                    base
                } else {
                    SampleSpace::new(base.power(*repeat).iter().cloned().map(Outcome::Tuple))
                }
            }
            SpaceSpec::Product { product } => {
                let mut tuples = vec![vec![]];
                for factor in product {
                    let factor = factor.build();
                    tuples = tuples
                        .into_iter()
                        .flat_map(|prefix: Vec<Outcome>| {
                            factor.iter().map(move |outcome| {
                                let mut next = prefix.clone();
                                next.push(outcome.clone());
                                next
                            })
                        })
                        .collect();
                }
                SampleSpace::new(tuples.into_iter().map(Outcome::Tuple))
            }
        }
    }
}

/// How an event is written: explicit outcomes or a rule over the space.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum EventSpec {
    Outcomes(Vec<Outcome>),
    Rule(EventRule),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum EventRule {
    /// Outcomes whose integer sum is one of the listed values.
    Sum(Vec<i64>),
    /// Outcomes whose integer sum is a multiple of the value.
    SumMultipleOf(i64),
    /// Tuples whose component at `index` is one of `values`.
    Component { index: usize, values: Vec<Outcome> },
    Union(Vec<EventSpec>),
    Intersection(Vec<EventSpec>),
    Not(Box<EventSpec>),
}

impl EventSpec {
    pub(crate) fn build(&self, space: &SampleSpace<Outcome>) -> Event<Outcome> {
        match self {
            EventSpec::Outcomes(outcomes) => Event::new(outcomes.iter().cloned()),
            EventSpec::Rule(rule) => rule.build(space),
        }
    }
}

impl EventRule {
    fn build(&self, space: &SampleSpace<Outcome>) -> Event<Outcome> {
        match self {
            EventRule::Sum(sums) => {
                space.filter(|o| o.sum().is_some_and(|s| sums.contains(&s)))
            }
            EventRule::SumMultipleOf(m) => {
                space.filter(|o| o.sum().and_then(|s| s.checked_rem(*m)) == Some(0))
            }
            EventRule::Component { index, values } => {
                space.filter(|o| o.component(*index).is_some_and(|c| values.contains(c)))
            }
            EventRule::Union(specs) => specs
                .iter()
                .fold(Event::empty(), |acc, spec| &acc | &spec.build(space)),
            EventRule::Intersection(specs) => specs
                .iter()
                .fold(space.certain_event(), |acc, spec| &acc & &spec.build(space)),
            EventRule::Not(spec) => spec.build(space).complement_in(space),
        }
    }
}

/// A problem file: a sample space and named events.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProblemFile {
    pub(crate) space: SpaceSpec,
    #[serde(default)]
    pub(crate) events: BTreeMap<String, EventSpec>,
}

impl ProblemFile {
    pub(crate) fn build(&self) -> (SampleSpace<Outcome>, BTreeMap<String, Event<Outcome>>) {
        let space = self.space.build();
        let events = self
            .events
            .iter()
            .map(|(name, spec)| (name.clone(), spec.build(&space)))
            .collect();
        (space, events)
    }
}
