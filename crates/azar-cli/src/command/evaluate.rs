use std::{collections::BTreeMap, fmt, path::PathBuf};

use anyhow::Context;
use azar_prob::{Event, Probability, ProbabilityError, SampleSpace, evaluator};
use serde::Serialize;

use crate::util::{self, Format, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Problem file describing a sample space and named events
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "text")]
    format: Format,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        file,
        output,
        format,
    } = arg;
    let problem = util::read_problem_file(file)?;
    let (space, events) = problem.build();
    tracing::info!(
        outcomes = space.len(),
        events = events.len(),
        "Evaluating {}",
        file.display()
    );
    let report = ProblemReport::new(&space, &events)
        .with_context(|| format!("Failed to evaluate problem: {}", file.display()))?;

    let mut output = Output::from_output_path(output.clone())?;
    output.write_report(*format, &report, &report.to_string())?;
    Ok(())
}

/// Probabilities of named events and of every pair of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ProblemReport {
    pub(crate) space_size: usize,
    pub(crate) events: Vec<EventReport>,
    pub(crate) pairs: Vec<PairReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct EventReport {
    pub(crate) name: String,
    /// Outcomes of the event that belong to the space.
    pub(crate) outcomes: Vec<String>,
    /// Outcomes named by the event but missing from the space.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) ignored: Vec<String>,
    pub(crate) probability: Probability,
    pub(crate) decimal: f64,
    pub(crate) complement: Probability,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PairReport {
    pub(crate) a: String,
    pub(crate) b: String,
    pub(crate) intersection: Probability,
    pub(crate) union: Probability,
    /// `P(A | B)`, `None` when `P(B) = 0`.
    pub(crate) a_given_b: Option<Probability>,
    /// `P(B | A)`, `None` when `P(A) = 0`.
    pub(crate) b_given_a: Option<Probability>,
    pub(crate) mutually_exclusive: bool,
    pub(crate) independent: bool,
}

impl ProblemReport {
    pub(crate) fn new<T>(
        space: &SampleSpace<T>,
        events: &BTreeMap<String, Event<T>>,
    ) -> anyhow::Result<Self>
    where
        T: Ord + Clone + fmt::Display,
    {
        anyhow::ensure!(!space.is_empty(), "sample space is empty");

        let events_report = events
            .iter()
            .map(|(name, event)| {
                let kept = event.restricted_to(space);
                if kept.len() < event.len() {
                    tracing::warn!(
                        event = %name,
                        ignored = event.len() - kept.len(),
                        "event names outcomes outside the sample space"
                    );
                }
                let probability = evaluator::probability(event, space)?;
                Ok(EventReport {
                    name: name.clone(),
                    outcomes: kept.iter().map(ToString::to_string).collect(),
                    ignored: event
                        .difference(&kept)
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    probability,
                    decimal: probability.to_f64(),
                    complement: evaluator::complement(event, space)?,
                })
            })
            .collect::<Result<Vec<_>, ProbabilityError>>()?;

        let named = events.iter().collect::<Vec<_>>();
        let mut pairs = vec![];
        for (i, (a_name, a)) in named.iter().enumerate() {
            for (b_name, b) in &named[i + 1..] {
                let mutually_exclusive = evaluator::are_mutually_exclusive(a, b, space);
                let union = if mutually_exclusive {
                    evaluator::union_exclusive(a, b, space)?
                } else {
                    evaluator::union(a, b, space)?
                };
                pairs.push(PairReport {
                    a: (*a_name).clone(),
                    b: (*b_name).clone(),
                    intersection: evaluator::intersection(a, b, space)?,
                    union,
                    a_given_b: defined(evaluator::conditional(a, b, space))?,
                    b_given_a: defined(evaluator::conditional(b, a, space))?,
                    mutually_exclusive,
                    independent: evaluator::are_independent(a, b, space)?,
                });
            }
        }

        tracing::debug!(pairs = pairs.len(), "problem evaluated");
        Ok(Self {
            space_size: space.len(),
            events: events_report,
            pairs,
        })
    }
}

/// Maps a division by zero to an undefined value.
fn defined(
    result: Result<Probability, ProbabilityError>,
) -> Result<Option<Probability>, ProbabilityError> {
    match result {
        Ok(p) => Ok(Some(p)),
        Err(ProbabilityError::DivisionByZero) => Ok(None),
        Err(e) => Err(e),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

struct Conditional(Option<Probability>);

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "{p}"),
            None => write!(f, "undefined"),
        }
    }
}

impl fmt::Display for ProblemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sample space: {} outcomes", self.space_size)?;
        for event in &self.events {
            writeln!(f)?;
            writeln!(f, "{} = {{{}}}", event.name, event.outcomes.join(", "))?;
            if !event.ignored.is_empty() {
                writeln!(f, "  ignored (not in space): {}", event.ignored.join(", "))?;
            }
            writeln!(
                f,
                "  P({}) = {} ({:.5})",
                event.name, event.probability, event.probability
            )?;
            writeln!(f, "  P({}') = {}", event.name, event.complement)?;
        }
        for pair in &self.pairs {
            let PairReport { a, b, .. } = pair;
            writeln!(f)?;
            writeln!(f, "{a} and {b}:")?;
            writeln!(f, "  P({a} ∩ {b}) = {}", pair.intersection)?;
            writeln!(f, "  P({a} ∪ {b}) = {}", pair.union)?;
            writeln!(f, "  P({a} | {b}) = {}", Conditional(pair.a_given_b))?;
            writeln!(f, "  P({b} | {a}) = {}", Conditional(pair.b_given_a))?;
            writeln!(f, "  mutually exclusive: {}", yes_no(pair.mutually_exclusive))?;
            writeln!(f, "  independent: {}", yes_no(pair.independent))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Probability {
        s.parse().unwrap()
    }

    fn die_problem() -> (SampleSpace<u32>, BTreeMap<String, Event<u32>>) {
        let space = SampleSpace::new(1..=6);
        let events = BTreeMap::from([
            ("even".to_owned(), Event::new([2, 4, 6])),
            ("low".to_owned(), Event::new([1, 2])),
            ("seven".to_owned(), Event::new([7])),
        ]);
        (space, events)
    }

    #[test]
    fn test_report_values() {
        let (space, events) = die_problem();
        let report = ProblemReport::new(&space, &events).unwrap();
        assert_eq!(report.space_size, 6);
        assert_eq!(report.events.len(), 3);
        assert_eq!(report.pairs.len(), 3);

        let even = &report.events[0];
        assert_eq!(even.name, "even");
        assert_eq!(even.probability, p("1/2"));
        assert_eq!(even.complement, p("1/2"));

        let seven = &report.events[2];
        assert_eq!(seven.probability, Probability::ZERO);
        assert!(seven.outcomes.is_empty());
        assert_eq!(seven.ignored, vec!["7".to_owned()]);

        let even_low = &report.pairs[0];
        assert_eq!((even_low.a.as_str(), even_low.b.as_str()), ("even", "low"));
        assert_eq!(even_low.intersection, p("1/6"));
        assert_eq!(even_low.union, p("2/3"));
        assert_eq!(even_low.a_given_b, Some(p("1/2")));
        assert_eq!(even_low.b_given_a, Some(p("1/3")));
        assert!(even_low.independent);
        assert!(!even_low.mutually_exclusive);
    }

    #[test]
    fn test_conditioning_on_impossible_event_is_undefined() {
        let (space, events) = die_problem();
        let report = ProblemReport::new(&space, &events).unwrap();
        let even_seven = &report.pairs[1];
        assert_eq!(even_seven.b, "seven");
        assert_eq!(even_seven.a_given_b, None);
        assert_eq!(even_seven.b_given_a, Some(Probability::ZERO));
        assert!(even_seven.mutually_exclusive);

        let text = report.to_string();
        assert!(text.contains("P(even | seven) = undefined"));
        assert!(text.contains("P(even) = 1/2 (0.50000)"));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["pairs"][1]["a_given_b"].is_null());
        assert_eq!(json["pairs"][0]["intersection"], "1/6");
    }

    #[test]
    fn test_empty_space_is_an_error() {
        let space = SampleSpace::<u32>::new([]);
        let err = ProblemReport::new(&space, &BTreeMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "sample space is empty");
    }
}
