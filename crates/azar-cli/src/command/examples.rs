use std::{collections::BTreeMap, fmt, path::PathBuf};

use anyhow::Context;
use azar_prob::{
    Event, Probability, SampleSpace,
    contingency::ContingencyTable,
    tree::{Branch, ProbabilityTree},
    urn::{Urn, UrnError},
};
use serde::Serialize;

use crate::{
    command::{evaluate::ProblemReport, table::TableReport, tree::TreeReport},
    schema::problem::{Outcome, SpaceSpec},
    util::{Format, Output},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub(crate) enum Example {
    Dice,
    Coordinates,
    Cards,
    Chips,
    Breakfast,
    Fuel,
    Handedness,
}

impl Example {
    const ALL: [Example; 7] = [
        Example::Dice,
        Example::Coordinates,
        Example::Cards,
        Example::Chips,
        Example::Breakfast,
        Example::Fuel,
        Example::Handedness,
    ];

    fn title(self) -> &'static str {
        match self {
            Example::Dice => "Sums of two dice",
            Example::Coordinates => "Coordinate pairs (i, j) with 1 ≤ i ≤ 3, 2 ≤ j ≤ 4",
            Example::Cards => "A deck of 52 cards",
            Example::Chips => "Chips from two suppliers, drawn without replacement",
            Example::Breakfast => "Breakfast habits by gender",
            Example::Fuel => "Fuel grade and payment method",
            Example::Handedness => "Left- and right-handed students, two chosen",
        }
    }

    fn evaluate(self) -> anyhow::Result<ExampleReport> {
        let report = match self {
            Example::Dice => ExampleReport::Problem(dice()?),
            Example::Coordinates => ExampleReport::Problem(coordinates()?),
            Example::Cards => ExampleReport::Problem(cards()?),
            Example::Chips => ExampleReport::Draws(chips()?),
            Example::Breakfast => ExampleReport::Table(breakfast()?),
            Example::Fuel => ExampleReport::Tree(fuel()?),
            Example::Handedness => ExampleReport::Draws(handedness()?),
        };
        Ok(report)
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ExamplesArg {
    /// Run only this example (dice, coordinates, cards, chips, breakfast, fuel, handedness)
    #[arg(long)]
    name: Option<Example>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "text")]
    format: Format,
}

pub(crate) fn run(arg: &ExamplesArg) -> anyhow::Result<()> {
    let ExamplesArg {
        name,
        output,
        format,
    } = arg;
    let selected = name.map_or(Example::ALL.to_vec(), |name| vec![name]);

    let mut reports = vec![];
    for example in selected {
        tracing::debug!(%example, "Running example");
        let report = example
            .evaluate()
            .with_context(|| format!("Failed to run example: {example}"))?;
        reports.push(NamedReport {
            name: example.to_string().to_lowercase(),
            title: example.title(),
            report,
        });
    }

    let text = reports
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    let mut output = Output::from_output_path(output.clone())?;
    output.write_report(*format, &reports, &text)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct NamedReport {
    name: String,
    title: &'static str,
    report: ExampleReport,
}

impl fmt::Display for NamedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {}: {} ==", self.name, self.title)?;
        writeln!(f)?;
        match &self.report {
            ExampleReport::Problem(report) => write!(f, "{report}"),
            ExampleReport::Table(report) => write!(f, "{report}"),
            ExampleReport::Tree(report) => write!(f, "{report}"),
            ExampleReport::Draws(report) => write!(f, "{report}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ExampleReport {
    Problem(ProblemReport),
    Table(TableReport),
    Tree(TreeReport),
    Draws(DrawReport),
}

/// Sequences of draws without replacement from one urn.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct DrawReport {
    urn: Urn<String>,
    sequences: Vec<SequenceReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SequenceReport {
    draws: Vec<String>,
    /// Probability of drawing exactly `draws`, in order.
    probability: Probability,
    /// Probability of each category on the following draw.
    next: BTreeMap<String, Probability>,
}

impl DrawReport {
    fn new(urn: Urn<String>, sequences: &[&[&str]]) -> Result<Self, UrnError> {
        let sequences = sequences
            .iter()
            .map(|draws| {
                let draws = draws.iter().map(|d| (*d).to_owned()).collect::<Vec<_>>();
                let probability = urn.sequence_probability(draws.iter().cloned())?;
                let mut after = urn.clone();
                after.draw_sequence(draws.iter().cloned())?;
                let next = after
                    .iter()
                    .map(|(category, _)| Ok((category.clone(), after.probability_of(category)?)))
                    .collect::<Result<_, UrnError>>()?;
                Ok(SequenceReport {
                    draws,
                    probability,
                    next,
                })
            })
            .collect::<Result<Vec<_>, UrnError>>()?;
        Ok(Self { urn, sequences })
    }
}

impl fmt::Display for DrawReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contents = self
            .urn
            .iter()
            .map(|(category, count)| format!("{count} {category}"))
            .collect::<Vec<_>>();
        writeln!(f, "Urn: {}", contents.join(", "))?;
        for sequence in &self.sequences {
            let draws = sequence.draws.join(", ");
            writeln!(f)?;
            writeln!(
                f,
                "P({draws}) = {} ({:.5})",
                sequence.probability, sequence.probability
            )?;
            for (category, p) in &sequence.next {
                writeln!(f, "  then P({category}) = {p} ({p:.5})")?;
            }
        }
        Ok(())
    }
}

fn is_prime(n: i64) -> bool {
    n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

fn dice() -> anyhow::Result<ProblemReport> {
    let space = SpaceSpec::Range {
        from: 1,
        to: 6,
        repeat: 2,
    }
    .build();
    let sum_is = |n: i64| space.filter(|roll| roll.sum() == Some(n));
    let events = BTreeMap::from([
        ("sum 5".to_owned(), sum_is(5)),
        ("sum 6".to_owned(), sum_is(6)),
        (
            "doubles".to_owned(),
            space.filter(|roll| roll.component(0) == roll.component(1)),
        ),
    ]);
    ProblemReport::new(&space, &events)
}

fn coordinates() -> anyhow::Result<ProblemReport> {
    let range = |from, to| SpaceSpec::Range {
        from,
        to,
        repeat: 1,
    };
    let space = SpaceSpec::Product {
        product: vec![range(1, 3), range(2, 4)],
    }
    .build();
    let events = BTreeMap::from([
        (
            "A".to_owned(),
            space.filter(|pair| pair.sum().is_some_and(|s| s % 2 == 0)),
        ),
        (
            "B".to_owned(),
            space.filter(|pair| matches!(pair.component(0), Some(Outcome::Int(i)) if is_prime(*i))),
        ),
    ]);
    ProblemReport::new(&space, &events)
}

fn cards() -> anyhow::Result<ProblemReport> {
    let suits = ['♥', '♠', '♦', '♣'];
    let ranks = ["A", "K", "Q", "J", "10", "9", "8", "7", "6", "5", "4", "3", "2"];
    let deck = SampleSpace::new(
        ranks
            .iter()
            .flat_map(|r| suits.iter().map(move |s| Outcome::Text(format!("{r}{s}")))),
    );
    let cards_where = |predicate: fn(&str) -> bool| {
        deck.filter(|card| matches!(card, Outcome::Text(card) if predicate(card)))
    };
    let black = cards_where(|card| card.ends_with(['♠', '♣']));
    let events = BTreeMap::from([
        ("red".to_owned(), black.complement_in(&deck)),
        ("black".to_owned(), black),
        ("hearts".to_owned(), cards_where(|card| card.ends_with('♥'))),
        ("king".to_owned(), cards_where(|card| card.starts_with('K'))),
    ]);
    ProblemReport::new(&deck, &events)
}

fn chips() -> anyhow::Result<DrawReport> {
    let urn = Urn::new([
        ("supplier 1".to_owned(), 2500),
        ("supplier 2".to_owned(), 7500),
    ]);
    Ok(DrawReport::new(
        urn,
        &[
            &["supplier 1", "supplier 1"],
            &["supplier 2", "supplier 2"],
            &["supplier 1", "supplier 1", "supplier 1"],
        ],
    )?)
}

fn handedness() -> anyhow::Result<DrawReport> {
    let urn = Urn::new([("left".to_owned(), 4), ("right".to_owned(), 24)]);
    Ok(DrawReport::new(
        urn,
        &[
            &["left", "left"],
            &["left", "right"],
            &["right", "left"],
            &["right", "right"],
        ],
    )?)
}

fn breakfast() -> anyhow::Result<TableReport> {
    let table = ContingencyTable::new(
        ["regular", "irregular"],
        ["man", "woman"],
        vec![vec![190, 110], vec![110, 165]],
    )?;
    Ok(TableReport::new(&table)?)
}

fn fuel() -> anyhow::Result<TreeReport> {
    let p = |s: &str| s.parse::<Probability>();
    let payment = |credit: &str| -> anyhow::Result<Vec<Branch<String>>> {
        let credit = p(credit)?;
        Ok(vec![
            Branch::leaf("credit".to_owned(), credit),
            Branch::leaf("cash".to_owned(), credit.complement()),
        ])
    };
    let tree = ProbabilityTree::new(vec![
        Branch::new("regular".to_owned(), p("0.88")?, payment("0.28")?),
        Branch::new("midgrade".to_owned(), p("0.02")?, payment("0.34")?),
        Branch::new("premium".to_owned(), p("0.10")?, payment("0.42")?),
    ])?;
    Ok(TreeReport::new(&tree, Some("credit"))?)
}
