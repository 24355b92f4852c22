use std::{fmt, path::PathBuf};

use anyhow::Context;
use azar_prob::{
    Event, Probability, SampleSpace, evaluator,
    simulation::{self, Simulation, SimulationSeed},
};
use rand::Rng as _;
use serde::Serialize;

use crate::util::{self, Format, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Problem file describing a sample space and named events
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Name of the event to estimate
    #[arg(long)]
    event: String,
    /// Number of draws with replacement
    #[arg(long, default_value_t = 10_000)]
    trials: u64,
    /// 32-character hex seed; random when omitted
    #[arg(long, value_parser = SimulationSeed::from_hex)]
    seed: Option<SimulationSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "text")]
    format: Format,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        file,
        event,
        trials,
        seed,
        output,
        format,
    } = arg;
    let problem = util::read_problem_file(file)?;
    let (space, events) = problem.build();
    let target = events.get(event).with_context(|| {
        format!(
            "Unknown event '{event}' in {} (available: {})",
            file.display(),
            events.keys().cloned().collect::<Vec<_>>().join(", ")
        )
    })?;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(seed = %seed.to_hex(), trials, "Simulating event '{event}'");
    let report = SimulationReport::new(event, target, &space, *trials, seed)?;

    let mut output = Output::from_output_path(output.clone())?;
    output.write_report(*format, &report, &report.to_string())?;
    Ok(())
}

/// A Monte Carlo estimate next to the exact probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SimulationReport {
    pub(crate) event: String,
    pub(crate) seed: SimulationSeed,
    pub(crate) trials: u64,
    pub(crate) hits: u64,
    pub(crate) estimate: f64,
    pub(crate) exact: Probability,
    /// `estimate - exact`.
    pub(crate) error: f64,
}

impl SimulationReport {
    pub(crate) fn new<T>(
        name: &str,
        event: &Event<T>,
        space: &SampleSpace<T>,
        trials: u64,
        seed: SimulationSeed,
    ) -> anyhow::Result<Self>
    where
        T: Ord,
    {
        let exact = evaluator::probability(event, space)
            .with_context(|| format!("Failed to evaluate event '{name}'"))?;
        let hits = Simulation::with_seed(seed)
            .count_hits(event, space, trials)
            .with_context(|| format!("Failed to simulate event '{name}'"))?;
        let estimate = simulation::relative_frequency(hits, trials);
        Ok(Self {
            event: name.to_owned(),
            seed,
            trials,
            hits,
            estimate,
            exact,
            error: estimate - exact.to_f64(),
        })
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            event,
            seed,
            trials,
            hits,
            estimate,
            exact,
            error,
        } = self;
        writeln!(f, "Event:    {event}")?;
        writeln!(f, "Seed:     {}", seed.to_hex())?;
        writeln!(f, "Hits:     {hits} / {trials}")?;
        writeln!(f, "Estimate: {estimate:.5}")?;
        writeln!(f, "Exact:    {exact} ({exact:.5})")?;
        writeln!(f, "Error:    {error:+.5}")
    }
}
