use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use self::{
    describe::DescribeArg, evaluate::EvaluateArg, examples::ExamplesArg, simulate::SimulateArg,
    table::TableArg, tree::TreeArg,
};

mod describe;
mod evaluate;
mod examples;
mod simulate;
mod table;
mod tree;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug events to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the built-in worked examples
    Examples(#[clap(flatten)] ExamplesArg),
    /// Evaluate the events of a problem file
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Joint, marginal and conditional probabilities of a contingency table
    Table(#[clap(flatten)] TableArg),
    /// Path probabilities and posteriors of a probability tree
    Tree(#[clap(flatten)] TreeArg),
    /// Descriptive statistics, five-number summary and histogram of a dataset
    Describe(#[clap(flatten)] DescribeArg),
    /// Estimate an event's probability by simulation
    Simulate(#[clap(flatten)] SimulateArg),
}

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    setup_logging(args.verbose)?;
    match args.mode {
        Mode::Examples(arg) => examples::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Table(arg) => table::run(&arg)?,
        Mode::Tree(arg) => tree::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
