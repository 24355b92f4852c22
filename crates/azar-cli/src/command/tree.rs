use std::{fmt, path::PathBuf};

use anyhow::Context;
use azar_prob::{
    Probability, ProbabilityError,
    tree::{ProbabilityTree, TreePath},
};
use serde::Serialize;

use crate::util::{self, Format, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TreeArg {
    /// Tree file (`tree` and an optional `given` leaf label)
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Leaf label to condition on, overriding `given` in the file
    #[arg(long)]
    given: Option<String>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "text")]
    format: Format,
}

pub(crate) fn run(arg: &TreeArg) -> anyhow::Result<()> {
    let TreeArg {
        file,
        given,
        output,
        format,
    } = arg;
    let tree_file = util::read_tree_file(file)?;
    let given = given.as_deref().or(tree_file.given.as_deref());
    tracing::info!(
        branches = tree_file.tree.branches().len(),
        given,
        "Evaluating {}",
        file.display()
    );
    let report = TreeReport::new(&tree_file.tree, given)
        .with_context(|| format!("Failed to evaluate tree: {}", file.display()))?;

    let mut output = Output::from_output_path(output.clone())?;
    output.write_report(*format, &report, &report.to_string())?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TreeReport {
    pub(crate) paths: Vec<TreePath<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) given: Option<GivenReport>,
}

/// Total probability of a leaf label and Bayes' rule on the first level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct GivenReport {
    pub(crate) leaf: String,
    pub(crate) probability: Probability,
    pub(crate) posteriors: Vec<PosteriorReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PosteriorReport {
    pub(crate) label: String,
    pub(crate) prior: Probability,
    /// `None` when the leaf has probability zero.
    pub(crate) posterior: Option<Probability>,
}

impl TreeReport {
    pub(crate) fn new(
        tree: &ProbabilityTree<String>,
        given: Option<&str>,
    ) -> Result<Self, ProbabilityError> {
        let paths = tree.paths()?;
        let given = given
            .map(|leaf| {
                let ends_in_leaf = |labels: &[String]| labels.last().is_some_and(|l| l == leaf);
                let probability = tree.probability_where(ends_in_leaf)?;
                let posteriors = tree
                    .branches()
                    .iter()
                    .map(|branch| {
                        let posterior = match tree.posterior(&branch.label, ends_in_leaf) {
                            Ok(p) => Some(p),
                            Err(ProbabilityError::DivisionByZero) => None,
                            Err(e) => return Err(e),
                        };
                        Ok(PosteriorReport {
                            label: branch.label.clone(),
                            prior: branch.probability,
                            posterior,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, ProbabilityError>(GivenReport {
                    leaf: leaf.to_owned(),
                    probability,
                    posteriors,
                })
            })
            .transpose()?;
        Ok(Self { paths, given })
    }
}

impl fmt::Display for TreeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Paths:")?;
        for path in &self.paths {
            writeln!(
                f,
                "  {}: {} ({:.4})",
                path.labels.join(" > "),
                path.probability,
                path.probability
            )?;
        }
        if let Some(given) = &self.given {
            let leaf = &given.leaf;
            writeln!(f)?;
            writeln!(
                f,
                "P({leaf}) = {} ({:.4})",
                given.probability, given.probability
            )?;
            for posterior in &given.posteriors {
                let label = &posterior.label;
                match posterior.posterior {
                    Some(p) => writeln!(f, "P({label} | {leaf}) = {p} ({p:.4})")?,
                    None => writeln!(f, "P({label} | {leaf}) = undefined")?,
                }
            }
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

    fn fuel() -> ProbabilityTree<String> {
        let json = r#"[
            { "label": "regular", "probability": "0.88", "children": [
                { "label": "credit", "probability": "0.28" },
                { "label": "cash", "probability": "0.72" } ] },
            { "label": "midgrade", "probability": "0.02", "children": [
                { "label": "credit", "probability": "0.34" },
                { "label": "cash", "probability": "0.66" } ] },
            { "label": "premium", "probability": "0.10", "children": [
                { "label": "credit", "probability": "0.42" },
                { "label": "cash", "probability": "0.58" } ] }
        ]"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_fuel_report() {
        let report = TreeReport::new(&fuel(), Some("credit")).unwrap();
        assert_eq!(report.paths.len(), 6);
        assert_eq!(report.paths[0].probability, p("0.2464"));

        let given = report.given.as_ref().unwrap();
        assert_eq!(given.probability, p("0.2952"));
        assert_eq!(given.posteriors[2].label, "premium");
        assert_eq!(given.posteriors[2].posterior, Some(p("35/246")));

        let text = report.to_string();
        assert!(text.contains("regular > credit: 154/625 (0.2464)"));
        assert!(text.contains("P(credit) = 369/1250 (0.2952)"));
    }

    #[test]
    fn test_unknown_leaf_has_undefined_posteriors() {
        let report = TreeReport::new(&fuel(), Some("cheque")).unwrap();
        let given = report.given.unwrap();
        assert_eq!(given.probability, Probability::ZERO);
        assert!(given.posteriors.iter().all(|p| p.posterior.is_none()));
    }

    #[test]
    fn test_without_given() {
        let report = TreeReport::new(&fuel(), None).unwrap();
        assert!(report.given.is_none());
        assert!(!report.to_string().contains("P("));
    }
}
