//! Probability tree diagrams.
//!
//! Each branch carries the probability of taking it *given* that its parent
//! branch was taken. The joint probability of a root-to-leaf path is the
//! product of its branch probabilities, and the probability of any set of
//! leaves is the sum of their path probabilities (law of total probability).
//!
//! # Examples
//!
//! ```
//! use azar_prob::{Probability, tree::{Branch, ProbabilityTree}};
//!
//! let p = |s: &str| s.parse::<Probability>().unwrap();
//! let payment = |credit: &str| {
//!     vec![
//!         Branch::leaf("credit", p(credit)),
//!         Branch::leaf("cash", p(credit).complement()),
//!     ]
//! };
//! let fuel = ProbabilityTree::new(vec![
//!     Branch::new("regular", p("0.88"), payment("0.28")),
//!     Branch::new("midgrade", p("0.02"), payment("0.34")),
//!     Branch::new("premium", p("0.10"), payment("0.42")),
//! ])
//! .unwrap();
//!
//! let credit = fuel.probability_where(|path| path.last() == Some(&"credit")).unwrap();
//! assert_eq!(credit, p("0.2952"));
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::probability::{Probability, ProbabilityError};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TreeError {
    #[display("probability tree has no branches")]
    #[from(ignore)]
    Empty,
    /// `sum` is `None` when the siblings add up to more than one.
    #[display(
        "branch probabilities under '{path}' sum to {} instead of one",
        sum.map_or_else(|| "more than 1".to_owned(), |sum| sum.to_string())
    )]
    #[from(ignore)]
    BranchesDoNotSumToOne {
        path: String,
        sum: Option<Probability>,
    },
    #[display("{_0}")]
    Probability(ProbabilityError),
}

/// A branch of a tree diagram with its conditional probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: Deserialize<'de>"))]
pub struct Branch<L> {
    pub label: L,
    pub probability: Probability,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Branch<L>>,
}

impl<L> Branch<L> {
    pub fn new(label: L, probability: Probability, children: Vec<Branch<L>>) -> Self {
        Self {
            label,
            probability,
            children,
        }
    }

    pub fn leaf(label: L, probability: Probability) -> Self {
        Self::new(label, probability, vec![])
    }
}

/// A root-to-leaf path and its joint probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreePath<L> {
    pub labels: Vec<L>,
    pub probability: Probability,
}

/// A validated tree diagram: at every level, sibling branches sum to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProbabilityTree<L> {
    branches: Vec<Branch<L>>,
}

impl<L> ProbabilityTree<L>
where
    L: Clone + fmt::Display,
{
    pub fn new(branches: Vec<Branch<L>>) -> Result<Self, TreeError> {
        Self::validate(&branches)?;
        Ok(Self { branches })
    }

    /// Checks that `branches` form a valid tree: non-empty, with sibling
    /// probabilities summing to exactly one at every level.
    pub fn validate(branches: &[Branch<L>]) -> Result<(), TreeError> {
        if branches.is_empty() {
            return Err(TreeError::Empty);
        }
        validate_level(branches, "root")
    }

    #[must_use]
    pub fn branches(&self) -> &[Branch<L>] {
        &self.branches
    }

    /// Every root-to-leaf path, depth first, in branch order.
    pub fn paths(&self) -> Result<Vec<TreePath<L>>, ProbabilityError> {
        let mut paths = vec![];
        collect_paths(&self.branches, &mut vec![], Probability::ONE, &mut paths)?;
        Ok(paths)
    }

    /// Total probability of the leaves whose label path satisfies `predicate`.
    pub fn probability_where<F>(&self, mut predicate: F) -> Result<Probability, ProbabilityError>
    where
        F: FnMut(&[L]) -> bool,
    {
        self.paths()?
            .into_iter()
            .filter(|path| predicate(&path.labels))
            .try_fold(Probability::ZERO, |acc, path| acc.checked_add(path.probability))
    }

    /// Bayes' rule on the first level of the tree:
    /// `P(first = label | predicate)`.
    ///
    /// # Errors
    ///
    /// [`ProbabilityError::DivisionByZero`] if no leaf with positive
    /// probability satisfies `predicate`.
    pub fn posterior<F>(&self, first: &L, mut predicate: F) -> Result<Probability, ProbabilityError>
    where
        L: PartialEq,
        F: FnMut(&[L]) -> bool,
    {
        let evidence = self.probability_where(&mut predicate)?;
        let joint =
            self.probability_where(|labels| labels.first() == Some(first) && predicate(labels))?;
        joint.checked_div(evidence)
    }
}

fn validate_level<L>(branches: &[Branch<L>], path: &str) -> Result<(), TreeError>
where
    L: fmt::Display,
{
    let sum = branches
        .iter()
        .try_fold(Probability::ZERO, |acc, b| acc.checked_add(b.probability));
    if !matches!(sum, Ok(sum) if sum.is_one()) {
        return Err(TreeError::BranchesDoNotSumToOne {
            path: path.to_owned(),
            sum: sum.ok(),
        });
    }
    for branch in branches {
        if !branch.children.is_empty() {
            let child_path = if path == "root" {
                branch.label.to_string()
            } else {
                format!("{path} > {}", branch.label)
            };
            validate_level(&branch.children, &child_path)?;
        }
    }
    Ok(())
}

fn collect_paths<L>(
    branches: &[Branch<L>],
    prefix: &mut Vec<L>,
    reach: Probability,
    out: &mut Vec<TreePath<L>>,
) -> Result<(), ProbabilityError>
where
    L: Clone,
{
    for branch in branches {
        let probability = reach.checked_mul(branch.probability)?;
        prefix.push(branch.label.clone());
        if branch.children.is_empty() {
            out.push(TreePath {
                labels: prefix.clone(),
                probability,
            });
        } else {
            collect_paths(&branch.children, prefix, probability, out)?;
        }
        prefix.pop();
    }
    Ok(())
}

impl<'de, L> Deserialize<'de> for ProbabilityTree<L>
where
    L: Deserialize<'de> + Clone + fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let branches = Vec::<Branch<L>>::deserialize(deserializer)?;
        Self::new(branches).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Probability {
        s.parse().unwrap()
    }

    fn fuel_tree() -> ProbabilityTree<&'static str> {
        let payment = |credit: &str| {
            vec![
                Branch::leaf("credit", p(credit)),
                Branch::leaf("cash", p(credit).complement()),
            ]
        };
        ProbabilityTree::new(vec![
            Branch::new("regular", p("0.88"), payment("0.28")),
            Branch::new("midgrade", p("0.02"), payment("0.34")),
            Branch::new("premium", p("0.10"), payment("0.42")),
        ])
        .unwrap()
    }

    fn pays_credit(labels: &[&str]) -> bool {
        labels.last() == Some(&"credit")
    }

    #[test]
    fn test_total_probability() {
        let tree = fuel_tree();
        assert_eq!(tree.probability_where(pays_credit).unwrap(), p("369/1250"));
        assert_eq!(
            tree.probability_where(|l| !pays_credit(l)).unwrap(),
            p("881/1250")
        );
    }

    #[test]
    fn test_leaf_paths_sum_to_one() {
        let paths = fuel_tree().paths().unwrap();
        assert_eq!(paths.len(), 6);
        assert_eq!(paths[0].labels, vec!["regular", "credit"]);
        assert_eq!(paths[0].probability, p("0.2464"));
        let total = paths
            .iter()
            .try_fold(Probability::ZERO, |acc, path| acc.checked_add(path.probability))
            .unwrap();
        assert_eq!(total, Probability::ONE);
    }

    #[test]
    fn test_posterior() {
        let tree = fuel_tree();
        assert_eq!(tree.posterior(&"premium", pays_credit).unwrap(), p("35/246"));
        assert_eq!(
            tree.posterior(&"premium", |_| false),
            Err(ProbabilityError::DivisionByZero)
        );
    }

    #[test]
    fn test_rejects_unbalanced_levels() {
        assert_eq!(
            ProbabilityTree::<&str>::new(vec![]),
            Err(TreeError::Empty)
        );
        assert_eq!(
            ProbabilityTree::new(vec![Branch::leaf("a", p("1/2")), Branch::leaf("b", p("1/3"))]),
            Err(TreeError::BranchesDoNotSumToOne {
                path: "root".to_owned(),
                sum: Some(p("5/6")),
            })
        );
        let nested = ProbabilityTree::new(vec![
            Branch::leaf("a", p("1/2")),
            Branch::new(
                "b",
                p("1/2"),
                vec![Branch::leaf("x", p("2/3")), Branch::leaf("y", p("2/3"))],
            ),
        ]);
        assert_eq!(
            nested,
            Err(TreeError::BranchesDoNotSumToOne {
                path: "b".to_owned(),
                sum: None,
            })
        );
        assert_eq!(
            nested.unwrap_err().to_string(),
            "branch probabilities under 'b' sum to more than 1 instead of one"
        );
        assert_eq!(
            ProbabilityTree::validate(&[Branch::leaf("a", p("1/4"))])
                .unwrap_err()
                .to_string(),
            "branch probabilities under 'root' sum to 1/4 instead of one"
        );
        assert_eq!(
            ProbabilityTree::validate(&[Branch::leaf("a", Probability::ONE)]),
            Ok(())
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[
            {"label": "L", "probability": "4/28", "children": [
                {"label": "L", "probability": "3/27"},
                {"label": "R", "probability": "24/27"}
            ]},
            {"label": "R", "probability": "24/28", "children": [
                {"label": "L", "probability": "4/27"},
                {"label": "R", "probability": "23/27"}
            ]}
        ]"#;
        let tree: ProbabilityTree<String> = serde_json::from_str(json).unwrap();
        let both_left = tree
            .probability_where(|labels| labels.iter().all(|l| l == "L"))
            .unwrap();
        assert_eq!(both_left, p("1/63"));

        let broken = r#"[{"label": "L", "probability": "1/2"}]"#;
        assert!(serde_json::from_str::<ProbabilityTree<String>>(broken).is_err());
    }
}
