//! Two-way contingency tables.
//!
//! A contingency table cross-tabulates counts by two categorical dimensions.
//! Joint, marginal and conditional probabilities are read off the table as
//! exact fractions of the relevant totals.
//!
//! # Examples
//!
//! ```
//! use azar_prob::{Probability, contingency::ContingencyTable};
//!
//! let table = ContingencyTable::new(
//!     ["left", "right"],
//!     ["woman", "man"],
//!     vec![vec![3, 1], vec![18, 6]],
//! )
//! .unwrap();
//!
//! assert_eq!(table.grand_total().unwrap(), 28);
//! assert_eq!(table.row_marginal("left").unwrap().to_string(), "1/7");
//! assert_eq!(table.row_given_column("left", "woman").unwrap().to_string(), "1/7");
//! assert!(table.are_independent("left", "woman").unwrap());
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::probability::{Probability, ProbabilityError, count_total};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ContingencyError {
    #[display("expected {expected_rows}x{expected_columns} counts")]
    #[from(ignore)]
    ShapeMismatch {
        expected_rows: usize,
        expected_columns: usize,
    },
    #[display("duplicate label '{label}'")]
    #[from(ignore)]
    DuplicateLabel { label: String },
    #[display("unknown label '{label}'")]
    #[from(ignore)]
    UnknownLabel { label: String },
    #[display("{_0}")]
    Probability(ProbabilityError),
}

/// Counts cross-tabulated by a row category and a column category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyTable {
    rows: Vec<String>,
    columns: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl ContingencyTable {
    /// Creates a table; `counts[r][c]` is the count for `rows[r]` and
    /// `columns[c]`.
    pub fn new<R, C>(rows: R, columns: C, counts: Vec<Vec<u64>>) -> Result<Self, ContingencyError>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows.into_iter().map(Into::into).collect::<Vec<String>>();
        let columns = columns.into_iter().map(Into::into).collect::<Vec<String>>();
        check_unique(&rows)?;
        check_unique(&columns)?;
        if counts.len() != rows.len() || counts.iter().any(|row| row.len() != columns.len()) {
            return Err(ContingencyError::ShapeMismatch {
                expected_rows: rows.len(),
                expected_columns: columns.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            counts,
        })
    }

    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn count(&self, row: &str, column: &str) -> Result<u64, ContingencyError> {
        let (r, c) = (self.row_index(row)?, self.column_index(column)?);
        Ok(self.counts[r][c])
    }

    pub fn row_total(&self, row: &str) -> Result<u64, ContingencyError> {
        let r = self.row_index(row)?;
        Ok(count_total(self.counts[r].iter().copied())?)
    }

    pub fn column_total(&self, column: &str) -> Result<u64, ContingencyError> {
        let c = self.column_index(column)?;
        Ok(count_total(self.counts.iter().map(|row| row[c]))?)
    }

    pub fn grand_total(&self) -> Result<u64, ContingencyError> {
        Ok(count_total(self.counts.iter().flatten().copied())?)
    }

    /// `P(row ∩ column)`.
    pub fn joint(&self, row: &str, column: &str) -> Result<Probability, ContingencyError> {
        Ok(Probability::new(self.count(row, column)?, self.grand_total()?)?)
    }

    /// `P(row)`.
    pub fn row_marginal(&self, row: &str) -> Result<Probability, ContingencyError> {
        Ok(Probability::new(self.row_total(row)?, self.grand_total()?)?)
    }

    /// `P(column)`.
    pub fn column_marginal(&self, column: &str) -> Result<Probability, ContingencyError> {
        Ok(Probability::new(
            self.column_total(column)?,
            self.grand_total()?,
        )?)
    }

    /// `P(row | column)`: the share of the column that falls in `row`.
    pub fn row_given_column(
        &self,
        row: &str,
        column: &str,
    ) -> Result<Probability, ContingencyError> {
        Ok(Probability::new(
            self.count(row, column)?,
            self.column_total(column)?,
        )?)
    }

    /// `P(column | row)`: the share of the row that falls in `column`.
    pub fn column_given_row(
        &self,
        column: &str,
        row: &str,
    ) -> Result<Probability, ContingencyError> {
        Ok(Probability::new(
            self.count(row, column)?,
            self.row_total(row)?,
        )?)
    }

    /// Whether the row and column categories are independent:
    /// `P(row ∩ column) = P(row) · P(column)`.
    pub fn are_independent(&self, row: &str, column: &str) -> Result<bool, ContingencyError> {
        let product = self
            .row_marginal(row)?
            .checked_mul(self.column_marginal(column)?)?;
        Ok(self.joint(row, column)? == product)
    }

    fn row_index(&self, row: &str) -> Result<usize, ContingencyError> {
        find_label(&self.rows, row)
    }

    fn column_index(&self, column: &str) -> Result<usize, ContingencyError> {
        find_label(&self.columns, column)
    }
}

fn find_label(labels: &[String], label: &str) -> Result<usize, ContingencyError> {
    labels
        .iter()
        .position(|l| l == label)
        .ok_or_else(|| ContingencyError::UnknownLabel {
            label: label.to_owned(),
        })
}

fn check_unique(labels: &[String]) -> Result<(), ContingencyError> {
    for (i, label) in labels.iter().enumerate() {
        if labels[..i].contains(label) {
            return Err(ContingencyError::DuplicateLabel {
                label: label.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawContingencyTable {
    rows: Vec<String>,
    columns: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl<'de> Deserialize<'de> for ContingencyTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawContingencyTable::deserialize(deserializer)?;
        Self::new(raw.rows, raw.columns, raw.counts).map_err(serde::de::Error::custom)
    }
}
