use std::{fmt, path::PathBuf};

use anyhow::Context;
use azar_prob::{
    Probability, ProbabilityError,
    contingency::{ContingencyError, ContingencyTable},
};
use serde::Serialize;

use crate::util::{self, Format, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TableArg {
    /// Contingency table file (`rows`, `columns`, `counts`)
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "text")]
    format: Format,
}

pub(crate) fn run(arg: &TableArg) -> anyhow::Result<()> {
    let TableArg {
        file,
        output,
        format,
    } = arg;
    let table: ContingencyTable = util::read_json_file("contingency table", file)?;
    tracing::info!(
        rows = table.rows().len(),
        columns = table.columns().len(),
        "Reading off {}",
        file.display()
    );
    let report = TableReport::new(&table)
        .with_context(|| format!("Failed to evaluate table: {}", file.display()))?;

    let mut output = Output::from_output_path(output.clone())?;
    output.write_report(*format, &report, &report.to_string())?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TableReport {
    pub(crate) table: ContingencyTable,
    pub(crate) grand_total: u64,
    pub(crate) rows: Vec<MarginReport>,
    pub(crate) columns: Vec<MarginReport>,
    pub(crate) cells: Vec<CellReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct MarginReport {
    pub(crate) label: String,
    pub(crate) total: u64,
    pub(crate) probability: Probability,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CellReport {
    pub(crate) row: String,
    pub(crate) column: String,
    pub(crate) count: u64,
    pub(crate) joint: Probability,
    /// `P(row | column)`, `None` for an empty column.
    pub(crate) row_given_column: Option<Probability>,
    /// `P(column | row)`, `None` for an empty row.
    pub(crate) column_given_row: Option<Probability>,
    pub(crate) independent: bool,
}

impl TableReport {
    pub(crate) fn new(table: &ContingencyTable) -> Result<Self, ContingencyError> {
        let grand_total = table.grand_total()?;
        if grand_total == 0 {
            return Err(ProbabilityError::DivisionByZero.into());
        }
        let rows = table
            .rows()
            .iter()
            .map(|label| {
                Ok(MarginReport {
                    label: label.clone(),
                    total: table.row_total(label)?,
                    probability: table.row_marginal(label)?,
                })
            })
            .collect::<Result<Vec<_>, ContingencyError>>()?;
        let columns = table
            .columns()
            .iter()
            .map(|label| {
                Ok(MarginReport {
                    label: label.clone(),
                    total: table.column_total(label)?,
                    probability: table.column_marginal(label)?,
                })
            })
            .collect::<Result<Vec<_>, ContingencyError>>()?;

        let mut cells = vec![];
        for row in table.rows() {
            for column in table.columns() {
                cells.push(CellReport {
                    row: row.clone(),
                    column: column.clone(),
                    count: table.count(row, column)?,
                    joint: table.joint(row, column)?,
                    row_given_column: defined(table.row_given_column(row, column))?,
                    column_given_row: defined(table.column_given_row(column, row))?,
                    independent: table.are_independent(row, column)?,
                });
            }
        }

        Ok(Self {
            table: table.clone(),
            grand_total,
            rows,
            columns,
            cells,
        })
    }
}

fn defined(
    result: Result<Probability, ContingencyError>,
) -> Result<Option<Probability>, ContingencyError> {
    match result {
        Ok(p) => Ok(Some(p)),
        Err(ContingencyError::Probability(ProbabilityError::DivisionByZero)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn or_undefined(p: Option<Probability>) -> String {
    p.map_or_else(|| "undefined".to_owned(), |p| p.to_string())
}

impl fmt::Display for TableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .chain(["total".len()])
            .max()
            .unwrap_or(0);

        write!(f, "{:width$}", "")?;
        for column in &self.columns {
            write!(f, "  {:>10}", column.label)?;
        }
        writeln!(f, "  {:>10}", "total")?;
        for row in &self.rows {
            write!(f, "{:width$}", row.label)?;
            for cell in self.cells.iter().filter(|c| c.row == row.label) {
                write!(f, "  {:>10}", cell.count)?;
            }
            writeln!(f, "  {:>10}", row.total)?;
        }
        write!(f, "{:width$}", "total")?;
        for column in &self.columns {
            write!(f, "  {:>10}", column.total)?;
        }
        writeln!(f, "  {:>10}", self.grand_total)?;

        writeln!(f)?;
        for margin in self.rows.iter().chain(&self.columns) {
            writeln!(
                f,
                "P({}) = {} ({:.4})",
                margin.label, margin.probability, margin.probability
            )?;
        }
        for cell in &self.cells {
            let CellReport { row, column, .. } = cell;
            writeln!(f)?;
            writeln!(f, "P({row} ∩ {column}) = {}", cell.joint)?;
            writeln!(f, "P({row} | {column}) = {}", or_undefined(cell.row_given_column))?;
            writeln!(f, "P({column} | {row}) = {}", or_undefined(cell.column_given_row))?;
            writeln!(
                f,
                "{row} and {column} are {}",
                if cell.independent { "independent" } else { "dependent" }
            )?;
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

    #[test]
    fn test_breakfast_report() {
        let table: ContingencyTable = serde_json::from_str(
            r#"{"rows": ["regular", "irregular"], "columns": ["man", "woman"], "counts": [[190, 110], [110, 165]]}"#,
        )
        .unwrap();
        let report = TableReport::new(&table).unwrap();
        assert_eq!(report.grand_total, 575);
        assert_eq!(report.rows[0].total, 300);
        assert_eq!(report.rows[0].probability, p("12/23"));
        assert_eq!(report.columns[1].total, 275);

        let regular_man = &report.cells[0];
        assert_eq!(regular_man.joint, p("190/575"));
        assert_eq!(regular_man.row_given_column, Some(p("19/30")));
        assert_eq!(regular_man.column_given_row, Some(p("19/30")));
        assert!(!regular_man.independent);

        let text = report.to_string();
        assert!(text.contains("P(regular | man) = 19/30"));
        assert!(text.contains("regular and man are dependent"));
    }

    #[test]
    fn test_empty_column_is_undefined() {
        let table = ContingencyTable::new(["a", "b"], ["x", "y"], vec![vec![1, 0], vec![3, 0]])
            .unwrap();
        let report = TableReport::new(&table).unwrap();
        let a_y = &report.cells[1];
        assert_eq!(a_y.row_given_column, None);
        assert_eq!(a_y.column_given_row, Some(Probability::ZERO));
    }

    #[test]
    fn test_all_zero_table_is_an_error() {
        let table = ContingencyTable::new(["a"], ["x"], vec![vec![0]]).unwrap();
        assert_eq!(
            TableReport::new(&table),
            Err(ContingencyError::Probability(ProbabilityError::DivisionByZero))
        );
    }

    #[test]
    fn test_overflowing_table_is_an_error() {
        let table =
            ContingencyTable::new(["a", "b"], ["x"], vec![vec![u64::MAX], vec![1]]).unwrap();
        assert_eq!(
            TableReport::new(&table),
            Err(ContingencyError::Probability(ProbabilityError::Overflow))
        );
    }
}
