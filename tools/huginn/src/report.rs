//! Comparison table of the estimated locations.
use std::fmt::{self, Display};

use colored::Colorize;
use nalgebra::Point2;
use vegvisir::{ConsensusResult, FitResult, Weighting};

const HEADER: [&str; 5] = ["Method", "Latitude", "Longitude", "Residual", "Error"];
const EMPTY: &str = "--";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The known location the estimates are compared against.
    Reference(Point2<f64>),
    Estimate { location: Point2<f64>, residual: f64 },
    /// The method did not produce an estimate.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub method: String,
    pub outcome: Outcome,
}

/// Table with one row per estimation method.
#[derive(Debug, Clone, Default)]
pub struct Report {
    actual: Option<Point2<f64>>,
    rows: Vec<Row>,
}

impl Report {
    #[must_use]
    pub fn new(actual: Option<Point2<f64>>) -> Self {
        let rows = actual
            .map(|location| Row {
                method: "Actual location".to_string(),
                outcome: Outcome::Reference(location),
            })
            .into_iter()
            .collect();

        Self { actual, rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Add the result of a plain nonlinear least squares fit.
    pub fn push_fit(
        &mut self,
        weighting: Weighting,
        fit: vegvisir::Result<FitResult<Point2<f64>>>,
    ) {
        let method = format!("Nonlinear least squares ({weighting})");
        self.push(
            method,
            fit.map(|fit| Outcome::Estimate {
                location: fit.parameters,
                residual: fit.sum_squared_residual,
            }),
        );
    }

    /// Add the result of a RANSAC estimate over `samples` samples.
    ///
    /// The row reports the consensus' own location and error.
    pub fn push_consensus(
        &mut self,
        weighting: Weighting,
        samples: usize,
        consensus: vegvisir::Result<ConsensusResult<Point2<f64>>>,
    ) {
        let method = match &consensus {
            Ok(consensus) => format!(
                "RANSAC ({weighting}, {}/{samples} points)",
                consensus.inliers.len()
            ),
            Err(_) => format!("RANSAC ({weighting})"),
        };

        self.push(
            method,
            consensus.map(|consensus| Outcome::Estimate {
                location: consensus.parameters,
                residual: consensus.total_error,
            }),
        );
    }

    fn push(&mut self, method: String, outcome: vegvisir::Result<Outcome>) {
        let outcome = outcome.unwrap_or_else(|error| {
            tracing::warn!(%method, %error, "estimation failed");
            Outcome::Failed(error.to_string())
        });

        self.rows.push(Row { method, outcome });
    }

    /// Distance between `location` and the known location, if there is one.
    #[must_use]
    pub fn error(&self, location: &Point2<f64>) -> Option<f64> {
        self.actual
            .map(|actual| nalgebra::distance(location, &actual))
    }

    fn cells(&self, row: &Row) -> [String; 5] {
        match &row.outcome {
            Outcome::Reference(location) => [
                row.method.clone(),
                format!("{:.6}", location.x),
                format!("{:.6}", location.y),
                EMPTY.to_string(),
                EMPTY.to_string(),
            ],
            Outcome::Estimate { location, residual } => [
                row.method.clone(),
                format!("{:.6}", location.x),
                format!("{:.6}", location.y),
                format!("{residual:.6e}"),
                self.error(location)
                    .map_or_else(|| EMPTY.to_string(), |error| format!("{error:.6}")),
            ],
            Outcome::Failed(reason) => [
                row.method.clone(),
                EMPTY.to_string(),
                EMPTY.to_string(),
                EMPTY.to_string(),
                format!("failed: {reason}"),
            ],
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = HEADER.map(str::to_string);
        let cells: Vec<[String; 5]> = self.rows.iter().map(|row| self.cells(row)).collect();

        let mut widths = header.each_ref().map(|cell| cell.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let failed = self
            .rows
            .iter()
            .map(|row| matches!(row.outcome, Outcome::Failed(_)));

        writeln!(f, "{}", format_line(&header, &widths).bold())?;
        for (row, failed) in cells.iter().zip(failed) {
            let line = format_line(row, &widths);
            if failed {
                writeln!(f, "{}", line.red())?;
            } else {
                writeln!(f, "{line}")?;
            }
        }

        Ok(())
    }
}

/// Method column left aligned, numbers right aligned.
fn format_line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let mut line = String::new();

    for (column, (cell, width)) in cells.iter().zip(widths.iter().copied()).enumerate() {
        let cell = if column == 0 {
            format!("{cell:<width$}")
        } else {
            format!(" | {cell:>width$}")
        };
        line.push_str(&cell);
    }

    line
}

#[cfg(test)]
mod tests {
    use vegvisir::{Error, TrialStatistics};

    use super::*;

    fn estimate(x: f64, y: f64) -> FitResult<Point2<f64>> {
        FitResult {
            parameters: Point2::new(x, y),
            sum_squared_residual: 0.5,
            converged: true,
            evaluations: 12,
        }
    }

    #[test]
    fn reference_row_comes_first() {
        let report = Report::new(Some(Point2::new(1.0, 2.0)));

        assert_eq!(
            report.rows(),
            &[Row {
                method: "Actual location".to_string(),
                outcome: Outcome::Reference(Point2::new(1.0, 2.0)),
            }]
        );
        assert!(Report::new(None).rows().is_empty());
    }

    #[test]
    fn consensus_row_uses_its_own_result() {
        let mut report = Report::new(Some(Point2::new(0.0, 0.0)));
        report.push_fit(Weighting::Uniform, Ok(estimate(30.0, 40.0)));
        report.push_consensus(
            Weighting::InverseSquareStrength,
            5,
            Ok(ConsensusResult {
                parameters: Point2::new(3.0, 4.0),
                inliers: vec![0, 1, 2, 3],
                total_error: 0.02,
                statistics: TrialStatistics::default(),
            }),
        );

        let rows = report.rows();
        assert_eq!(rows[1].method, "Nonlinear least squares (unweighted)");
        assert_eq!(rows[2].method, "RANSAC (weighted, 4/5 points)");
        assert_eq!(
            rows[2].outcome,
            Outcome::Estimate {
                location: Point2::new(3.0, 4.0),
                residual: 0.02
            }
        );

        let Outcome::Estimate { location, .. } = &rows[2].outcome else {
            unreachable!()
        };
        assert_eq!(report.error(location), Some(5.0));
    }

    #[test]
    fn failures_become_rows() {
        let mut report = Report::new(None);
        report.push_consensus(
            Weighting::Uniform,
            5,
            Err(Error::NoConsensusFound { iterations: 10 }),
        );

        assert_eq!(report.rows()[0].method, "RANSAC (unweighted)");
        assert!(matches!(report.rows()[0].outcome, Outcome::Failed(_)));

        let table = report.to_string();
        assert!(table.contains("failed: no consensus set"), "{table}");
    }

    #[test]
    fn columns_are_aligned() {
        colored::control::set_override(false);

        let mut report = Report::new(Some(Point2::new(49.754592, 9.961313)));
        report.push_fit(Weighting::Uniform, Ok(estimate(49.75, 9.96)));

        let table = report.to_string();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Method"));
        assert!(lines[1].starts_with("Actual location"));
        assert!(lines[2].contains("49.750000"));
        assert!(lines[2].contains("5.000000e-1"));

        let widths: Vec<usize> = lines.iter().map(|line| line.chars().count()).collect();
        assert!(widths.iter().all(|&width| width == widths[0]), "{table}");
    }
}
