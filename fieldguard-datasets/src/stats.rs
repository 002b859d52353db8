//! Per-column summary statistics.

use crate::dataset::{Column, Dataset};
use serde::Serialize;
use std::collections::HashMap;

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    /// Every non-missing cell parses as a number.
    Numeric {
        count: usize,
        mean: f64,
        min: f64,
        max: f64,
    },
    /// Anything else, including columns with no values at all.
    Text {
        count: usize,
        unique: usize,
        /// Most common value; ties go to the value seen first.
        top: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub summary: ColumnSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: Vec<ColumnStats>,
}

impl DatasetStats {
    /// Summarizes every column.
    pub fn compute(dataset: &Dataset) -> Self {
        Self::compute_filtered(dataset, |_| true)
    }

    /// Summarizes the columns for which `include` returns true.
    pub fn compute_filtered(dataset: &Dataset, include: impl Fn(&str) -> bool) -> Self {
        let columns = dataset
            .columns()
            .iter()
            .filter(|column| include(column.name()))
            .map(|column| ColumnStats {
                column: column.name().to_string(),
                summary: summarize(column),
            })
            .collect();

        Self {
            rows: dataset.row_count(),
            columns,
        }
    }
}

fn summarize(column: &Column) -> ColumnSummary {
    let values: Vec<&str> = column.cells().iter().filter_map(|c| c.as_deref()).collect();

    let numbers: Option<Vec<f64>> = values
        .iter()
        .map(|v| v.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect();

    match numbers {
        Some(numbers) if !numbers.is_empty() => {
            let count = numbers.len();
            let sum: f64 = numbers.iter().sum();
            let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
            let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            ColumnSummary::Numeric {
                count,
                mean: round2(sum / count as f64),
                min,
                max,
            }
        }
        _ => text_summary(&values),
    }
}

fn text_summary(values: &[&str]) -> ColumnSummary {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        counts.entry(*value).or_insert((0, position)).0 += 1;
    }

    let top = counts
        .iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(value, _)| value.to_string());

    ColumnSummary::Text {
        count: values.len(),
        unique: counts.len(),
        top,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
