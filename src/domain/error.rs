// Error types for loading and binding
use super::dataset::ColumnType;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "lowercase")]
pub enum LoadFailureReason {
    Missing,
    Unreadable(String),
}

/// A declared dataset whose backing file could not be turned into a dataset.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("dataset '{name}' ({}): {}", .path.display(), describe(.reason))]
pub struct LoadFailure {
    pub name: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub reason: LoadFailureReason,
}

impl LoadFailure {
    pub fn missing(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            reason: LoadFailureReason::Missing,
        }
    }

    pub fn unreadable(name: impl Into<String>, path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            reason: LoadFailureReason::Unreadable(detail.into()),
        }
    }
}

fn describe(reason: &LoadFailureReason) -> String {
    match reason {
        LoadFailureReason::Missing => "file not found".to_string(),
        LoadFailureReason::Unreadable(detail) => format!("unreadable: {}", detail),
    }
}

/// A view asked for data its dataset cannot provide.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("view '{view}' references unknown dataset '{dataset}'")]
    UnknownDataset { view: String, dataset: String },

    #[error("dataset '{dataset}' has no field '{field}'")]
    MissingField { dataset: String, field: String },

    #[error("field '{field}' in dataset '{dataset}' is {found}, expected {expected}")]
    UnexpectedType {
        dataset: String,
        field: String,
        expected: String,
        found: ColumnType,
    },

    #[error("field '{field}' in dataset '{dataset}' has a non-numeric value at row {row}")]
    NonNumericValue {
        dataset: String,
        field: String,
        row: usize,
    },

    #[error("dataset '{dataset}' row {row}: invalid year/month {year}-{month}")]
    InvalidYearMonth {
        dataset: String,
        row: usize,
        year: i64,
        month: i64,
    },

    #[error("view '{view}': series are not aligned on '{x}': {detail}")]
    MisalignedSeries {
        view: String,
        x: String,
        detail: String,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("missing input: {}", names(.0))]
    MissingInputs(Vec<LoadFailure>),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

fn names(failures: &[LoadFailure]) -> String {
    failures
        .iter()
        .map(|f| f.path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
