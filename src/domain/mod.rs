// Domain layer - Datasets, chart specifications and errors
pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod error;
