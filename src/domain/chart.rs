// Chart specification domain models
use super::dataset::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Scatter,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
        };
        f.write_str(name)
    }
}

/// One field of the bound data: its name and its values in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValues {
    pub field: String,
    pub values: Vec<Value>,
}

impl FieldValues {
    pub fn new(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }
}

/// Renderer-agnostic description of one chart.
///
/// For pie charts `x` carries the slice names and the single series the slice values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: String,
    pub section: String,
    pub title: String,
    pub kind: ChartKind,
    pub x: FieldValues,
    pub series: Vec<FieldValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<FieldValues>,
}

impl ChartSpec {
    pub fn new(
        id: String,
        section: String,
        title: String,
        kind: ChartKind,
        x: FieldValues,
        series: Vec<FieldValues>,
        labels: Option<FieldValues>,
    ) -> Self {
        Self {
            id,
            section,
            title,
            kind,
            x,
            series,
            labels,
        }
    }

    pub fn is_multi_series(&self) -> bool {
        self.series.len() > 1
    }
}
