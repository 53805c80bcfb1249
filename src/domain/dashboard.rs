// Dashboard domain model
use super::chart::ChartSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLayout {
    #[default]
    Wide,
    Centered,
}

/// Load status of one dataset, shown before any chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStatus {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub layout: PageLayout,
    pub datasets: Vec<DatasetStatus>,
    pub charts: Vec<ChartSpec>,
}

impl Dashboard {
    pub fn new(
        title: String,
        layout: PageLayout,
        datasets: Vec<DatasetStatus>,
        charts: Vec<ChartSpec>,
    ) -> Self {
        Self {
            title,
            layout,
            datasets,
            charts,
        }
    }
}
