use crate::domain::chart::ChartKind;
use crate::domain::dashboard::PageLayout;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub page: PageSettings,
    pub server: ServerSettings,
    pub data_dir: PathBuf,
    #[serde(default)]
    pub datasets: Vec<DatasetConfig>,
    #[serde(default)]
    pub views: Vec<ViewConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageSettings {
    pub title: String,
    #[serde(default)]
    pub layout: PageLayout,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DatasetConfig {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ViewConfig {
    pub id: String,
    pub section: String,
    pub title: String,
    pub dataset: String,
    pub kind: ChartKind,
    pub x: String,
    pub y: Vec<String>,
    pub label: Option<String>,
    pub derive_date: Option<DateDerivation>,
    pub top_n: Option<RankConfig>,
}

/// Builds `field` as the first day of (`year`, `month`).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DateDerivation {
    pub year: String,
    pub month: String,
    pub field: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RankConfig {
    pub field: String,
    pub limit: usize,
}

impl DashboardConfig {
    /// Reject view/dataset declarations that can never bind.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut dataset_names = HashSet::new();
        for dataset in &self.datasets {
            if !dataset_names.insert(dataset.name.as_str()) {
                anyhow::bail!("dataset '{}' is declared more than once", dataset.name);
            }
        }

        let mut view_ids = HashSet::new();
        for view in &self.views {
            if !view_ids.insert(view.id.as_str()) {
                anyhow::bail!("view '{}' is declared more than once", view.id);
            }
            if !dataset_names.contains(view.dataset.as_str()) {
                anyhow::bail!(
                    "view '{}' references undeclared dataset '{}'",
                    view.id,
                    view.dataset
                );
            }
            if view.y.is_empty() {
                anyhow::bail!("view '{}' has no y field", view.id);
            }
            if view.kind == ChartKind::Pie && view.y.len() > 1 {
                anyhow::bail!("pie view '{}' takes exactly one value field", view.id);
            }
            if let Some(rank) = &view.top_n {
                if rank.limit == 0 {
                    anyhow::bail!("view '{}' has a top_n limit of 0", view.id);
                }
            }
        }

        Ok(())
    }
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
        data_dir = "data"

        [page]
        title = "Company Sales Dashboard"

        [server]
        host = "127.0.0.1"
        port = 8080

        [[datasets]]
        name = "monthly_sales"
        file = "monthly_sales_clean.csv"

        [[views]]
        id = "monthly_sales"
        section = "Monthly Sales Trend"
        title = "Monthly Sales"
        dataset = "monthly_sales"
        kind = "line"
        x = "MonthYear"
        y = ["TotalSales"]
        derive_date = { year = "Year", month = "Month", field = "MonthYear" }
    "#;

    fn parse(source: &str) -> DashboardConfig {
        toml::from_str(source).unwrap()
    }

    #[test]
    fn test_parses_views() {
        let config = parse(BASE);
        assert_eq!(config.page.layout, PageLayout::Wide);
        assert_eq!(config.views.len(), 1);
        let view = &config.views[0];
        assert_eq!(view.kind, ChartKind::Line);
        assert_eq!(
            view.derive_date,
            Some(DateDerivation {
                year: "Year".into(),
                month: "Month".into(),
                field: "MonthYear".into(),
            })
        );
        assert!(view.top_n.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_dataset() {
        let config = parse(&BASE.replace("dataset = \"monthly_sales\"", "dataset = \"nope\""));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared dataset 'nope'"));
    }

    #[test]
    fn test_rejects_multi_value_pie() {
        let source = BASE
            .replace("kind = \"line\"", "kind = \"pie\"")
            .replace("y = [\"TotalSales\"]", "y = [\"TotalSales\", \"TotalUnits\"]");
        assert!(parse(&source).validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_views_and_zero_limit() {
        let mut config = parse(BASE);
        config.views.push(config.views[0].clone());
        assert!(config.validate().is_err());

        let mut config = parse(BASE);
        config.views[0].top_n = Some(RankConfig {
            field: "TotalSales".into(),
            limit: 0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let config = parse(include_str!("../../config/dashboard.toml"));
        assert!(config.validate().is_ok());
        assert_eq!(config.datasets.len(), 5);
        assert_eq!(config.views.len(), 10);
    }
}
