// Dashboard service - Use case for building the whole dashboard
use crate::application::binding::bind_view;
use crate::application::dataset_repository::DatasetRepository;
use crate::application::loader::load_datasets;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::DashboardError;
use crate::infrastructure::config::DashboardConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn DatasetRepository>,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn DatasetRepository>, config: DashboardConfig) -> Self {
        Self { repository, config }
    }

    /// Load every dataset, then bind every view in declaration order.
    ///
    /// Nothing is bound unless all datasets loaded.
    pub fn build_dashboard(&self) -> Result<Dashboard, DashboardError> {
        let ctx = load_datasets(self.repository.as_ref(), &self.config.datasets)
            .map_err(DashboardError::MissingInputs)?;

        let charts = self
            .config
            .views
            .iter()
            .map(|view| bind_view(&ctx, view))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            "Built dashboard '{}' with {} charts from {} datasets",
            self.config.page.title,
            charts.len(),
            ctx.statuses().len()
        );

        Ok(Dashboard::new(
            self.config.page.title.clone(),
            self.config.page.layout,
            ctx.statuses().to_vec(),
            charts,
        ))
    }
}
