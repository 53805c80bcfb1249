// Loader - All-or-nothing dataset loading
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::dashboard::DatasetStatus;
use crate::domain::dataset::Dataset;
use crate::domain::error::LoadFailure;
use crate::infrastructure::config::DatasetConfig;
use std::collections::HashMap;

/// Every declared dataset, fully loaded, for the duration of one run.
#[derive(Debug, Clone)]
pub struct DatasetContext {
    datasets: HashMap<String, Dataset>,
    statuses: Vec<DatasetStatus>,
}

impl DatasetContext {
    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Load status in declaration order
    pub fn statuses(&self) -> &[DatasetStatus] {
        &self.statuses
    }
}

/// Load every declared dataset.
///
/// Either all of them load or the returned list names each one that failed.
pub fn load_datasets(
    repository: &dyn DatasetRepository,
    sources: &[DatasetConfig],
) -> Result<DatasetContext, Vec<LoadFailure>> {
    let mut datasets = HashMap::with_capacity(sources.len());
    let mut statuses = Vec::with_capacity(sources.len());
    let mut failures = Vec::new();

    for source in sources {
        match repository.load(&source.name, &source.file) {
            Ok(dataset) => {
                let path = repository.resolve(&source.file);
                tracing::info!(
                    "✅ Loaded {} from {} ({} rows, {} columns)",
                    source.name,
                    path.display(),
                    dataset.len(),
                    dataset.columns().len()
                );
                statuses.push(DatasetStatus {
                    name: source.name.clone(),
                    path,
                    rows: dataset.len(),
                    columns: dataset.columns().len(),
                });
                datasets.insert(source.name.clone(), dataset);
            }
            Err(failure) => {
                tracing::error!("❌ {}", failure);
                failures.push(failure);
            }
        }
    }

    if !failures.is_empty() {
        return Err(failures);
    }

    Ok(DatasetContext { datasets, statuses })
}
