// Repository trait for dataset file access
use crate::domain::dataset::Dataset;
use crate::domain::error::LoadFailure;
use std::path::PathBuf;

pub trait DatasetRepository: Send + Sync {
    /// Location the file declared for a dataset is read from
    fn resolve(&self, file: &str) -> PathBuf;

    /// Read and parse one dataset in full
    fn load(&self, name: &str, file: &str) -> Result<Dataset, LoadFailure>;
}
