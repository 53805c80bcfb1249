// CSV file repository implementation
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::dataset::{Column, ColumnType, Dataset, Value};
use crate::domain::error::LoadFailure;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CsvDatasetRepository {
    data_dir: PathBuf,
}

impl CsvDatasetRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn read(name: &str, path: &Path) -> Result<Dataset, String> {
        let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        // Strip UTF-8 BOM if present
        let text = text.trim_start_matches('\u{FEFF}');

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| format!("failed to read header row: {}", e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err("header row is empty".to_string());
        }

        let mut cells: Vec<Vec<String>> = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            // +2: header is line 1
            let record = result.map_err(|e| format!("line {}: {}", idx + 2, e))?;
            cells.push(record.iter().map(|c| c.trim().to_string()).collect());
        }

        let types: Vec<ColumnType> = (0..headers.len())
            .map(|col| infer_type(cells.iter().map(|row| row[col].as_str())))
            .collect();

        let rows: Vec<Vec<Value>> = cells
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&types)
                    .map(|(cell, ty)| parse_cell(cell, *ty))
                    .collect::<Vec<_>>()
            })
            .collect();

        let columns: Vec<Column> = headers
            .into_iter()
            .zip(types)
            .map(|(name, ty)| Column::new(name, ty))
            .collect();

        Dataset::new(name, columns, rows).ok_or_else(|| "ragged rows".to_string())
    }
}

impl DatasetRepository for CsvDatasetRepository {
    fn resolve(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn load(&self, name: &str, file: &str) -> Result<Dataset, LoadFailure> {
        let path = self.resolve(file);
        if !path.is_file() {
            return Err(LoadFailure::missing(name, path));
        }

        Self::read(name, &path).map_err(|detail| LoadFailure::unreadable(name, path, detail))
    }
}

/// Narrowest type that every non-empty cell parses as, `Empty` when there is none.
fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut ty: Option<ColumnType> = None;
    for cell in cells.filter(|c| !c.is_empty()) {
        let cell_ty = if cell.parse::<i64>().is_ok() {
            ColumnType::Integer
        } else if cell.parse::<f64>().is_ok() {
            ColumnType::Float
        } else {
            return ColumnType::Text;
        };
        ty = match (ty, cell_ty) {
            (Some(ColumnType::Float), _) | (_, ColumnType::Float) => Some(ColumnType::Float),
            _ => Some(ColumnType::Integer),
        };
    }
    ty.unwrap_or(ColumnType::Empty)
}

fn parse_cell(cell: &str, ty: ColumnType) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match ty {
        ColumnType::Integer => cell.parse().map(Value::Integer).unwrap_or(Value::Null),
        ColumnType::Float => cell.parse().map(Value::Float).unwrap_or(Value::Null),
        ColumnType::Text | ColumnType::Date => Value::Text(cell.to_string()),
        ColumnType::Empty => Value::Null,
    }
}
