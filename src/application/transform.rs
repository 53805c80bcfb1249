// Transforms - Date synthesis and top-N ranking
use crate::domain::dataset::{Column, ColumnType, Dataset, Value};
use crate::domain::error::ShapeError;
use crate::infrastructure::config::DateDerivation;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// First day of (`year`, `month`), or `None` outside the valid calendar range.
pub fn first_of_month(year: i64, month: i64) -> Option<NaiveDate> {
    if year < 1 || !(1..=12).contains(&month) {
        return None;
    }
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month as u32, 1)
}

/// Add `derivation.field` holding the first day of each row's year and month.
///
/// The year and month columns are kept.
pub fn synthesize_date(dataset: Dataset, derivation: &DateDerivation) -> Result<Dataset, ShapeError> {
    let year_idx = integer_column(&dataset, &derivation.year)?;
    let month_idx = integer_column(&dataset, &derivation.month)?;

    let mut dates = Vec::with_capacity(dataset.len());
    for (row_idx, row) in dataset.rows().iter().enumerate() {
        let year = row[year_idx].as_i64().ok_or_else(|| ShapeError::NonNumericValue {
            dataset: dataset.name.clone(),
            field: derivation.year.clone(),
            row: row_idx,
        })?;
        let month = row[month_idx].as_i64().ok_or_else(|| ShapeError::NonNumericValue {
            dataset: dataset.name.clone(),
            field: derivation.month.clone(),
            row: row_idx,
        })?;
        let date = first_of_month(year, month).ok_or_else(|| ShapeError::InvalidYearMonth {
            dataset: dataset.name.clone(),
            row: row_idx,
            year,
            month,
        })?;
        dates.push(Value::Date(date));
    }

    let name = dataset.name.clone();
    dataset
        .with_column(Column::new(derivation.field.clone(), ColumnType::Date), dates)
        .ok_or_else(|| ShapeError::MissingField {
            dataset: name,
            field: derivation.field.clone(),
        })
}

/// The `limit` rows with the largest `field` values, largest first.
///
/// Equal values keep their input order. Fewer rows than `limit` are all returned.
/// Integer columns compare exactly as `i64`; NaN is not a rankable value.
pub fn top_n(dataset: &Dataset, field: &str, limit: usize) -> Result<Dataset, ShapeError> {
    let idx = numeric_column(dataset, field)?;
    let non_numeric = |row: usize| ShapeError::NonNumericValue {
        dataset: dataset.name.clone(),
        field: field.to_string(),
        row,
    };

    // sort_by is stable
    let mut order: Vec<usize> = (0..dataset.len()).collect();
    if dataset.columns()[idx].ty == ColumnType::Integer {
        let keys = dataset
            .rows()
            .iter()
            .enumerate()
            .map(|(row_idx, row)| row[idx].as_i64().ok_or_else(|| non_numeric(row_idx)))
            .collect::<Result<Vec<_>, _>>()?;
        order.sort_by(|a, b| keys[*b].cmp(&keys[*a]));
    } else {
        let keys = dataset
            .rows()
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                row[idx]
                    .as_f64()
                    .filter(|v| !v.is_nan())
                    .ok_or_else(|| non_numeric(row_idx))
            })
            .collect::<Result<Vec<_>, _>>()?;
        order.sort_by(|a, b| keys[*b].partial_cmp(&keys[*a]).unwrap_or(Ordering::Equal));
    }

    let rows = order
        .into_iter()
        .take(limit)
        .map(|row_idx| dataset.rows()[row_idx].clone())
        .collect();

    Ok(dataset.with_rows(rows))
}

fn numeric_column(dataset: &Dataset, field: &str) -> Result<usize, ShapeError> {
    typed_column(dataset, field, "numeric", ColumnType::is_numeric)
}

fn integer_column(dataset: &Dataset, field: &str) -> Result<usize, ShapeError> {
    typed_column(dataset, field, "integer", |ty| ty == ColumnType::Integer)
}

fn typed_column(
    dataset: &Dataset,
    field: &str,
    expected: &str,
    accepts: impl Fn(ColumnType) -> bool,
) -> Result<usize, ShapeError> {
    let idx = dataset
        .column_index(field)
        .ok_or_else(|| ShapeError::MissingField {
            dataset: dataset.name.clone(),
            field: field.to_string(),
        })?;
    let ty = dataset.columns()[idx].ty;
    // all-null columns fail per row instead
    if ty != ColumnType::Empty && !accepts(ty) {
        return Err(ShapeError::UnexpectedType {
            dataset: dataset.name.clone(),
            field: field.to_string(),
            expected: expected.to_string(),
            found: ty,
        });
    }
    Ok(idx)
}
