// Chart binding - Turns a view declaration into a chart specification
use crate::application::loader::DatasetContext;
use crate::application::transform::{synthesize_date, top_n};
use crate::domain::chart::{ChartSpec, FieldValues};
use crate::domain::dataset::{ColumnType, Dataset};
use crate::domain::error::ShapeError;
use crate::infrastructure::config::ViewConfig;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Any,
    Numeric,
    Integer,
}

impl FieldKind {
    fn accepts(self, ty: ColumnType) -> bool {
        // all-null columns carry no type to check
        if ty == ColumnType::Empty {
            return true;
        }
        match self {
            FieldKind::Any => true,
            FieldKind::Numeric => ty.is_numeric(),
            FieldKind::Integer => ty == ColumnType::Integer,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FieldKind::Any => "any",
            FieldKind::Numeric => "numeric",
            FieldKind::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRequirement {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldRequirement {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Fields the view needs from its source dataset, before any derived field is added.
pub fn view_schema(view: &ViewConfig) -> Vec<FieldRequirement> {
    let derived = view.derive_date.as_ref().map(|d| d.field.as_str());
    let mut schema: Vec<FieldRequirement> = Vec::new();
    let mut push = |name: &str, kind: FieldKind| {
        if Some(name) == derived {
            return;
        }
        match schema.iter_mut().find(|r| r.name == name) {
            // keep the stricter requirement
            Some(existing) if existing.kind == FieldKind::Any => existing.kind = kind,
            Some(_) => {}
            None => schema.push(FieldRequirement::new(name, kind)),
        }
    };

    if let Some(date) = &view.derive_date {
        push(date.year.as_str(), FieldKind::Integer);
        push(date.month.as_str(), FieldKind::Integer);
    }
    push(view.x.as_str(), FieldKind::Any);
    for y in &view.y {
        push(y.as_str(), FieldKind::Numeric);
    }
    if let Some(label) = &view.label {
        push(label.as_str(), FieldKind::Any);
    }
    if let Some(rank) = &view.top_n {
        push(rank.field.as_str(), FieldKind::Numeric);
    }

    schema
}

pub fn check_schema(dataset: &Dataset, schema: &[FieldRequirement]) -> Result<(), ShapeError> {
    for requirement in schema {
        let column = dataset
            .column(&requirement.name)
            .ok_or_else(|| ShapeError::MissingField {
                dataset: dataset.name.clone(),
                field: requirement.name.clone(),
            })?;
        if !requirement.kind.accepts(column.ty) {
            return Err(ShapeError::UnexpectedType {
                dataset: dataset.name.clone(),
                field: requirement.name.clone(),
                expected: requirement.kind.name().to_string(),
                found: column.ty,
            });
        }
    }
    Ok(())
}

/// Bind one view against the loaded datasets.
pub fn bind_view(ctx: &DatasetContext, view: &ViewConfig) -> Result<ChartSpec, ShapeError> {
    let source = ctx
        .get(&view.dataset)
        .ok_or_else(|| ShapeError::UnknownDataset {
            view: view.id.clone(),
            dataset: view.dataset.clone(),
        })?;

    check_schema(source, &view_schema(view))?;

    let mut dataset = source.clone();
    if let Some(derivation) = &view.derive_date {
        dataset = synthesize_date(dataset, derivation)?;
    }
    if let Some(rank) = &view.top_n {
        dataset = top_n(&dataset, &rank.field, rank.limit)?;
    }

    let x = field_values(&dataset, &view.x)?;
    let series = view
        .y
        .iter()
        .map(|y| field_values(&dataset, y))
        .collect::<Result<Vec<_>, _>>()?;
    let labels = view
        .label
        .as_ref()
        .map(|label| field_values(&dataset, label))
        .transpose()?;

    let spec = ChartSpec::new(
        view.id.clone(),
        view.section.clone(),
        view.title.clone(),
        view.kind,
        x,
        series,
        labels,
    );
    if spec.is_multi_series() {
        check_alignment(view, &spec.x, &spec.series)?;
    }

    if dataset.is_empty() {
        tracing::warn!("View {} is bound to an empty dataset {}", view.id, view.dataset);
    }
    tracing::debug!(
        "Bound view {} ({}) from {}: {} points, {} series",
        view.id,
        view.kind,
        view.dataset,
        spec.x.values.len(),
        spec.series.len()
    );

    Ok(spec)
}

fn field_values(dataset: &Dataset, field: &str) -> Result<FieldValues, ShapeError> {
    dataset
        .column_values(field)
        .map(|values| FieldValues::new(field, values))
        .ok_or_else(|| ShapeError::MissingField {
            dataset: dataset.name.clone(),
            field: field.to_string(),
        })
}

/// Series sharing an x axis need one value per distinct x key.
fn check_alignment(view: &ViewConfig, x: &FieldValues, series: &[FieldValues]) -> Result<(), ShapeError> {
    let misaligned = |detail: String| ShapeError::MisalignedSeries {
        view: view.id.clone(),
        x: x.field.clone(),
        detail,
    };

    let mut keys = HashSet::with_capacity(x.values.len());
    for value in &x.values {
        if value.is_null() {
            return Err(misaligned("null x key".to_string()));
        }
        if !keys.insert(value.to_string()) {
            return Err(misaligned(format!("duplicate x key {}", value)));
        }
    }

    for s in series {
        if s.values.len() != x.values.len() {
            return Err(misaligned(format!(
                "'{}' has {} values for {} keys",
                s.field,
                s.values.len(),
                x.values.len()
            )));
        }
        if let Some(pos) = s.values.iter().position(|v| v.is_null()) {
            return Err(misaligned(format!(
                "'{}' has no value at {}",
                s.field, x.values[pos]
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::loader::load_datasets;
    use crate::application::loader::tests::MemoryRepository;
    use crate::domain::chart::ChartKind;
    use crate::domain::dataset::{Column, Value};
    use crate::infrastructure::config::{DatasetConfig, DateDerivation, RankConfig};
    use chrono::NaiveDate;

    fn bonus_discount(rows: Vec<Vec<Value>>) -> Dataset {
        Dataset::new(
            "bonus_discount",
            vec![
                Column::new("Year", ColumnType::Integer),
                Column::new("Month", ColumnType::Integer),
                Column::new("TotalBonus", ColumnType::Float),
                Column::new("TotalDiscount", ColumnType::Float),
            ],
            rows,
        )
        .unwrap()
    }

    fn products() -> Dataset {
        Dataset::new(
            "top_products",
            vec![
                Column::new("ProductName", ColumnType::Text),
                Column::new("Revenue", ColumnType::Integer),
            ],
            vec![
                vec![Value::Text("A".into()), Value::Integer(100)],
                vec![Value::Text("B".into()), Value::Integer(500)],
                vec![Value::Text("C".into()), Value::Integer(500)],
                vec![Value::Text("D".into()), Value::Integer(50)],
            ],
        )
        .unwrap()
    }

    fn context(files: Vec<(&str, Dataset)>) -> DatasetContext {
        let sources: Vec<DatasetConfig> = files
            .iter()
            .map(|(file, ds)| DatasetConfig {
                name: ds.name.clone(),
                file: file.to_string(),
            })
            .collect();
        load_datasets(&MemoryRepository::new(files), &sources).unwrap()
    }

    fn view(dataset: &str, kind: ChartKind, x: &str, y: &[&str]) -> ViewConfig {
        ViewConfig {
            id: format!("{}_view", dataset),
            section: "Section".into(),
            title: "Title".into(),
            dataset: dataset.into(),
            kind,
            x: x.into(),
            y: y.iter().map(|s| s.to_string()).collect(),
            label: None,
            derive_date: None,
            top_n: None,
        }
    }

    fn month_year() -> Option<DateDerivation> {
        Some(DateDerivation {
            year: "Year".into(),
            month: "Month".into(),
            field: "MonthYear".into(),
        })
    }

    fn row(year: i64, month: i64, bonus: f64, discount: Value) -> Vec<Value> {
        vec![
            Value::Integer(year),
            Value::Integer(month),
            Value::Float(bonus),
            discount,
        ]
    }

    #[test]
    fn test_view_schema_skips_derived_field() {
        let mut v = view("bonus_discount", ChartKind::Line, "MonthYear", &["TotalBonus"]);
        v.derive_date = month_year();
        v.label = Some("TotalBonus".into());
        let schema = view_schema(&v);
        assert_eq!(
            schema,
            vec![
                FieldRequirement::new("Year", FieldKind::Integer),
                FieldRequirement::new("Month", FieldKind::Integer),
                FieldRequirement::new("TotalBonus", FieldKind::Numeric),
            ]
        );
    }

    #[test]
    fn test_binds_ranked_bar_with_labels() {
        let ctx = context(vec![("top_products.csv", products())]);
        let mut v = view("top_products", ChartKind::Bar, "ProductName", &["Revenue"]);
        v.label = Some("Revenue".into());
        v.top_n = Some(RankConfig {
            field: "Revenue".into(),
            limit: 2,
        });

        let spec = bind_view(&ctx, &v).unwrap();
        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(
            spec.x.values,
            vec![Value::Text("B".into()), Value::Text("C".into())]
        );
        assert_eq!(
            spec.series[0].values,
            vec![Value::Integer(500), Value::Integer(500)]
        );
        assert_eq!(spec.labels.unwrap().field, "Revenue");
    }

    #[test]
    fn test_binds_multi_series_on_synthesized_date() {
        let ctx = context(vec![(
            "bonus_discount.csv",
            bonus_discount(vec![
                row(2024, 1, 10.0, Value::Float(20.0)),
                row(2024, 2, 11.0, Value::Float(21.0)),
            ]),
        )]);
        let mut v = view(
            "bonus_discount",
            ChartKind::Line,
            "MonthYear",
            &["TotalBonus", "TotalDiscount"],
        );
        v.derive_date = month_year();

        let spec = bind_view(&ctx, &v).unwrap();
        assert!(spec.is_multi_series());
        assert_eq!(spec.x.field, "MonthYear");
        assert_eq!(
            spec.x.values[1],
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
        assert_eq!(spec.series[1].field, "TotalDiscount");
    }

    #[test]
    fn test_multi_series_rejects_duplicate_keys_and_gaps() {
        let mut v = view(
            "bonus_discount",
            ChartKind::Line,
            "MonthYear",
            &["TotalBonus", "TotalDiscount"],
        );
        v.derive_date = month_year();

        let duplicated = context(vec![(
            "bonus_discount.csv",
            bonus_discount(vec![
                row(2024, 1, 10.0, Value::Float(20.0)),
                row(2024, 1, 11.0, Value::Float(21.0)),
            ]),
        )]);
        assert!(matches!(
            bind_view(&duplicated, &v),
            Err(ShapeError::MisalignedSeries { .. })
        ));

        let gap = context(vec![(
            "bonus_discount.csv",
            bonus_discount(vec![
                row(2024, 1, 10.0, Value::Float(20.0)),
                row(2024, 2, 11.0, Value::Null),
            ]),
        )]);
        assert!(matches!(
            bind_view(&gap, &v),
            Err(ShapeError::MisalignedSeries { .. })
        ));
    }

    #[test]
    fn test_missing_field_fails_at_binding() {
        let ctx = context(vec![("top_products.csv", products())]);
        let v = view("top_products", ChartKind::Bar, "ProductName", &["UnitsSold"]);
        assert_eq!(
            bind_view(&ctx, &v),
            Err(ShapeError::MissingField {
                dataset: "top_products".into(),
                field: "UnitsSold".into(),
            })
        );
    }

    #[test]
    fn test_text_series_fails_at_binding() {
        let ctx = context(vec![("top_products.csv", products())]);
        let v = view("top_products", ChartKind::Pie, "Revenue", &["ProductName"]);
        assert!(matches!(
            bind_view(&ctx, &v),
            Err(ShapeError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn test_unknown_dataset() {
        let ctx = context(vec![("top_products.csv", products())]);
        let v = view("client_type", ChartKind::Pie, "ClientType", &["Revenue"]);
        assert!(matches!(
            bind_view(&ctx, &v),
            Err(ShapeError::UnknownDataset { .. })
        ));
    }
}
