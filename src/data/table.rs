use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use thiserror::Error;

use super::MetricProvider;
use crate::domain::{Metric, MetricKey};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset must be a JSON array of row objects")]
    NotAnArray,
}

/// Column naming of a tabular dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLayout {
    /// Per-region population and store counts
    #[default]
    Population,
    /// Graded recommendation rows with per-area metrics
    Recommendation,
}

struct Columns {
    name: &'static [&'static str],
    grade: &'static [&'static str],
    metrics: &'static [(Metric, &'static [&'static str])],
}

const POPULATION_COLUMNS: Columns = Columns {
    name: &["행정동명", "regionName"],
    grade: &[],
    metrics: &[
        (Metric::FloatingPopulation, &["유동인구", "floatingPopulation"]),
        (Metric::WorkplacePopulation, &["직장인구", "workplacePopulation"]),
        (Metric::ResidentPopulation, &["거주인구", "residentPopulation"]),
        (Metric::StoreCount, &["총 업소 수", "storeCount"]),
    ],
};

const RECOMMENDATION_COLUMNS: Columns = Columns {
    name: &["행정동명", "regionName"],
    grade: &["등급", "grade"],
    metrics: &[
        (Metric::FloatingPopulation, &["유동인구(면적당)", "floatingPopulation"]),
        (Metric::WorkplacePopulation, &["직장인구(면적당)", "workplacePopulation"]),
        (Metric::ResidentPopulation, &["거주인구(면적당)", "residentPopulation"]),
        (Metric::TargetAgeCount, &["타겟연령_수", "targetAgeCount"]),
        (Metric::Rent, &["임대료", "rent"]),
    ],
};

impl TableLayout {
    fn columns(self) -> &'static Columns {
        match self {
            TableLayout::Population => &POPULATION_COLUMNS,
            TableLayout::Recommendation => &RECOMMENDATION_COLUMNS,
        }
    }
}

/// Dataset of per-region rows keyed by [`MetricKey`]
#[derive(Debug, Clone, Default)]
pub struct MetricTable {
    values: HashMap<MetricKey, f64>,
    grades: HashMap<String, String>,
    regions: HashSet<String>,
    rows: usize,
    skipped: usize,
}

impl MetricTable {
    pub fn from_json(json: &str, layout: TableLayout) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(json)?;
        let rows = value.as_array().ok_or(DatasetError::NotAnArray)?;
        Ok(Self::from_rows(rows, layout))
    }

    /// Build from row objects; rows without a region name are counted as skipped
    pub fn from_rows(rows: &[Value], layout: TableLayout) -> Self {
        let columns = layout.columns();
        let mut table = Self::default();

        for row in rows {
            let Some(object) = row.as_object() else {
                table.skipped += 1;
                continue;
            };
            let Some(region) = lookup(object, columns.name).and_then(text_cell) else {
                table.skipped += 1;
                continue;
            };

            for &(metric, aliases) in columns.metrics {
                if let Some(value) = lookup(object, aliases).and_then(numeric_cell) {
                    table.values.insert(MetricKey::new(&region, metric), value);
                }
            }
            if let Some(grade) = lookup(object, columns.grade).and_then(text_cell) {
                table.grades.insert(region.clone(), grade);
            }
            table.regions.insert(region);
            table.rows += 1;
        }

        table
    }

    pub fn insert(&mut self, region_short_name: &str, metric: Metric, value: f64) {
        self.values
            .insert(MetricKey::new(region_short_name, metric), value);
        self.regions.insert(region_short_name.to_string());
    }

    pub fn set_grade(&mut self, region_short_name: &str, grade: impl Into<String>) {
        self.grades
            .insert(region_short_name.to_string(), grade.into());
        self.regions.insert(region_short_name.to_string());
    }

    /// Rows accepted
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 && self.regions.is_empty()
    }

    /// Rows dropped for lacking a region name
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }
}

impl MetricProvider for MetricTable {
    fn get(&self, key: &MetricKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    fn grade(&self, region_short_name: &str) -> Option<&str> {
        self.grades.get(region_short_name).map(String::as_str)
    }

    fn knows(&self, region_short_name: &str) -> bool {
        self.regions.contains(region_short_name)
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| object.get(*key))
}

fn text_cell(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Numbers, or strings like "42,000"
fn numeric_cell(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_rows() {
        let json = r#"[
            {"행정동명": "삼성1동", "유동인구": 42000, "직장인구": "12,500", "거주인구": null, "총 업소 수": 310},
            {"유동인구": 5},
            "garbage"
        ]"#;
        let table = MetricTable::from_json(json, TableLayout::Population).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped(), 2);
        assert_eq!(
            table.get(&MetricKey::new("삼성1동", Metric::FloatingPopulation)),
            Some(42_000.0)
        );
        assert_eq!(
            table.get(&MetricKey::new("삼성1동", Metric::WorkplacePopulation)),
            Some(12_500.0)
        );
        assert_eq!(table.get(&MetricKey::new("삼성1동", Metric::ResidentPopulation)), None);
        assert_eq!(table.get(&MetricKey::new("삼성1동", Metric::StoreCount)), Some(310.0));
        assert_eq!(table.grade("삼성1동"), None);
    }

    #[test]
    fn test_recommendation_rows_with_grade() {
        let json = r#"[
            {"행정동명": "역삼1동", "등급": " 1등급 ", "유동인구(면적당)": 1523.4, "타겟연령_수": 800, "임대료": "95000"},
            {"regionName": "Yeoksam2-dong", "grade": "3rd tier", "rent": 70000}
        ]"#;
        let table = MetricTable::from_json(json, TableLayout::Recommendation).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.grade("역삼1동"), Some("1등급"));
        assert_eq!(table.grade("Yeoksam2-dong"), Some("3rd tier"));
        assert_eq!(
            table.get(&MetricKey::new("역삼1동", Metric::FloatingPopulation)),
            Some(1523.4)
        );
        assert_eq!(table.get(&MetricKey::new("역삼1동", Metric::Rent)), Some(95_000.0));
        assert_eq!(table.get(&MetricKey::new("Yeoksam2-dong", Metric::Rent)), Some(70_000.0));
    }

    #[test]
    fn test_row_without_values_still_known() {
        let json = r#"[{"행정동명": "역삼1동", "등급": null}]"#;
        let table = MetricTable::from_json(json, TableLayout::Recommendation).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.value_count(), 0);
        assert_eq!(table.grade("역삼1동"), None);
        assert!(table.knows("역삼1동"));
        assert!(!table.knows("역삼2동"));
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(
            MetricTable::from_json(r#"{"rows": []}"#, TableLayout::Population),
            Err(DatasetError::NotAnArray)
        ));
        assert!(matches!(
            MetricTable::from_json("[", TableLayout::Population),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn test_manual_inserts() {
        let mut table = MetricTable::default();
        assert!(table.is_empty());
        table.insert("A-dong", Metric::Rent, 10.0);
        table.set_grade("A-dong", "2등급");
        assert!(!table.is_empty());
        assert_eq!(table.value_count(), 1);
        assert_eq!(table.grade("A-dong"), Some("2등급"));
    }
}
