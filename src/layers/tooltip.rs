use std::fmt;

use super::classifier::{classify_grade, group_thousands};
use crate::domain::{Color, PolygonRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub value: f64,
    pub unit: String,
}

impl TooltipRow {
    /// Value with thousands separators; one decimal for fractional values
    pub fn formatted_value(&self) -> String {
        format_value(self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeBadge {
    pub grade: String,
    pub color: Color,
}

/// Structured content of the shared hover tooltip.
///
/// Hosts decide how to draw it; `Display` gives a plain-text rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub badge: Option<GradeBadge>,
    pub rows: Vec<TooltipRow>,
}

impl TooltipContent {
    /// Region name, grade badge when graded, and one row per resolved metric
    pub fn for_record(record: &PolygonRecord) -> Self {
        let badge = record.grade().map(|grade| GradeBadge {
            grade: grade.to_string(),
            color: classify_grade(grade),
        });

        let rows = record
            .metrics()
            .iter()
            .map(|(metric, value)| TooltipRow {
                label: metric.label().to_string(),
                value,
                unit: metric.unit().to_string(),
            })
            .collect();

        Self {
            title: record.region_short_name().to_string(),
            badge,
            rows,
        }
    }

    /// Text lines in display order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        match &self.badge {
            Some(badge) => lines.push(format!("{} [{}]", self.title, badge.grade)),
            None => lines.push(self.title.clone()),
        }
        for row in &self.rows {
            lines.push(format!("{}: {} {}", row.label, row.formatted_value(), row.unit));
        }
        lines
    }
}

impl fmt::Display for TooltipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return group_thousands(value);
    }
    let tenths = (value * 10.0).round() / 10.0;
    let whole = group_thousands(tenths.trunc());
    let decimal = ((tenths.fract().abs()) * 10.0).round() as u8;
    let sign = if tenths < 0.0 && tenths.trunc() == 0.0 { "-" } else { "" };
    format!("{sign}{whole}.{decimal}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(42_000.0), "42,000");
        assert_eq!(format_value(1_234.56), "1,234.6");
        assert_eq!(format_value(0.25), "0.3");
        assert_eq!(format_value(-0.5), "-0.5");
        assert_eq!(format_value(f64::NAN), "0");
    }

    #[test]
    fn test_display_without_badge() {
        let content = TooltipContent {
            title: "Samseong-dong".into(),
            badge: None,
            rows: vec![TooltipRow {
                label: "Floating population".into(),
                value: 42_000.0,
                unit: "people".into(),
            }],
        };
        assert_eq!(
            content.to_string(),
            "Samseong-dong\nFloating population: 42,000 people"
        );
    }

    #[test]
    fn test_display_with_badge() {
        let content = TooltipContent {
            title: "Yeoksam1-dong".into(),
            badge: Some(GradeBadge {
                grade: "1st tier".into(),
                color: Color::RED,
            }),
            rows: Vec::new(),
        };
        assert_eq!(content.lines(), vec!["Yeoksam1-dong [1st tier]".to_string()]);
    }
}
