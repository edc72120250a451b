use crate::domain::{Color, Metric, Metrics};

/// How a layer picks fill colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Continuous value of one metric against descending breakpoints
    Threshold(Metric),
    /// Categorical grade label
    Grade,
}

/// Input to [`ColorClassifier::classify`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure<'a> {
    Value(f64),
    Grade(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    /// The band applies to values strictly greater than this
    pub above: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: Color,
    pub label: String,
}

/// Descending breakpoints for population-style metrics
pub const POPULATION_BANDS: [ThresholdBand; 4] = [
    ThresholdBand {
        above: 100_000.0,
        color: Color::RED,
    },
    ThresholdBand {
        above: 50_000.0,
        color: Color::ORANGE,
    },
    ThresholdBand {
        above: 30_000.0,
        color: Color::YELLOW,
    },
    ThresholdBand {
        above: 10_000.0,
        color: Color::GREEN,
    },
];

/// Color for values at or below every breakpoint
pub const LOW_COLOR: Color = Color::BLUE;

struct GradeEntry {
    aliases: &'static [&'static str],
    label: &'static str,
    color: Color,
}

const GRADE_TABLE: [GradeEntry; 5] = [
    GradeEntry {
        aliases: &["1등급", "1st tier"],
        label: "1st tier",
        color: Color::RED,
    },
    GradeEntry {
        aliases: &["2등급", "2nd tier"],
        label: "2nd tier",
        color: Color::ORANGE,
    },
    GradeEntry {
        aliases: &["3등급", "3rd tier"],
        label: "3rd tier",
        color: Color::YELLOW,
    },
    GradeEntry {
        aliases: &["4등급", "4th tier"],
        label: "4th tier",
        color: Color::GREEN,
    },
    GradeEntry {
        aliases: &["5등급", "5th tier"],
        label: "5th tier",
        color: Color::BLUE,
    },
];

/// Maps metric values or grade labels to display colors.
///
/// Total: every input yields exactly one color. NaN falls below every
/// breakpoint; unknown grades get [`Color::GRAY`].
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    policy: ColorPolicy,
}

impl ColorClassifier {
    pub fn new(policy: ColorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ColorPolicy {
        self.policy
    }

    pub fn classify(&self, measure: Measure<'_>) -> Color {
        match measure {
            Measure::Value(value) => classify_value(value),
            Measure::Grade(grade) => classify_grade(grade),
        }
    }

    /// Color for a region under this classifier's policy
    pub fn color_for(&self, metrics: &Metrics, grade: Option<&str>) -> Color {
        match self.policy {
            ColorPolicy::Threshold(metric) => {
                self.classify(Measure::Value(metrics.get(metric).unwrap_or(0.0)))
            }
            ColorPolicy::Grade => match grade {
                Some(grade) => self.classify(Measure::Grade(grade)),
                None => Color::GRAY,
            },
        }
    }

    /// Ordered legend for the active policy, most significant first
    pub fn legend(&self) -> Vec<LegendEntry> {
        match self.policy {
            ColorPolicy::Threshold(_) => {
                let mut entries = Vec::with_capacity(POPULATION_BANDS.len() + 1);
                let mut upper: Option<f64> = None;
                for band in POPULATION_BANDS {
                    let label = match upper {
                        None => format!("over {}", group_thousands(band.above)),
                        Some(upper) => format!(
                            "{} - {}",
                            group_thousands(band.above),
                            group_thousands(upper)
                        ),
                    };
                    entries.push(LegendEntry {
                        color: band.color,
                        label,
                    });
                    upper = Some(band.above);
                }
                if let Some(last) = upper {
                    entries.push(LegendEntry {
                        color: LOW_COLOR,
                        label: format!("{} or less", group_thousands(last)),
                    });
                }
                entries
            }
            ColorPolicy::Grade => GRADE_TABLE
                .iter()
                .map(|entry| LegendEntry {
                    color: entry.color,
                    label: entry.label.to_string(),
                })
                .collect(),
        }
    }
}

pub fn classify_value(value: f64) -> Color {
    POPULATION_BANDS
        .iter()
        .find(|band| value > band.above)
        .map(|band| band.color)
        .unwrap_or(LOW_COLOR)
}

pub fn classify_grade(grade: &str) -> Color {
    let grade = grade.trim();
    GRADE_TABLE
        .iter()
        .find(|entry| entry.aliases.contains(&grade))
        .map(|entry| entry.color)
        .unwrap_or(Color::GRAY)
}

/// Whole number with comma thousands separators
pub(crate) fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_examples() {
        let classifier = ColorClassifier::new(ColorPolicy::Threshold(Metric::FloatingPopulation));
        assert_eq!(classifier.classify(Measure::Value(150_000.0)), Color::RED);
        assert_eq!(classifier.classify(Measure::Value(20_000.0)), Color::GREEN);
        assert_eq!(classifier.classify(Measure::Value(-5.0)), Color::BLUE);
    }

    #[test]
    fn test_threshold_boundaries_are_exclusive() {
        assert_eq!(classify_value(100_000.0), Color::ORANGE);
        assert_eq!(classify_value(50_000.0), Color::YELLOW);
        assert_eq!(classify_value(30_000.0), Color::GREEN);
        assert_eq!(classify_value(10_000.0), Color::BLUE);
        assert_eq!(classify_value(42_000.0), Color::YELLOW);
        assert_eq!(classify_value(50_000.5), Color::ORANGE);
    }

    #[test]
    fn test_threshold_is_total() {
        let palette = [Color::RED, Color::ORANGE, Color::YELLOW, Color::GREEN, Color::BLUE];
        for value in [
            f64::NEG_INFINITY,
            -1e12,
            0.0,
            9_999.9,
            10_000.1,
            1e300,
            f64::INFINITY,
            f64::NAN,
        ] {
            assert!(palette.contains(&classify_value(value)), "value {value}");
        }
        assert_eq!(classify_value(f64::NAN), Color::BLUE);
    }

    #[test]
    fn test_grade_table() {
        assert_eq!(classify_grade("1등급"), Color::RED);
        assert_eq!(classify_grade("2nd tier"), Color::ORANGE);
        assert_eq!(classify_grade(" 5등급 "), Color::BLUE);
        assert_eq!(classify_grade("6등급"), Color::GRAY);
        assert_eq!(classify_grade(""), Color::GRAY);
    }

    #[test]
    fn test_color_for_missing_inputs() {
        let threshold = ColorClassifier::new(ColorPolicy::Threshold(Metric::FloatingPopulation));
        assert_eq!(threshold.color_for(&Metrics::new(), None), Color::BLUE);

        let grade = ColorClassifier::new(ColorPolicy::Grade);
        assert_eq!(grade.color_for(&Metrics::new(), None), Color::GRAY);
        assert_eq!(grade.color_for(&Metrics::new(), Some("3rd tier")), Color::YELLOW);
    }

    #[test]
    fn test_threshold_legend() {
        let classifier = ColorClassifier::new(ColorPolicy::Threshold(Metric::FloatingPopulation));
        let legend = classifier.legend();
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[0].label, "over 100,000");
        assert_eq!(legend[1].label, "50,000 - 100,000");
        assert_eq!(legend[4].label, "10,000 or less");
        assert_eq!(legend[4].color, Color::BLUE);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(42_000.0), "42,000");
        assert_eq!(group_thousands(1_234_567.4), "1,234,567");
        assert_eq!(group_thousands(-1_500.0), "-1,500");
    }
}
