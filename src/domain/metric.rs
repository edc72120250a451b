use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Metrics that can be joined from tabular datasets onto regions.
///
/// Declaration order is the order rows appear in a tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    FloatingPopulation,
    WorkplacePopulation,
    ResidentPopulation,
    StoreCount,
    TargetAgeCount,
    Rent,
}

impl Metric {
    /// Metrics shown on the population heat map
    pub const POPULATION: [Metric; 4] = [
        Metric::FloatingPopulation,
        Metric::WorkplacePopulation,
        Metric::ResidentPopulation,
        Metric::StoreCount,
    ];

    /// Metrics shown on the location recommendation map
    pub const RECOMMENDATION: [Metric; 5] = [
        Metric::FloatingPopulation,
        Metric::WorkplacePopulation,
        Metric::ResidentPopulation,
        Metric::TargetAgeCount,
        Metric::Rent,
    ];

    /// Name used inside a [`MetricKey`]
    pub fn key_name(self) -> &'static str {
        match self {
            Metric::FloatingPopulation => "floatingPopulation",
            Metric::WorkplacePopulation => "workplacePopulation",
            Metric::ResidentPopulation => "residentPopulation",
            Metric::StoreCount => "storeCount",
            Metric::TargetAgeCount => "targetAgeCount",
            Metric::Rent => "rent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::FloatingPopulation => "Floating population",
            Metric::WorkplacePopulation => "Workplace population",
            Metric::ResidentPopulation => "Resident population",
            Metric::StoreCount => "Stores",
            Metric::TargetAgeCount => "Target age group",
            Metric::Rent => "Rent",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::FloatingPopulation
            | Metric::WorkplacePopulation
            | Metric::ResidentPopulation
            | Metric::TargetAgeCount => "people",
            Metric::StoreCount => "stores",
            Metric::Rent => "KRW/pyeong",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [
            Metric::FloatingPopulation,
            Metric::WorkplacePopulation,
            Metric::ResidentPopulation,
            Metric::StoreCount,
            Metric::TargetAgeCount,
            Metric::Rent,
        ];
        all.into_iter()
            .find(|m| m.key_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown metric: {s}"))
    }
}

/// Join key between a region and one dataset value.
///
/// Built only through [`MetricKey::new`], which is shared by dataset
/// producers and the resolver so both sides agree on the format
/// `<regionShortName>_<metricName>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey(String);

impl MetricKey {
    pub fn new(region_short_name: &str, metric: Metric) -> Self {
        Self(format!("{}_{}", region_short_name, metric.key_name()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved metric values for one region, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics(Vec<(Metric, f64)>);

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any earlier value for the same metric
    pub fn insert(&mut self, metric: Metric, value: f64) {
        match self.0.iter_mut().find(|(m, _)| *m == metric) {
            Some(slot) => slot.1 = value,
            None => self.0.push((metric, value)),
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.iter().find(|(m, _)| *m == metric).map(|&(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Metric, f64)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        let mut metrics = Metrics::new();
        for (metric, value) in iter {
            metrics.insert(metric, value);
        }
        metrics
    }
}
