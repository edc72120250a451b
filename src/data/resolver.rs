use super::MetricProvider;
use crate::domain::{Metric, MetricKey, Metrics, PolygonRecord};

/// Metrics joined onto one region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub metrics: Metrics,
    pub grade: Option<String>,
    /// Whether any provider has a row or value for the region
    pub matched: bool,
}

/// Joins region short names against an ordered list of datasets.
///
/// Earlier providers win. A metric no provider defines resolves to `0`.
pub struct MetricResolver<'a> {
    metrics: &'a [Metric],
    providers: &'a [&'a dyn MetricProvider],
}

impl<'a> MetricResolver<'a> {
    pub fn new(metrics: &'a [Metric], providers: &'a [&'a dyn MetricProvider]) -> Self {
        Self { metrics, providers }
    }

    pub fn resolve(&self, record: &PolygonRecord) -> Resolution {
        self.resolve_region(record.region_short_name())
    }

    pub fn resolve_region(&self, region_short_name: &str) -> Resolution {
        let mut matched = false;
        let mut metrics = Metrics::new();

        for &metric in self.metrics {
            let key = MetricKey::new(region_short_name, metric);
            let value = self.providers.iter().find_map(|p| p.get(&key));
            matched |= value.is_some();
            metrics.insert(metric, value.unwrap_or(0.0));
        }

        let grade = self
            .providers
            .iter()
            .find_map(|p| p.grade(region_short_name))
            .map(str::to_string);
        matched |= grade.is_some();
        matched |= self.providers.iter().any(|p| p.knows(region_short_name));

        Resolution {
            metrics,
            grade,
            matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn provider(entries: &[(&str, Metric, f64)]) -> HashMap<MetricKey, f64> {
        entries
            .iter()
            .map(|&(region, metric, value)| (MetricKey::new(region, metric), value))
            .collect()
    }

    #[test]
    fn test_missing_metric_defaults_to_zero() {
        let data = provider(&[("Samseong-dong", Metric::FloatingPopulation, 42_000.0)]);
        let providers: [&dyn MetricProvider; 1] = [&data];
        let resolver = MetricResolver::new(&Metric::POPULATION, &providers);

        let resolution = resolver.resolve_region("Samseong-dong");
        assert!(resolution.matched);
        assert_eq!(resolution.metrics.get(Metric::FloatingPopulation), Some(42_000.0));
        assert_eq!(resolution.metrics.get(Metric::StoreCount), Some(0.0));
        assert_eq!(resolution.metrics.len(), 4);

        let unknown = resolver.resolve_region("Nowhere-dong");
        assert!(!unknown.matched);
        assert!(unknown.metrics.iter().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn test_first_provider_wins() {
        let first = provider(&[("A-dong", Metric::ResidentPopulation, 1.0)]);
        let second = provider(&[
            ("A-dong", Metric::ResidentPopulation, 2.0),
            ("A-dong", Metric::StoreCount, 7.0),
        ]);
        let providers: [&dyn MetricProvider; 2] = [&first, &second];
        let resolver = MetricResolver::new(&Metric::POPULATION, &providers);

        let resolution = resolver.resolve_region("A-dong");
        assert_eq!(resolution.metrics.get(Metric::ResidentPopulation), Some(1.0));
        assert_eq!(resolution.metrics.get(Metric::StoreCount), Some(7.0));
    }

    #[test]
    fn test_row_presence_matches() {
        let table = crate::data::MetricTable::from_json(
            r#"[{"regionName": "Yeoksam1-dong", "grade": null}]"#,
            crate::data::TableLayout::Recommendation,
        )
        .unwrap();
        let providers: [&dyn MetricProvider; 1] = [&table];
        let resolver = MetricResolver::new(&Metric::RECOMMENDATION, &providers);

        let resolution = resolver.resolve_region("Yeoksam1-dong");
        assert!(resolution.matched);
        assert_eq!(resolution.grade, None);
        assert!(resolution.metrics.iter().all(|(_, v)| v == 0.0));
        assert!(!resolver.resolve_region("Nonhyeon-dong").matched);
    }

    #[test]
    fn test_no_providers() {
        let resolver = MetricResolver::new(&Metric::RECOMMENDATION, &[]);
        let resolution = resolver.resolve_region("A-dong");
        assert!(!resolution.matched);
        assert_eq!(resolution.grade, None);
        assert_eq!(resolution.metrics.get(Metric::Rent), Some(0.0));
    }
}
