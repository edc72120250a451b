use std::collections::HashMap;

use crate::domain::MetricKey;

/// Externally supplied key -> value dataset
pub trait MetricProvider {
    fn get(&self, key: &MetricKey) -> Option<f64>;

    /// Categorical grade of a region, for datasets that carry one
    fn grade(&self, _region_short_name: &str) -> Option<&str> {
        None
    }

    /// Whether the dataset has a row for the region, even one without values
    fn knows(&self, _region_short_name: &str) -> bool {
        false
    }
}

impl MetricProvider for HashMap<MetricKey, f64> {
    fn get(&self, key: &MetricKey) -> Option<f64> {
        HashMap::get(self, key).copied()
    }
}
