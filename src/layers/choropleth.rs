use serde::Deserialize;
use std::time::Duration;

use super::{ColorClassifier, ColorPolicy, DrawnLayer, LayerStyle, LegendEntry, OverlayRenderer};
use crate::data::{MetricProvider, MetricResolver, TableLayout};
use crate::domain::{Feature, Metric};
use crate::geojson::GeoFeatureIndex;
use crate::geometry::BoundsAccumulator;
use crate::host::HostSurface;

/// Which map screen to reproduce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Population heat map over every region
    #[default]
    Population,
    /// Graded recommendation map over matched regions
    Recommendation,
}

impl RenderMode {
    /// Dataset column layout this mode reads
    pub fn layout(self) -> TableLayout {
        match self {
            RenderMode::Population => TableLayout::Population,
            RenderMode::Recommendation => TableLayout::Recommendation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionFilter {
    All,
    /// Only regions some dataset knows about
    MatchedOnly,
}

/// Everything one render pass needs besides the data
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub metrics: Vec<Metric>,
    pub color_policy: ColorPolicy,
    pub filter: RegionFilter,
    pub style: LayerStyle,
}

impl LayerSpec {
    pub fn population() -> Self {
        Self {
            metrics: Metric::POPULATION.to_vec(),
            color_policy: ColorPolicy::Threshold(Metric::FloatingPopulation),
            filter: RegionFilter::All,
            style: LayerStyle::population(),
        }
    }

    pub fn recommendation() -> Self {
        Self {
            metrics: Metric::RECOMMENDATION.to_vec(),
            color_policy: ColorPolicy::Grade,
            filter: RegionFilter::MatchedOnly,
            style: LayerStyle::recommendation(),
        }
    }

    pub fn for_mode(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Population => Self::population(),
            RenderMode::Recommendation => Self::recommendation(),
        }
    }

    /// Color by `metric` instead; ignored under a grade policy
    pub fn with_threshold_metric(mut self, metric: Metric) -> Self {
        if let ColorPolicy::Threshold(_) = self.color_policy {
            self.color_policy = ColorPolicy::Threshold(metric);
            if !self.metrics.contains(&metric) {
                self.metrics.push(metric);
                self.metrics.sort();
            }
        }
        self
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        ColorClassifier::new(self.color_policy).legend()
    }
}

/// Index, join, classify and draw `features` as one layer.
///
/// Regions without any dataset entry still render in the low/default
/// color unless the filter drops them. With `MatchedOnly` the
/// viewport bounds cover the kept regions only. Reuse `index` across
/// passes of one map so record ids stay distinct.
pub fn render_choropleth(
    index: &mut GeoFeatureIndex,
    features: &[Feature],
    datasets: &[&dyn MetricProvider],
    layer_spec: &LayerSpec,
    host: &mut dyn HostSurface,
    now: Duration,
) -> DrawnLayer {
    let mut bounds = BoundsAccumulator::new();
    let records = index.build(features, |lon, lat| host.project(lon, lat), &mut bounds);
    let indexed = records.len();

    let resolver = MetricResolver::new(&layer_spec.metrics, datasets);
    let classifier = ColorClassifier::new(layer_spec.color_policy);

    let records: Vec<_> = records
        .into_iter()
        .filter_map(|record| {
            let resolution = resolver.resolve(&record);
            if layer_spec.filter == RegionFilter::MatchedOnly && !resolution.matched {
                return None;
            }
            let color = classifier.color_for(&resolution.metrics, resolution.grade.as_deref());
            Some(
                record
                    .with_metrics(resolution.metrics, resolution.grade)
                    .with_fill_color(color),
            )
        })
        .collect();

    if records.len() != indexed {
        bounds = BoundsAccumulator::new();
        for record in &records {
            for ring in record.projected_rings() {
                bounds.extend_all(ring.iter().copied());
            }
        }
    }

    OverlayRenderer::new(layer_spec.style.clone()).render(records, &bounds, host, now)
}
