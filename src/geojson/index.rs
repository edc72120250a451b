use geo::{Coord, coord};

use crate::domain::{Feature, PolygonRecord, RecordIds};
use crate::geometry::{BoundsAccumulator, Point};

/// Turns raw features into polygon records, one batch per render pass.
///
/// Owns the id allocator, so records from every pass built by the same
/// index have distinct ids.
#[derive(Debug, Default)]
pub struct GeoFeatureIndex {
    ids: RecordIds,
}

impl GeoFeatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one record per drawable feature.
    ///
    /// # Algorithm
    /// 1. Flatten Polygon / MultiPolygon rings into a single ring list
    /// 2. Project every vertex through `project`, extending `bounds`
    /// 3. Average every visited (lon, lat) into the centroid
    ///
    /// Unsupported geometry types and features without vertices are
    /// skipped silently.
    pub fn build<P>(
        &mut self,
        features: &[Feature],
        project: P,
        bounds: &mut BoundsAccumulator,
    ) -> Vec<PolygonRecord>
    where
        P: Fn(f64, f64) -> Point,
    {
        let mut records = Vec::with_capacity(features.len());

        for feature in features {
            let Some(rings) = feature.geometry.rings() else {
                continue;
            };

            let mut projected = Vec::with_capacity(rings.len());
            let mut sum = (0.0, 0.0);
            let mut count = 0usize;

            for ring in rings {
                if ring.is_empty() {
                    continue;
                }
                let mut points = Vec::with_capacity(ring.len());
                for &(lon, lat) in ring {
                    let point = project(lon, lat);
                    bounds.extend(point);
                    points.push(point);
                    sum.0 += lon;
                    sum.1 += lat;
                    count += 1;
                }
                projected.push(points);
            }

            if count == 0 {
                continue;
            }

            let centroid: Coord<f64> = coord! {
                x: sum.0 / count as f64,
                y: sum.1 / count as f64,
            };
            records.push(PolygonRecord::new(
                self.ids.allocate(),
                &feature.region_full_name,
                feature.region_short_name(),
                projected,
                centroid,
            ));
        }

        records
    }
}
