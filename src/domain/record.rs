use geo::Coord;

use super::{Color, Metrics};
use crate::geometry::Point;
use crate::host::ShapeHandle;

/// Identity of a polygon record, unique among the ids of one [`RecordIds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Allocator for [`RecordId`]s.
///
/// Ids are never reused by the same allocator, so records indexed for
/// successive render passes of one map never share an id.
#[derive(Debug, Clone, Default)]
pub struct RecordIds {
    last: u64,
}

impl RecordIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> RecordId {
        self.last += 1;
        RecordId(self.last)
    }
}

/// One drawable region for a single render pass
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRecord {
    id: RecordId,
    region_full_name: String,
    region_short_name: String,
    projected_rings: Vec<Vec<Point>>,
    centroid: Coord<f64>,
    metrics: Metrics,
    grade: Option<String>,
    fill_color: Color,
    draw_handle: Option<ShapeHandle>,
}

impl PolygonRecord {
    pub(crate) fn new(
        id: RecordId,
        region_full_name: &str,
        region_short_name: &str,
        projected_rings: Vec<Vec<Point>>,
        centroid: Coord<f64>,
    ) -> Self {
        Self {
            id,
            region_full_name: region_full_name.to_string(),
            region_short_name: region_short_name.to_string(),
            projected_rings,
            centroid,
            metrics: Metrics::new(),
            grade: None,
            fill_color: Color::GRAY,
            draw_handle: None,
        }
    }

    pub(crate) fn with_metrics(mut self, metrics: Metrics, grade: Option<String>) -> Self {
        self.metrics = metrics;
        self.grade = grade;
        self
    }

    pub(crate) fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    pub(crate) fn attach(&mut self, handle: ShapeHandle) {
        self.draw_handle = Some(handle);
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn region_full_name(&self) -> &str {
        &self.region_full_name
    }

    pub fn region_short_name(&self) -> &str {
        &self.region_short_name
    }

    /// Rings in host-surface coordinates
    pub fn projected_rings(&self) -> &[Vec<Point>] {
        &self.projected_rings
    }

    /// Arithmetic mean of every ring vertex in (lon, lat).
    ///
    /// Not an area centroid: closing vertices count twice and large
    /// rings pull the mean toward themselves.
    pub fn centroid(&self) -> Coord<f64> {
        self.centroid
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    /// Shape currently displaying this record, once rendered
    pub fn draw_handle(&self) -> Option<ShapeHandle> {
        self.draw_handle
    }

    pub fn vertex_count(&self) -> usize {
        self.projected_rings.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_allocated_ids_are_unique() {
        let mut ids = RecordIds::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
        assert!(b > a);

        // Separate allocators are independent
        assert_eq!(RecordIds::new().allocate(), a);
    }

    #[test]
    fn test_builders_keep_identity() {
        let id = RecordIds::new().allocate();
        let record = PolygonRecord::new(
            id,
            "Seoul X-dong",
            "X-dong",
            Vec::new(),
            coord! { x: 1.0, y: 2.0 },
        );
        let record = record
            .with_metrics(Metrics::new(), Some("1st tier".into()))
            .with_fill_color(Color::RED);

        assert_eq!(record.id(), id);
        assert_eq!(record.grade(), Some("1st tier"));
        assert_eq!(record.fill_color(), Color::RED);
        assert_eq!(record.draw_handle(), None);
    }
}
