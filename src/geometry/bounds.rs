use geo::{Rect, coord};

use super::Point;

/// Bounding box in host-surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Degenerate bounds covering a single point
    pub fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x,
            max_x: point.x,
            min_y: point.y,
            max_y: point.y,
        }
    }

    /// Create bounds from a set of points
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let mut acc = BoundsAccumulator::new();
        acc.extend_all(points.iter().copied());
        acc.current()
    }

    pub fn extend(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        self.to_rect().center()
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        )
    }
}

/// Running min/max over every vertex of a render pass.
///
/// Empty until the first point is added; NaN coordinates are ignored.
#[derive(Debug, Clone, Default)]
pub struct BoundsAccumulator {
    bounds: Option<Bounds>,
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, point: Point) {
        if point.x.is_nan() || point.y.is_nan() {
            return;
        }
        match self.bounds.as_mut() {
            Some(bounds) => bounds.extend(point),
            None => self.bounds = Some(Bounds::from_point(point)),
        }
    }

    pub fn extend_all(&mut self, points: impl IntoIterator<Item = Point>) {
        for point in points {
            self.extend(point);
        }
    }

    /// Bounds so far, `None` when nothing has been added
    pub fn current(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let points = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1000.0, y: 2000.0 },
            coord! { x: 500.0, y: 1000.0 },
        ];
        let bounds = Bounds::from_points(&points).unwrap();

        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.max_x, 1000.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(bounds.max_y, 2000.0);
    }

    #[test]
    fn test_accumulator_contains_interior_not_exterior() {
        let mut acc = BoundsAccumulator::new();
        acc.extend(coord! { x: 0.0, y: 0.0 });
        acc.extend(coord! { x: 10.0, y: 10.0 });

        let bounds = acc.current().unwrap();
        assert!(bounds.contains(coord! { x: 5.0, y: 5.0 }));
        assert!(!bounds.contains(coord! { x: 11.0, y: 11.0 }));
        assert_eq!(bounds.center(), coord! { x: 5.0, y: 5.0 });
    }

    #[test]
    fn test_accumulator_empty_and_nan() {
        let mut acc = BoundsAccumulator::new();
        assert!(acc.is_empty());
        acc.extend(coord! { x: f64::NAN, y: 1.0 });
        assert!(acc.current().is_none());
        assert!(Bounds::from_points(&[]).is_none());
    }
}
