use super::{Bounds, Point};

/// Scales surface coordinates (meters, north up) into image pixels (y down)
#[derive(Debug, Clone)]
pub struct Scaler {
    /// Scale factor: pixels per meter
    scale: f64,
    /// Offset to center the map
    offset_x: f64,
    offset_y: f64,
    height_px: f64,
}

impl Scaler {
    /// Create a scaler fitting `bounds` into a `width_px` x `height_px` image
    pub fn from_bounds(bounds: &Bounds, width_px: f64, height_px: f64) -> Self {
        Self::from_bounds_with_margin(bounds, width_px, height_px, 0.0)
    }

    /// Create a scaler leaving `margin_px` free on every side
    pub fn from_bounds_with_margin(
        bounds: &Bounds,
        width_px: f64,
        height_px: f64,
        margin_px: f64,
    ) -> Self {
        let usable_width = (width_px - 2.0 * margin_px).max(1.0);
        let usable_height = (height_px - 2.0 * margin_px).max(1.0);

        let scale_x = if bounds.width() > 0.0 {
            usable_width / bounds.width()
        } else {
            f64::INFINITY
        };
        let scale_y = if bounds.height() > 0.0 {
            usable_height / bounds.height()
        } else {
            f64::INFINITY
        };
        let scale = match scale_x.min(scale_y) {
            s if s.is_finite() => s,
            _ => 1.0,
        };

        let scaled_width = bounds.width() * scale;
        let scaled_height = bounds.height() * scale;

        let offset_x = (width_px - scaled_width) / 2.0 - bounds.min_x * scale;
        let offset_y = (height_px - scaled_height) / 2.0 - bounds.min_y * scale;

        Self {
            scale,
            offset_x,
            offset_y,
            height_px,
        }
    }

    /// Scale a surface point to pixel coordinates
    pub fn scale(&self, point: Point) -> (f64, f64) {
        let x = point.x * self.scale + self.offset_x;
        let y = point.y * self.scale + self.offset_y;
        (x, self.height_px - y)
    }

    /// Get the scale factor (pixels per meter)
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }
}
