//! Capability interface a map SDK binding provides to the overlay renderer.
//!
//! The renderer never reaches for a global map object: every component is
//! handed a `&mut dyn HostSurface` explicitly. Events flow the other way as
//! plain [`HostEvent`] values the embedding application forwards to the
//! layer that subscribed to them.

pub mod memory;
pub mod svg;

pub use memory::{HostOp, MemorySurface};
pub use svg::{render_svg, write_svg};

use crate::domain::Color;
use crate::geometry::{Bounds, Point};
use crate::layers::TooltipContent;

/// Opaque reference to a polygon drawn by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u64);

/// Opaque reference to an overlay (tooltip) created by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub u64);

/// Opaque reference to an event subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Visual style of one drawn polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub stroke_color: Color,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
}

/// Where an overlay sits relative to its position, as fractions of its size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Default for Anchor {
    /// Centered horizontally, floating above the pointer
    fn default() -> Self {
        Self { x: 0.5, y: 1.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    PointerEnter,
    PointerMove,
    PointerLeave,
    Click,
    /// The host finished its initial load (e.g. tiles loaded)
    ViewSettled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventTarget {
    Shape(ShapeHandle),
    Surface,
}

/// Event dispatched by the host for a subscription
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostEvent {
    pub target: EventTarget,
    pub kind: EventKind,
    /// Pointer location on the surface, when the event has one
    pub position: Option<Point>,
}

impl HostEvent {
    pub fn shape(shape: ShapeHandle, kind: EventKind, position: Point) -> Self {
        Self {
            target: EventTarget::Shape(shape),
            kind,
            position: Some(position),
        }
    }

    pub fn surface(kind: EventKind, position: Option<Point>) -> Self {
        Self {
            target: EventTarget::Surface,
            kind,
            position,
        }
    }

    pub fn view_settled() -> Self {
        Self::surface(EventKind::ViewSettled, None)
    }
}

pub trait HostSurface {
    /// Coordinate transform from WGS84 to surface points
    fn project(&self, lon: f64, lat: f64) -> Point;

    fn draw_polygon(&mut self, rings: &[Vec<Point>], style: &ShapeStyle) -> ShapeHandle;
    fn restyle(&mut self, shape: ShapeHandle, style: &ShapeStyle);
    fn remove_shape(&mut self, shape: ShapeHandle);

    /// Create a hidden overlay
    fn create_overlay(&mut self, content: &TooltipContent, anchor: Anchor) -> OverlayHandle;
    fn set_overlay_content(&mut self, overlay: OverlayHandle, content: &TooltipContent);
    fn show_overlay(&mut self, overlay: OverlayHandle, position: Point);
    fn hide_overlay(&mut self, overlay: OverlayHandle);
    fn remove_overlay(&mut self, overlay: OverlayHandle);

    fn fit_bounds(&mut self, bounds: &Bounds);

    fn subscribe(&mut self, target: EventTarget, kind: EventKind) -> SubscriptionId;
    fn unsubscribe(&mut self, subscription: SubscriptionId);
}
