use std::collections::BTreeMap;

use super::{
    Anchor, EventKind, EventTarget, HostEvent, HostSurface, OverlayHandle, ShapeHandle,
    ShapeStyle, SubscriptionId,
};
use crate::geometry::{Bounds, Point, Projector};
use crate::layers::TooltipContent;

/// One host call, in the order it was made
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    DrawPolygon(ShapeHandle),
    Restyle(ShapeHandle, ShapeStyle),
    RemoveShape(ShapeHandle),
    CreateOverlay(OverlayHandle),
    SetOverlayContent(OverlayHandle),
    ShowOverlay(OverlayHandle, Point),
    HideOverlay(OverlayHandle),
    RemoveOverlay(OverlayHandle),
    FitBounds(Bounds),
    Subscribe(SubscriptionId, EventTarget, EventKind),
    Unsubscribe(SubscriptionId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneShape {
    pub rings: Vec<Vec<Point>>,
    pub style: ShapeStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneOverlay {
    pub content: TooltipContent,
    pub anchor: Anchor,
    /// Set while the overlay is shown
    pub position: Option<Point>,
}

/// In-process host surface keeping the whole scene in memory.
///
/// Used by the CLI to produce SVG snapshots and by tests to observe what
/// the renderer asked the host to do.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    projector: Projector,
    next_id: u64,
    shapes: BTreeMap<ShapeHandle, SceneShape>,
    overlays: BTreeMap<OverlayHandle, SceneOverlay>,
    subscriptions: BTreeMap<SubscriptionId, (EventTarget, EventKind)>,
    viewport: Option<Bounds>,
    log: Vec<HostOp>,
}

impl MemorySurface {
    pub fn new(projector: Projector) -> Self {
        Self {
            projector,
            next_id: 1,
            shapes: BTreeMap::new(),
            overlays: BTreeMap::new(),
            subscriptions: BTreeMap::new(),
            viewport: None,
            log: Vec::new(),
        }
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeHandle, &SceneShape)> {
        self.shapes.iter().map(|(h, s)| (*h, s))
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&SceneShape> {
        self.shapes.get(&handle)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn overlay(&self, handle: OverlayHandle) -> Option<&SceneOverlay> {
        self.overlays.get(&handle)
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn visible_overlays(&self) -> impl Iterator<Item = &SceneOverlay> {
        self.overlays.values().filter(|o| o.position.is_some())
    }

    pub fn visible_overlay_count(&self) -> usize {
        self.visible_overlays().count()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether a live subscription would receive `event`
    pub fn delivers(&self, event: &HostEvent) -> bool {
        self.subscriptions
            .values()
            .any(|&(target, kind)| target == event.target && kind == event.kind)
    }

    /// Last viewport requested through `fit_bounds`
    pub fn viewport(&self) -> Option<Bounds> {
        self.viewport
    }

    pub fn log(&self) -> &[HostOp] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl HostSurface for MemorySurface {
    fn project(&self, lon: f64, lat: f64) -> Point {
        self.projector.project(lon, lat)
    }

    fn draw_polygon(&mut self, rings: &[Vec<Point>], style: &ShapeStyle) -> ShapeHandle {
        let handle = ShapeHandle(self.allocate());
        self.shapes.insert(
            handle,
            SceneShape {
                rings: rings.to_vec(),
                style: *style,
            },
        );
        self.log.push(HostOp::DrawPolygon(handle));
        handle
    }

    fn restyle(&mut self, shape: ShapeHandle, style: &ShapeStyle) {
        if let Some(entry) = self.shapes.get_mut(&shape) {
            entry.style = *style;
            self.log.push(HostOp::Restyle(shape, *style));
        }
    }

    fn remove_shape(&mut self, shape: ShapeHandle) {
        if self.shapes.remove(&shape).is_some() {
            self.log.push(HostOp::RemoveShape(shape));
        }
    }

    fn create_overlay(&mut self, content: &TooltipContent, anchor: Anchor) -> OverlayHandle {
        let handle = OverlayHandle(self.allocate());
        self.overlays.insert(
            handle,
            SceneOverlay {
                content: content.clone(),
                anchor,
                position: None,
            },
        );
        self.log.push(HostOp::CreateOverlay(handle));
        handle
    }

    fn set_overlay_content(&mut self, overlay: OverlayHandle, content: &TooltipContent) {
        if let Some(entry) = self.overlays.get_mut(&overlay) {
            entry.content = content.clone();
            self.log.push(HostOp::SetOverlayContent(overlay));
        }
    }

    fn show_overlay(&mut self, overlay: OverlayHandle, position: Point) {
        if let Some(entry) = self.overlays.get_mut(&overlay) {
            entry.position = Some(position);
            self.log.push(HostOp::ShowOverlay(overlay, position));
        }
    }

    fn hide_overlay(&mut self, overlay: OverlayHandle) {
        if let Some(entry) = self.overlays.get_mut(&overlay) {
            entry.position = None;
            self.log.push(HostOp::HideOverlay(overlay));
        }
    }

    fn remove_overlay(&mut self, overlay: OverlayHandle) {
        if self.overlays.remove(&overlay).is_some() {
            self.log.push(HostOp::RemoveOverlay(overlay));
        }
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        self.viewport = Some(*bounds);
        self.log.push(HostOp::FitBounds(*bounds));
    }

    fn subscribe(&mut self, target: EventTarget, kind: EventKind) -> SubscriptionId {
        let id = SubscriptionId(self.allocate());
        self.subscriptions.insert(id, (target, kind));
        self.log.push(HostOp::Subscribe(id, target, kind));
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        if self.subscriptions.remove(&subscription).is_some() {
            self.log.push(HostOp::Unsubscribe(subscription));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Color;
    use geo::coord;

    fn style() -> ShapeStyle {
        ShapeStyle {
            fill_color: Color::RED,
            fill_opacity: 0.2,
            stroke_color: Color::CHARCOAL,
            stroke_opacity: 0.5,
            stroke_weight: 1.0,
        }
    }

    #[test]
    fn test_shape_lifecycle() {
        let mut surface = MemorySurface::new(Projector::new(0.0, 0.0));
        let ring = vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 0.0 }];
        let handle = surface.draw_polygon(&[ring], &style());
        assert_eq!(surface.shape_count(), 1);

        let mut restyled = style();
        restyled.fill_opacity = 0.4;
        surface.restyle(handle, &restyled);
        assert_eq!(surface.shape(handle).unwrap().style.fill_opacity, 0.4);

        surface.remove_shape(handle);
        assert_eq!(surface.shape_count(), 0);
        // Restyling a removed shape is a no-op
        surface.restyle(handle, &restyled);
        assert_eq!(surface.log().len(), 3);
    }

    #[test]
    fn test_overlay_visibility() {
        let mut surface = MemorySurface::new(Projector::new(0.0, 0.0));
        let overlay = surface.create_overlay(&TooltipContent::default(), Anchor::default());
        assert_eq!(surface.visible_overlay_count(), 0);

        surface.show_overlay(overlay, coord! { x: 3.0, y: 4.0 });
        assert_eq!(surface.visible_overlay_count(), 1);
        assert_eq!(
            surface.overlay(overlay).unwrap().position,
            Some(coord! { x: 3.0, y: 4.0 })
        );

        surface.hide_overlay(overlay);
        assert_eq!(surface.visible_overlay_count(), 0);
    }

    #[test]
    fn test_subscriptions_gate_delivery() {
        let mut surface = MemorySurface::new(Projector::new(0.0, 0.0));
        let sub = surface.subscribe(EventTarget::Surface, EventKind::ViewSettled);
        assert!(surface.delivers(&HostEvent::view_settled()));

        surface.unsubscribe(sub);
        assert!(!surface.delivers(&HostEvent::view_settled()));
        assert_eq!(surface.subscription_count(), 0);
    }
}
