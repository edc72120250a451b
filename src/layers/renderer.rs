use std::time::Duration;

use super::{LayerStyle, ShapeEntry, ShapeTable, TooltipContent};
use crate::domain::PolygonRecord;
use crate::geometry::{Bounds, BoundsAccumulator};
use crate::host::{
    Anchor, EventKind, EventTarget, HostEvent, HostSurface, OverlayHandle, SubscriptionId,
};
use crate::interaction::{
    ClickPulseController, HoverState, HoverTooltipController, LayerTask, RegionSelection,
    TimerId, TimerQueue,
};

/// Pointer events every drawn shape subscribes to
const SHAPE_EVENTS: [EventKind; 4] = [
    EventKind::PointerEnter,
    EventKind::PointerMove,
    EventKind::PointerLeave,
    EventKind::Click,
];

pub type SelectCallback = Box<dyn FnMut(&RegionSelection)>;

/// Draws polygon records on a host surface
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    style: LayerStyle,
}

impl OverlayRenderer {
    pub fn new(style: LayerStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    /// Draw every record and wire up its listeners.
    ///
    /// The returned layer starts in [`HoverState::Settling`]. It settles
    /// `settle_delay` after the host's view-settled event, or after
    /// `settle_fallback` from `now` if the host never sends one.
    pub fn render(
        &self,
        records: Vec<PolygonRecord>,
        bounds: &BoundsAccumulator,
        host: &mut dyn HostSurface,
        now: Duration,
    ) -> DrawnLayer {
        let mut shapes = ShapeTable::new(self.style.hover_opacity_delta);
        let mut subscriptions = Vec::with_capacity(records.len() * SHAPE_EVENTS.len() + 2);

        for mut record in records {
            let base = self.style.shape_style(record.fill_color());
            let handle = host.draw_polygon(record.projected_rings(), &base);
            record.attach(handle);

            for kind in SHAPE_EVENTS {
                subscriptions.push(host.subscribe(EventTarget::Shape(handle), kind));
            }

            shapes.push(ShapeEntry {
                tooltip: TooltipContent::for_record(&record),
                record,
                handle,
                base,
                current: base,
                hovered: false,
            });
        }

        let overlay = host.create_overlay(&TooltipContent::default(), Anchor::default());
        subscriptions.push(host.subscribe(EventTarget::Surface, EventKind::ViewSettled));
        subscriptions.push(host.subscribe(EventTarget::Surface, EventKind::PointerMove));

        let mut timers = TimerQueue::new();
        let mut settle_timers = Vec::new();
        if let Some(fallback) = self.style.settle_fallback {
            settle_timers.push(timers.schedule(now, fallback, LayerTask::Settle));
        }

        let bounds = bounds.current();
        if self.style.fit_bounds
            && let Some(ref b) = bounds
        {
            host.fit_bounds(b);
        }

        DrawnLayer {
            style: self.style.clone(),
            shapes,
            hover: HoverTooltipController::new(overlay),
            pulse: ClickPulseController::new(&self.style),
            timers,
            settle_timers,
            settle_signalled: false,
            subscriptions,
            bounds,
            on_select: None,
        }
    }
}

/// Handle to one render pass.
///
/// Owns every shape, listener, timer and the shared tooltip the pass
/// created; [`DrawnLayer::dispose`] takes all of them off the host.
pub struct DrawnLayer {
    style: LayerStyle,
    shapes: ShapeTable,
    hover: HoverTooltipController,
    pulse: ClickPulseController,
    timers: TimerQueue<LayerTask>,
    settle_timers: Vec<TimerId>,
    settle_signalled: bool,
    subscriptions: Vec<SubscriptionId>,
    bounds: Option<Bounds>,
    on_select: Option<SelectCallback>,
}

impl DrawnLayer {
    /// Register the callback notified with each clicked region
    pub fn on_select(&mut self, callback: impl FnMut(&RegionSelection) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    pub fn shapes(&self) -> &ShapeTable {
        &self.shapes
    }

    pub fn records(&self) -> impl Iterator<Item = &PolygonRecord> {
        self.shapes.iter().map(|entry| &entry.record)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover.state()
    }

    pub fn tooltip_visible(&self) -> bool {
        self.hover.tooltip_visible()
    }

    pub fn overlay(&self) -> OverlayHandle {
        self.hover.tooltip().overlay
    }

    /// Bounds of the rendered regions in surface coordinates
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn subscriptions(&self) -> &[SubscriptionId] {
        &self.subscriptions
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// When [`DrawnLayer::advance`] next has work to do
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// Dispatch one host event. Returns false if it did not concern this layer.
    ///
    /// Timers due at or before `now` run first.
    pub fn handle_event(
        &mut self,
        host: &mut dyn HostSurface,
        event: &HostEvent,
        now: Duration,
    ) -> bool {
        self.advance(host, now);

        match event.target {
            EventTarget::Surface => match event.kind {
                EventKind::ViewSettled => {
                    if !self.settle_signalled && self.hover.state() == HoverState::Settling {
                        self.settle_signalled = true;
                        let timer = self
                            .timers
                            .schedule(now, self.style.settle_delay, LayerTask::Settle);
                        self.settle_timers.push(timer);
                    }
                    true
                }
                EventKind::PointerMove => {
                    self.hover.surface_pointer_move(host);
                    true
                }
                _ => false,
            },
            EventTarget::Shape(handle) => {
                let Some(id) = self.shapes.id_for(handle) else {
                    return false;
                };
                let position = match event.position {
                    Some(p) => p,
                    None => {
                        let Some(entry) = self.shapes.get(id) else {
                            return false;
                        };
                        let centroid = entry.record.centroid();
                        host.project(centroid.x, centroid.y)
                    }
                };

                match event.kind {
                    EventKind::PointerEnter => {
                        self.hover
                            .pointer_enter(host, &mut self.shapes, id, position);
                    }
                    EventKind::PointerMove => self.hover.pointer_move(host, id, position),
                    EventKind::PointerLeave => {
                        self.hover.pointer_leave(host, &mut self.shapes, id);
                    }
                    EventKind::Click => {
                        // Same gate as hover: nothing reacts before the view settles
                        if self.hover.state() == HoverState::Settling {
                            return true;
                        }
                        if let Some((selection, _)) = self.pulse.on_click(
                            host,
                            &mut self.shapes,
                            &mut self.timers,
                            now,
                            id,
                        ) && let Some(callback) = self.on_select.as_mut()
                        {
                            callback(&selection);
                        }
                    }
                    EventKind::ViewSettled => return false,
                }
                true
            }
        }
    }

    /// Run every timer due at or before `now`
    pub fn advance(&mut self, host: &mut dyn HostSurface, now: Duration) {
        for (timer, task) in self.timers.pop_due(now) {
            match task {
                LayerTask::Settle => self.settle(host),
                LayerTask::RevertPulse(id) => {
                    self.pulse.revert(host, &mut self.shapes, id, timer);
                }
            }
        }
    }

    fn settle(&mut self, host: &mut dyn HostSurface) {
        for timer in self.settle_timers.drain(..) {
            self.timers.cancel(timer);
        }
        self.hover.view_settled(host);
    }

    /// Remove every shape, listener, timer and the tooltip from the host
    pub fn dispose(mut self, host: &mut dyn HostSurface) {
        self.timers.cancel_all();
        self.pulse.clear();
        for subscription in self.subscriptions.drain(..) {
            host.unsubscribe(subscription);
        }
        self.hover.release(host);
        for entry in self.shapes.into_entries() {
            host.remove_shape(entry.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Feature, Geometry};
    use crate::geojson::GeoFeatureIndex;
    use crate::geometry::Projector;
    use crate::host::{HostOp, MemorySurface, ShapeHandle};
    use geo::coord;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn square(x: f64, name: &str) -> Feature {
        Feature::new(
            Geometry::Polygon(vec![vec![
                (x, 0.0),
                (x, 0.01),
                (x + 0.01, 0.01),
                (x + 0.01, 0.0),
            ]]),
            name,
        )
    }

    fn render(style: LayerStyle, host: &mut MemorySurface) -> DrawnLayer {
        let features = vec![
            square(0.0, "Seoul Jung-gu A-dong"),
            square(0.01, "Seoul Jung-gu B-dong"),
        ];
        let mut bounds = BoundsAccumulator::new();
        let records = GeoFeatureIndex::new().build(
            &features,
            |lon, lat| host.project(lon, lat),
            &mut bounds,
        );
        OverlayRenderer::new(style).render(records, &bounds, host, ms(0))
    }

    fn handles(layer: &DrawnLayer) -> Vec<ShapeHandle> {
        layer.shapes().iter().map(|e| e.handle).collect()
    }

    fn enter(handle: ShapeHandle) -> HostEvent {
        HostEvent::shape(handle, EventKind::PointerEnter, coord! { x: 1.0, y: 1.0 })
    }

    #[test]
    fn test_render_draws_and_subscribes() {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let layer = render(LayerStyle::population(), &mut host);

        assert_eq!(layer.len(), 2);
        assert_eq!(host.shape_count(), 2);
        assert_eq!(host.overlay_count(), 1);
        assert_eq!(host.visible_overlay_count(), 0);
        // Four pointer events per shape plus two surface listeners
        assert_eq!(host.subscription_count(), 10);
        assert_eq!(layer.hover_state(), HoverState::Settling);

        for record in layer.records() {
            assert!(record.draw_handle().is_some());
        }
        // Population style never fits the viewport
        assert_eq!(host.viewport(), None);
        assert!(layer.bounds().is_some());
    }

    #[test]
    fn test_fit_bounds_when_enabled() {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let layer = render(LayerStyle::recommendation(), &mut host);
        assert_eq!(host.viewport(), layer.bounds());
        assert_eq!(
            host.log().iter().filter(|op| matches!(op, HostOp::FitBounds(_))).count(),
            1
        );
    }

    #[test]
    fn test_settle_after_view_settled_delay() {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let style = LayerStyle {
            settle_fallback: None,
            ..LayerStyle::population()
        };
        let mut layer = render(style, &mut host);
        let a = handles(&layer)[0];

        // Spurious enter during load is ignored
        layer.handle_event(&mut host, &enter(a), ms(10));
        assert_eq!(host.visible_overlay_count(), 0);

        layer.handle_event(&mut host, &HostEvent::view_settled(), ms(100));
        layer.advance(&mut host, ms(299));
        assert_eq!(layer.hover_state(), HoverState::Settling);
        layer.advance(&mut host, ms(300));
        assert_eq!(layer.hover_state(), HoverState::Idle);

        layer.handle_event(&mut host, &enter(a), ms(400));
        assert!(layer.tooltip_visible());
        assert_eq!(host.visible_overlay_count(), 1);
    }

    #[test]
    fn test_fallback_settles_without_host_signal() {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let mut layer = render(LayerStyle::population(), &mut host);

        layer.advance(&mut host, ms(500));
        assert_eq!(layer.hover_state(), HoverState::Idle);
        assert_eq!(layer.pending_timers(), 0);

        // A late host signal does not schedule anything
        layer.handle_event(&mut host, &HostEvent::view_settled(), ms(600));
        assert_eq!(layer.pending_timers(), 0);
    }

    #[test]
    fn test_click_pulses_and_notifies() {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let mut layer = render(LayerStyle::population(), &mut host);
        let selected = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&selected);
        layer.on_select(move |selection| sink.borrow_mut().push(selection.region.clone()));

        let a = handles(&layer)[0];
        let click = HostEvent::shape(a, EventKind::Click, coord! { x: 0.0, y: 0.0 });

        // Before settling clicks are ignored
        layer.handle_event(&mut host, &click, ms(0));
        assert!(selected.borrow().is_empty());

        layer.advance(&mut host, ms(500));
        layer.handle_event(&mut host, &click, ms(600));
        assert_eq!(*selected.borrow(), vec!["A-dong".to_string()]);
        assert_eq!(host.shape(a).unwrap().style.stroke_weight, 2.0);

        layer.advance(&mut host, ms(2100));
        assert_eq!(host.shape(a).unwrap().style.stroke_weight, 1.0);
        assert_eq!(host.shape(a).unwrap().style.fill_opacity, 0.2);
    }

    #[test]
    fn test_surface_move_hides_idle_tooltip() {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let mut layer = render(LayerStyle::population(), &mut host);
        layer.advance(&mut host, ms(500));
        let overlay = layer.overlay();

        host.show_overlay(overlay, coord! { x: 0.0, y: 0.0 });
        let moved = HostEvent::surface(EventKind::PointerMove, Some(coord! { x: 5.0, y: 5.0 }));
        assert!(layer.handle_event(&mut host, &moved, ms(600)));
        assert_eq!(host.visible_overlay_count(), 0);

        // While a region is active the surface move leaves the tooltip alone
        let a = handles(&layer)[0];
        layer.handle_event(&mut host, &enter(a), ms(700));
        layer.handle_event(&mut host, &moved, ms(800));
        assert_eq!(host.visible_overlay_count(), 1);
    }

    #[test]
    fn test_dispose_removes_everything() {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let mut layer = render(LayerStyle::population(), &mut host);
        layer.advance(&mut host, ms(500));
        let a = handles(&layer)[0];
        layer.handle_event(
            &mut host,
            &HostEvent::shape(a, EventKind::Click, coord! { x: 0.0, y: 0.0 }),
            ms(600),
        );
        assert_eq!(layer.pending_timers(), 1);

        layer.dispose(&mut host);
        assert_eq!(host.shape_count(), 0);
        assert_eq!(host.overlay_count(), 0);
        assert_eq!(host.subscription_count(), 0);
        assert!(!host.delivers(&enter(a)));
    }

    #[test]
    fn test_unknown_shape_events_ignored() {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let mut layer = render(LayerStyle::population(), &mut host);
        layer.advance(&mut host, ms(500));

        assert!(!layer.handle_event(&mut host, &enter(ShapeHandle(9_999)), ms(600)));
        assert_eq!(layer.hover_state(), HoverState::Idle);
    }
}
