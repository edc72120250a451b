use crate::domain::RecordId;
use crate::geometry::Point;
use crate::host::{HostSurface, OverlayHandle};
use crate::layers::ShapeTable;

/// Observable state of the shared tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    /// Host has not settled yet; every pointer event is ignored
    Settling,
    Idle,
    Active(RecordId),
}

/// Singleton tooltip state of one layer
#[derive(Debug, Clone)]
pub struct TooltipState {
    pub active_record: Option<RecordId>,
    pub suppressed: bool,
    pub overlay: OverlayHandle,
}

/// Owns the one tooltip overlay shared by every polygon of a layer.
///
/// The tooltip is visible iff a record is active and the controller is no
/// longer suppressed. Moving straight from region A into region B goes
/// `Active(A) -> Active(B)` without hiding the overlay in between.
#[derive(Debug, Clone)]
pub struct HoverTooltipController {
    tooltip: TooltipState,
}

impl HoverTooltipController {
    pub fn new(overlay: OverlayHandle) -> Self {
        Self {
            tooltip: TooltipState {
                active_record: None,
                suppressed: true,
                overlay,
            },
        }
    }

    pub fn state(&self) -> HoverState {
        match (self.tooltip.suppressed, self.tooltip.active_record) {
            (true, _) => HoverState::Settling,
            (false, None) => HoverState::Idle,
            (false, Some(id)) => HoverState::Active(id),
        }
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub fn active(&self) -> Option<RecordId> {
        self.tooltip.active_record
    }

    pub fn tooltip_visible(&self) -> bool {
        self.tooltip.active_record.is_some() && !self.tooltip.suppressed
    }

    /// `Settling -> Idle`; later calls are no-ops
    pub fn view_settled(&mut self, host: &mut dyn HostSurface) {
        if !self.tooltip.suppressed {
            return;
        }
        self.tooltip.suppressed = false;
        self.tooltip.active_record = None;
        host.hide_overlay(self.tooltip.overlay);
    }

    pub fn pointer_enter(
        &mut self,
        host: &mut dyn HostSurface,
        shapes: &mut ShapeTable,
        id: RecordId,
        position: Point,
    ) {
        if self.tooltip.suppressed {
            return;
        }
        let Some(entry) = shapes.get(id) else {
            return;
        };
        host.set_overlay_content(self.tooltip.overlay, &entry.tooltip);

        // A leave for the previous record may still be in flight; drop its emphasis now.
        if let Some(previous) = self.tooltip.active_record.replace(id)
            && previous != id
        {
            shapes.set_hovered(host, previous, false);
        }
        shapes.set_hovered(host, id, true);
        host.show_overlay(self.tooltip.overlay, position);
    }

    pub fn pointer_move(&mut self, host: &mut dyn HostSurface, id: RecordId, position: Point) {
        if self.tooltip.suppressed || self.tooltip.active_record != Some(id) {
            return;
        }
        host.show_overlay(self.tooltip.overlay, position);
    }

    pub fn pointer_leave(
        &mut self,
        host: &mut dyn HostSurface,
        shapes: &mut ShapeTable,
        id: RecordId,
    ) {
        if self.tooltip.suppressed || self.tooltip.active_record != Some(id) {
            return;
        }
        self.tooltip.active_record = None;
        shapes.set_hovered(host, id, false);
        host.hide_overlay(self.tooltip.overlay);
    }

    /// Pointer moved over the bare surface
    pub fn surface_pointer_move(&mut self, host: &mut dyn HostSurface) {
        if !self.tooltip.suppressed && self.tooltip.active_record.is_none() {
            host.hide_overlay(self.tooltip.overlay);
        }
    }

    /// Drop the overlay from the host; the controller is unusable afterwards
    pub fn release(&mut self, host: &mut dyn HostSurface) {
        self.tooltip.active_record = None;
        self.tooltip.suppressed = true;
        host.remove_overlay(self.tooltip.overlay);
    }
}
