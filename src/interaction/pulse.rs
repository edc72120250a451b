use std::collections::HashMap;
use std::time::Duration;

use geo::Coord;

use super::timer::{TimerId, TimerQueue};
use crate::domain::RecordId;
use crate::host::HostSurface;
use crate::layers::{LayerStyle, ShapeTable};

/// Region picked by a click, handed to the selection callback
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSelection {
    pub region: String,
    /// Vertex-mean centroid in (lon, lat)
    pub centroid: Coord<f64>,
}

/// Timed work owned by a drawn layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerTask {
    Settle,
    RevertPulse(RecordId),
}

/// Transient click emphasis plus selection notification.
///
/// Every click schedules its own revert, but only the revert of the most
/// recent click on a record takes effect. It restores the record's resting
/// style as of the moment it fires (hover emphasis included).
#[derive(Debug, Clone)]
pub struct ClickPulseController {
    opacity_delta: f64,
    stroke_delta: f64,
    duration: Duration,
    latest: HashMap<RecordId, TimerId>,
}

impl ClickPulseController {
    pub fn new(style: &LayerStyle) -> Self {
        Self {
            opacity_delta: style.pulse_opacity_delta,
            stroke_delta: style.pulse_stroke_delta,
            duration: style.pulse_duration,
            latest: HashMap::new(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Emphasize the record and schedule its revert.
    ///
    /// Returns `None` when `id` is not part of this layer.
    pub fn on_click(
        &mut self,
        host: &mut dyn HostSurface,
        shapes: &mut ShapeTable,
        timers: &mut TimerQueue<LayerTask>,
        now: Duration,
        id: RecordId,
    ) -> Option<(RegionSelection, TimerId)> {
        let entry = shapes.get(id)?;
        let selection = RegionSelection {
            region: entry.record.region_short_name().to_string(),
            centroid: entry.record.centroid(),
        };

        shapes.pulse(host, id, self.opacity_delta, self.stroke_delta);
        let timer = timers.schedule(now, self.duration, LayerTask::RevertPulse(id));
        self.latest.insert(id, timer);
        Some((selection, timer))
    }

    /// Handle a fired revert timer; superseded reverts do nothing
    pub fn revert(
        &mut self,
        host: &mut dyn HostSurface,
        shapes: &mut ShapeTable,
        id: RecordId,
        timer: TimerId,
    ) {
        if self.latest.get(&id) != Some(&timer) {
            return;
        }
        self.latest.remove(&id);
        shapes.rest(host, id);
    }

    pub fn pending(&self) -> usize {
        self.latest.len()
    }

    /// Forget outstanding pulses after their timers were cancelled
    pub fn clear(&mut self) {
        self.latest.clear();
    }
}
