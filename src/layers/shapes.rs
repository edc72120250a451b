use std::collections::HashMap;

use super::TooltipContent;
use crate::domain::{PolygonRecord, RecordId};
use crate::host::{HostSurface, ShapeHandle, ShapeStyle};

/// A rendered record together with its host shape and styles
#[derive(Debug, Clone)]
pub struct ShapeEntry {
    pub record: PolygonRecord,
    pub handle: ShapeHandle,
    /// Style the shape was drawn with
    pub base: ShapeStyle,
    /// Style last sent to the host
    pub current: ShapeStyle,
    pub hovered: bool,
    pub tooltip: TooltipContent,
}

/// Every shape of one render pass, addressable by record id or handle.
///
/// All restyling goes through here so the host always mirrors `current`.
#[derive(Debug, Clone, Default)]
pub struct ShapeTable {
    entries: Vec<ShapeEntry>,
    by_id: HashMap<RecordId, usize>,
    by_handle: HashMap<ShapeHandle, usize>,
    hover_opacity_delta: f64,
}

impl ShapeTable {
    pub fn new(hover_opacity_delta: f64) -> Self {
        Self {
            hover_opacity_delta,
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, entry: ShapeEntry) {
        let index = self.entries.len();
        self.by_id.insert(entry.record.id(), index);
        self.by_handle.insert(entry.handle, index);
        self.entries.push(entry);
    }

    pub fn get(&self, id: RecordId) -> Option<&ShapeEntry> {
        self.by_id.get(&id).map(|&i| &self.entries[i])
    }

    fn get_mut(&mut self, id: RecordId) -> Option<&mut ShapeEntry> {
        self.by_id.get(&id).map(|&i| &mut self.entries[i])
    }

    /// Record shown by `handle`, if it belongs to this pass
    pub fn id_for(&self, handle: ShapeHandle) -> Option<RecordId> {
        self.by_handle
            .get(&handle)
            .map(|&i| self.entries[i].record.id())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn apply(host: &mut dyn HostSurface, entry: &mut ShapeEntry, style: ShapeStyle) {
        if entry.current != style {
            entry.current = style;
            host.restyle(entry.handle, &style);
        }
    }

    /// Raise or restore the fill opacity for hover emphasis
    pub fn set_hovered(&mut self, host: &mut dyn HostSurface, id: RecordId, hovered: bool) {
        let delta = self.hover_opacity_delta;
        if let Some(entry) = self.get_mut(id) {
            entry.hovered = hovered;
            let mut style = entry.current;
            style.fill_opacity = if hovered {
                emphasized(entry.base.fill_opacity, delta)
            } else {
                entry.base.fill_opacity
            };
            Self::apply(host, entry, style);
        }
    }

    /// Emphasize fill and stroke for a click pulse
    pub fn pulse(
        &mut self,
        host: &mut dyn HostSurface,
        id: RecordId,
        opacity_delta: f64,
        stroke_delta: f64,
    ) {
        if let Some(entry) = self.get_mut(id) {
            let mut style = entry.current;
            style.fill_opacity = emphasized(entry.base.fill_opacity, opacity_delta);
            style.stroke_weight = entry.base.stroke_weight + stroke_delta;
            Self::apply(host, entry, style);
        }
    }

    /// Style the record should have when nothing transient applies
    pub fn resting_style(&self, id: RecordId) -> Option<ShapeStyle> {
        self.get(id).map(|entry| {
            let mut style = entry.base;
            if entry.hovered {
                style.fill_opacity = emphasized(style.fill_opacity, self.hover_opacity_delta);
            }
            style
        })
    }

    /// Return the record to its resting style; safe to repeat
    pub fn rest(&mut self, host: &mut dyn HostSurface, id: RecordId) {
        if let Some(style) = self.resting_style(id)
            && let Some(entry) = self.get_mut(id)
        {
            Self::apply(host, entry, style);
        }
    }

    pub(crate) fn into_entries(self) -> Vec<ShapeEntry> {
        self.entries
    }
}

/// Opacity raised by `delta`, capped at fully opaque
fn emphasized(opacity: f64, delta: f64) -> f64 {
    (opacity + delta).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Color, RecordIds};
    use crate::geometry::Projector;
    use crate::host::MemorySurface;
    use geo::coord;

    fn table_with_base_opacity(opacity: f64) -> (MemorySurface, ShapeTable, RecordId) {
        let mut host = MemorySurface::new(Projector::new(0.0, 0.0));
        let ring = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.0, y: 10.0 },
            coord! { x: 10.0, y: 10.0 },
        ];
        let record = PolygonRecord::new(
            RecordIds::new().allocate(),
            "Seoul Jung-gu A-dong",
            "A-dong",
            vec![ring],
            coord! { x: 0.0, y: 0.0 },
        );
        let base = ShapeStyle {
            fill_color: Color::YELLOW,
            fill_opacity: opacity,
            stroke_color: Color::CHARCOAL,
            stroke_opacity: 0.5,
            stroke_weight: 1.0,
        };
        let handle = host.draw_polygon(record.projected_rings(), &base);
        let id = record.id();
        let mut shapes = ShapeTable::new(0.2);
        shapes.push(ShapeEntry {
            tooltip: TooltipContent::for_record(&record),
            record,
            handle,
            base,
            current: base,
            hovered: false,
        });
        (host, shapes, id)
    }

    fn shown_opacity(host: &MemorySurface, shapes: &ShapeTable, id: RecordId) -> f64 {
        let handle = shapes.get(id).unwrap().handle;
        host.shape(handle).unwrap().style.fill_opacity
    }

    #[test]
    fn test_hover_emphasis_capped_at_opaque() {
        let (mut host, mut shapes, id) = table_with_base_opacity(0.9);

        shapes.set_hovered(&mut host, id, true);
        assert_eq!(shown_opacity(&host, &shapes, id), 1.0);
        assert_eq!(shapes.resting_style(id).unwrap().fill_opacity, 1.0);

        shapes.set_hovered(&mut host, id, false);
        assert_eq!(shown_opacity(&host, &shapes, id), 0.9);
    }

    #[test]
    fn test_pulse_capped_at_opaque() {
        let (mut host, mut shapes, id) = table_with_base_opacity(0.8);

        shapes.pulse(&mut host, id, 0.5, 2.0);
        assert_eq!(shown_opacity(&host, &shapes, id), 1.0);
        assert_eq!(shapes.get(id).unwrap().current.stroke_weight, 3.0);

        shapes.rest(&mut host, id);
        assert_eq!(shown_opacity(&host, &shapes, id), 0.8);
    }
}
