use std::time::Duration;

use super::DrawnLayer;
use crate::host::{HostEvent, HostSurface};

/// Keeps at most one live render pass for a logical layer.
///
/// Installing a new pass disposes the previous one first, so shapes,
/// listeners and timers never accumulate across re-renders.
#[derive(Default)]
pub struct LayerSlot {
    current: Option<DrawnLayer>,
}

impl LayerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, host: &mut dyn HostSurface, layer: DrawnLayer) -> &mut DrawnLayer {
        self.clear(host);
        self.current.insert(layer)
    }

    pub fn clear(&mut self, host: &mut dyn HostSurface) {
        if let Some(previous) = self.current.take() {
            previous.dispose(host);
        }
    }

    pub fn current(&self) -> Option<&DrawnLayer> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut DrawnLayer> {
        self.current.as_mut()
    }

    pub fn handle_event(
        &mut self,
        host: &mut dyn HostSurface,
        event: &HostEvent,
        now: Duration,
    ) -> bool {
        match self.current.as_mut() {
            Some(layer) => layer.handle_event(host, event, now),
            None => false,
        }
    }

    pub fn advance(&mut self, host: &mut dyn HostSurface, now: Duration) {
        if let Some(layer) = self.current.as_mut() {
            layer.advance(host, now);
        }
    }
}
