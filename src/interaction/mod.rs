pub mod hover;
pub mod pulse;
pub mod timer;

pub use hover::{HoverState, HoverTooltipController, TooltipState};
pub use pulse::{ClickPulseController, LayerTask, RegionSelection};
pub use timer::{TimerId, TimerQueue};
