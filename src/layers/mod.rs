pub mod choropleth;
pub mod classifier;
pub mod renderer;
pub mod shapes;
pub mod slot;
pub mod style;
pub mod tooltip;

pub use choropleth::{LayerSpec, RegionFilter, RenderMode, render_choropleth};
pub use classifier::{
    ColorClassifier, ColorPolicy, LOW_COLOR, LegendEntry, Measure, POPULATION_BANDS,
    ThresholdBand, classify_grade, classify_value,
};
pub use renderer::{DrawnLayer, OverlayRenderer, SelectCallback};
pub use shapes::{ShapeEntry, ShapeTable};
pub use slot::LayerSlot;
pub use style::{LayerStyle, StyleOverrides};
pub use tooltip::{GradeBadge, TooltipContent, TooltipRow};
