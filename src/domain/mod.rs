pub mod color;
pub mod feature;
pub mod metric;
pub mod record;

pub use color::{Color, ColorParseError};
pub use feature::{Feature, Geometry, Ring, short_name};
pub use metric::{Metric, MetricKey, Metrics};
pub use record::{PolygonRecord, RecordId, RecordIds};
