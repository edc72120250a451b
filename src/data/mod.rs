pub mod provider;
pub mod resolver;
pub mod source;
pub mod table;

pub use provider::MetricProvider;
pub use resolver::{MetricResolver, Resolution};
pub use source::{is_remote, load_dataset, read_source};
pub use table::{DatasetError, MetricTable, TableLayout};
