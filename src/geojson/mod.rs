pub mod index;
pub mod parser;

pub use index::GeoFeatureIndex;
pub use parser::{load_features, parse_feature_collection};
