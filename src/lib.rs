//! choromap - Interactive choropleth overlays of administrative regions

pub mod config;
pub mod data;
pub mod domain;
pub mod geojson;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod layers;
