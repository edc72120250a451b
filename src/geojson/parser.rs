use anyhow::Result;
use geojson::{GeoJson, JsonObject, JsonValue, PolygonType, Value};

use crate::config::FetchConfig;
use crate::data::read_source;
use crate::domain::{Feature, Geometry, Ring};

/// Property keys that may carry the full administrative name, in priority order
const NAME_KEYS: [&str; 3] = ["adm_nm", "regionFullName", "name"];

/// Parse a GeoJSON FeatureCollection into features.
///
/// Never fails: a malformed collection yields no features, and features
/// that cannot be decoded are skipped with a warning. Geometry types
/// other than Polygon / MultiPolygon are kept as
/// [`Geometry::Unsupported`] so the index can drop them.
pub fn parse_feature_collection(json: &str) -> Vec<Feature> {
    let features = match json.parse::<GeoJson>() {
        Ok(GeoJson::FeatureCollection(collection)) => collection.features,
        Ok(GeoJson::Feature(feature)) => vec![feature],
        Ok(GeoJson::Geometry(_)) => {
            eprintln!("Warning: Expected a FeatureCollection, got a bare geometry");
            return Vec::new();
        }
        // One bad feature fails the whole document; decode what survives
        Err(e) => return salvage_features(json, &e),
    };

    features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| match convert_feature(feature) {
            Ok(feature) => Some(feature),
            Err(e) => {
                eprintln!("Warning: Skipping feature #{}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Read a FeatureCollection from a file path or http(s) URL
pub fn load_features(source: &str, fetch: &FetchConfig) -> Result<Vec<Feature>> {
    let body = read_source(source, fetch)?;
    Ok(parse_feature_collection(&body))
}

fn salvage_features(json: &str, error: &geojson::Error) -> Vec<Feature> {
    let Ok(JsonValue::Object(mut document)) = serde_json::from_str::<JsonValue>(json) else {
        eprintln!("Warning: Malformed FeatureCollection: {}", error);
        return Vec::new();
    };
    let Some(JsonValue::Array(features)) = document.remove("features") else {
        eprintln!("Warning: Malformed FeatureCollection: {}", error);
        return Vec::new();
    };

    features
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let decoded = geojson::Feature::from_json_value(value)
                .map_err(|e| e.to_string())
                .and_then(convert_feature);
            match decoded {
                Ok(feature) => Some(feature),
                Err(e) => {
                    eprintln!("Warning: Skipping feature #{}: {}", index, e);
                    None
                }
            }
        })
        .collect()
}

fn convert_feature(feature: geojson::Feature) -> Result<Feature, String> {
    let name = feature
        .properties
        .as_ref()
        .and_then(region_name)
        .unwrap_or_default()
        .to_string();

    let geometry = match feature.geometry {
        None => Geometry::Unsupported("null".to_string()),
        Some(geometry) => convert_geometry(geometry.value)?,
    };

    Ok(Feature::new(geometry, name))
}

fn region_name(properties: &JsonObject) -> Option<&str> {
    NAME_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(JsonValue::as_str))
}

fn convert_geometry(value: Value) -> Result<Geometry, String> {
    let geometry = match value {
        Value::Polygon(rings) => Geometry::Polygon(to_rings(rings)?),
        Value::MultiPolygon(polygons) => Geometry::MultiPolygon(
            polygons
                .into_iter()
                .map(to_rings)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Point(_) => Geometry::Unsupported("Point".to_string()),
        Value::MultiPoint(_) => Geometry::Unsupported("MultiPoint".to_string()),
        Value::LineString(_) => Geometry::Unsupported("LineString".to_string()),
        Value::MultiLineString(_) => Geometry::Unsupported("MultiLineString".to_string()),
        Value::GeometryCollection(_) => {
            Geometry::Unsupported("GeometryCollection".to_string())
        }
    };
    Ok(geometry)
}

/// Positions keep their first two values (lon, lat); altitude is dropped
fn to_rings(rings: PolygonType) -> Result<Vec<Ring>, String> {
    rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|position| match position.as_slice() {
                    [lon, lat, ..] => Ok((*lon, *lat)),
                    _ => Err(format!("position needs 2 values, got {}", position.len())),
                })
                .collect()
        })
        .collect()
}
