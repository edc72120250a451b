/// Ring of (lon, lat) pairs in WGS84
pub type Ring = Vec<(f64, f64)>;

/// Geometry of one administrative region
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// List of rings (outer first, then holes)
    Polygon(Vec<Ring>),
    /// List of polygons, each a list of rings
    MultiPolygon(Vec<Vec<Ring>>),
    /// Any other geometry type; carries the type name for diagnostics
    Unsupported(String),
}

impl Geometry {
    /// Flatten into a single ring list, or `None` for unsupported types
    pub fn rings(&self) -> Option<Vec<&Ring>> {
        match self {
            Geometry::Polygon(rings) => Some(rings.iter().collect()),
            Geometry::MultiPolygon(polygons) => Some(polygons.iter().flatten().collect()),
            Geometry::Unsupported(_) => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Unsupported(name) => name,
        }
    }
}

/// Raw input region: geometry plus its full administrative name
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    /// e.g. "Seoul Gangnam-gu Samseong-dong"
    pub region_full_name: String,
}

impl Feature {
    pub fn new(geometry: Geometry, region_full_name: impl Into<String>) -> Self {
        Self {
            geometry,
            region_full_name: region_full_name.into(),
        }
    }

    /// Last whitespace-delimited token of the full name, used as the join key
    pub fn region_short_name(&self) -> &str {
        short_name(&self.region_full_name)
    }
}

pub fn short_name(full_name: &str) -> &str {
    full_name.split_whitespace().last().unwrap_or(full_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Seoul Gangnam-gu Samseong-dong"), "Samseong-dong");
        assert_eq!(short_name("Yeoksam1-dong"), "Yeoksam1-dong");
        assert_eq!(short_name("Seoul  Jung-gu\tMyeong-dong "), "Myeong-dong");
        assert_eq!(short_name(""), "");
    }

    #[test]
    fn test_multipolygon_rings_flatten() {
        let square: Ring = vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let geometry = Geometry::MultiPolygon(vec![
            vec![square.clone()],
            vec![square.clone(), square.clone()],
        ]);
        assert_eq!(geometry.rings().unwrap().len(), 3);
        assert!(Geometry::Unsupported("Point".into()).rings().is_none());
    }
}
