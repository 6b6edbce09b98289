use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plain longitude/latitude pair as sent to and received from API callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, CodecError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(CodecError::NonFinite);
        }
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(CodecError::OutOfRange { longitude, latitude });
        }
        Ok(Self { longitude, latitude })
    }

    /// Planar distance in degrees, the same measure ST_DWithin uses on SRID 4326 geometry
    pub fn planar_distance_degrees(&self, other: &Coordinates) -> f64 {
        let dx = self.longitude - other.longitude;
        let dy = self.latitude - other.latitude;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("Malformed point: {0}")]
    Malformed(String),

    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("Coordinates must be finite numbers")]
    NonFinite,

    #[error("Coordinates out of range: longitude {longitude}, latitude {latitude}")]
    OutOfRange { longitude: f64, latitude: f64 },
}

/// Translates between the store's persisted point representation and plain coordinates
pub trait CoordinateCodec: Send + Sync {
    fn decode(&self, persisted: &str) -> Result<Coordinates, CodecError>;
    fn encode(&self, coordinates: &Coordinates) -> String;
}

/// Well-known text codec for `POINT(lon lat)`, as produced by `ST_AsText`.
/// Also accepts the EWKT form with an `SRID=...;` prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct WktPointCodec;

impl CoordinateCodec for WktPointCodec {
    fn decode(&self, persisted: &str) -> Result<Coordinates, CodecError> {
        let text = persisted.trim();
        let text = match text.split_once(';') {
            Some((srid, rest)) if srid.trim().to_ascii_uppercase().starts_with("SRID=") => rest.trim(),
            _ => text,
        };

        let open = text.find('(').ok_or_else(|| CodecError::Malformed(persisted.to_string()))?;
        let keyword = text[..open].trim();
        if !keyword.eq_ignore_ascii_case("POINT") {
            return Err(CodecError::UnsupportedGeometry(keyword.to_string()));
        }
        if !text.ends_with(')') {
            return Err(CodecError::Malformed(persisted.to_string()));
        }

        let body = &text[open + 1..text.len() - 1];
        let mut parts = body.split_whitespace();
        let longitude = parse_ordinate(parts.next(), persisted)?;
        let latitude = parse_ordinate(parts.next(), persisted)?;
        // Z/M ordinates are tolerated and dropped
        if parts.count() > 2 {
            return Err(CodecError::Malformed(persisted.to_string()));
        }

        Coordinates::new(longitude, latitude)
    }

    fn encode(&self, coordinates: &Coordinates) -> String {
        format!("POINT({} {})", coordinates.longitude, coordinates.latitude)
    }
}

fn parse_ordinate(token: Option<&str>, original: &str) -> Result<f64, CodecError> {
    token
        .and_then(|t| t.parse::<f64>().ok())
        .ok_or_else(|| CodecError::Malformed(original.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_st_astext_output() {
        let c = WktPointCodec.decode("POINT(-122.4194 37.7749)").unwrap();
        assert_eq!(c.longitude, -122.4194);
        assert_eq!(c.latitude, 37.7749);
    }

    #[test]
    fn decodes_ewkt_and_loose_spacing() {
        let c = WktPointCodec.decode("SRID=4326; point ( 2.35  48.85 )").unwrap();
        assert_eq!(c, Coordinates { longitude: 2.35, latitude: 48.85 });
    }

    #[test]
    fn encode_is_readable_by_decode() {
        let original = Coordinates::new(-73.9857, 40.7484).unwrap();
        let wkt = WktPointCodec.encode(&original);
        assert_eq!(wkt, "POINT(-73.9857 40.7484)");
        assert_eq!(WktPointCodec.decode(&wkt).unwrap(), original);
    }

    #[test]
    fn rejects_other_geometries_and_garbage() {
        assert!(matches!(
            WktPointCodec.decode("LINESTRING(0 0, 1 1)"),
            Err(CodecError::UnsupportedGeometry(_))
        ));
        assert!(matches!(WktPointCodec.decode("POINT(abc 1)"), Err(CodecError::Malformed(_))));
        assert!(matches!(WktPointCodec.decode("POINT EMPTY"), Err(CodecError::Malformed(_))));
        assert!(matches!(WktPointCodec.decode(""), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn rejects_out_of_range_points() {
        assert!(matches!(
            WktPointCodec.decode("POINT(200 10)"),
            Err(CodecError::OutOfRange { .. })
        ));
        assert_eq!(Coordinates::new(f64::NAN, 0.0), Err(CodecError::NonFinite));
    }

    #[test]
    fn planar_distance_is_euclidean_in_degrees() {
        let a = Coordinates::new(0.0, 0.0).unwrap();
        let b = Coordinates::new(3.0, 4.0).unwrap();
        assert_eq!(a.planar_distance_degrees(&b), 5.0);
    }
}
