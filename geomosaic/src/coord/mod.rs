//! Geographic coordinate types
//!
//! Provides the `GeoCoordinate` pair used to bound the requested mosaic,
//! with range validation and parsing of the `"lat,lon"` CLI input format.

use std::fmt;
use std::str::FromStr;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced while validating or parsing coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude outside [-90, 90] degrees
    InvalidLatitude(f64),
    /// Longitude outside [-180, 180] degrees
    InvalidLongitude(f64),
    /// Input string is not a `lat,lon` pair
    Malformed(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(f, "latitude {} outside valid range [-90, 90]", lat)
            }
            CoordError::InvalidLongitude(lon) => {
                write!(f, "longitude {} outside valid range [-180, 180]", lon)
            }
            CoordError::Malformed(input) => {
                write!(f, "expected coordinates as 'lat,lon', got '{}'", input)
            }
        }
    }
}

impl std::error::Error for CoordError {}

/// A geographic position in floating-point degrees.
///
/// Fields are public for convenient access; use [`GeoCoordinate::new`] at
/// trust boundaries to get range validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lon: f64,
}

impl GeoCoordinate {
    /// Creates a coordinate, validating both axes.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) || !lat.is_finite() {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) || !lon.is_finite() {
            return Err(CoordError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for GeoCoordinate {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| CoordError::Malformed(s.to_string()))?;

        let lat: f64 = lat_str
            .trim()
            .parse()
            .map_err(|_| CoordError::Malformed(s.to_string()))?;
        let lon: f64 = lon_str
            .trim()
            .parse()
            .map_err(|_| CoordError::Malformed(s.to_string()))?;

        GeoCoordinate::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        let coord = GeoCoordinate::new(45.1800992, 5.7074098).unwrap();
        assert_eq!(coord.lat, 45.1800992);
        assert_eq!(coord.lon, 5.7074098);
    }

    #[test]
    fn test_latitude_out_of_range() {
        let result = GeoCoordinate::new(90.5, 0.0);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_longitude_out_of_range() {
        let result = GeoCoordinate::new(0.0, -180.5);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_pair() {
        let coord: GeoCoordinate = "45.1800992,5.7074098".parse().unwrap();
        assert_eq!(coord.lat, 45.1800992);
        assert_eq!(coord.lon, 5.7074098);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let coord: GeoCoordinate = " 45.182037 , 5.712044 ".parse().unwrap();
        assert_eq!(coord.lat, 45.182037);
        assert_eq!(coord.lon, 5.712044);
    }

    #[test]
    fn test_parse_negative_values() {
        let coord: GeoCoordinate = "-33.8688,151.2093".parse().unwrap();
        assert_eq!(coord.lat, -33.8688);
        assert_eq!(coord.lon, 151.2093);
    }

    #[test]
    fn test_parse_missing_comma() {
        let result: Result<GeoCoordinate, _> = "45.18 5.70".parse();
        assert!(matches!(result, Err(CoordError::Malformed(_))));
    }

    #[test]
    fn test_parse_non_numeric() {
        let result: Result<GeoCoordinate, _> = "north,east".parse();
        assert!(matches!(result, Err(CoordError::Malformed(_))));
    }

    #[test]
    fn test_parse_validates_range() {
        let result: Result<GeoCoordinate, _> = "91.0,0.0".parse();
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_display_roundtrip() {
        let coord = GeoCoordinate::new(45.1800992, 5.7074098).unwrap();
        let parsed: GeoCoordinate = coord.to_string().parse().unwrap();
        assert_eq!(parsed, coord);
    }
}
