//! Validated latitude/longitude pairs.
//!
//! Wire formats disagree about axis order: route requests send
//! `[lat, lon]` while route responses return `[lon, lat]`. [`LatLon`] keeps
//! the order explicit and offers named conversions for both.

use std::{fmt, str::FromStr};

use geo::Coord;
use thiserror::Error;

/// A geographic position in display order (latitude first).
///
/// # Examples
///
/// ```
/// use osmap_core::LatLon;
///
/// # fn main() -> Result<(), osmap_core::CoordinateError> {
/// let centre = LatLon::new(17.8111683, -97.7810027)?;
/// assert_eq!(centre.lat(), 17.8111683);
/// assert_eq!(centre.to_lat_lon(), [17.8111683, -97.7810027]);
///
/// let parsed: LatLon = "17.75, -97.77".parse()?;
/// assert_eq!(parsed.lon(), -97.77);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    lat: f64,
    lon: f64,
}

/// Errors raised while validating or parsing a [`LatLon`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was non-finite or outside `[-90, 90]`.
    #[error("latitude {value} is outside [-90, 90]")]
    Latitude { value: f64 },
    /// Longitude was non-finite or outside `[-180, 180]`.
    #[error("longitude {value} is outside [-180, 180]")]
    Longitude { value: f64 },
    /// Text did not have the `lat,lon` shape.
    #[error("expected `lat,lon`, found {input:?}")]
    Syntax { input: String },
}

impl LatLon {
    /// Validate and construct a position.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude { value: lat });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::Longitude { value: lon });
        }
        Ok(Self { lat, lon })
    }

    /// Construct from compile-time constants already known to be in range.
    pub(crate) const fn from_trusted(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a position from a wire pair ordered `[lon, lat]`.
    pub fn from_lon_lat(pair: [f64; 2]) -> Result<Self, CoordinateError> {
        let [lon, lat] = pair;
        Self::new(lat, lon)
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// The `[lat, lon]` pair sent in route requests.
    #[must_use]
    pub const fn to_lat_lon(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl From<LatLon> for Coord {
    fn from(value: LatLon) -> Self {
        Self {
            x: value.lon,
            y: value.lat,
        }
    }
}

impl TryFrom<Coord> for LatLon {
    type Error = CoordinateError;

    fn try_from(value: Coord) -> Result<Self, Self::Error> {
        Self::new(value.y, value.x)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for LatLon {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || CoordinateError::Syntax {
            input: s.to_owned(),
        };
        let (lat, lon) = s.split_once(',').ok_or_else(syntax)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| syntax())?;
        let lon = lon.trim().parse::<f64>().map_err(|_| syntax())?;
        Self::new(lat, lon)
    }
}
