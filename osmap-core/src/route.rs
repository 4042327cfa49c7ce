//! Route requests, responses and the polylines shown on the map.
//!
//! The remote route service receives `[lat, lon]` pairs and answers with a
//! `ruta` of `[lon, lat]` pairs. [`RouteResponse::polyline`] is the single
//! place where the response order is swapped back into display order.

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;

use crate::coord::{CoordinateError, LatLon};

/// Name of the algorithm the remote service should run.
///
/// The identifier is opaque to this crate and only checked for being
/// non-blank.
///
/// # Examples
/// ```
/// use osmap_core::Algorithm;
///
/// let algorithm = Algorithm::new("busqueda_bidireccional")?;
/// assert_eq!(algorithm.as_ref(), "busqueda_bidireccional");
/// # Ok::<(), osmap_core::RouteRequestError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Algorithm(String);

impl Algorithm {
    /// Validate and wrap an algorithm name.
    pub fn new(name: impl Into<String>) -> Result<Self, RouteRequestError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RouteRequestError::BlankAlgorithm);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors returned while assembling a [`RouteRequest`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteRequestError {
    /// The algorithm name was empty or whitespace.
    #[error("algorithm name must not be blank")]
    BlankAlgorithm,
    /// A coordinate failed validation.
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

/// Ask the route service for a path between two points.
///
/// Serialises to `{ "start": [lat, lon], "end": [lat, lon], "algorithm": "..." }`.
///
/// # Examples
/// ```
/// use osmap_core::{Algorithm, LatLon, RouteRequest};
///
/// # fn main() -> Result<(), osmap_core::RouteRequestError> {
/// let request = RouteRequest::new(
///     LatLon::new(17.7491299, -97.76906)?,
///     LatLon::new(17.8771799, -97.7329293)?,
///     Algorithm::new("busqueda_bidireccional")?,
/// );
/// assert_eq!(request.start().lat(), 17.7491299);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    start: LatLon,
    end: LatLon,
    algorithm: Algorithm,
}

impl RouteRequest {
    /// Construct a request from validated parts.
    #[must_use]
    pub const fn new(start: LatLon, end: LatLon, algorithm: Algorithm) -> Self {
        Self {
            start,
            end,
            algorithm,
        }
    }

    /// Origin of the route.
    #[must_use]
    pub const fn start(&self) -> LatLon {
        self.start
    }

    /// Destination of the route.
    #[must_use]
    pub const fn end(&self) -> LatLon {
        self.end
    }

    /// Algorithm the remote service should run.
    #[must_use]
    pub const fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }
}

impl Serialize for RouteRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RouteRequest", 3)?;
        state.serialize_field("start", &self.start.to_lat_lon())?;
        state.serialize_field("end", &self.end.to_lat_lon())?;
        state.serialize_field("algorithm", self.algorithm.as_ref())?;
        state.end()
    }
}

/// Body returned by the route service.
///
/// `ruta` holds `[lon, lat]` pairs. It may be missing or empty when the
/// service found no path, which is not an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteResponse {
    /// Algorithm echoed back by the service.
    pub algorithm: String,
    /// Path as `[lon, lat]` pairs.
    #[serde(default)]
    pub ruta: Option<Vec<[f64; 2]>>,
}

impl RouteResponse {
    /// Convert `ruta` into a display-ordered polyline.
    ///
    /// Returns `Ok(None)` when no path was found. Every wire pair is swapped
    /// from `[lon, lat]` to `(lat, lon)` and validated.
    ///
    /// # Examples
    /// ```
    /// use osmap_core::RouteResponse;
    ///
    /// let response = RouteResponse {
    ///     algorithm: "busqueda_bidireccional".to_owned(),
    ///     ruta: Some(vec![[-97.77, 17.75], [-97.74, 17.80]]),
    /// };
    /// let polyline = response.polyline()?.expect("path present");
    /// assert_eq!(polyline.points()[0].lat(), 17.75);
    /// assert_eq!(polyline.points()[1].lon(), -97.74);
    /// # Ok::<(), osmap_core::CoordinateError>(())
    /// ```
    pub fn polyline(&self) -> Result<Option<Polyline>, CoordinateError> {
        let Some(pairs) = self.ruta.as_deref() else {
            return Ok(None);
        };
        let points = pairs
            .iter()
            .map(|pair| LatLon::from_lon_lat(*pair))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polyline::new(points))
    }
}

/// A non-empty, ordered sequence of points rendered as a connected line.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<LatLon>,
}

impl Polyline {
    /// Wrap the points, returning `None` for an empty sequence.
    #[must_use]
    pub fn new(points: Vec<LatLon>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    /// Points in display order.
    #[must_use]
    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with [`Polyline::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Convert into a `geo` line string (x = longitude, y = latitude).
    #[must_use]
    pub fn to_line_string(&self) -> LineString<f64> {
        self.points
            .iter()
            .copied()
            .map(Coord::from)
            .collect::<Vec<_>>()
            .into()
    }
}
