//! Overpass queries, downloaded map documents and the initial map view.

use std::fmt;

use crate::coord::LatLon;

/// Default radius, in metres, of the area requested around the map centre.
pub const DEFAULT_QUERY_RADIUS_M: u32 = 3_000_000;

/// An Overpass QL query sent verbatim as the `data` parameter.
///
/// # Examples
/// ```
/// use osmap_core::{LatLon, MapDataQuery};
///
/// let centre = LatLon::new(17.8111683, -97.7810027)?;
/// let query = MapDataQuery::highways_and_buildings(centre, 1_000);
/// assert!(query.as_str().starts_with("[out:xml][timeout:25];"));
/// assert!(query.as_str().contains("way(around:1000, 17.8111683,-97.7810027)[highway];"));
/// # Ok::<(), osmap_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDataQuery(String);

impl MapDataQuery {
    /// Wrap an arbitrary query string.
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    /// Highways and buildings within `radius_m` metres of `centre`, followed
    /// by the nodes they reference.
    #[must_use]
    pub fn highways_and_buildings(centre: LatLon, radius_m: u32) -> Self {
        let around = format!("around:{radius_m}, {},{}", centre.lat(), centre.lon());
        Self(format!(
            "[out:xml][timeout:25];\n\
             (\n  \
             way({around})[highway];\n  \
             way({around})[building];\n\
             );\n\
             out body;\n\
             >;\n\
             out skel qt;"
        ))
    }

    /// The raw query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapDataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element counts gathered while checking a downloaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Number of `<node>` elements.
    pub nodes: u64,
    /// Number of `<way>` elements.
    pub ways: u64,
    /// Number of `<relation>` elements.
    pub relations: u64,
}

/// A downloaded map-data document, kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDocument {
    body: Vec<u8>,
    summary: DocumentSummary,
}

impl MapDocument {
    /// Pair a response body with the summary produced while checking it.
    #[must_use]
    pub const fn new(body: Vec<u8>, summary: DocumentSummary) -> Self {
        Self { body, summary }
    }

    /// The response body exactly as received.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Element counts for the document.
    #[must_use]
    pub const fn summary(&self) -> DocumentSummary {
        self.summary
    }
}

/// Initial camera and zoom limits for the map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// Map centre.
    pub centre: LatLon,
    /// Initial zoom level.
    pub zoom: f64,
    /// Lowest zoom the user may reach.
    pub min_zoom: f64,
    /// Highest zoom the user may reach.
    pub max_zoom: f64,
}

impl MapView {
    /// Default map centre.
    pub const DEFAULT_CENTRE: LatLon = LatLon::from_trusted(17.811_168_3, -97.781_002_7);

    /// Centre the default view on `centre`.
    #[must_use]
    pub fn centred_on(centre: LatLon) -> Self {
        Self {
            centre,
            ..Self::default()
        }
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            centre: Self::DEFAULT_CENTRE,
            zoom: 12.0,
            min_zoom: 2.0,
            max_zoom: 19.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_query_matches_overpass_layout() {
        let query =
            MapDataQuery::highways_and_buildings(MapView::DEFAULT_CENTRE, DEFAULT_QUERY_RADIUS_M);
        let expected = "[out:xml][timeout:25];\n\
                        (\n\
                        \x20 way(around:3000000, 17.8111683,-97.7810027)[highway];\n\
                        \x20 way(around:3000000, 17.8111683,-97.7810027)[building];\n\
                        );\n\
                        out body;\n\
                        >;\n\
                        out skel qt;";
        assert_eq!(query.as_str(), expected);
    }

    #[rstest]
    fn default_view_matches_widget_limits() {
        let view = MapView::default();
        assert_eq!(view.centre.to_lat_lon(), [17.811_168_3, -97.781_002_7]);
        assert_eq!(view.zoom, 12.0);
        assert_eq!(view.min_zoom, 2.0);
        assert_eq!(view.max_zoom, 19.0);
    }

    #[rstest]
    fn centred_view_keeps_zoom_defaults() {
        let centre = LatLon::new(51.5, -0.1).expect("valid centre");
        let view = MapView::centred_on(centre);
        assert_eq!(view.centre, centre);
        assert_eq!(view.zoom, MapView::default().zoom);
    }
}
