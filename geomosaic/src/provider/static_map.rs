//! Static-map satellite imagery source.
//!
//! Requests satellite tiles through the static-map rendering endpoint: each
//! request names a center coordinate, zoom, and pixel size, and the server
//! returns one rendered PNG. Valid satellite imagery comes back
//! palette-indexed; a full-color response is the endpoint's way of refusing
//! service (throttling or blocking), which the fetch layer detects.

use crate::provider::{HttpClient, ImageSource, SourceError};

const BASE_URL: &str = "http://maps.googleapis.com/maps/api/staticmap";

/// Imagery source backed by the static-map HTTP endpoint.
pub struct StaticMapSource<C: HttpClient> {
    http_client: C,
}

impl<C: HttpClient> StaticMapSource<C> {
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    /// Builds the request URL for one tile.
    fn build_url(&self, lat: f64, lon: f64, zoom: u8, width: u32, height: u32) -> String {
        format!(
            "{}?center={},{}&zoom={}&scale=false&size={}x{}&maptype=satellite&format=png&visual_refresh=true",
            BASE_URL, lat, lon, zoom, width, height
        )
    }
}

impl<C: HttpClient> ImageSource for StaticMapSource<C> {
    fn fetch(
        &self,
        lat: f64,
        lon: f64,
        zoom: u8,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, SourceError> {
        if !self.supports_zoom(zoom) {
            return Err(SourceError::UnsupportedZoom(zoom));
        }

        let url = self.build_url(lat, lon, zoom, width, height);
        tracing::debug!(%url, "requesting tile");
        self.http_client.get(&url)
    }

    fn name(&self) -> &str {
        "Static Maps"
    }

    fn min_zoom(&self) -> u8 {
        0
    }

    fn max_zoom(&self) -> u8 {
        21
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    #[test]
    fn test_source_name() {
        let source = StaticMapSource::new(MockHttpClient::new(Ok(vec![])));
        assert_eq!(source.name(), "Static Maps");
    }

    #[test]
    fn test_zoom_range() {
        let source = StaticMapSource::new(MockHttpClient::new(Ok(vec![])));
        assert!(source.supports_zoom(0));
        assert!(source.supports_zoom(21));
        assert!(!source.supports_zoom(22));
    }

    #[test]
    fn test_url_construction() {
        let source = StaticMapSource::new(MockHttpClient::new(Ok(vec![])));
        let url = source.build_url(45.1800992, 5.7074098, 20, 640, 640);
        assert_eq!(
            url,
            "http://maps.googleapis.com/maps/api/staticmap?center=45.1800992,5.7074098&zoom=20&scale=false&size=640x640&maptype=satellite&format=png&visual_refresh=true"
        );
    }

    #[test]
    fn test_fetch_requests_built_url() {
        let source = StaticMapSource::new(MockHttpClient::new(Ok(vec![9, 9])));
        let bytes = source.fetch(10.5, -20.25, 15, 320, 240).unwrap();
        assert_eq!(bytes, vec![9, 9]);

        let urls = source.http_client.requested_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("center=10.5,-20.25"));
        assert!(urls[0].contains("zoom=15"));
        assert!(urls[0].contains("size=320x240"));
        assert!(urls[0].contains("maptype=satellite"));
    }

    #[test]
    fn test_fetch_rejects_unsupported_zoom() {
        let source = StaticMapSource::new(MockHttpClient::new(Ok(vec![])));
        let result = source.fetch(0.0, 0.0, 22, 640, 640);
        assert_eq!(result, Err(SourceError::UnsupportedZoom(22)));
        assert!(source.http_client.requested_urls().is_empty());
    }

    #[test]
    fn test_fetch_propagates_transport_error() {
        let source = StaticMapSource::new(MockHttpClient::new(Err(SourceError::Http(
            "connection refused".to_string(),
        ))));
        let result = source.fetch(0.0, 0.0, 15, 640, 640);
        assert!(matches!(result, Err(SourceError::Http(_))));
    }
}
