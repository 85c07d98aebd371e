//! HTTP client abstraction for testability

use super::types::SourceError;
use std::time::Duration;

/// Trait for HTTP GET operations.
///
/// Keeps the transport injectable so imagery sources can be tested against
/// a mock client instead of the network.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}

/// Real HTTP client implementation using blocking reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with a 30 second request timeout.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SourceError::Http(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| SourceError::Http(format!("failed to read response body: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock HTTP client returning a canned response and recording every
    /// requested URL.
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, SourceError>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<Vec<u8>, SourceError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// URLs requested so far, in call order.
        pub fn requested_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, SourceError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[test]
    fn test_mock_client_returns_canned_response() {
        let mock = MockHttpClient::new(Ok(vec![1, 2, 3, 4]));
        let result = mock.get("http://example.com/tile");
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mock_client_records_urls() {
        let mock = MockHttpClient::new(Ok(vec![]));
        mock.get("http://example.com/a").unwrap();
        mock.get("http://example.com/b").unwrap();
        assert_eq!(
            mock.requested_urls(),
            vec!["http://example.com/a", "http://example.com/b"]
        );
    }

    #[test]
    fn test_mock_client_error_passthrough() {
        let mock = MockHttpClient::new(Err(SourceError::Http("boom".to_string())));
        let result = mock.get("http://example.com");
        assert_eq!(result, Err(SourceError::Http("boom".to_string())));
    }
}
