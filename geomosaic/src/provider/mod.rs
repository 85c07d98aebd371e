//! Satellite imagery source abstraction
//!
//! Traits and implementations for obtaining raw tile bytes from an imagery
//! endpoint. The HTTP transport sits behind [`HttpClient`] so every consumer
//! can be exercised against a mock without touching the network.

mod http;
mod static_map;
mod types;

pub use http::{HttpClient, ReqwestClient};
pub use static_map::StaticMapSource;
pub use types::{ImageSource, SourceError};

#[cfg(test)]
pub use http::tests::MockHttpClient;
