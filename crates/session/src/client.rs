//! Client configuration and initialization

use crate::config::ApiConfig;
pub use raiser_http::ClientError;
use raiser_http::{PublicRaiserClient, TypedClientBuilder};
use tracing::debug;

/// Get the base URL for API calls
///
/// `RAISER_API_URL` wins; otherwise the local development default.
pub fn base_url_from_env() -> String {
    std::env::var(ApiConfig::BASE_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| ApiConfig::DEFAULT_BASE_URL.to_string())
}

/// Create the public client every session component shares
///
/// Keep one instance per session: its cookie jar is where the refresh
/// cookie lives.
pub fn create_public_client(base_url: &str) -> Result<PublicRaiserClient, ClientError> {
    debug!(base_url, "Creating API client");
    TypedClientBuilder::new()
        .base_url(base_url)
        .timeout(ApiConfig::REQUEST_TIMEOUT)
        .build_public()
}
