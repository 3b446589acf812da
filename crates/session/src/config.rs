//! Frontend configuration

use std::time::Duration;

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Storage key of the persisted session record
    pub const SESSION_KEY: &'static str = "raiser_session";

    /// Field holding the access token inside the session record
    pub const ACCESS_TOKEN_KEY: &'static str = "access_token";

    /// Field holding the access token expiry (decimal unix seconds)
    pub const ACCESS_TOKEN_EXPIRY_KEY: &'static str = "access_token_expiry";

    /// Field holding the cached user
    pub const USER_KEY: &'static str = "user";

    /// Refresh this many seconds before the access token expires
    pub const REFRESH_BUFFER_SECS: i64 = 60;

    /// Period of the background refresh check
    pub const TOKEN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
}

/// API endpoint configuration
pub struct ApiConfig;

impl ApiConfig {
    /// Base URL used when nothing else is configured
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Environment variable overriding the base URL
    pub const BASE_URL_ENV: &'static str = "RAISER_API_URL";

    pub const REQUEST_TIMEOUT: Duration = raiser_http::DEFAULT_TIMEOUT;
}

/// List page configuration
pub struct PaginationConfig;

impl PaginationConfig {
    pub const ITEMS_PER_PAGE: u32 = 10;
}
