//! Raiser HTTP client

pub mod auth;
pub mod error;
pub mod problems;
pub mod submissions;
pub mod typed;
pub mod users;

pub use error::ClientError;
pub use typed::{AuthenticatedRaiserClient, DEFAULT_TIMEOUT, PublicRaiserClient, TypedClientBuilder};

use serde::de::DeserializeOwned;
use tracing::debug;

/// Send a request and decode a JSON body from a successful response
async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ClientError> {
    let response = send(request).await?;
    Ok(response.json().await?)
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(url = %response.url().path(), status = status.as_u16(), "Received response");

    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status, body))
    }
}
