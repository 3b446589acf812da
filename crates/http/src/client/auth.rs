//! Authentication endpoints

use super::{
    error::ClientError,
    typed::{AuthenticatedRaiserClient, PublicRaiserClient},
};
use crate::types::{
    ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest, TokenResponse,
    VerifyEmailRequest,
};
use reqwest::Method;

/// Path of the refresh endpoint, which is also the refresh cookie's scope
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Authentication endpoints for public client
impl PublicRaiserClient {
    /// Create an account
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/register").json(request);
        self.execute(req).await
    }

    /// Exchange credentials for an access token
    ///
    /// The same response sets the refresh cookie in this client's jar.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/login").form(request);
        self.execute(req).await
    }

    /// Mint a new access token from the refresh cookie
    pub async fn refresh(&self) -> Result<TokenResponse, ClientError> {
        let req = self.request(Method::POST, REFRESH_PATH);
        self.execute(req).await
    }

    /// Check that an email is registered
    pub async fn verify_email(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, "/auth/verify-email")
            .json(&VerifyEmailRequest {
                email: email.to_string(),
            });
        self.execute(req).await
    }

    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, "/auth/change-password")
            .json(request);
        self.execute(req).await
    }
}

/// Session teardown endpoints for authenticated client
impl AuthenticatedRaiserClient {
    /// Revoke the current session
    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/logout");
        self.execute(req).await
    }

    /// Revoke every session of the current user
    pub async fn logout_all(&self) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/logout-all");
        self.execute(req).await
    }
}
