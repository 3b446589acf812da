//! Authentication API service
//!
//! Owns the durable session record and the public client whose cookie jar
//! carries the refresh token. Remote calls never retry; local accessors
//! never touch the network.

use crate::error::{AuthError, Result, StorageError};
use crate::storage::{Session, SessionStore};
use raiser_http::types::{
    ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest, TokenResponse, User,
};
use raiser_http::{AuthenticatedRaiserClient, ClientError, PublicRaiserClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication API service
#[derive(Clone)]
pub struct AuthService {
    client: PublicRaiserClient,
    store: Arc<dyn SessionStore>,
}

impl AuthService {
    /// Create a new auth API service
    pub fn new(client: PublicRaiserClient, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    pub const fn client(&self) -> &PublicRaiserClient {
        &self.client
    }

    /// Create an account; does not sign in
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse> {
        let response = self.client.register(request).await?;
        info!(username = %request.username, "Account registered");
        Ok(response)
    }

    /// Exchange credentials for an access token and persist it
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let token = self
            .client
            .login(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.set_tokens(&token.access_token, token.expires_at)?;
        info!(username, expires_at = token.expires_at, "Logged in");
        Ok(token)
    }

    /// Mint a new access token from the refresh cookie and persist it
    pub async fn refresh(&self) -> Result<TokenResponse> {
        let token = self.client.refresh().await?;
        self.set_tokens(&token.access_token, token.expires_at)?;
        debug!(expires_at = token.expires_at, "Access token refreshed");
        Ok(token)
    }

    /// Revoke the current session
    ///
    /// The local record is cleared whatever the server says; a remote
    /// failure is still reported after the clear.
    pub async fn logout(&self) -> Result<()> {
        let remote = match self.get_access_token() {
            Some(token) => self.client.with_token(token).logout().await.map(drop),
            None => Ok(()),
        };
        self.finish_sign_out(remote, "logout")
    }

    /// Revoke every session of the current user, clearing local state regardless
    pub async fn logout_all(&self) -> Result<()> {
        let remote = match self.get_access_token() {
            Some(token) => self.client.with_token(token).logout_all().await.map(drop),
            None => Ok(()),
        };
        self.finish_sign_out(remote, "logout-all")
    }

    fn finish_sign_out(
        &self,
        remote: std::result::Result<(), ClientError>,
        operation: &str,
    ) -> Result<()> {
        let cleared = self.clear_tokens();
        if let Err(err) = &remote {
            warn!(operation, error = %err, "Remote sign-out failed, local session cleared anyway");
        } else {
            info!(operation, "Signed out");
        }
        remote?;
        cleared.map_err(AuthError::from)
    }

    /// Fetch the signed-in user and cache it
    pub async fn get_current_user(&self) -> Result<User> {
        let user = self.authenticated_client()?.get_me().await?;
        self.set_user(Some(user.clone()))?;
        Ok(user)
    }

    pub async fn change_password(&self, email: &str, new_password: &str) -> Result<MessageResponse> {
        let response = self
            .client
            .change_password(&ChangePasswordRequest {
                email: email.to_string(),
                new_password: new_password.to_string(),
            })
            .await?;
        info!(email, "Password changed");
        Ok(response)
    }

    /// Check that an email is registered
    pub async fn verify_email(&self, email: &str) -> Result<MessageResponse> {
        Ok(self.client.verify_email(email).await?)
    }

    /// Client carrying the stored access token
    pub fn authenticated_client(&self) -> Result<AuthenticatedRaiserClient> {
        self.get_access_token()
            .map(|token| self.client.with_token(token))
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Raw read of the session record
    pub fn session(&self) -> std::result::Result<Option<Session>, StorageError> {
        self.store.load()
    }

    /// Session record for accessors, treating unreadable storage as empty
    fn current(&self) -> Session {
        match self.store.load() {
            Ok(session) => session.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "Failed to read session record");
                Session::default()
            }
        }
    }

    fn write(&self, session: &Session) -> std::result::Result<(), StorageError> {
        if session.is_empty() {
            self.store.clear()
        } else {
            self.store.save(session)
        }
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.current().token().map(str::to_string)
    }

    pub fn get_access_token_expiry(&self) -> Option<i64> {
        self.current().access_token_expiry
    }

    pub fn get_user(&self) -> Option<User> {
        self.current().user
    }

    /// Overwrite token and expiry, keeping the cached user
    pub fn set_tokens(
        &self,
        access_token: &str,
        expires_at: i64,
    ) -> std::result::Result<(), StorageError> {
        let mut session = self.current();
        session.access_token = Some(access_token.to_string());
        session.access_token_expiry = Some(expires_at);
        self.write(&session)
    }

    pub fn set_user(&self, user: Option<User>) -> std::result::Result<(), StorageError> {
        let mut session = self.current();
        session.user = user;
        self.write(&session)
    }

    /// Remove the whole session record
    pub fn clear_tokens(&self) -> std::result::Result<(), StorageError> {
        self.store.clear()
    }

    /// True while a non-empty access token is stored; expiry is not consulted
    pub fn is_authenticated(&self) -> bool {
        self.get_access_token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySessionStore, MockSessionStore};
    use raiser_http::types::Role;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer, store: Arc<dyn SessionStore>) -> AuthService {
        AuthService::new(PublicRaiserClient::new(server.uri()).unwrap(), store)
    }

    fn user() -> User {
        User {
            id: 3,
            username: "bob".into(),
            email: "bob@example.com".into(),
            role: Role::ProblemSetter,
            created_at: "2024-02-02T00:00:00".into(),
        }
    }

    #[tokio::test]
    async fn test_set_tokens_keeps_cached_user() {
        let server = MockServer::start().await;
        let auth = service(&server, Arc::new(MemorySessionStore::new()));

        auth.set_user(Some(user())).unwrap();
        auth.set_tokens("t1", 10).unwrap();
        auth.set_tokens("t2", 20).unwrap();

        assert_eq!(auth.get_access_token().as_deref(), Some("t2"));
        assert_eq!(auth.get_access_token_expiry(), Some(20));
        assert_eq!(auth.get_user(), Some(user()));
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_expired_token_still_reads_as_authenticated() {
        let server = MockServer::start().await;
        let auth = service(&server, Arc::new(MemorySessionStore::new()));

        auth.set_tokens("old", 1).unwrap();
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_unreadable_store_reads_as_signed_out() {
        let server = MockServer::start().await;
        let mut store = MockSessionStore::new();
        store.expect_load().returning(|| {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        });
        let auth = service(&server, Arc::new(store));

        assert!(!auth.is_authenticated());
        assert_eq!(auth.get_user(), None);
    }

    #[tokio::test]
    async fn test_login_storage_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "t", "expires_at": 99})),
            )
            .mount(&server)
            .await;

        let mut store = MockSessionStore::new();
        store.expect_load().returning(|| Ok(None));
        store.expect_save().times(1).returning(|_| {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        });
        let auth = service(&server, Arc::new(store));

        let result = auth.login("bob", "pw").await;
        assert!(matches!(result, Err(AuthError::Storage(_))));
    }

    #[tokio::test]
    async fn test_logout_without_token_skips_remote_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut store = MockSessionStore::new();
        store.expect_load().returning(|| Ok(None));
        store.expect_clear().times(1).returning(|| Ok(()));
        let auth = service(&server, Arc::new(store));

        auth.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_get_current_user_caches_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("authorization", "Bearer t"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "username": "bob",
                "email": "bob@example.com",
                "role": "PROBLEM_SETTER",
                "created_at": "2024-02-02T00:00:00"
            })))
            .mount(&server)
            .await;

        let auth = service(&server, Arc::new(MemorySessionStore::new()));
        auth.set_tokens("t", 500).unwrap();

        let fetched = auth.get_current_user().await.unwrap();
        assert_eq!(fetched, user());
        assert_eq!(auth.get_user(), Some(user()));
    }

    #[tokio::test]
    async fn test_get_current_user_requires_token() {
        let server = MockServer::start().await;
        let auth = service(&server, Arc::new(MemorySessionStore::new()));

        let result = auth.get_current_user().await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }
}
