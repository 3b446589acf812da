//! Access token expiry check and refresh action
//!
//! Exposes a predicate and an action for a caller (a request interceptor or
//! a timer) to invoke around authenticated calls. Nothing here schedules
//! itself except [`TokenRefresher::spawn_refresh_task`], which a caller must
//! start explicitly.

use crate::config::AuthConfig;
use crate::services::AuthService;
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct TokenRefresher {
    auth: AuthService,
    buffer_secs: i64,
}

impl TokenRefresher {
    pub const fn new(auth: AuthService) -> Self {
        Self {
            auth,
            buffer_secs: AuthConfig::REFRESH_BUFFER_SECS,
        }
    }

    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Whether the stored token is missing or within the refresh buffer
    pub fn is_token_expiring_soon(&self) -> bool {
        self.is_token_expiring_soon_at(Utc::now().timestamp())
    }

    /// Same as [`Self::is_token_expiring_soon`] with an explicit clock
    ///
    /// Any failure to read or interpret the record answers `true`.
    pub fn is_token_expiring_soon_at(&self, now: i64) -> bool {
        let session = match self.auth.session() {
            Ok(Some(session)) => session,
            Ok(None) => return true,
            Err(err) => {
                warn!(error = %err, "Cannot read session, treating token as expiring");
                return true;
            }
        };

        match (session.token(), session.access_token_expiry) {
            (Some(_), Some(expiry)) => expiry
                .checked_sub(now)
                .is_none_or(|remaining| remaining < self.buffer_secs),
            _ => true,
        }
    }

    /// Refresh the access token, clearing the session on any failure
    pub async fn refresh_token(&self) -> bool {
        match self.auth.refresh().await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "Token refresh failed, clearing session");
                if let Err(clear_err) = self.auth.clear_tokens() {
                    warn!(error = %clear_err, "Failed to clear session after refresh failure");
                }
                false
            }
        }
    }

    /// Refresh only when needed; `false` means the session is gone
    pub async fn ensure_fresh_token(&self) -> bool {
        if !self.is_token_expiring_soon() {
            return true;
        }
        debug!("Access token expiring, refreshing before request");
        self.refresh_token().await
    }

    /// Check-and-refresh on a fixed period until cancelled
    ///
    /// Stops by itself after a failed refresh, since the session is cleared
    /// and nothing can mint a new token without signing in again.
    pub fn spawn_refresh_task(
        self,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        debug!("Refresh task cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        if self.is_token_expiring_soon() && !self.refresh_token().await {
                            info!("Session ended, stopping refresh task");
                            break;
                        }
                    }
                }
            }
        })
    }
}
