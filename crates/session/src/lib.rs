//! Client-side session lifecycle for the Ticket Raiser API
//!
//! [`AuthService`] owns the persisted session and talks to the auth
//! endpoints, [`TokenRefresher`] decides when the access token needs
//! refreshing, and [`AuthContext`] is the state the front end reads.
//! Page models under [`pages`] build on all three.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod pages;
pub mod services;
pub mod storage;

pub use auth::context::{AuthAction, AuthContext, AuthContextData};
pub use client::{base_url_from_env, create_public_client};
pub use config::{ApiConfig, AuthConfig, PaginationConfig};
pub use error::{AuthError, AuthOperation, StorageError};
pub use hooks::TokenRefresher;
pub use services::AuthService;
pub use storage::{FileSessionStore, MemorySessionStore, RefreshCookieFile, Session, SessionStore};
