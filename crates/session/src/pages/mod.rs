//! Page models: fetch on load, filter and paginate locally, expose a view
//!
//! Views are plain data; rendering belongs to the caller.

pub mod admin_issues;
pub mod dashboard;
pub mod my_submissions;
pub mod pagination;
pub mod problem;
pub mod profile;

pub use admin_issues::{AdminIssuesPage, Issue, IssueStatus, IssuesView};
pub use dashboard::{DashboardPage, DashboardStats, DashboardView};
pub use my_submissions::{MySubmissionsPage, SubmissionsView};
pub use pagination::Pagination;
pub use problem::{ProblemPage, ProblemView};
pub use profile::{ProfilePage, ProfileView};

use crate::auth::{AuthAction, AuthContext};
use crate::error::{AuthError, Result};
use crate::hooks::TokenRefresher;
use raiser_http::AuthenticatedRaiserClient;

/// Per-call async state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Refresh if needed, then hand out a client with the current token
///
/// A failed refresh has already cleared the stored session; the context is
/// signed out too so no view keeps showing the old user.
async fn authorized_client(
    context: &AuthContext,
    refresher: &TokenRefresher,
) -> Result<AuthenticatedRaiserClient> {
    if !refresher.ensure_fresh_token().await {
        context.dispatch(AuthAction::SignedOut);
        return Err(AuthError::NotAuthenticated);
    }
    refresher.auth().authenticated_client()
}
