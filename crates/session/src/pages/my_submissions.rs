//! The signed-in user's submissions, one page at a time

use super::{LoadState, Pagination, authorized_client};
use crate::auth::AuthContext;
use crate::config::PaginationConfig;
use crate::error::Result;
use crate::hooks::TokenRefresher;
use raiser_http::types::{Submission, SubmissionStatus};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionsView {
    pub page: u32,
    pub rows: Vec<Submission>,
    pub is_loading: bool,
    /// Loaded successfully but nothing to show
    pub is_empty: bool,
    pub has_previous: bool,
    pub has_next: bool,
    pub error: Option<String>,
}

pub struct MySubmissionsPage {
    context: AuthContext,
    refresher: TokenRefresher,
    pagination: Pagination,
    status_filter: Option<SubmissionStatus>,
    state: LoadState<Vec<Submission>>,
}

impl MySubmissionsPage {
    pub fn new(context: &AuthContext) -> Self {
        Self::with_items_per_page(context, PaginationConfig::ITEMS_PER_PAGE)
    }

    pub fn with_items_per_page(context: &AuthContext, items_per_page: u32) -> Self {
        Self {
            context: context.clone(),
            refresher: TokenRefresher::new(context.service().clone()),
            pagination: Pagination::new(items_per_page),
            status_filter: None,
            state: LoadState::Idle,
        }
    }

    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Fetch the current page
    pub async fn load(&mut self) -> Result<()> {
        self.state = LoadState::Loading;
        let query = self.pagination.query();
        debug!(page = self.pagination.page(), ?query, "Loading submissions");

        let fetched = match authorized_client(&self.context, &self.refresher).await {
            Ok(client) => client.my_submissions(query).await.map_err(Into::into),
            Err(err) => Err(err),
        };

        match fetched {
            Ok(rows) => {
                self.pagination.record_fetch(rows.len());
                self.state = LoadState::Loaded(rows);
                Ok(())
            }
            Err(err) => {
                self.pagination.record_fetch(0);
                self.state = LoadState::Failed(err.user_message());
                Err(err)
            }
        }
    }

    /// Load the next page; `Ok(false)` when "Next" is disabled
    pub async fn next_page(&mut self) -> Result<bool> {
        if !self.pagination.next() {
            return Ok(false);
        }
        self.load().await.map(|()| true)
    }

    /// Load the previous page; `Ok(false)` on page 1
    pub async fn previous_page(&mut self) -> Result<bool> {
        if !self.pagination.previous() {
            return Ok(false);
        }
        self.load().await.map(|()| true)
    }

    /// Filter the fetched page by verdict; no request is made
    pub fn set_status_filter(&mut self, status: Option<SubmissionStatus>) {
        self.status_filter = status;
    }

    pub fn view(&self) -> SubmissionsView {
        let rows: Vec<Submission> = self
            .state
            .data()
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        self.status_filter
                            .as_ref()
                            .is_none_or(|status| &row.status == status)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        SubmissionsView {
            page: self.pagination.page(),
            is_empty: self.state.data().is_some() && rows.is_empty(),
            rows,
            is_loading: self.state.is_loading(),
            has_previous: self.pagination.has_previous(),
            has_next: self.pagination.has_next(),
            error: self.state.error().map(str::to_string),
        }
    }
}
