//! Issue review list for problem setters
//!
//! The backend has no issue listing endpoint yet, so loading always yields
//! an empty list. Filtering works on whatever was loaded.

use super::LoadState;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    InReview,
    Resolved,
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.pad("OPEN"),
            Self::InReview => f.pad("IN_REVIEW"),
            Self::Resolved => f.pad("RESOLVED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub problem_id: i64,
    pub title: String,
    pub status: IssueStatus,
    pub reported_by: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesView {
    pub rows: Vec<Issue>,
    pub is_empty: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct AdminIssuesPage {
    status_filter: Option<IssueStatus>,
    state: LoadState<Vec<Issue>>,
}

impl AdminIssuesPage {
    pub fn new() -> Self {
        Self::default()
    }

    // TODO: fetch from the issues endpoint once the backend exposes one
    pub fn load(&mut self) {
        debug!("Issue listing has no backend endpoint, showing empty list");
        self.state = LoadState::Loaded(Vec::new());
    }

    pub const fn set_status_filter(&mut self, status: Option<IssueStatus>) {
        self.status_filter = status;
    }

    pub fn view(&self) -> IssuesView {
        let rows: Vec<Issue> = self
            .state
            .data()
            .map(|issues| {
                issues
                    .iter()
                    .filter(|issue| self.status_filter.is_none_or(|status| issue.status == status))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        IssuesView {
            is_empty: self.state.data().is_some() && rows.is_empty(),
            rows,
            error: self.state.error().map(str::to_string),
        }
    }
}
