//! Landing page: greeting, recent submissions and progress counters

use super::{LoadState, authorized_client};
use crate::auth::AuthContext;
use crate::config::PaginationConfig;
use crate::error::{AuthError, Result};
use crate::hooks::TokenRefresher;
use raiser_http::types::{PageQuery, ProblemSummary, Submission, SubmissionStatus, User};
use std::collections::BTreeMap;

/// Counters over the most recent page of submissions and the problem list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub recent_submissions: usize,
    pub accepted: usize,
    pub by_status: BTreeMap<SubmissionStatus, usize>,
    pub problems_total: usize,
    pub problems_solved: usize,
}

impl DashboardStats {
    pub fn compute(submissions: &[Submission], problems: &[ProblemSummary]) -> Self {
        let mut by_status = BTreeMap::new();
        for submission in submissions {
            *by_status.entry(submission.status.clone()).or_insert(0) += 1;
        }

        Self {
            recent_submissions: submissions.len(),
            accepted: by_status
                .get(&SubmissionStatus::Accepted)
                .copied()
                .unwrap_or(0),
            by_status,
            problems_total: problems.len(),
            problems_solved: problems.iter().filter(|problem| problem.is_solved).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub user: Option<User>,
    pub recent: Vec<Submission>,
    pub stats: DashboardStats,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DashboardData {
    submissions: Vec<Submission>,
    problems: Vec<ProblemSummary>,
}

pub struct DashboardPage {
    context: AuthContext,
    refresher: TokenRefresher,
    state: LoadState<DashboardData>,
}

impl DashboardPage {
    pub fn new(context: &AuthContext) -> Self {
        Self {
            context: context.clone(),
            refresher: TokenRefresher::new(context.service().clone()),
            state: LoadState::Idle,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.state = LoadState::Loading;

        match self.fetch().await {
            Ok(data) => {
                self.state = LoadState::Loaded(data);
                Ok(())
            }
            Err(err) => {
                self.state = LoadState::Failed(err.user_message());
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<DashboardData> {
        let client = authorized_client(&self.context, &self.refresher).await?;
        let page = PageQuery {
            skip: 0,
            limit: PaginationConfig::ITEMS_PER_PAGE,
        };

        let (submissions, problems) =
            tokio::join!(client.my_submissions(page), client.list_problems());

        Ok(DashboardData {
            submissions: submissions.map_err(AuthError::from)?,
            problems: problems.map_err(AuthError::from)?,
        })
    }

    pub fn view(&self) -> DashboardView {
        let (recent, stats) = self.state.data().map_or_else(
            || (Vec::new(), DashboardStats::default()),
            |data| {
                (
                    data.submissions.clone(),
                    DashboardStats::compute(&data.submissions, &data.problems),
                )
            },
        );

        DashboardView {
            user: self.context.user(),
            recent,
            stats,
            is_loading: self.state.is_loading(),
            error: self.state.error().map(str::to_string),
        }
    }
}
