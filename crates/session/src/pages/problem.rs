use super::{LoadState, authorized_client};
use crate::auth::AuthContext;
use crate::error::{AuthError, Result};
use crate::hooks::TokenRefresher;
use raiser_http::types::{ProblemDetail, TestCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemView {
    pub problem: Option<ProblemDetail>,
    /// Sample cases only; hidden cases are never shown
    pub samples: Vec<TestCase>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// One problem with its sample test cases
pub struct ProblemPage {
    context: AuthContext,
    refresher: TokenRefresher,
    problem_id: i64,
    state: LoadState<ProblemDetail>,
}

impl ProblemPage {
    pub fn new(context: &AuthContext, problem_id: i64) -> Self {
        Self {
            context: context.clone(),
            refresher: TokenRefresher::new(context.service().clone()),
            problem_id,
            state: LoadState::Idle,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.state = LoadState::Loading;

        let fetched = match authorized_client(&self.context, &self.refresher).await {
            Ok(client) => client
                .get_problem(self.problem_id)
                .await
                .map_err(AuthError::from),
            Err(err) => Err(err),
        };

        match fetched {
            Ok(problem) => {
                self.state = LoadState::Loaded(problem);
                Ok(())
            }
            Err(err) => {
                self.state = LoadState::Failed(err.user_message());
                Err(err)
            }
        }
    }

    pub fn view(&self) -> ProblemView {
        let problem = self.state.data().cloned();
        let samples = problem
            .as_ref()
            .map(|problem| {
                problem
                    .test_cases
                    .iter()
                    .filter(|case| case.is_sample)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        ProblemView {
            problem,
            samples,
            is_loading: self.state.is_loading(),
            error: self.state.error().map(str::to_string),
        }
    }
}
