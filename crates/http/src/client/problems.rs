//! Problem endpoints

use super::{error::ClientError, typed::AuthenticatedRaiserClient};
use crate::types::{ProblemDetail, ProblemSummary};
use reqwest::Method;

impl AuthenticatedRaiserClient {
    /// List problems with the caller's solved flag
    pub async fn list_problems(&self) -> Result<Vec<ProblemSummary>, ClientError> {
        let request = self.request(Method::GET, "/problems");
        self.execute(request).await
    }

    pub async fn get_problem(&self, problem_id: i64) -> Result<ProblemDetail, ClientError> {
        let request = self.request(Method::GET, &format!("/problems/{problem_id}"));
        self.execute(request).await
    }
}
