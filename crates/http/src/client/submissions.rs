//! Submission endpoints

use super::{error::ClientError, typed::AuthenticatedRaiserClient};
use crate::types::{PageQuery, Submission};

impl AuthenticatedRaiserClient {
    /// List one page of the current user's submissions
    ///
    /// The backend returns no total count; an empty vector means "no data".
    pub async fn my_submissions(&self, page: PageQuery) -> Result<Vec<Submission>, ClientError> {
        let request = self
            .request(reqwest::Method::GET, "/submissions/me/submissions")
            .query(&page);
        self.execute(request).await
    }
}
