//! User endpoints

use super::{error::ClientError, typed::AuthenticatedRaiserClient};
use crate::types::User;

impl AuthenticatedRaiserClient {
    /// Get current user info (requires authentication)
    pub async fn get_me(&self) -> Result<User, ClientError> {
        let request = self.request(reqwest::Method::GET, "/users/me");
        self.execute(request).await
    }
}
