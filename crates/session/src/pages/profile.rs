//! Account details and password change

use super::LoadState;
use crate::auth::{AuthAction, AuthContext};
use crate::error::{AuthError, Result};
use raiser_http::types::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub password_changed: bool,
}

pub struct ProfilePage {
    context: AuthContext,
    state: LoadState<User>,
    password_changed: bool,
}

impl ProfilePage {
    pub fn new(context: &AuthContext) -> Self {
        Self {
            context: context.clone(),
            state: LoadState::Idle,
            password_changed: false,
        }
    }

    /// Use the context's user, fetching it only when the context has none
    pub async fn load(&mut self) -> Result<()> {
        if let Some(user) = self.context.user() {
            self.state = LoadState::Loaded(user);
            return Ok(());
        }

        self.state = LoadState::Loading;
        match self.context.service().get_current_user().await {
            Ok(user) => {
                self.context
                    .dispatch(AuthAction::Authenticated(user.clone()));
                self.state = LoadState::Loaded(user);
                Ok(())
            }
            Err(err) => {
                self.state = LoadState::Failed(err.user_message());
                Err(err)
            }
        }
    }

    /// Change the password of the loaded account
    pub async fn change_password(&mut self, new_password: &str) -> Result<()> {
        self.password_changed = false;
        let email = self
            .state
            .data()
            .map(|user| user.email.clone())
            .ok_or(AuthError::NotAuthenticated)?;

        self.context.change_password(&email, new_password).await?;
        self.password_changed = true;
        Ok(())
    }

    pub fn view(&self) -> ProfileView {
        let context = self.context.snapshot();
        ProfileView {
            user: self.state.data().cloned(),
            is_loading: self.state.is_loading() || context.is_loading,
            error: self
                .state
                .error()
                .map(str::to_string)
                .or(context.error),
            password_changed: self.password_changed,
        }
    }
}
