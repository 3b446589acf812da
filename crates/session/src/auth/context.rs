//! Process-wide authentication context
//!
//! State changes go through [`AuthContextData::reduce`], the same
//! action/reducer split a UI provider would use. Each mutating operation
//! admits one request at a time; different operations do not wait on each
//! other.

use crate::error::{AuthError, AuthOperation, Result};
use crate::services::AuthService;
use raiser_http::types::{RegisterRequest, User};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Authentication context data
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContextData {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Authentication context actions
#[derive(Debug)]
pub enum AuthAction {
    Started,
    Authenticated(User),
    SignedOut,
    Failed(String),
    Finished,
    ClearError,
}

impl AuthContextData {
    #[must_use]
    pub fn reduce(&self, action: AuthAction) -> Self {
        match action {
            AuthAction::Started => Self {
                is_loading: true,
                error: None,
                ..self.clone()
            },
            AuthAction::Authenticated(user) => Self {
                user: Some(user),
                error: None,
                ..self.clone()
            },
            AuthAction::SignedOut => Self {
                user: None,
                ..self.clone()
            },
            AuthAction::Failed(message) => Self {
                error: Some(message),
                ..self.clone()
            },
            AuthAction::Finished => Self {
                is_loading: false,
                ..self.clone()
            },
            AuthAction::ClearError => Self {
                error: None,
                ..self.clone()
            },
        }
    }
}

struct AuthContextInner {
    service: AuthService,
    state: Mutex<AuthContextData>,
    in_flight: Mutex<HashSet<AuthOperation>>,
    mounted: OnceCell<()>,
}

/// Authentication context shared by every consumer in the process
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<AuthContextInner>,
}

/// Removes its operation from the in-flight set when dropped
struct InFlight<'a> {
    set: &'a Mutex<HashSet<AuthOperation>>,
    operation: AuthOperation,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.operation);
    }
}

impl AuthContext {
    pub fn new(service: AuthService) -> Self {
        Self {
            inner: Arc::new(AuthContextInner {
                service,
                state: Mutex::new(AuthContextData {
                    is_loading: true,
                    ..AuthContextData::default()
                }),
                in_flight: Mutex::new(HashSet::new()),
                mounted: OnceCell::new(),
            }),
        }
    }

    pub fn service(&self) -> &AuthService {
        &self.inner.service
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> AuthContextData {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.snapshot().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.service.is_authenticated()
    }

    pub fn dispatch(&self, action: AuthAction) {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *state = state.reduce(action);
    }

    pub fn clear_error(&self) {
        self.dispatch(AuthAction::ClearError);
    }

    /// Restore the stored session, once per context
    ///
    /// A stored token is validated by fetching the current user. If that
    /// fails the token is purged and the context settles signed out; it is
    /// never retried. Concurrent callers wait for the single run.
    pub async fn initialize(&self) {
        self.inner
            .mounted
            .get_or_init(|| async {
                let service = &self.inner.service;
                if service.is_authenticated() {
                    match service.get_current_user().await {
                        Ok(user) => {
                            info!(username = %user.username, "Restored stored session");
                            self.dispatch(AuthAction::Authenticated(user));
                        }
                        Err(err) => {
                            warn!(error = %err, "Stored session is invalid, clearing it");
                            if let Err(clear_err) = service.clear_tokens() {
                                warn!(error = %clear_err, "Failed to clear invalid session");
                            }
                            self.dispatch(AuthAction::SignedOut);
                        }
                    }
                } else {
                    debug!("No stored session");
                    self.dispatch(AuthAction::SignedOut);
                }
                self.dispatch(AuthAction::Finished);
            })
            .await;
    }

    fn begin(&self, operation: AuthOperation) -> Result<InFlight<'_>> {
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(operation) {
            debug!(%operation, "Rejected overlapping request");
            return Err(AuthError::OperationInProgress(operation));
        }
        Ok(InFlight {
            set: &self.inner.in_flight,
            operation,
        })
    }

    /// Loading flag around `call`, error message on failure
    async fn run<T, F, Fut>(&self, operation: AuthOperation, call: F) -> Result<T>
    where
        F: FnOnce(AuthService) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _guard = self.begin(operation)?;
        self.dispatch(AuthAction::Started);

        let result = call(self.inner.service.clone()).await;
        if let Err(err) = &result {
            self.dispatch(AuthAction::Failed(err.user_message()));
        }

        self.dispatch(AuthAction::Finished);
        result
    }

    /// Sign in and load the user
    ///
    /// If the user cannot be fetched right after login the new token is
    /// dropped again, so the context never holds a token without a user.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .run(AuthOperation::Login, |service| async move {
                service.login(username, password).await?;
                fetch_user_or_clear(&service).await
            })
            .await?;
        self.dispatch(AuthAction::Authenticated(user.clone()));
        Ok(user)
    }

    /// Register, then sign in with the same credentials, then load the user
    ///
    /// There is no rollback: when a later step fails the account still
    /// exists, the context stays signed out and the error is
    /// [`AuthError::RegistrationIncomplete`].
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let user = self
            .run(AuthOperation::Register, |service| async move {
                service.register(&request).await?;

                let signed_in = async {
                    service.login(&request.username, &request.password).await?;
                    fetch_user_or_clear(&service).await
                }
                .await;

                signed_in.map_err(|err| AuthError::RegistrationIncomplete {
                    source: Box::new(err),
                })
            })
            .await?;
        self.dispatch(AuthAction::Authenticated(user.clone()));
        Ok(user)
    }

    /// Sign out locally even when the server call fails
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .run(AuthOperation::Logout, |service| async move {
                service.logout().await
            })
            .await;
        self.signed_out_unless_busy(result)
    }

    pub async fn logout_all(&self) -> Result<()> {
        let result = self
            .run(AuthOperation::LogoutAll, |service| async move {
                service.logout_all().await
            })
            .await;
        self.signed_out_unless_busy(result)
    }

    fn signed_out_unless_busy(&self, result: Result<()>) -> Result<()> {
        if !matches!(result, Err(AuthError::OperationInProgress(_))) {
            self.dispatch(AuthAction::SignedOut);
        }
        result
    }

    pub async fn change_password(&self, email: &str, new_password: &str) -> Result<()> {
        self.run(AuthOperation::ChangePassword, |service| async move {
            service.change_password(email, new_password).await.map(drop)
        })
        .await
    }
}

async fn fetch_user_or_clear(service: &AuthService) -> Result<User> {
    match service.get_current_user().await {
        Ok(user) => Ok(user),
        Err(err) => {
            if let Err(clear_err) = service.clear_tokens() {
                warn!(error = %clear_err, "Failed to clear session after user fetch failure");
            }
            Err(err)
        }
    }
}
