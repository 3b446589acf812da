//! Session and authentication errors

use raiser_http::ClientError;
use std::fmt;
use thiserror::Error;

/// Failures of the durable session store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Operations guarded by the auth context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthOperation {
    Register,
    Login,
    Logout,
    LogoutAll,
    ChangePassword,
}

impl fmt::Display for AuthOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::LogoutAll => "logout-all",
            Self::ChangePassword => "change-password",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("A {0} request is already in progress")]
    OperationInProgress(AuthOperation),

    /// The account was created but signing in afterwards failed
    #[error("Account created but sign-in failed: {source}")]
    RegistrationIncomplete {
        #[source]
        source: Box<AuthError>,
    },
}

impl AuthError {
    /// Whether the backend rejected the session's credentials
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Client(err) => err.is_auth_expired(),
            Self::NotAuthenticated => true,
            Self::RegistrationIncomplete { source } => source.is_auth_expired(),
            Self::Storage(_) | Self::OperationInProgress(_) => false,
        }
    }

    /// Message shown in an error banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) => err.message(),
            Self::Storage(_) => "Could not access saved session".to_string(),
            Self::NotAuthenticated => "Please sign in to continue".to_string(),
            Self::OperationInProgress(op) => format!("Please wait, {op} is still in progress"),
            Self::RegistrationIncomplete { source } => format!(
                "Your account was created, but signing in failed: {}",
                source.user_message()
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
