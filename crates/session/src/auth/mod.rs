//! Authentication module

pub mod context;

pub use context::{AuthAction, AuthContext, AuthContextData};
