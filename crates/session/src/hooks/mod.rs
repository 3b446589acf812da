//! Session helpers invoked around authenticated calls

pub mod token_refresh;

pub use token_refresh::TokenRefresher;
