//! Raiser HTTP module providing wire types and typed API clients
//!
//! The clients wrap `reqwest` and split public endpoints from endpoints that
//! need a bearer token, so a missing access token is a type error rather than
//! a 401 at runtime.

pub mod client;
pub mod types;

pub use client::{
    AuthenticatedRaiserClient, ClientError, DEFAULT_TIMEOUT, PublicRaiserClient,
    TypedClientBuilder,
};
