//! Request extractors for authentication.
//!
//! - [`auth::AuthUser`] -- requires a valid Bearer token.
//! - [`auth::MaybeAuthUser`] -- accepts anonymous requests, still rejects bad tokens.

pub mod auth;
