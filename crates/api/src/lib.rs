//! ShareEase / Ventopia API server library.
//!
//! Exposes config, state, error handling, and the router builder so the
//! binary entrypoint and the integration tests share one middleware stack.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
