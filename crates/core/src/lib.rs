//! Domain types and pure business logic shared by the ShareEase and
//! Ventopia backends.
//!
//! Nothing in this crate touches the database or the network; handlers in
//! `sv-api` call into these functions before persisting anything.

pub mod bill;
pub mod error;
pub mod event_status;
pub mod money;
pub mod roles;
pub mod settlement;
pub mod split;
pub mod ticket;
pub mod types;
pub mod validation;
