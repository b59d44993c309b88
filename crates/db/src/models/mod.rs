//! Row models and DTOs, one module per table group.

pub mod bill;
pub mod comment;
pub mod email_log;
pub mod event;
pub mod participant;
pub mod registration;
pub mod session;
pub mod ticket;
pub mod user;
