pub mod auth;
pub mod bill;
pub mod comment;
pub mod email;
pub mod event;
pub mod participant;
pub mod profile;
pub mod registration;
pub mod ticket;
