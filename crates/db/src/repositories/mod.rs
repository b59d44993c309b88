//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod bill_participant_repo;
pub mod bill_repo;
pub mod comment_repo;
pub mod email_log_repo;
pub mod event_repo;
pub mod participant_repo;
pub mod registration_repo;
pub mod session_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use bill_participant_repo::BillParticipantRepo;
pub use bill_repo::{BillRepo, CompleteOutcome};
pub use comment_repo::CommentRepo;
pub use email_log_repo::EmailLogRepo;
pub use event_repo::EventRepo;
pub use participant_repo::ParticipantRepo;
pub use registration_repo::{ConfirmOutcome, RegistrationRepo};
pub use session_repo::SessionRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
