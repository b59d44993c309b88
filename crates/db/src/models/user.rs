//! User entity model and DTOs. A user row is also the public profile.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sv_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`Profile`] or [`PublicProfile`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The signed-in user's own profile.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
}

/// What other users can see.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: DbId,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<User> for Profile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            bio: u.bio,
            avatar_url: u.avatar_url,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

impl From<User> for PublicProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            display_name: u.display_name,
            bio: u.bio,
            avatar_url: u.avatar_url,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    /// Defaults to `user` if omitted.
    pub role: Option<String>,
}

/// DTO for profile edits. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}
