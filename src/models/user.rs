//! User and Role: the acting principal of every operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user (players, referees, organizers, spectators).
pub type UserId = Uuid;

/// What a user is allowed to do. Fixed at registration.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Organizer,
    Referee,
    Player,
    #[default]
    Spectator,
}

/// A registered user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    role: Role,
    pub phone: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            role,
            phone: String::new(),
            bio: String::new(),
            created_at: Utc::now(),
        }
    }

    /// The user's role. There is no setter: a role never changes after registration.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Registration data for a new user.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
}
