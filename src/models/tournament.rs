//! Tournament and TournamentStatus.

use crate::models::user::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Default cap on enrolled players.
pub const DEFAULT_MAX_PLAYERS: u32 = 32;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Being set up by the organizer.
    #[default]
    Draft,
    /// Players may be enrolled.
    Registration,
    InProgress,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    /// Players can only be enrolled before the tournament starts.
    pub fn accepts_players(self) -> bool {
        matches!(self, TournamentStatus::Draft | TournamentStatus::Registration)
    }
}

/// A tennis tournament: dates, location, enrolled players and assigned referees.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub status: TournamentStatus,
    pub max_players: u32,
    /// Organizer who created it.
    pub created_by: UserId,
    /// Enrolled players, in enrollment order.
    pub players: Vec<UserId>,
    pub referees: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Draft with no players or referees.
    pub fn new(details: NewTournament, created_by: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: details.name,
            description: details.description,
            start_date: details.start_date,
            end_date: details.end_date,
            location: details.location,
            status: TournamentStatus::Draft,
            max_players: details.max_players.unwrap_or(DEFAULT_MAX_PLAYERS),
            created_by,
            players: Vec::new(),
            referees: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_player(&self, id: UserId) -> bool {
        self.players.contains(&id)
    }

    pub fn has_referee(&self, id: UserId) -> bool {
        self.referees.contains(&id)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players as usize
    }
}

/// Input for creating a tournament.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    #[serde(default)]
    pub max_players: Option<u32>,
}

/// Partial update of a tournament's details. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TournamentChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub max_players: Option<u32>,
}
