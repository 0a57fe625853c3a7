//! Match, Round, MatchStatus and Side for singles matches.

use crate::models::tournament::TournamentId;
use crate::models::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two slots of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player1,
    Player2,
}

/// Bracket stage of a match. Determines the points awarded.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Round {
    R128,
    R64,
    #[default]
    R32,
    R16,
    QF,
    SF,
    F,
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Disputed,
    Cancelled,
}

/// A singles match within a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// None until the organizer assigns players.
    pub player1: Option<UserId>,
    pub player2: Option<UserId>,
    pub referee: Option<UserId>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub court: String,
    pub round: Round,
    pub status: MatchStatus,
    /// Always one of `player1` / `player2` when set.
    pub winner: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn new(tournament_id: TournamentId, round: Round) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            player1: None,
            player2: None,
            referee: None,
            scheduled_time: None,
            court: String::new(),
            round,
            status: MatchStatus::Scheduled,
            winner: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the user plays in this match (either slot).
    pub fn has_player(&self, user: UserId) -> bool {
        self.player1 == Some(user) || self.player2 == Some(user)
    }

    /// Whether the user is this match's assigned referee.
    pub fn is_refereed_by(&self, user: UserId) -> bool {
        self.referee == Some(user)
    }

    pub fn players_assigned(&self) -> bool {
        self.player1.is_some() && self.player2.is_some()
    }

    /// The user occupying a slot.
    pub fn player_at(&self, side: Side) -> Option<UserId> {
        match side {
            Side::Player1 => self.player1,
            Side::Player2 => self.player2,
        }
    }

    /// The slot a participant occupies.
    pub fn side_of(&self, user: UserId) -> Option<Side> {
        if self.player1 == Some(user) {
            Some(Side::Player1)
        } else if self.player2 == Some(user) {
            Some(Side::Player2)
        } else {
            None
        }
    }

    /// The participant who is not `user`.
    pub fn opponent_of(&self, user: UserId) -> Option<UserId> {
        match self.side_of(user)? {
            Side::Player1 => self.player2,
            Side::Player2 => self.player1,
        }
    }

    /// Whether the match is between exactly these two players, in either slot order.
    pub fn is_between(&self, a: UserId, b: UserId) -> bool {
        (self.player1 == Some(a) && self.player2 == Some(b))
            || (self.player1 == Some(b) && self.player2 == Some(a))
    }

    /// Terminal transition shared by score confirmation and dispute resolution.
    pub fn finalize(&mut self, winner: Option<UserId>) {
        self.status = MatchStatus::Completed;
        self.winner = winner;
    }
}

/// Input for creating a match.
#[derive(Clone, Debug, Deserialize)]
pub struct NewMatch {
    pub tournament_id: TournamentId,
    #[serde(default)]
    pub player1: Option<UserId>,
    #[serde(default)]
    pub player2: Option<UserId>,
    #[serde(default)]
    pub referee: Option<UserId>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub court: String,
    #[serde(default)]
    pub round: Round,
}
