//! Score submissions and per-set results.

use crate::models::game::MatchId;
use crate::models::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a score submission.
pub type ScoreId = Uuid;

/// Games won by each slot in one set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub player1: u32,
    pub player2: u32,
}

impl SetScore {
    pub fn new(player1: u32, player2: u32) -> Self {
        Self { player1, player2 }
    }
}

/// One user's submission of a match result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: ScoreId,
    pub match_id: MatchId,
    pub submitted_by: UserId,
    pub set_scores: Vec<SetScore>,
    /// Derived from `set_scores`; None when no side reached the set majority.
    pub winner: Option<UserId>,
    pub is_confirmed: bool,
    pub confirmed_by: Option<UserId>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Score {
    pub fn new(
        match_id: MatchId,
        submitted_by: UserId,
        set_scores: Vec<SetScore>,
        winner: Option<UserId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            submitted_by,
            set_scores,
            winner,
            is_confirmed: false,
            confirmed_by: None,
            confirmed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark the score confirmed by `user` now.
    pub fn confirm(&mut self, user: UserId) {
        self.is_confirmed = true;
        self.confirmed_by = Some(user);
        self.confirmed_at = Some(Utc::now());
    }
}
