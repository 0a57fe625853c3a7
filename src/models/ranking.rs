//! Per-tournament and global standings, and head-to-head summaries.

use crate::models::game::{MatchId, Round};
use crate::models::tournament::TournamentId;
use crate::models::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a ranking row.
pub type RankingId = Uuid;

/// A player's accumulated standing within one tournament. Unique per (player, tournament).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub id: RankingId,
    pub player: UserId,
    pub tournament_id: TournamentId,
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    /// 1-based; 0 until positions are first calculated.
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl Ranking {
    pub fn new(player: UserId, tournament_id: TournamentId) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            tournament_id,
            points: 0,
            wins: 0,
            losses: 0,
            sets_won: 0,
            sets_lost: 0,
            games_won: 0,
            games_lost: 0,
            position: 0,
            created_at: Utc::now(),
        }
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Percentage of matches won, 0.0 when none played.
    pub fn win_percentage(&self) -> f64 {
        match self.matches_played() {
            0 => 0.0,
            played => f64::from(self.wins) / f64::from(played) * 100.0,
        }
    }

    /// Zero every accumulated counter (position is kept until recalculated).
    pub fn reset_stats(&mut self) {
        self.points = 0;
        self.wins = 0;
        self.losses = 0;
        self.sets_won = 0;
        self.sets_lost = 0;
        self.games_won = 0;
        self.games_lost = 0;
    }
}

/// A player's standing across all tournaments. Unique per player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GlobalRanking {
    pub id: RankingId,
    pub player: UserId,
    pub total_points: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub tournaments_played: u32,
    pub tournaments_won: u32,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl GlobalRanking {
    pub fn new(player: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            total_points: 0,
            total_wins: 0,
            total_losses: 0,
            tournaments_played: 0,
            tournaments_won: 0,
            position: 0,
            created_at: Utc::now(),
        }
    }
}

/// One completed match in a head-to-head listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HeadToHeadMatch {
    pub id: MatchId,
    pub tournament_name: String,
    pub round: Round,
    pub winner: Option<UserId>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Record between two players across all completed matches.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HeadToHead {
    pub player1_id: UserId,
    pub player2_id: UserId,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub total_matches: u32,
    /// Most recent first.
    pub matches: Vec<HeadToHeadMatch>,
}
