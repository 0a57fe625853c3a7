//! Disputes over match results and the evidence attached to them.

use crate::models::game::MatchId;
use crate::models::score::ScoreId;
use crate::models::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a dispute.
pub type DisputeId = Uuid;

/// Unique identifier for a piece of evidence.
pub type EvidenceId = Uuid;

/// Open -> UnderReview -> Resolved. Resolved is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    #[default]
    Open,
    UnderReview,
    Resolved,
}

impl DisputeStatus {
    /// Open and UnderReview disputes block new disputes on the same match.
    pub fn is_active(self) -> bool {
        matches!(self, DisputeStatus::Open | DisputeStatus::UnderReview)
    }
}

/// A contested match result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub match_id: MatchId,
    pub raised_by: UserId,
    pub reason: String,
    pub status: DisputeStatus,
    pub resolved_by: Option<UserId>,
    pub resolution_notes: String,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Score accepted as authoritative on resolution (same match).
    pub final_score: Option<ScoreId>,
    pub created_at: DateTime<Utc>,
}

impl Dispute {
    pub fn new(match_id: MatchId, raised_by: UserId, reason: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            raised_by,
            reason: reason.into(),
            status: DisputeStatus::Open,
            resolved_by: None,
            resolution_notes: String::new(),
            resolved_at: None,
            final_score: None,
            created_at: Utc::now(),
        }
    }
}

/// Supporting material for a dispute.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub dispute_id: DisputeId,
    pub submitted_by: UserId,
    /// Reference returned by the evidence file storage, if a file was attached.
    pub file: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new(
        dispute_id: DisputeId,
        submitted_by: UserId,
        file: Option<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            dispute_id,
            submitted_by,
            file,
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

/// An uploaded evidence file. The core never looks inside `bytes`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct EvidenceUpload {
    pub filename: String,
    #[serde(default)]
    pub bytes: Vec<u8>,
}
