//! Disputes: raising, evidence, review and resolution.

use crate::logic::matches::finalize_match;
use crate::models::{
    Dispute, DisputeId, DisputeStatus, Evidence, EvidenceUpload, MatchId, MatchStatus, Role,
    ScoreId, TennisError, User, UserId,
};
use crate::store::Store;

/// Raise a dispute on a match. Only its players may do so, and only while no other dispute
/// on the match is active. The match becomes Disputed.
pub fn create_dispute(
    store: &mut Store,
    match_id: MatchId,
    reason: impl Into<String>,
    actor: &User,
) -> Result<Dispute, TennisError> {
    let reason = reason.into();
    store.transaction(|tx| {
        let game = tx.matches.get(match_id)?;

        let is_participant = match actor.role() {
            Role::Player => game.has_player(actor.id),
            Role::Organizer | Role::Referee | Role::Spectator => false,
        };
        if !is_participant {
            return Err(TennisError::permission_denied(
                "Only players in this match can raise disputes.",
            ));
        }

        if tx
            .disputes
            .any(|d| d.match_id == match_id && d.status.is_active())
        {
            return Err(TennisError::dispute(
                "There is already an open dispute for this match.",
            ));
        }

        tx.matches.get_mut(match_id)?.status = MatchStatus::Disputed;
        let dispute = tx.disputes.insert(Dispute::new(match_id, actor.id, reason));
        log::info!("Dispute {} raised on match {}", dispute.id, match_id);
        Ok(dispute)
    })
}

/// Attach evidence to an unresolved dispute.
///
/// Allowed for the match's players, its assigned referee, and any organizer. An attached
/// file is handed to evidence storage and referenced from the evidence row.
pub fn add_evidence(
    store: &mut Store,
    dispute_id: DisputeId,
    file: Option<EvidenceUpload>,
    description: impl Into<String>,
    actor: &User,
) -> Result<Evidence, TennisError> {
    let description = description.into();
    store.transaction(|tx| {
        let dispute = tx.disputes.get(dispute_id)?;
        if dispute.status == DisputeStatus::Resolved {
            return Err(TennisError::invalid_state(
                "Cannot add evidence to resolved dispute.",
            ));
        }
        let game = tx.matches.get(dispute.match_id)?;

        match actor.role() {
            Role::Player => {
                if !game.has_player(actor.id) {
                    return Err(TennisError::permission_denied(
                        "You are not a player in this match.",
                    ));
                }
            }
            Role::Referee => {
                if !game.is_refereed_by(actor.id) {
                    return Err(TennisError::permission_denied(
                        "You are not the referee for this match.",
                    ));
                }
            }
            Role::Organizer => {}
            Role::Spectator => {
                return Err(TennisError::permission_denied(
                    "Only involved parties can submit evidence.",
                ))
            }
        }

        let file = file.map(|upload| tx.put_evidence_file(dispute_id, upload));
        Ok(tx
            .evidence
            .insert(Evidence::new(dispute_id, actor.id, file, description)))
    })
}

/// Move an active dispute to UnderReview. Referees and organizers only.
pub fn mark_under_review(
    store: &mut Store,
    dispute_id: DisputeId,
    actor: &User,
) -> Result<Dispute, TennisError> {
    require_reviewer(actor, "review")?;

    let dispute = store.disputes.get_mut(dispute_id)?;
    if dispute.status == DisputeStatus::Resolved {
        return Err(TennisError::invalid_state("Dispute is already resolved."));
    }
    dispute.status = DisputeStatus::UnderReview;
    Ok(dispute.clone())
}

/// Resolve a dispute and finalize its match with the decided winner.
///
/// An explicit `winner` (which must play in the match) takes priority over the winner of
/// `final_score` (which must belong to the match). With neither, the match completes with
/// no winner. Dispute and match are updated together or not at all.
pub fn resolve_dispute(
    store: &mut Store,
    dispute_id: DisputeId,
    notes: impl Into<String>,
    actor: &User,
    final_score: Option<ScoreId>,
    winner: Option<UserId>,
) -> Result<Dispute, TennisError> {
    let notes = notes.into();
    require_reviewer(actor, "resolve")?;

    let dispute = store.transaction(|tx| {
        let mut dispute = tx.disputes.get(dispute_id)?.clone();
        let game = tx.matches.get(dispute.match_id)?.clone();

        match actor.role() {
            Role::Referee if !game.is_refereed_by(actor.id) => {
                return Err(TennisError::permission_denied(
                    "You are not the referee for this match.",
                ));
            }
            Role::Referee | Role::Organizer | Role::Player | Role::Spectator => {}
        }
        if dispute.status == DisputeStatus::Resolved {
            return Err(TennisError::invalid_state("Dispute is already resolved."));
        }

        let accepted = match final_score {
            Some(id) => Some(
                tx.scores
                    .first(|s| s.id == id && s.match_id == game.id)
                    .ok_or_else(|| TennisError::not_found("Final score not found."))?
                    .clone(),
            ),
            None => None,
        };

        let decided = match winner {
            Some(id) => {
                if !tx.users.contains(id) {
                    return Err(TennisError::not_found("Winner not found."));
                }
                if !game.has_player(id) {
                    return Err(TennisError::validation(
                        "Winner must be a player in the match.",
                    ));
                }
                Some(id)
            }
            None => accepted.as_ref().and_then(|s| s.winner),
        };

        dispute.status = DisputeStatus::Resolved;
        dispute.resolved_by = Some(actor.id);
        dispute.resolution_notes = notes;
        dispute.resolved_at = Some(chrono::Utc::now());
        dispute.final_score = accepted.map(|s| s.id);
        tx.disputes.save(dispute.clone());

        finalize_match(tx, game.id, decided)?;
        Ok(dispute)
    })?;

    log::info!("Dispute {} resolved by {}", dispute.id, actor.username);
    Ok(dispute)
}

fn require_reviewer(actor: &User, action: &str) -> Result<(), TennisError> {
    match actor.role() {
        Role::Referee | Role::Organizer => Ok(()),
        Role::Player | Role::Spectator => Err(TennisError::permission_denied(format!(
            "Only referees and organizers can {action} disputes."
        ))),
    }
}

pub fn get_dispute(store: &Store, dispute_id: DisputeId) -> Result<Dispute, TennisError> {
    store.disputes.get(dispute_id).cloned()
}

/// Disputes that are Open or UnderReview.
pub fn get_open_disputes(store: &Store) -> Vec<Dispute> {
    store
        .disputes
        .filter(|d| d.status.is_active())
        .into_iter()
        .cloned()
        .collect()
}

/// Evidence attached to a dispute, oldest first.
pub fn get_dispute_evidence(
    store: &Store,
    dispute_id: DisputeId,
) -> Result<Vec<Evidence>, TennisError> {
    store.disputes.get(dispute_id)?;
    Ok(store
        .evidence
        .filter(|e| e.dispute_id == dispute_id)
        .into_iter()
        .cloned()
        .collect())
}
