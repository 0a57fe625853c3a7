//! Score submission, confirmation, update and deletion.

use crate::logic::matches::finalize_match;
use crate::logic::rankings::update_ranking_after_match;
use crate::logic::validation::{determine_match_winner, validate_set_scores};
use crate::models::{
    Match, MatchId, MatchStatus, Role, Score, ScoreId, SetScore, TennisError, User, UserId,
};
use crate::store::Store;

/// Submit the result of a match.
///
/// Players must play in the match; referees must be its assigned referee. A referee's
/// submission is confirmed at once and finalizes the match. Each user may submit only
/// one score per match.
pub fn submit_score(
    store: &mut Store,
    match_id: MatchId,
    sets: Vec<SetScore>,
    actor: &User,
) -> Result<Score, TennisError> {
    store.transaction(|tx| {
        let game = tx.matches.get(match_id)?.clone();

        let auto_confirm = match actor.role() {
            Role::Player => {
                if !game.has_player(actor.id) {
                    return Err(TennisError::permission_denied(
                        "You are not a player in this match.",
                    ));
                }
                false
            }
            Role::Referee => {
                if !game.is_refereed_by(actor.id) {
                    return Err(TennisError::permission_denied(
                        "You are not the referee for this match.",
                    ));
                }
                true
            }
            Role::Organizer | Role::Spectator => {
                return Err(TennisError::permission_denied(
                    "Only players and referees can submit scores.",
                ))
            }
        };

        if !matches!(game.status, MatchStatus::InProgress | MatchStatus::Completed) {
            return Err(TennisError::invalid_state(
                "Match must be in progress or completed to submit score.",
            ));
        }

        validate_set_scores(&sets)?;

        if tx
            .scores
            .any(|s| s.match_id == match_id && s.submitted_by == actor.id)
        {
            return Err(TennisError::validation(
                "You have already submitted a score for this match.",
            ));
        }

        let winner = winner_of(&game, &sets);
        let mut score = Score::new(match_id, actor.id, sets, winner);
        if auto_confirm {
            score.confirm(actor.id);
        }
        let score = tx.scores.insert(score);

        if auto_confirm {
            finalize_match(tx, match_id, score.winner)?;
        }
        Ok(score)
    })
}

/// Confirm someone else's score submission, finalizing the match.
///
/// A player in the match may confirm the opponent's submission; the assigned referee may
/// confirm any submission for the match.
pub fn confirm_score(
    store: &mut Store,
    score_id: ScoreId,
    actor: &User,
) -> Result<Score, TennisError> {
    store.transaction(|tx| {
        let mut score = tx.scores.get(score_id)?.clone();
        let game = tx.matches.get(score.match_id)?.clone();

        match actor.role() {
            Role::Player => {
                if !game.has_player(actor.id) {
                    return Err(TennisError::permission_denied(
                        "You are not a player in this match.",
                    ));
                }
                if score.submitted_by == actor.id {
                    return Err(TennisError::validation("You cannot confirm your own score."));
                }
            }
            Role::Referee => {
                if !game.is_refereed_by(actor.id) {
                    return Err(TennisError::permission_denied(
                        "You are not the referee for this match.",
                    ));
                }
            }
            Role::Organizer | Role::Spectator => {
                return Err(TennisError::permission_denied(
                    "Only players and referees can confirm scores.",
                ))
            }
        }

        if score.is_confirmed {
            return Err(TennisError::validation("Score is already confirmed."));
        }

        score.confirm(actor.id);
        tx.scores.save(score.clone());
        finalize_match(tx, game.id, score.winner)?;
        Ok(score)
    })
}

/// Replace the sets of one's own unconfirmed submission.
pub fn update_score(
    store: &mut Store,
    score_id: ScoreId,
    sets: Vec<SetScore>,
    actor: &User,
) -> Result<Score, TennisError> {
    let mut score = store.scores.get(score_id)?.clone();

    if score.submitted_by != actor.id {
        return Err(TennisError::permission_denied(
            "You can only update your own score submission.",
        ));
    }
    if score.is_confirmed {
        return Err(TennisError::invalid_state("Cannot update confirmed score."));
    }

    validate_set_scores(&sets)?;

    let game = store.matches.get(score.match_id)?;
    score.winner = winner_of(game, &sets);
    score.set_scores = sets;
    store.scores.save(score.clone());
    Ok(score)
}

/// Delete a submission. Submitters may delete their own unconfirmed score; organizers may
/// delete any score, confirmed or not. Removing a confirmed score recomputes the standings
/// of its tournament.
pub fn delete_score(
    store: &mut Store,
    score_id: ScoreId,
    actor: &User,
) -> Result<(), TennisError> {
    store.transaction(|tx| {
        let score = tx.scores.get(score_id)?.clone();
        let is_organizer = match actor.role() {
            Role::Organizer => true,
            Role::Referee | Role::Player | Role::Spectator => false,
        };

        if score.submitted_by != actor.id && !is_organizer {
            return Err(TennisError::permission_denied(
                "You can only delete your own score submission.",
            ));
        }
        if score.is_confirmed && !is_organizer {
            return Err(TennisError::invalid_state("Cannot delete confirmed score."));
        }

        tx.scores.delete(score_id)?;
        for dispute in tx.disputes.iter_mut() {
            if dispute.final_score == Some(score_id) {
                dispute.final_score = None;
            }
        }
        if score.is_confirmed {
            let game = tx.matches.get(score.match_id)?.clone();
            update_ranking_after_match(tx, &game)?;
        }
        Ok(())
    })?;
    log::info!("Score {} deleted by {}", score_id, actor.username);
    Ok(())
}

/// All submissions for a match, newest first.
pub fn get_match_scores(store: &Store, match_id: MatchId) -> Result<Vec<Score>, TennisError> {
    store.matches.get(match_id)?;
    Ok(store
        .scores
        .filter(|s| s.match_id == match_id)
        .into_iter()
        .rev()
        .cloned()
        .collect())
}

fn winner_of(game: &Match, sets: &[SetScore]) -> Option<UserId> {
    determine_match_winner(sets).and_then(|side| game.player_at(side))
}
