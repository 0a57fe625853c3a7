//! Tournament lifecycle: Draft -> Registration -> InProgress -> Completed (or Cancelled),
//! plus player enrollment and referee assignment.

use crate::logic::rankings;
use crate::models::{
    Match, NewTournament, Role, TennisError, Tournament, TournamentChanges, TournamentId,
    TournamentStatus, User, UserId,
};
use crate::store::Store;

/// Fewest enrolled players needed to start.
pub const MIN_PLAYERS_TO_START: usize = 2;

fn require_organizer(actor: &User, action: &str) -> Result<(), TennisError> {
    match actor.role() {
        Role::Organizer => Ok(()),
        Role::Referee | Role::Player | Role::Spectator => Err(TennisError::permission_denied(
            format!("Only organizers can {action}."),
        )),
    }
}

/// Create a tournament in Draft, owned by the acting organizer.
pub fn create_tournament(
    store: &mut Store,
    details: NewTournament,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "create tournaments")?;
    if details.name.trim().is_empty() {
        return Err(TennisError::validation("Tournament name is required."));
    }
    if details.end_date < details.start_date {
        return Err(TennisError::validation("End date cannot be before start date."));
    }
    let tournament = store.tournaments.insert(Tournament::new(details, actor.id));
    log::info!("Tournament {} created by {}", tournament.id, actor.username);
    Ok(tournament)
}

pub fn get_tournament(store: &Store, id: TournamentId) -> Result<Tournament, TennisError> {
    store.tournaments.get(id).cloned()
}

/// Change a tournament's details. Not allowed once Completed or Cancelled.
pub fn update_tournament(
    store: &mut Store,
    id: TournamentId,
    changes: TournamentChanges,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "update tournaments")?;
    let mut t = store.tournaments.get(id)?.clone();
    if matches!(
        t.status,
        TournamentStatus::Completed | TournamentStatus::Cancelled
    ) {
        return Err(TennisError::invalid_state(
            "Cannot update completed or cancelled tournament.",
        ));
    }

    if let Some(name) = changes.name {
        t.name = name;
    }
    if let Some(description) = changes.description {
        t.description = description;
    }
    if let Some(start) = changes.start_date {
        t.start_date = start;
    }
    if let Some(end) = changes.end_date {
        t.end_date = end;
    }
    if let Some(location) = changes.location {
        t.location = location;
    }
    if let Some(max) = changes.max_players {
        if (max as usize) < t.players.len() {
            return Err(TennisError::validation(
                "Max players cannot be below the number of enrolled players.",
            ));
        }
        t.max_players = max;
    }
    if t.end_date < t.start_date {
        return Err(TennisError::validation("End date cannot be before start date."));
    }

    store.tournaments.save(t.clone());
    Ok(t)
}

/// Delete a tournament that is not in progress, with its matches, scores, disputes,
/// evidence and rankings.
pub fn delete_tournament(
    store: &mut Store,
    id: TournamentId,
    actor: &User,
) -> Result<(), TennisError> {
    require_organizer(actor, "delete tournaments")?;
    store.transaction(|tx| {
        if tx.tournaments.get(id)?.status == TournamentStatus::InProgress {
            return Err(TennisError::invalid_state("Cannot delete tournament in progress."));
        }

        let match_ids: Vec<_> = tx
            .matches
            .filter(|m| m.tournament_id == id)
            .into_iter()
            .map(|m| m.id)
            .collect();
        let dispute_ids: Vec<_> = tx
            .disputes
            .filter(|d| match_ids.contains(&d.match_id))
            .into_iter()
            .map(|d| d.id)
            .collect();
        let files: Vec<String> = tx
            .evidence
            .filter(|e| dispute_ids.contains(&e.dispute_id))
            .into_iter()
            .filter_map(|e| e.file.clone())
            .collect();
        for file in &files {
            tx.remove_evidence_file(file);
        }

        tx.evidence.retain(|e| !dispute_ids.contains(&e.dispute_id));
        tx.disputes.retain(|d| !match_ids.contains(&d.match_id));
        tx.scores.retain(|s| !match_ids.contains(&s.match_id));
        tx.matches.retain(|m| m.tournament_id != id);
        tx.rankings.retain(|r| r.tournament_id != id);
        tx.tournaments.delete(id)?;
        Ok(())
    })?;
    log::info!("Tournament {} deleted", id);
    Ok(())
}

/// Enroll a player while the tournament is in Draft or Registration and not full.
pub fn add_player(
    store: &mut Store,
    id: TournamentId,
    player_id: UserId,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "add players")?;
    let mut t = store.tournaments.get(id)?.clone();
    if !t.status.accepts_players() {
        return Err(TennisError::invalid_state(
            "Cannot add players after registration closes.",
        ));
    }
    let is_player = store
        .users
        .find(player_id)
        .map_or(false, |u| u.role() == Role::Player);
    if !is_player {
        return Err(TennisError::not_found("Player not found."));
    }
    if t.is_full() {
        return Err(TennisError::validation("Tournament is full."));
    }
    if t.has_player(player_id) {
        return Err(TennisError::validation("Player already in tournament."));
    }

    t.players.push(player_id);
    store.tournaments.save(t.clone());
    Ok(t)
}

/// Withdraw a player. Not allowed while the tournament is in progress.
pub fn remove_player(
    store: &mut Store,
    id: TournamentId,
    player_id: UserId,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "remove players")?;
    let t = store.tournaments.get_mut(id)?;
    if t.status == TournamentStatus::InProgress {
        return Err(TennisError::invalid_state(
            "Cannot remove players from tournament in progress.",
        ));
    }
    t.players.retain(|&p| p != player_id);
    Ok(t.clone())
}

/// Assign a referee to the tournament.
pub fn add_referee(
    store: &mut Store,
    id: TournamentId,
    referee_id: UserId,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "add referees")?;
    let is_referee = store
        .users
        .find(referee_id)
        .map_or(false, |u| u.role() == Role::Referee);
    if !is_referee {
        return Err(TennisError::not_found("Referee not found."));
    }
    let t = store.tournaments.get_mut(id)?;
    if t.has_referee(referee_id) {
        return Err(TennisError::validation("Referee already in tournament."));
    }
    t.referees.push(referee_id);
    Ok(t.clone())
}

/// Draft -> Registration.
pub fn open_registration(
    store: &mut Store,
    id: TournamentId,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "open registration")?;
    let t = store.tournaments.get_mut(id)?;
    if t.status != TournamentStatus::Draft {
        return Err(TennisError::invalid_state(
            "Can only open registration for draft tournaments.",
        ));
    }
    t.status = TournamentStatus::Registration;
    Ok(t.clone())
}

/// Registration -> InProgress, with at least two enrolled players.
pub fn start_tournament(
    store: &mut Store,
    id: TournamentId,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "start tournaments")?;
    let t = store.tournaments.get_mut(id)?;
    if t.status != TournamentStatus::Registration {
        return Err(TennisError::invalid_state(
            "Tournament must be in registration to start.",
        ));
    }
    if t.players.len() < MIN_PLAYERS_TO_START {
        return Err(TennisError::validation(
            "Tournament needs at least 2 players to start.",
        ));
    }
    t.status = TournamentStatus::InProgress;
    log::info!("Tournament {} started with {} players", t.id, t.players.len());
    Ok(t.clone())
}

/// Mark the tournament Completed and finalize its rankings (winner bonus, global standings).
pub fn complete_tournament(
    store: &mut Store,
    id: TournamentId,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "complete tournaments")?;
    store.transaction(|tx| {
        let t = tx.tournaments.get_mut(id)?;
        if matches!(
            t.status,
            TournamentStatus::Completed | TournamentStatus::Cancelled
        ) {
            return Err(TennisError::invalid_state(
                "Tournament is already completed or cancelled.",
            ));
        }
        t.status = TournamentStatus::Completed;
        rankings::finalize_tournament_rankings(tx, id)?;
        tx.tournaments.get(id).cloned()
    })
}

/// Cancel a tournament that has not completed.
pub fn cancel_tournament(
    store: &mut Store,
    id: TournamentId,
    actor: &User,
) -> Result<Tournament, TennisError> {
    require_organizer(actor, "cancel tournaments")?;
    let t = store.tournaments.get_mut(id)?;
    if matches!(
        t.status,
        TournamentStatus::Completed | TournamentStatus::Cancelled
    ) {
        return Err(TennisError::invalid_state(
            "Tournament is already completed or cancelled.",
        ));
    }
    t.status = TournamentStatus::Cancelled;
    Ok(t.clone())
}

/// Tournaments relevant to a user: created (organizers), enrolled (players), assigned
/// (referees), or open/running (spectators).
pub fn get_user_tournaments(store: &Store, actor: &User) -> Vec<Tournament> {
    let mine = match actor.role() {
        Role::Organizer => store.tournaments.filter(|t| t.created_by == actor.id),
        Role::Player => store.tournaments.filter(|t| t.has_player(actor.id)),
        Role::Referee => store.tournaments.filter(|t| t.has_referee(actor.id)),
        Role::Spectator => store.tournaments.filter(|t| {
            matches!(
                t.status,
                TournamentStatus::Registration | TournamentStatus::InProgress
            )
        }),
    };
    mine.into_iter().cloned().collect()
}

/// All matches of a tournament.
pub fn get_tournament_matches(
    store: &Store,
    id: TournamentId,
) -> Result<Vec<Match>, TennisError> {
    store.tournaments.get(id)?;
    Ok(store
        .matches
        .filter(|m| m.tournament_id == id)
        .into_iter()
        .cloned()
        .collect())
}
