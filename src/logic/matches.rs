//! Match lifecycle: creation, player/referee assignment, start, cancel and finalization.

use crate::logic::rankings;
use crate::models::{
    Match, MatchId, MatchStatus, NewMatch, Role, TennisError, TournamentStatus, User, UserId,
};
use crate::store::Store;

fn require_organizer(actor: &User, action: &str) -> Result<(), TennisError> {
    match actor.role() {
        Role::Organizer => Ok(()),
        Role::Referee | Role::Player | Role::Spectator => Err(TennisError::permission_denied(
            format!("Only organizers can {action}."),
        )),
    }
}

/// Create a Scheduled match in a tournament that is in Registration or InProgress.
pub fn create_match(store: &mut Store, new: NewMatch, actor: &User) -> Result<Match, TennisError> {
    require_organizer(actor, "create matches")?;

    let tournament = store.tournaments.get(new.tournament_id)?;
    if !matches!(
        tournament.status,
        TournamentStatus::Registration | TournamentStatus::InProgress
    ) {
        return Err(TennisError::invalid_state(
            "Cannot create matches for this tournament.",
        ));
    }

    let mut game = Match::new(new.tournament_id, new.round);
    game.player1 = new.player1;
    game.player2 = new.player2;
    game.referee = new.referee;
    game.scheduled_time = new.scheduled_time;
    game.court = new.court;
    Ok(store.matches.insert(game))
}

/// Assign both players. The match must be Scheduled and both must be enrolled Players.
pub fn assign_players(
    store: &mut Store,
    match_id: MatchId,
    player1: UserId,
    player2: UserId,
    actor: &User,
) -> Result<Match, TennisError> {
    require_organizer(actor, "assign players")?;

    let mut game = store.matches.get(match_id)?.clone();
    if game.status != MatchStatus::Scheduled {
        return Err(TennisError::invalid_state(
            "Can only assign players to scheduled matches.",
        ));
    }
    for id in [player1, player2] {
        let is_player = store
            .users
            .find(id)
            .map_or(false, |u| u.role() == Role::Player);
        if !is_player {
            return Err(TennisError::not_found("Player not found."));
        }
    }
    if player1 == player2 {
        return Err(TennisError::validation("A player cannot play against themselves."));
    }
    let tournament = store.tournaments.get(game.tournament_id)?;
    if !(tournament.has_player(player1) && tournament.has_player(player2)) {
        return Err(TennisError::validation(
            "Both players must be registered in the tournament.",
        ));
    }

    game.player1 = Some(player1);
    game.player2 = Some(player2);
    store.matches.save(game.clone());
    Ok(game)
}

/// Assign the match referee. The user must have the Referee role.
pub fn assign_referee(
    store: &mut Store,
    match_id: MatchId,
    referee: UserId,
    actor: &User,
) -> Result<Match, TennisError> {
    require_organizer(actor, "assign referees")?;

    let is_referee = store
        .users
        .find(referee)
        .map_or(false, |u| u.role() == Role::Referee);
    if !is_referee {
        return Err(TennisError::not_found("Referee not found."));
    }

    let game = store.matches.get_mut(match_id)?;
    game.referee = Some(referee);
    Ok(game.clone())
}

/// Scheduled -> InProgress. Organizers or the assigned referee; both players must be assigned.
pub fn start_match(
    store: &mut Store,
    match_id: MatchId,
    actor: &User,
) -> Result<Match, TennisError> {
    let game = store.matches.get_mut(match_id)?;

    let allowed = match actor.role() {
        Role::Organizer => true,
        Role::Referee => game.is_refereed_by(actor.id),
        Role::Player | Role::Spectator => false,
    };
    if !allowed {
        return Err(TennisError::permission_denied(
            "Only organizers or assigned referee can start match.",
        ));
    }
    if game.status != MatchStatus::Scheduled {
        return Err(TennisError::invalid_state("Match must be scheduled to start."));
    }
    if !game.players_assigned() {
        return Err(TennisError::validation(
            "Both players must be assigned to start match.",
        ));
    }

    game.status = MatchStatus::InProgress;
    log::info!("Match {} started", game.id);
    Ok(game.clone())
}

/// Cancel a match that has not been completed.
pub fn cancel_match(
    store: &mut Store,
    match_id: MatchId,
    actor: &User,
) -> Result<Match, TennisError> {
    require_organizer(actor, "cancel matches")?;

    let game = store.matches.get_mut(match_id)?;
    if matches!(game.status, MatchStatus::Completed | MatchStatus::Cancelled) {
        return Err(TennisError::invalid_state(
            "Cannot cancel a completed or cancelled match.",
        ));
    }
    game.status = MatchStatus::Cancelled;
    Ok(game.clone())
}

pub fn get_match(store: &Store, match_id: MatchId) -> Result<Match, TennisError> {
    store.matches.get(match_id).cloned()
}

/// Matches relevant to a user: refereed ones for referees, played ones for players.
pub fn get_user_matches(store: &Store, actor: &User) -> Vec<Match> {
    let mine: Vec<&Match> = match actor.role() {
        Role::Referee => store.matches.filter(|m| m.is_refereed_by(actor.id)),
        Role::Player => store.matches.filter(|m| m.has_player(actor.id)),
        Role::Organizer | Role::Spectator => Vec::new(),
    };
    mine.into_iter().cloned().collect()
}

/// Mark the match Completed with `winner` and rebuild its tournament's standings.
///
/// Shared by score confirmation and dispute resolution; call it inside the caller's
/// transaction.
pub(crate) fn finalize_match(
    store: &mut Store,
    match_id: MatchId,
    winner: Option<UserId>,
) -> Result<(), TennisError> {
    let game = store.matches.get_mut(match_id)?;
    game.finalize(winner);
    let game = game.clone();
    log::info!("Match {} completed, winner {:?}", match_id, winner);
    rankings::update_ranking_after_match(store, &game)
}
