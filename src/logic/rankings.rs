//! Ranking engine: round points, tournament positions, global standings, head-to-head.

use crate::models::{
    GlobalRanking, HeadToHead, HeadToHeadMatch, Match, MatchStatus, Ranking, Round,
    TennisError, TournamentId, TournamentStatus, UserId,
};
use crate::store::Store;
use std::cmp::{Ordering, Reverse};

/// Flat bonus for the winner of a tournament's final.
pub const WINNER_BONUS: u32 = 500;

/// Points awarded to the winner of a match in `round`. The loser gets a quarter (rounded down).
pub fn round_points(round: Round) -> u32 {
    match round {
        Round::R128 => 10,
        Round::R64 => 25,
        Round::R32 => 50,
        Round::R16 => 100,
        Round::QF => 200,
        Round::SF => 400,
        Round::F => 800,
    }
}

/// Bring the standings of a match's tournament up to date with its result.
///
/// The tournament is recomputed from all its Completed matches, so feeding the same match
/// again never counts it twice. A match that is not Completed with a winner credits nothing.
pub fn update_ranking_after_match(store: &mut Store, game: &Match) -> Result<(), TennisError> {
    store.transaction(|tx| rebuild_tournament_rankings(tx, game.tournament_id))
}

/// Apply one match's points and set/game tallies.
fn credit_match(store: &mut Store, game: &Match) {
    if game.status != MatchStatus::Completed {
        return;
    }
    let Some(winner) = game.winner else {
        return;
    };
    let Some(loser) = game.opponent_of(winner) else {
        return;
    };

    let points = round_points(game.round);
    let mut winner_row = ranking_for(store, winner, game.tournament_id);
    let mut loser_row = ranking_for(store, loser, game.tournament_id);

    winner_row.wins += 1;
    winner_row.points += points;
    loser_row.losses += 1;
    loser_row.points += points / 4;

    // Newest confirmed submission wins if several exist.
    let confirmed = store
        .scores
        .filter(|s| s.match_id == game.id && s.is_confirmed)
        .last()
        .map(|s| s.set_scores.clone());
    if let Some(sets) = confirmed {
        let winner_is_player1 = game.player1 == Some(winner);
        for set in sets {
            let (winner_games, loser_games) = if winner_is_player1 {
                (set.player1, set.player2)
            } else {
                (set.player2, set.player1)
            };
            // A set goes to whoever has more games in it, not to the match winner.
            if winner_games > loser_games {
                winner_row.sets_won += 1;
                loser_row.sets_lost += 1;
            } else {
                winner_row.sets_lost += 1;
                loser_row.sets_won += 1;
            }
            winner_row.games_won += winner_games;
            winner_row.games_lost += loser_games;
            loser_row.games_won += loser_games;
            loser_row.games_lost += winner_games;
        }
    }

    store.rankings.save(winner_row);
    store.rankings.save(loser_row);
}

/// Copy of the (player, tournament) ranking, created and stored if missing.
fn ranking_for(store: &mut Store, player: UserId, tournament_id: TournamentId) -> Ranking {
    match store
        .rankings
        .first(|r| r.player == player && r.tournament_id == tournament_id)
    {
        Some(existing) => existing.clone(),
        None => store.rankings.insert(Ranking::new(player, tournament_id)),
    }
}

/// Order a tournament's rankings by points desc, wins desc, losses asc, sets won desc and
/// store the 1-based position. Further ties keep their existing order.
pub fn recalculate_positions(store: &mut Store, tournament_id: TournamentId) {
    let mut order: Vec<_> = store
        .rankings
        .filter(|r| r.tournament_id == tournament_id)
        .into_iter()
        .map(|r| (r.id, (Reverse(r.points), Reverse(r.wins), r.losses, Reverse(r.sets_won))))
        .collect();
    order.sort_by_key(|(_, key)| *key);

    for (i, (id, _)) in order.into_iter().enumerate() {
        if let Ok(row) = store.rankings.get_mut(id) {
            row.position = i as u32 + 1;
        }
    }
    log::debug!("Recalculated positions for tournament {}", tournament_id);
}

/// Award the final's winner the tournament bonus, reposition, and refresh the global
/// ranking of every player ranked in the tournament.
pub fn finalize_tournament_rankings(
    store: &mut Store,
    tournament_id: TournamentId,
) -> Result<(), TennisError> {
    store.tournaments.get(tournament_id)?;
    store.transaction(|tx| {
        apply_winner_bonus(tx, tournament_id);
        recalculate_positions(tx, tournament_id);
        refresh_global_rankings(tx, tournament_id);
        Ok(())
    })?;
    log::info!("Finalized rankings for tournament {}", tournament_id);
    Ok(())
}

fn apply_winner_bonus(store: &mut Store, tournament_id: TournamentId) {
    let champion = store
        .matches
        .first(|m| {
            m.tournament_id == tournament_id
                && m.round == Round::F
                && m.status == MatchStatus::Completed
        })
        .and_then(|m| m.winner);
    let Some(champion) = champion else {
        return;
    };
    if let Some(row) = store
        .rankings
        .iter_mut()
        .find(|r| r.player == champion && r.tournament_id == tournament_id)
    {
        row.points += WINNER_BONUS;
    }
}

fn refresh_global_rankings(store: &mut Store, tournament_id: TournamentId) {
    let players: Vec<UserId> = store
        .rankings
        .filter(|r| r.tournament_id == tournament_id)
        .into_iter()
        .map(|r| r.player)
        .collect();
    for player in players {
        recompute_global_ranking(store, player);
    }
    recalculate_global_positions(store);
}

/// Recompute a player's global ranking from all their tournament rankings.
pub fn update_global_ranking(store: &mut Store, player: UserId) -> Result<(), TennisError> {
    store.users.get(player)?;
    store.transaction(|tx| {
        recompute_global_ranking(tx, player);
        recalculate_global_positions(tx);
        Ok(())
    })
}

fn recompute_global_ranking(store: &mut Store, player: UserId) {
    let mut global = match store.global_rankings.first(|g| g.player == player) {
        Some(existing) => existing.clone(),
        None => GlobalRanking::new(player),
    };

    let rows = store.rankings.filter(|r| r.player == player);
    global.total_points = rows.iter().map(|r| r.points).sum();
    global.total_wins = rows.iter().map(|r| r.wins).sum();
    global.total_losses = rows.iter().map(|r| r.losses).sum();
    global.tournaments_played = rows.len() as u32;
    global.tournaments_won = rows.iter().filter(|r| r.position == 1).count() as u32;

    store.global_rankings.save(global);
}

/// Order global rankings by total points desc, total wins desc, total losses asc.
pub fn recalculate_global_positions(store: &mut Store) {
    let mut order: Vec<_> = store
        .global_rankings
        .iter()
        .map(|g| (g.id, (Reverse(g.total_points), Reverse(g.total_wins), g.total_losses)))
        .collect();
    order.sort_by_key(|(_, key)| *key);

    for (i, (id, _)) in order.into_iter().enumerate() {
        if let Ok(row) = store.global_rankings.get_mut(id) {
            row.position = i as u32 + 1;
        }
    }
}

/// Recompute a tournament's standings from scratch after a match result changed.
///
/// Every Completed match with a winner is credited again in creation order, so an
/// overturned result never counts twice. A Completed tournament also gets its winner
/// bonus and global rankings refreshed.
pub(crate) fn rebuild_tournament_rankings(
    store: &mut Store,
    tournament_id: TournamentId,
) -> Result<(), TennisError> {
    let completed = store.tournaments.get(tournament_id)?.status == TournamentStatus::Completed;

    for row in store
        .rankings
        .iter_mut()
        .filter(|r| r.tournament_id == tournament_id)
    {
        row.reset_stats();
    }

    let played: Vec<Match> = store
        .matches
        .filter(|m| m.tournament_id == tournament_id)
        .into_iter()
        .cloned()
        .collect();
    for game in &played {
        credit_match(store, game);
    }

    if completed {
        apply_winner_bonus(store, tournament_id);
    }
    recalculate_positions(store, tournament_id);
    if completed {
        refresh_global_rankings(store, tournament_id);
    }
    Ok(())
}

/// Create an empty ranking row for every enrolled player that lacks one.
pub fn initialize_tournament_rankings(
    store: &mut Store,
    tournament_id: TournamentId,
) -> Result<(), TennisError> {
    let players = store.tournaments.get(tournament_id)?.players.clone();
    for player in players {
        ranking_for(store, player, tournament_id);
    }
    Ok(())
}

/// A tournament's rankings by position.
pub fn get_tournament_leaderboard(store: &Store, tournament_id: TournamentId) -> Vec<Ranking> {
    let mut rows: Vec<Ranking> = store
        .rankings
        .filter(|r| r.tournament_id == tournament_id)
        .into_iter()
        .cloned()
        .collect();
    rows.sort_by_key(|r| r.position);
    rows
}

/// All global rankings by position.
pub fn get_global_leaderboard(store: &Store) -> Vec<GlobalRanking> {
    let mut rows: Vec<GlobalRanking> = store.global_rankings.iter().cloned().collect();
    rows.sort_by_key(|g| g.position);
    rows
}

/// A player's tournament rankings, most recently ended tournament first.
pub fn get_player_rankings(store: &Store, player: UserId) -> Vec<Ranking> {
    let mut rows: Vec<Ranking> = store
        .rankings
        .filter(|r| r.player == player)
        .into_iter()
        .cloned()
        .collect();
    rows.sort_by_key(|r| {
        Reverse(store.tournaments.find(r.tournament_id).map(|t| t.end_date))
    });
    rows
}

/// Record between two players over their Completed matches that have a winner.
///
/// Matches are listed by scheduled time (latest first, unscheduled last), then by
/// creation time, latest first.
pub fn get_head_to_head(
    store: &Store,
    player1: UserId,
    player2: UserId,
) -> Result<HeadToHead, TennisError> {
    store.users.get(player1)?;
    store.users.get(player2)?;

    let mut games: Vec<&Match> = store.matches.filter(|m| {
        m.status == MatchStatus::Completed && m.winner.is_some() && m.is_between(player1, player2)
    });
    games.sort_by(|a, b| compare_latest_first(a, b));

    let player1_wins = games.iter().filter(|m| m.winner == Some(player1)).count() as u32;
    let player2_wins = games.iter().filter(|m| m.winner == Some(player2)).count() as u32;

    let matches = games
        .iter()
        .map(|m| HeadToHeadMatch {
            id: m.id,
            tournament_name: store
                .tournaments
                .find(m.tournament_id)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            round: m.round,
            winner: m.winner,
            scheduled_time: m.scheduled_time,
            created_at: m.created_at,
        })
        .collect::<Vec<_>>();

    Ok(HeadToHead {
        player1_id: player1,
        player2_id: player2,
        player1_wins,
        player2_wins,
        total_matches: matches.len() as u32,
        matches,
    })
}

fn compare_latest_first(a: &Match, b: &Match) -> Ordering {
    let by_schedule = match (a.scheduled_time, b.scheduled_time) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_schedule.then_with(|| b.created_at.cmp(&a.created_at))
}
