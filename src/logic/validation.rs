//! Set-score validation and match winner determination. Pure functions.

use crate::models::{SetScore, Side, TennisError};
use serde_json::Value;

/// Fewest sets a submission may contain.
pub const MIN_SETS: usize = 2;
/// Most sets a submission may contain.
pub const MAX_SETS: usize = 5;

/// Parse raw JSON set scores (`[{"player1": 6, "player2": 4}, ...]`) and validate them.
///
/// Shape errors (not a list, entry not an object, missing key, non-integer or negative
/// value) name the offending 1-based set index.
pub fn parse_set_scores(raw: &Value) -> Result<Vec<SetScore>, TennisError> {
    let entries = raw
        .as_array()
        .ok_or_else(|| TennisError::validation("Set scores must be a list"))?;

    let mut sets = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let n = i + 1;
        let obj = entry
            .as_object()
            .ok_or_else(|| TennisError::validation(format!("Set {n} must be a dictionary")))?;
        let (Some(p1), Some(p2)) = (obj.get("player1"), obj.get("player2")) else {
            return Err(TennisError::validation(format!(
                "Set {n} must have 'player1' and 'player2' scores"
            )));
        };
        if !(is_integer(p1) && is_integer(p2)) {
            return Err(TennisError::validation(format!("Set {n} scores must be integers")));
        }
        let (Some(p1), Some(p2)) = (games(p1), games(p2)) else {
            return Err(TennisError::validation(format!("Set {n} scores cannot be negative")));
        };
        sets.push(SetScore::new(p1, p2));
    }

    validate_set_scores(&sets)?;
    Ok(sets)
}

fn is_integer(v: &Value) -> bool {
    v.is_i64() || v.is_u64()
}

fn games(v: &Value) -> Option<u32> {
    v.as_u64().and_then(|g| u32::try_from(g).ok())
}

/// Check every set against tennis set-winning rules, then the set count (2 to 5).
///
/// Per set: the winner has at least 6 games, no tie, a 6-game winner leaves the opponent
/// at 4 or fewer, and a 7-game winner leaves the opponent at 5 or 6.
pub fn validate_set_scores(sets: &[SetScore]) -> Result<(), TennisError> {
    for (i, set) in sets.iter().enumerate() {
        validate_set(i + 1, set)?;
    }
    if sets.len() < MIN_SETS || sets.len() > MAX_SETS {
        return Err(TennisError::validation(format!(
            "Match must have between {MIN_SETS} and {MAX_SETS} sets"
        )));
    }
    Ok(())
}

fn validate_set(n: usize, set: &SetScore) -> Result<(), TennisError> {
    let winner = set.player1.max(set.player2);
    let loser = set.player1.min(set.player2);

    if winner < 6 {
        return Err(TennisError::validation(format!(
            "Set {n}: Winner must have at least 6 games"
        )));
    }
    if set.player1 == set.player2 {
        return Err(TennisError::validation(format!("Set {n}: Scores cannot be equal")));
    }
    if winner == 6 && loser > 4 {
        return Err(TennisError::validation(format!(
            "Set {n}: Invalid score - 6 games requires opponent to have 4 or fewer"
        )));
    }
    if winner == 7 && !matches!(loser, 5 | 6) {
        return Err(TennisError::validation(format!(
            "Set {n}: 7 games requires opponent to have 5 or 6"
        )));
    }
    Ok(())
}

/// Sets needed to win: best of three for up to 3 sets, best of five otherwise.
pub fn sets_to_win(set_count: usize) -> usize {
    if set_count <= 3 {
        2
    } else {
        3
    }
}

/// Which slot won the match, or None if neither reached the set majority yet.
///
/// A set with equal games counts for player 2.
pub fn determine_match_winner(sets: &[SetScore]) -> Option<Side> {
    let player1_sets = sets.iter().filter(|s| s.player1 > s.player2).count();
    let player2_sets = sets.len() - player1_sets;
    let needed = sets_to_win(sets.len());

    if player1_sets >= needed {
        Some(Side::Player1)
    } else if player2_sets >= needed {
        Some(Side::Player2)
    } else {
        None
    }
}
