//! Tournament business logic: accounts, tournament and match lifecycle, scores, disputes,
//! rankings.

pub mod accounts;
pub mod disputes;
pub mod matches;
pub mod rankings;
pub mod scores;
pub mod tournaments;
pub mod validation;

pub use disputes::{add_evidence, create_dispute, mark_under_review, resolve_dispute};
pub use rankings::{
    finalize_tournament_rankings, get_head_to_head, recalculate_positions,
    update_global_ranking, update_ranking_after_match, WINNER_BONUS,
};
pub use scores::{confirm_score, delete_score, submit_score, update_score};
pub use validation::{determine_match_winner, parse_set_scores, validate_set_scores};
