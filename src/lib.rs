//! Tennis tournament web app: library with models, business rules, store and HTTP API.

pub mod config;
pub mod http;
pub mod logic;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use logic::{
    add_evidence, confirm_score, create_dispute, delete_score, determine_match_winner,
    finalize_tournament_rankings, get_head_to_head, mark_under_review, parse_set_scores,
    recalculate_positions, resolve_dispute, submit_score, update_global_ranking,
    update_ranking_after_match, update_score, validate_set_scores, WINNER_BONUS,
};
pub use models::{
    Dispute, DisputeId, DisputeStatus, Evidence, EvidenceId, EvidenceUpload, GlobalRanking,
    HeadToHead, HeadToHeadMatch, Match, MatchId, MatchStatus, NewMatch, NewTournament, NewUser,
    Ranking, Role, Round, Score, ScoreId, SetScore, Side, TennisError, Tournament,
    TournamentChanges, TournamentId, TournamentStatus, User, UserId,
};
pub use store::Store;
