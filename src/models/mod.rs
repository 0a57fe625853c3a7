//! Data structures for the tennis tournament: users, tournaments, matches, scores,
//! disputes and rankings.

mod dispute;
mod error;
mod game;
mod ranking;
mod score;
mod tournament;
mod user;

pub use dispute::{Dispute, DisputeId, DisputeStatus, Evidence, EvidenceId, EvidenceUpload};
pub use error::TennisError;
pub use game::{Match, MatchId, MatchStatus, NewMatch, Round, Side};
pub use ranking::{GlobalRanking, HeadToHead, HeadToHeadMatch, Ranking, RankingId};
pub use score::{Score, ScoreId, SetScore};
pub use tournament::{
    NewTournament, Tournament, TournamentChanges, TournamentId, TournamentStatus,
    DEFAULT_MAX_PLAYERS,
};
pub use user::{NewUser, Role, User, UserId};
