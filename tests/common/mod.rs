//! Shared fixtures: a tournament in progress with one started match between two players.

#![allow(dead_code)]

use chrono::NaiveDate;
use tennis_tournament_web::logic::{accounts, matches, tournaments};
use tennis_tournament_web::{
    Match, NewMatch, NewTournament, NewUser, Role, Round, SetScore, Store, Tournament, User,
};

pub struct World {
    pub store: Store,
    pub organizer: User,
    pub referee: User,
    pub player1: User,
    pub player2: User,
    pub spectator: User,
    pub tournament: Tournament,
    pub game: Match,
}

pub fn register(store: &mut Store, name: &str, role: Role) -> User {
    accounts::register_user(
        store,
        NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            role,
            ..NewUser::default()
        },
    )
    .unwrap()
}

pub fn new_tournament(name: &str) -> NewTournament {
    NewTournament {
        name: name.to_string(),
        description: String::new(),
        start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 7).unwrap(),
        location: "Test City".to_string(),
        max_players: None,
    }
}

pub fn new_match(tournament: &Tournament, round: Round) -> NewMatch {
    NewMatch {
        tournament_id: tournament.id,
        player1: None,
        player2: None,
        referee: None,
        scheduled_time: None,
        court: String::new(),
        round,
    }
}

pub fn sets(pairs: &[(u32, u32)]) -> Vec<SetScore> {
    pairs.iter().map(|&(a, b)| SetScore::new(a, b)).collect()
}

impl World {
    /// Tournament in progress, players enrolled, one R32 match in progress.
    pub fn new() -> Self {
        Self::with_round(Round::R32)
    }

    pub fn with_round(round: Round) -> Self {
        let mut store = Store::new();
        let organizer = register(&mut store, "organizer", Role::Organizer);
        let referee = register(&mut store, "referee", Role::Referee);
        let player1 = register(&mut store, "player1", Role::Player);
        let player2 = register(&mut store, "player2", Role::Player);
        let spectator = register(&mut store, "spectator", Role::Spectator);

        let t = tournaments::create_tournament(&mut store, new_tournament("Open"), &organizer)
            .unwrap();
        tournaments::open_registration(&mut store, t.id, &organizer).unwrap();
        tournaments::add_player(&mut store, t.id, player1.id, &organizer).unwrap();
        tournaments::add_player(&mut store, t.id, player2.id, &organizer).unwrap();
        tournaments::add_referee(&mut store, t.id, referee.id, &organizer).unwrap();
        let tournament = tournaments::start_tournament(&mut store, t.id, &organizer).unwrap();

        let game =
            start_match(&mut store, &tournament, round, &organizer, &player1, &player2, &referee);

        Self {
            store,
            organizer,
            referee,
            player1,
            player2,
            spectator,
            tournament,
            game,
        }
    }

    /// Current copy of the fixture match.
    pub fn game(&self) -> Match {
        self.store.matches.get(self.game.id).unwrap().clone()
    }

    /// Another enrolled player. Only possible before the tournament starts, so this
    /// bypasses the lifecycle check by enrolling directly.
    pub fn enroll_extra_player(&mut self, name: &str) -> User {
        let user = register(&mut self.store, name, Role::Player);
        self.store
            .tournaments
            .get_mut(self.tournament.id)
            .unwrap()
            .players
            .push(user.id);
        user
    }
}

/// Create, assign and start a match.
pub fn start_match(
    store: &mut Store,
    tournament: &Tournament,
    round: Round,
    organizer: &User,
    player1: &User,
    player2: &User,
    referee: &User,
) -> Match {
    let game = matches::create_match(store, new_match(tournament, round), organizer).unwrap();
    matches::assign_players(store, game.id, player1.id, player2.id, organizer).unwrap();
    matches::assign_referee(store, game.id, referee.id, organizer).unwrap();
    matches::start_match(store, game.id, organizer).unwrap()
}
