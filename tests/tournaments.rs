//! Integration tests for accounts and the tournament and match lifecycles.

mod common;

use common::{new_match, new_tournament, register, sets, World};
use tennis_tournament_web::logic::{accounts, matches, tournaments};
use tennis_tournament_web::{
    add_evidence, create_dispute, submit_score, EvidenceUpload, MatchStatus, NewUser, Role,
    Round, Store, TennisError, TournamentChanges, TournamentStatus,
};

#[test]
fn registration_rejects_duplicates_and_bad_email() {
    let mut store = Store::new();
    register(&mut store, "ana", Role::Player);

    let dup_name = NewUser {
        username: "ANA".to_string(),
        email: "other@example.com".to_string(),
        ..NewUser::default()
    };
    assert_eq!(
        accounts::register_user(&mut store, dup_name).unwrap_err(),
        TennisError::validation("Username already exists.")
    );

    let dup_email = NewUser {
        username: "bea".to_string(),
        email: "Ana@Example.com".to_string(),
        ..NewUser::default()
    };
    assert_eq!(
        accounts::register_user(&mut store, dup_email).unwrap_err(),
        TennisError::validation("Email already exists.")
    );

    let bad_email = NewUser {
        username: "cy".to_string(),
        email: "nope".to_string(),
        ..NewUser::default()
    };
    assert!(matches!(
        accounts::register_user(&mut store, bad_email),
        Err(TennisError::Validation(_))
    ));
}

#[test]
fn new_users_default_to_spectator() {
    let mut store = Store::new();
    let user = accounts::register_user(
        &mut store,
        NewUser {
            username: "fan".to_string(),
            email: "fan@example.com".to_string(),
            ..NewUser::default()
        },
    )
    .unwrap();
    assert_eq!(user.role(), Role::Spectator);
    assert_eq!(accounts::get_users_by_role(&store, Role::Spectator).len(), 1);
    assert_eq!(accounts::get_user(&store, user.id).unwrap(), user);
}

#[test]
fn tournament_lifecycle() {
    let mut store = Store::new();
    let org = register(&mut store, "org", Role::Organizer);
    let p1 = register(&mut store, "p1", Role::Player);
    let p2 = register(&mut store, "p2", Role::Player);

    let t = tournaments::create_tournament(&mut store, new_tournament("Open"), &org).unwrap();
    assert_eq!(t.status, TournamentStatus::Draft);
    assert_eq!(t.max_players, 32);

    // Cannot start from Draft.
    assert!(matches!(
        tournaments::start_tournament(&mut store, t.id, &org),
        Err(TennisError::InvalidState(_))
    ));

    tournaments::open_registration(&mut store, t.id, &org).unwrap();
    tournaments::add_player(&mut store, t.id, p1.id, &org).unwrap();
    assert!(matches!(
        tournaments::start_tournament(&mut store, t.id, &org),
        Err(TennisError::Validation(_))
    ));
    assert_eq!(
        tournaments::add_player(&mut store, t.id, p1.id, &org).unwrap_err(),
        TennisError::validation("Player already in tournament.")
    );
    tournaments::add_player(&mut store, t.id, p2.id, &org).unwrap();

    let started = tournaments::start_tournament(&mut store, t.id, &org).unwrap();
    assert_eq!(started.status, TournamentStatus::InProgress);
    let late = register(&mut store, "p3", Role::Player);
    assert!(matches!(
        tournaments::add_player(&mut store, t.id, late.id, &org),
        Err(TennisError::InvalidState(_))
    ));
    assert!(matches!(
        tournaments::remove_player(&mut store, t.id, p1.id, &org),
        Err(TennisError::InvalidState(_))
    ));
    assert!(matches!(
        tournaments::delete_tournament(&mut store, t.id, &org),
        Err(TennisError::InvalidState(_))
    ));

    let done = tournaments::complete_tournament(&mut store, t.id, &org).unwrap();
    assert_eq!(done.status, TournamentStatus::Completed);
    assert!(matches!(
        tournaments::cancel_tournament(&mut store, t.id, &org),
        Err(TennisError::InvalidState(_))
    ));
    assert!(matches!(
        tournaments::update_tournament(&mut store, t.id, TournamentChanges::default(), &org),
        Err(TennisError::InvalidState(_))
    ));
}

#[test]
fn only_organizers_manage_tournaments() {
    let mut store = Store::new();
    let player = register(&mut store, "p", Role::Player);
    assert!(matches!(
        tournaments::create_tournament(&mut store, new_tournament("Open"), &player),
        Err(TennisError::PermissionDenied(_))
    ));
}

#[test]
fn tournament_details_are_validated() {
    let mut store = Store::new();
    let org = register(&mut store, "org", Role::Organizer);

    let mut backwards = new_tournament("Backwards");
    backwards.end_date = chrono::NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
    assert!(matches!(
        tournaments::create_tournament(&mut store, backwards, &org),
        Err(TennisError::Validation(_))
    ));
    assert!(matches!(
        tournaments::create_tournament(&mut store, new_tournament("  "), &org),
        Err(TennisError::Validation(_))
    ));

    let t = tournaments::create_tournament(&mut store, new_tournament("Open"), &org).unwrap();
    let updated = tournaments::update_tournament(
        &mut store,
        t.id,
        TournamentChanges {
            name: Some("Summer Open".to_string()),
            max_players: Some(16),
            ..TournamentChanges::default()
        },
        &org,
    )
    .unwrap();
    assert_eq!(updated.name, "Summer Open");
    assert_eq!(updated.max_players, 16);
    assert_eq!(updated.location, "Test City");
}

#[test]
fn full_tournament_rejects_players() {
    let mut store = Store::new();
    let org = register(&mut store, "org", Role::Organizer);
    let mut details = new_tournament("Tiny");
    details.max_players = Some(1);
    let t = tournaments::create_tournament(&mut store, details, &org).unwrap();
    tournaments::open_registration(&mut store, t.id, &org).unwrap();

    let p1 = register(&mut store, "p1", Role::Player);
    let p2 = register(&mut store, "p2", Role::Player);
    tournaments::add_player(&mut store, t.id, p1.id, &org).unwrap();
    assert_eq!(
        tournaments::add_player(&mut store, t.id, p2.id, &org).unwrap_err(),
        TennisError::validation("Tournament is full.")
    );

    // Only Player accounts can enroll.
    let spectator = register(&mut store, "fan", Role::Spectator);
    assert!(matches!(
        tournaments::add_player(&mut store, t.id, spectator.id, &org),
        Err(TennisError::NotFound(_))
    ));
}

#[test]
fn user_tournaments_depend_on_role() {
    let w = World::new();
    let mine = |user| tournaments::get_user_tournaments(&w.store, user).len();
    assert_eq!(mine(&w.organizer), 1);
    assert_eq!(mine(&w.player1), 1);
    assert_eq!(mine(&w.referee), 1);
    assert_eq!(mine(&w.spectator), 1);
}

#[test]
fn delete_cascades_to_matches_scores_disputes_and_evidence() {
    let mut w = World::new();
    submit_score(&mut w.store, w.game.id, sets(&[(6, 4), (6, 4)]), &w.referee).unwrap();
    let dispute = create_dispute(&mut w.store, w.game.id, "x", &w.player2).unwrap();
    let evidence = add_evidence(
        &mut w.store,
        dispute.id,
        Some(EvidenceUpload {
            filename: "note.txt".to_string(),
            bytes: b"out".to_vec(),
        }),
        "note",
        &w.player2,
    )
    .unwrap();
    let file = evidence.file.unwrap();

    tournaments::cancel_tournament(&mut w.store, w.tournament.id, &w.organizer).unwrap();
    tournaments::delete_tournament(&mut w.store, w.tournament.id, &w.organizer).unwrap();

    assert!(w.store.tournaments.is_empty());
    assert!(w.store.matches.is_empty());
    assert!(w.store.scores.is_empty());
    assert!(w.store.disputes.is_empty());
    assert!(w.store.evidence.is_empty());
    assert!(w.store.rankings.is_empty());
    assert!(w.store.evidence_file(&file).is_none());
}

#[test]
fn match_creation_needs_an_open_tournament() {
    let mut store = Store::new();
    let org = register(&mut store, "org", Role::Organizer);
    let t = tournaments::create_tournament(&mut store, new_tournament("Open"), &org).unwrap();
    assert!(matches!(
        matches::create_match(&mut store, new_match(&t, Round::R32), &org),
        Err(TennisError::InvalidState(_))
    ));

    tournaments::open_registration(&mut store, t.id, &org).unwrap();
    let game = matches::create_match(&mut store, new_match(&t, Round::SF), &org).unwrap();
    assert_eq!(game.status, MatchStatus::Scheduled);
    assert_eq!(game.round, Round::SF);
}

#[test]
fn assigning_players_checks_enrollment() {
    let mut w = World::new();
    let game =
        matches::create_match(&mut w.store, new_match(&w.tournament, Round::R16), &w.organizer)
            .unwrap();
    let stranger = register(&mut w.store, "stranger", Role::Player);

    assert!(matches!(
        matches::assign_players(&mut w.store, game.id, w.player1.id, w.player1.id, &w.organizer),
        Err(TennisError::Validation(_))
    ));
    assert!(matches!(
        matches::assign_players(&mut w.store, game.id, w.player1.id, stranger.id, &w.organizer),
        Err(TennisError::Validation(_))
    ));
    assert!(matches!(
        matches::assign_players(&mut w.store, game.id, w.player1.id, w.referee.id, &w.organizer),
        Err(TennisError::NotFound(_))
    ));
    assert!(matches!(
        matches::assign_players(&mut w.store, game.id, w.player1.id, w.player2.id, &w.player1),
        Err(TennisError::PermissionDenied(_))
    ));

    // Players are fixed once the match has started.
    assert!(matches!(
        matches::assign_players(&mut w.store, w.game.id, w.player2.id, w.player1.id, &w.organizer),
        Err(TennisError::InvalidState(_))
    ));
}

#[test]
fn starting_a_match() {
    let mut w = World::new();
    let game =
        matches::create_match(&mut w.store, new_match(&w.tournament, Round::R16), &w.organizer)
            .unwrap();
    assert!(matches!(
        matches::start_match(&mut w.store, game.id, &w.organizer),
        Err(TennisError::Validation(_))
    ));
    matches::assign_players(&mut w.store, game.id, w.player1.id, w.player2.id, &w.organizer)
        .unwrap();
    assert!(matches!(
        matches::start_match(&mut w.store, game.id, &w.referee),
        Err(TennisError::PermissionDenied(_))
    ));
    matches::assign_referee(&mut w.store, game.id, w.referee.id, &w.organizer).unwrap();
    let started = matches::start_match(&mut w.store, game.id, &w.referee).unwrap();
    assert_eq!(started.status, MatchStatus::InProgress);
    assert!(matches!(
        matches::start_match(&mut w.store, game.id, &w.referee),
        Err(TennisError::InvalidState(_))
    ));
}

#[test]
fn cancelling_a_match() {
    let mut w = World::new();
    let cancelled = matches::cancel_match(&mut w.store, w.game.id, &w.organizer).unwrap();
    assert_eq!(cancelled.status, MatchStatus::Cancelled);
    assert!(matches!(
        matches::cancel_match(&mut w.store, w.game.id, &w.organizer),
        Err(TennisError::InvalidState(_))
    ));
}

#[test]
fn user_matches_depend_on_role() {
    let w = World::new();
    assert_eq!(matches::get_user_matches(&w.store, &w.player1).len(), 1);
    assert_eq!(matches::get_user_matches(&w.store, &w.referee).len(), 1);
    assert!(matches::get_user_matches(&w.store, &w.spectator).is_empty());
    assert_eq!(
        tournaments::get_tournament_matches(&w.store, w.tournament.id)
            .unwrap()
            .len(),
        1
    );
}
