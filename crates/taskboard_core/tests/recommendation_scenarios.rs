mod common;

use chrono::Duration;
use common::{card_id, list_id, now, BoardBuilder, RecordingSink, StaticBoards};
use taskboard_core::{
    FixedClock, Recommendation, RecommendationKind, RecommendationPayload, RecommendationService,
    ServiceError,
};
use uuid::Uuid;

const OWNER: u128 = 42;

fn service_for(
    board: taskboard_core::Board,
) -> RecommendationService<StaticBoards, RecordingSink, FixedClock> {
    RecommendationService::with_clock(
        StaticBoards::default().with_board(board, Uuid::from_u128(OWNER)),
        RecordingSink::default(),
        FixedClock(now()),
    )
}

fn of_kind(recs: &[Recommendation], kind: RecommendationKind) -> Vec<&Recommendation> {
    recs.iter().filter(|rec| rec.kind() == kind).collect()
}

#[test]
fn started_card_in_todo_moves_to_doing() {
    let board = BoardBuilder::new(1)
        .list("To Do")
        .card("Write report", Some("I started this yesterday"), None)
        .list("Doing")
        .list("Done")
        .build();
    let service = service_for(board);

    let recs = service.generate(Uuid::from_u128(1)).unwrap();
    let moves = of_kind(&recs, RecommendationKind::ListMovement);
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].card_id(), Some(card_id(0)));
    match moves[0].payload() {
        RecommendationPayload::ListMovement(payload) => {
            assert_eq!(payload.target_list_id, list_id(1));
            assert_eq!(payload.target_list_title, "Doing");
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn nearest_of_two_due_dates_is_prioritized() {
    let board = BoardBuilder::new(1)
        .list("Backlog")
        .card("Later", None, Some(now() + Duration::days(7)))
        .card("Sooner", None, Some(now() + Duration::days(3)))
        .build();
    let service = service_for(board);

    let recs = service.generate(Uuid::from_u128(1)).unwrap();
    let due = of_kind(&recs, RecommendationKind::DueDate);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].score(), 0.8);
    assert_eq!(due[0].card_id(), Some(card_id(1)));
    match due[0].payload() {
        RecommendationPayload::DueDate(payload) => {
            assert_eq!(payload.days_until, Some(3));
            assert_eq!(payload.card_title, "Sooner");
            assert!(payload.reason.ends_with("should be done first"));
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn lone_overdue_card_is_not_prioritized() {
    let board = BoardBuilder::new(1)
        .list("To Do")
        .card("Missed", None, Some(now() - Duration::days(2)))
        .card("Undated", None, None)
        .build();
    let service = service_for(board);

    let recs = service.generate(Uuid::from_u128(1)).unwrap();
    assert!(of_kind(&recs, RecommendationKind::DueDate).is_empty());
}

#[test]
fn overdue_card_loses_to_upcoming_card() {
    let board = BoardBuilder::new(1)
        .list("To Do")
        .card("Missed", None, Some(now() - Duration::hours(1)))
        .card("Upcoming", None, Some(now() + Duration::days(9)))
        .build();
    let service = service_for(board);

    let recs = service.generate(Uuid::from_u128(1)).unwrap();
    let due = of_kind(&recs, RecommendationKind::DueDate);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].card_id(), Some(card_id(1)));
}

#[test]
fn related_login_cards_are_grouped() {
    let board = BoardBuilder::new(1)
        .list("To Do")
        .card("Fix login bug", None, None)
        .list("Done")
        .card("Login button broken", None, None)
        .build();
    let service = service_for(board);

    let recs = service.generate(Uuid::from_u128(1)).unwrap();
    let groups = of_kind(&recs, RecommendationKind::GroupCards);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].card_id(), None);
    match groups[0].payload() {
        RecommendationPayload::GroupCards(payload) => {
            assert_eq!(payload.card_ids, vec![card_id(0), card_id(1)]);
            assert_eq!(payload.card_titles, vec!["Fix login bug", "Login button broken"]);
            assert_eq!(payload.reason, "You may want to group these cards together");
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn empty_board_still_replaces_stored_set() {
    let board = BoardBuilder::new(1).build();
    let service = service_for(board);

    let recs = service.generate(Uuid::from_u128(1)).unwrap();
    assert!(recs.is_empty());
    assert_eq!(service.sink().call_count(), 1);
    let (board_id, written) = service.sink().last_call().unwrap();
    assert_eq!(board_id, Uuid::from_u128(1));
    assert!(written.is_empty());
}

#[test]
fn missing_board_fails_without_touching_sink() {
    let service = service_for(BoardBuilder::new(1).build());

    let err = service.generate(Uuid::from_u128(99)).unwrap_err();
    assert!(matches!(err, ServiceError::BoardNotFound(id) if id == Uuid::from_u128(99)));
    assert_eq!(service.sink().call_count(), 0);
}

#[test]
fn generation_is_deterministic_for_a_fixed_snapshot() {
    let board = BoardBuilder::new(1)
        .list("Backlog")
        .card("Fix login bug", Some("started the fix"), Some(now() + Duration::days(1)))
        .card("Login page broken", None, Some(now() + Duration::days(4)))
        .card("Update docs", Some("docs for login"), None)
        .list("In Progress")
        .card("Refactor auth", Some("started"), None)
        .build();
    let service = service_for(board);

    let first = service.generate(Uuid::from_u128(1)).unwrap();
    let second = service.generate(Uuid::from_u128(1)).unwrap();
    assert_eq!(first, second);
    assert!(of_kind(&first, RecommendationKind::DueDate).len() <= 1);
    // "Refactor auth" already sits in a progress list.
    assert_eq!(of_kind(&first, RecommendationKind::ListMovement).len(), 1);
}

#[test]
fn sink_failure_surfaces_as_generation_failure() {
    let board = BoardBuilder::new(1).list("To Do").card("a card", None, None).build();
    let service = RecommendationService::with_clock(
        StaticBoards::default().with_board(board, Uuid::from_u128(OWNER)),
        RecordingSink::failing(),
        FixedClock(now()),
    );

    let err = service.generate(Uuid::from_u128(1)).unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)));
}

#[test]
fn get_path_degrades_to_empty_on_sink_failure() {
    let board = BoardBuilder::new(1).list("To Do").card("a card", None, None).build();
    let service = RecommendationService::with_clock(
        StaticBoards::default().with_board(board, Uuid::from_u128(OWNER)),
        RecordingSink::failing(),
        FixedClock(now()),
    );

    let stored = service.recommendations(Uuid::from_u128(1)).unwrap();
    assert!(stored.is_empty());
    assert!(service.refresh(Uuid::from_u128(1)).is_err());
}

#[test]
fn get_path_generates_only_when_empty() {
    let board = BoardBuilder::new(1)
        .list("To Do")
        .card("Fix login bug", None, Some(now() + Duration::days(2)))
        .build();
    let service = service_for(board);

    let first = service.recommendations(Uuid::from_u128(1)).unwrap();
    assert_eq!(first.len(), 1);
    let again = service.recommendations(Uuid::from_u128(1)).unwrap();
    assert_eq!(again, first);
    assert_eq!(service.sink().call_count(), 1);

    service.refresh(Uuid::from_u128(1)).unwrap();
    assert_eq!(service.sink().call_count(), 2);
}

#[test]
fn user_entry_points_require_access() {
    let board = BoardBuilder::new(1).list("To Do").build();
    let service = service_for(board);

    let stranger = Uuid::from_u128(7);
    let err = service
        .recommendations_for_user(stranger, Uuid::from_u128(1))
        .unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied { .. }));
    assert!(service.refresh_for_user(stranger, Uuid::from_u128(1)).is_err());
    assert_eq!(service.sink().call_count(), 0);

    service
        .refresh_for_user(Uuid::from_u128(OWNER), Uuid::from_u128(1))
        .unwrap();
    assert_eq!(service.sink().call_count(), 1);
}
