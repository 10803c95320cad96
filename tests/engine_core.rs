// tests/engine_core.rs

mod common;
use crate::common::{init_tracing, names, team_roster};

use rota::engine::{parse_count, AssignmentEngine, EngineState};
use rota::errors::RotaError;
use rota::roster::Roster;

fn loaded(roster: Roster, cursor: u64) -> AssignmentEngine {
    let mut engine = AssignmentEngine::new();
    engine.load(roster, cursor);
    engine
}

#[test]
fn end_to_end_team_scenario() {
    init_tracing();
    let mut engine = loaded(team_roster(), 0);

    let a = engine.assign(2).unwrap();
    assert_eq!(names(&a.batch), ["Kim", "Lee"]);
    assert_eq!(engine.cursor(), 2);
    assert_eq!(engine.checkpoint(), Some(0));

    let b = engine.assign(3).unwrap();
    assert_eq!(names(&b.batch), ["Park", "Choi", "Jung"]);
    assert_eq!(engine.cursor(), 0);
    assert_eq!(engine.checkpoint(), Some(2));

    assert_eq!(engine.undo().unwrap(), 2);
    assert_eq!(engine.cursor(), 2);
    assert!(engine.last_batch().is_empty());

    let c = engine.assign(6).unwrap();
    assert_eq!(
        names(&c.batch),
        ["Park", "Choi", "Jung", "Kim", "Lee", "Park"]
    );
    assert_eq!(engine.cursor(), 3);
    assert_eq!(c.next_start_display(), 4);
}

#[test]
fn wraps_past_the_end_of_the_roster() {
    init_tracing();
    let engine = loaded(Roster::from_names(["A", "B", "C"]), 2);

    let plan = engine.plan(4, 2).unwrap();
    assert_eq!(names(&plan.batch), ["C", "A", "B", "C"]);
    assert_eq!(plan.start, 2);
    assert_eq!(plan.cursor, 0);

    // Planning never mutates.
    assert_eq!(engine.cursor(), 2);
    assert_eq!(engine.checkpoint(), None);
}

#[test]
fn batch_entries_carry_their_roster_rank() {
    init_tracing();
    // Duplicate names must still report the position they were taken from.
    let mut engine = loaded(Roster::from_names(["Kim", "Lee", "Kim"]), 1);

    let a = engine.assign(3).unwrap();
    let ranks: Vec<usize> = a.batch.entries().iter().map(|e| e.rank).collect();
    assert_eq!(ranks, [2, 3, 1]);
    assert_eq!(names(&a.batch), ["Lee", "Kim", "Kim"]);
}

#[test]
fn second_undo_reports_nothing_to_undo_and_changes_nothing() {
    init_tracing();
    let mut engine = loaded(team_roster(), 0);
    engine.assign(3).unwrap();
    engine.undo().unwrap();

    let before = (engine.cursor(), engine.checkpoint(), engine.last_batch().clone());
    assert!(matches!(engine.undo(), Err(RotaError::NothingToUndo)));
    assert_eq!(
        (engine.cursor(), engine.checkpoint(), engine.last_batch().clone()),
        before
    );
}

#[test]
fn undo_before_any_assign_is_nothing_to_undo() {
    init_tracing();
    let mut engine = loaded(team_roster(), 4);
    assert!(matches!(engine.undo(), Err(RotaError::NothingToUndo)));
    assert_eq!(engine.cursor(), 4);
}

#[test]
fn only_the_latest_assign_can_be_undone() {
    init_tracing();
    let mut engine = loaded(team_roster(), 0);
    engine.assign(1).unwrap();
    engine.assign(2).unwrap();

    assert_eq!(engine.undo().unwrap(), 1);
    assert!(matches!(engine.undo(), Err(RotaError::NothingToUndo)));
    assert_eq!(engine.cursor(), 1);
}

#[test]
fn reset_always_returns_to_the_top() {
    init_tracing();
    let mut engine = loaded(team_roster(), 3);
    engine.assign(4).unwrap();

    engine.reset();
    assert_eq!(engine.cursor(), 0);
    assert_eq!(engine.checkpoint(), None);
    assert!(engine.last_batch().is_empty());

    engine.reset();
    assert_eq!(engine.cursor(), 0);
    assert_eq!(engine.state(), EngineState::Loaded { has_batch: false });
}

#[test]
fn invalid_requests_leave_state_untouched() {
    init_tracing();
    let mut engine = loaded(team_roster(), 0);
    engine.assign(2).unwrap();
    let before = (engine.cursor(), engine.checkpoint(), engine.last_batch().clone());

    assert!(matches!(engine.assign(0), Err(RotaError::InvalidRequest(_))));
    for raw in ["0", "-5", "x", ""] {
        let err = parse_count(raw).unwrap_err();
        assert!(matches!(err, RotaError::InvalidRequest(_)), "{raw:?} gave {err:?}");
    }

    assert_eq!(
        (engine.cursor(), engine.checkpoint(), engine.last_batch().clone()),
        before
    );
}

#[test]
fn empty_roster_is_loaded_but_blocks_assign() {
    init_tracing();
    let mut engine = loaded(Roster::default(), 7);

    assert_eq!(engine.state(), EngineState::Loaded { has_batch: false });
    assert_eq!(engine.cursor(), 0);
    match engine.assign(1) {
        Err(RotaError::InvalidRequest(msg)) => assert!(msg.contains("empty")),
        other => panic!("expected InvalidRequest, got {other:?}"),
    }
}

#[test]
fn uninitialized_engine_rejects_assign() {
    init_tracing();
    let mut engine = AssignmentEngine::new();
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert!(matches!(engine.assign(1), Err(RotaError::InvalidRequest(_))));
    assert_eq!(engine.state(), EngineState::Uninitialized);
}

#[test]
fn load_reduces_cursor_and_clears_history() {
    init_tracing();
    let mut engine = loaded(team_roster(), 0);
    engine.assign(2).unwrap();
    assert_eq!(engine.state(), EngineState::Loaded { has_batch: true });

    engine.load(team_roster(), 12);
    assert_eq!(engine.cursor(), 2);
    assert_eq!(engine.checkpoint(), None);
    assert_eq!(engine.state(), EngineState::Loaded { has_batch: false });
}

#[test]
fn full_cycle_request_returns_to_the_same_cursor() {
    init_tracing();
    let mut engine = loaded(team_roster(), 3);
    let a = engine.assign(5).unwrap();
    assert_eq!(names(&a.batch), ["Choi", "Jung", "Kim", "Lee", "Park"]);
    assert_eq!(engine.cursor(), 3);
}
