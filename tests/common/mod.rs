#![allow(dead_code)]

pub use rota_test_utils::{init_tracing, with_timeout};

use rota::roster::Roster;

/// The five-person team used throughout the scenario tests.
pub const TEAM: [&str; 5] = ["Kim", "Lee", "Park", "Choi", "Jung"];

pub fn team_roster() -> Roster {
    Roster::from_names(TEAM)
}

pub fn names(batch: &rota::engine::AssignedBatch) -> Vec<String> {
    batch.names().iter().map(|n| n.to_string()).collect()
}
