//! Post-battle resolution pipeline tests
//!
//! A stub authority stands in for the backend so each test controls the
//! server's verdict, including not answering at all.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use geoclash::api::models::PlayerProfile;
use geoclash::battle::session::{BattleOutcome, BattleReport};
use geoclash::core::error::{GameError, Result};
use geoclash::core::types::{now_ms, LocationId, SessionId};
use geoclash::resolution::cooldown::CooldownLedger;
use geoclash::resolution::stats::take_staged_profile;
use geoclash::resolution::submit::{submit_battle_result, BattleAuthority, CaptureOutcome};
use geoclash::storage::{KeyValueStore, MemoryStore};

struct StubAuthority {
    verdict: Option<&'static str>,
    calls: Mutex<Vec<(LocationId, u32)>>,
}

impl StubAuthority {
    fn confirming(verdict: &'static str) -> Self {
        Self {
            verdict: Some(verdict),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn offline() -> Self {
        Self {
            verdict: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl BattleAuthority for StubAuthority {
    async fn report_battle(&self, location: LocationId, score: u32) -> Result<String> {
        self.calls.lock().unwrap().push((location, score));
        match self.verdict {
            Some(verdict) => Ok(verdict.to_string()),
            None => Err(GameError::NetworkFailure("connection refused".to_string())),
        }
    }

    async fn claim_ownership(&self, _location: LocationId) -> Result<()> {
        Ok(())
    }
}

fn report(location: u32, outcome: BattleOutcome, elapsed_seconds: u64, player_health: u32) -> BattleReport {
    BattleReport {
        session_id: SessionId::new(),
        location_id: LocationId(location),
        outcome,
        elapsed_seconds,
        player_health,
    }
}

fn profile() -> PlayerProfile {
    PlayerProfile {
        username: "kestrel".to_string(),
        team: Some("crimson".to_string()),
        strength: 40,
        wins: 5,
        losses: 2,
        image: None,
    }
}

#[tokio::test]
async fn test_confirmed_victory_is_a_full_capture() {
    let store = Arc::new(MemoryStore::new());
    let ledger = CooldownLedger::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, 60);
    let authority = StubAuthority::confirming("win");
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    // A ten-second win with 80 health: 50 + 50 + 20 + 80
    let report = report(9, BattleOutcome::Victory, 10, 80);
    let summary =
        submit_battle_result(&report, &profile(), &authority, &ledger, store.as_ref(), &mut rng)
            .await;

    assert_eq!(summary.score, 200);
    assert_eq!(summary.capture, CaptureOutcome::Captured);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.updated_profile.wins, 6);
    assert_eq!(summary.updated_profile.losses, 2);
    let gained = summary.updated_profile.strength - 40;
    assert!((1..=3).contains(&gained), "gained {gained}");

    // The location is locked out and the profile update is staged
    assert!(ledger.is_active(report.location_id, now_ms()).unwrap());
    let staged = take_staged_profile(store.as_ref()).unwrap().unwrap();
    assert_eq!(staged.profile.wins, 6);
    assert!(take_staged_profile(store.as_ref()).unwrap().is_none());

    assert_eq!(*authority.calls.lock().unwrap(), vec![(LocationId(9), 200)]);
}

#[tokio::test]
async fn test_server_can_overrule_a_local_victory() {
    let store = Arc::new(MemoryStore::new());
    let ledger = CooldownLedger::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, 60);
    let authority = StubAuthority::confirming("lose");
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let report = report(3, BattleOutcome::Victory, 25, 40);
    let summary =
        submit_battle_result(&report, &profile(), &authority, &ledger, store.as_ref(), &mut rng)
            .await;

    assert_eq!(summary.capture, CaptureOutcome::Contested);
    // The local result still counts locally
    assert_eq!(summary.updated_profile.wins, 6);
    assert!(ledger.is_active(report.location_id, now_ms()).unwrap());
}

#[tokio::test]
async fn test_defeat_scores_the_floor_and_keeps_the_cooldown() {
    let store = Arc::new(MemoryStore::new());
    let ledger = CooldownLedger::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, 60);
    let authority = StubAuthority::confirming("win");
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let report = report(4, BattleOutcome::Defeat, 45, 0);
    let summary =
        submit_battle_result(&report, &profile(), &authority, &ledger, store.as_ref(), &mut rng)
            .await;

    assert_eq!(summary.score, 30);
    assert_eq!(summary.capture, CaptureOutcome::Defeated);
    assert_eq!(summary.updated_profile.losses, 3);
    assert_eq!(summary.updated_profile.wins, 5);
    assert!((38..=40).contains(&summary.updated_profile.strength));
    assert!(ledger.is_active(report.location_id, now_ms()).unwrap());
    assert_eq!(*authority.calls.lock().unwrap(), vec![(LocationId(4), 30)]);
}

#[tokio::test]
async fn test_unreachable_server_keeps_local_results() {
    let store = Arc::new(MemoryStore::new());
    let ledger = CooldownLedger::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, 60);
    let authority = StubAuthority::offline();
    let mut rng = ChaCha8Rng::seed_from_u64(10);

    let report = report(5, BattleOutcome::Victory, 10, 80);
    let summary =
        submit_battle_result(&report, &profile(), &authority, &ledger, store.as_ref(), &mut rng)
            .await;

    assert_eq!(summary.capture, CaptureOutcome::Unreported);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.score, 200);

    // Cooldown and staged stats survive the dead network
    assert!(ledger.is_active(report.location_id, now_ms()).unwrap());
    assert!(take_staged_profile(store.as_ref()).unwrap().is_some());
}
