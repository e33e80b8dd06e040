//! Battle session state machine
//!
//! One session runs one fight. Two timer tasks drive it: a one-second
//! ticker for the elapsed clock, and an opponent scheduler that re-arms
//! itself with a fresh random delay after every strike. All mutation
//! happens under a single lock; the first transition into `Resolved`
//! wins, and every later trigger is a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::Rng;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::battle::combatant::Combatant;
use crate::battle::damage::damage_roll;
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{LocationId, SessionId};

/// Lifecycle of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    NotStarted,
    InProgress,
    Resolved(BattleOutcome),
}

/// Terminal result of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Final record of a fight, sent exactly once on resolution
#[derive(Debug, Clone)]
pub struct BattleReport {
    pub session_id: SessionId,
    pub location_id: LocationId,
    pub outcome: BattleOutcome,
    pub elapsed_seconds: u64,
    pub player_health: u32,
}

/// Point-in-time copy of a session, for display
#[derive(Debug, Clone)]
pub struct BattleSnapshot {
    pub phase: BattlePhase,
    pub elapsed_seconds: u64,
    pub player_name: String,
    pub player_health: u32,
    pub opponent_name: String,
    pub opponent_health: u32,
}

struct SessionState {
    phase: BattlePhase,
    elapsed_seconds: u64,
    player: Combatant,
    opponent: Combatant,
    report_tx: Option<oneshot::Sender<BattleReport>>,
}

/// One fight at one location
///
/// Dropping the session aborts both timer tasks without resolving the
/// battle; the report receiver then yields a `RecvError`.
pub struct BattleSession {
    id: SessionId,
    location_id: LocationId,
    attack_delay_ms: (u64, u64),
    state: Arc<Mutex<SessionState>>,
    stop: Arc<Notify>,
    ticker: Option<JoinHandle<()>>,
    scheduler: Option<JoinHandle<()>>,
}

// The battle state must stay usable for resolution even if a timer
// task panicked while holding the guard.
fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BattleSession {
    /// Create a session in `NotStarted`
    ///
    /// The returned receiver yields the battle report once the session
    /// resolves.
    pub fn new(
        location_id: LocationId,
        player: Combatant,
        opponent: Combatant,
        config: &GameConfig,
    ) -> (Self, oneshot::Receiver<BattleReport>) {
        let (report_tx, report_rx) = oneshot::channel();
        let session = Self {
            id: SessionId::new(),
            location_id,
            attack_delay_ms: (config.opponent_attack_min_ms, config.opponent_attack_max_ms),
            state: Arc::new(Mutex::new(SessionState {
                phase: BattlePhase::NotStarted,
                elapsed_seconds: 0,
                player,
                opponent,
                report_tx: Some(report_tx),
            })),
            stop: Arc::new(Notify::new()),
            ticker: None,
            scheduler: None,
        };
        (session, report_rx)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn location_id(&self) -> LocationId {
        self.location_id
    }

    pub fn phase(&self) -> BattlePhase {
        lock(&self.state).phase
    }

    pub fn elapsed_seconds(&self) -> u64 {
        lock(&self.state).elapsed_seconds
    }

    /// Copy the current state for display
    pub fn snapshot(&self) -> BattleSnapshot {
        let state = lock(&self.state);
        BattleSnapshot {
            phase: state.phase,
            elapsed_seconds: state.elapsed_seconds,
            player_name: state.player.display_name.clone(),
            player_health: state.player.current_health,
            opponent_name: state.opponent.display_name.clone(),
            opponent_health: state.opponent.current_health,
        }
    }

    /// Begin the fight: both sides at full health, clock at zero,
    /// both timers running
    ///
    /// Valid once, from `NotStarted`. Must be called within a tokio
    /// runtime.
    pub fn start(&mut self) -> Result<()> {
        {
            let mut state = lock(&self.state);
            if state.phase != BattlePhase::NotStarted {
                return Err(GameError::ValidationFailure(
                    "battle already started".into(),
                ));
            }
            state.phase = BattlePhase::InProgress;
            state.elapsed_seconds = 0;
            state.player.reset_health();
            state.opponent.reset_health();
        }

        self.ticker = Some(tokio::spawn(run_ticker(
            Arc::clone(&self.state),
            Arc::clone(&self.stop),
        )));
        self.scheduler = Some(tokio::spawn(run_opponent(
            Arc::clone(&self.state),
            Arc::clone(&self.stop),
            self.attack_delay_ms,
            self.id,
            self.location_id,
        )));

        tracing::debug!("Battle started at location {}", self.location_id.0);
        Ok(())
    }

    /// Land one player strike
    ///
    /// Ignored unless the battle is in progress; attacks are not
    /// rate-limited beyond that.
    pub fn attack(&self) {
        let mut state = lock(&self.state);
        if state.phase != BattlePhase::InProgress {
            return;
        }
        let damage = damage_roll(
            state.player.strength,
            state.opponent.strength,
            &mut rand::thread_rng(),
        );
        if state.opponent.take_damage(damage) {
            resolve(
                &mut state,
                BattleOutcome::Victory,
                self.id,
                self.location_id,
            );
            self.stop.notify_waiters();
        }
    }
}

impl Drop for BattleSession {
    fn drop(&mut self) {
        // Leaving the arena stops the fight without resolving it
        self.stop.notify_waiters();
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        if let Some(handle) = self.scheduler.take() {
            handle.abort();
        }
    }
}

/// Apply a terminal outcome under the lock. The first caller wins and
/// sends the one report; later calls find the phase already terminal.
fn resolve(
    state: &mut SessionState,
    outcome: BattleOutcome,
    session_id: SessionId,
    location_id: LocationId,
) {
    if matches!(state.phase, BattlePhase::Resolved(_)) {
        return;
    }
    state.phase = BattlePhase::Resolved(outcome);
    if let Some(report_tx) = state.report_tx.take() {
        let report = BattleReport {
            session_id,
            location_id,
            outcome,
            elapsed_seconds: state.elapsed_seconds,
            player_health: state.player.current_health,
        };
        // The receiver may already be gone; the battle resolved either way
        let _ = report_tx.send(report);
    }
    tracing::info!("Battle resolved: {:?}", outcome);
}

async fn run_ticker(state: Arc<Mutex<SessionState>>, stop: Arc<Notify>) {
    let period = Duration::from_secs(1);
    loop {
        if lock(&state).phase != BattlePhase::InProgress {
            break;
        }
        tokio::select! {
            _ = sleep(period) => {
                let mut state = lock(&state);
                if state.phase != BattlePhase::InProgress {
                    break;
                }
                state.elapsed_seconds += 1;
            }
            _ = stop.notified() => break,
        }
    }
}

async fn run_opponent(
    state: Arc<Mutex<SessionState>>,
    stop: Arc<Notify>,
    delay_ms: (u64, u64),
    session_id: SessionId,
    location_id: LocationId,
) {
    loop {
        if lock(&state).phase != BattlePhase::InProgress {
            break;
        }
        // Fresh draw after every strike, not a fixed period
        let delay = Duration::from_millis(rand::thread_rng().gen_range(delay_ms.0..delay_ms.1));
        tokio::select! {
            _ = sleep(delay) => {
                let mut state = lock(&state);
                if state.phase != BattlePhase::InProgress {
                    break;
                }
                if state.player.is_defeated() || state.opponent.is_defeated() {
                    break;
                }
                let damage = damage_roll(
                    state.opponent.strength,
                    state.player.strength,
                    &mut rand::thread_rng(),
                );
                if state.player.take_damage(damage) {
                    resolve(&mut state, BattleOutcome::Defeat, session_id, location_id);
                    stop.notify_waiters();
                }
            }
            _ = stop.notified() => break,
        }
    }
}

/// Elapsed-clock display: minutes and zero-padded seconds
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session(player_strength: i64, opponent_strength: i64) -> (BattleSession, oneshot::Receiver<BattleReport>) {
        BattleSession::new(
            LocationId(7),
            Combatant::new("Challenger", player_strength),
            Combatant::new("Defender", opponent_strength),
            &GameConfig::default(),
        )
    }

    #[test]
    fn test_new_session_is_not_started() {
        let (session, _rx) = test_session(50, 50);
        assert_eq!(session.phase(), BattlePhase::NotStarted);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn test_attack_before_start_is_ignored() {
        let (session, _rx) = test_session(100, 1);
        session.attack();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, BattlePhase::NotStarted);
        assert_eq!(snapshot.opponent_health, 100);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(9), "0:09");
        assert_eq!(format_elapsed(65), "1:05");
        assert_eq!(format_elapsed(600), "10:00");
    }
}
