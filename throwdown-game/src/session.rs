//! High-level session facade binding the engine to a profile store.
//!
//! `GameSession` loads one named profile blob on open, routes every
//! mutation through [`MatchEngine`], and writes the blob back after each
//! one. Presentation layers talk to this type; the engine and state stay
//! reachable for embedders that want finer control.

use crate::engine::{MatchEngine, RoundProgress};
use crate::event::{EventList, GameEvent};
use crate::history::RoundRecord;
use crate::moves::Move;
use crate::powerups::{PowerupError, PowerupKind};
use crate::state::{Difficulty, GameMode, GameState, ProgressSnapshot, Settings};
use crate::{Clock, ProfileStorage};
use std::collections::VecDeque;

/// Session wrapper owning engine, state, storage backend, and clock.
#[derive(Debug, Clone)]
pub struct GameSession<S, C>
where
    S: ProfileStorage,
    C: Clock,
{
    engine: MatchEngine,
    state: GameState,
    storage: S,
    clock: C,
    profile_name: String,
}

impl<S, C> GameSession<S, C>
where
    S: ProfileStorage,
    C: Clock,
{
    /// Open a session for `profile_name`, loading the stored blob.
    ///
    /// A missing blob starts a fresh profile. A blob that fails to decode
    /// starts a fresh profile too, immediately persists it over the bad
    /// payload, and reports [`GameEvent::ProfileRecovered`] in the returned
    /// event list.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read or write.
    pub fn open(
        storage: S,
        clock: C,
        profile_name: &str,
        seed: u64,
    ) -> Result<(Self, EventList), anyhow::Error> {
        let mut recovered = false;
        let state = match storage
            .load_profile(profile_name)
            .map_err(Into::<anyhow::Error>::into)?
        {
            None => GameState::default(),
            Some(payload) => match serde_json::from_str::<GameState>(&payload) {
                Ok(state) => state,
                Err(err) => {
                    if debug_log_enabled() {
                        println!("Profile '{profile_name}' failed to decode: {err}");
                    }
                    recovered = true;
                    GameState::default()
                }
            },
        };

        let session = Self {
            engine: MatchEngine::new(seed),
            state,
            storage,
            clock,
            profile_name: profile_name.to_string(),
        };
        let mut events = EventList::new();
        if recovered {
            session.save()?;
            events.push(GameEvent::ProfileRecovered);
        }
        Ok((session, events))
    }

    /// Submit the next move and persist the profile if a round resolved.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RoundError::MoveLocked`] for a move outside the
    /// unlocked roster, or a storage error if persisting fails.
    pub fn play(&mut self, player_move: Move) -> Result<RoundProgress, anyhow::Error> {
        let now_ms = self.clock.now_ms();
        let progress = self.engine.submit_move(&mut self.state, player_move, now_ms)?;
        if matches!(progress, RoundProgress::Resolved(_)) {
            self.save()?;
        }
        Ok(progress)
    }

    /// Arm a powerup for the next round and persist.
    ///
    /// # Errors
    ///
    /// Returns [`PowerupError::Exhausted`] when no charges remain, or a
    /// storage error if persisting fails.
    pub fn activate_powerup(&mut self, kind: PowerupKind) -> Result<EventList, anyhow::Error> {
        let events = self.engine.activate_powerup(&mut self.state, kind)?;
        self.save()?;
        Ok(events)
    }

    /// Arm a powerup given its wire name, e.g. from user input.
    ///
    /// # Errors
    ///
    /// Returns [`PowerupError::Unknown`] for an unrecognized name, plus
    /// everything [`Self::activate_powerup`] can return.
    pub fn activate_powerup_named(&mut self, name: &str) -> Result<EventList, anyhow::Error> {
        let kind: PowerupKind = name
            .parse()
            .map_err(|()| PowerupError::Unknown(name.to_string()))?;
        self.activate_powerup(kind)
    }

    /// Switch the game mode, dropping any half-submitted duel move.
    ///
    /// Scores and progression carry over across modes.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn set_mode(&mut self, mode: GameMode) -> Result<(), anyhow::Error> {
        self.state.mode = mode;
        self.engine.clear_pending_duel();
        self.save()
    }

    /// Change the computer opponent difficulty.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), anyhow::Error> {
        self.state.difficulty = difficulty;
        self.save()
    }

    /// Edit the profile settings in place and persist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn update_settings(
        &mut self,
        apply: impl FnOnce(&mut Settings),
    ) -> Result<(), anyhow::Error> {
        apply(&mut self.state.settings);
        self.save()
    }

    /// Clear-data: restore the default profile and persist it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn reset(&mut self) -> Result<EventList, anyhow::Error> {
        self.state = GameState::default();
        self.engine.clear_pending_duel();
        self.save()?;
        let mut events = EventList::new();
        events.push(GameEvent::ProfileReset);
        Ok(events)
    }

    /// Write the current profile blob to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the storage backend fails.
    pub fn save(&self) -> Result<(), anyhow::Error> {
        let payload = serde_json::to_string(&self.state)?;
        self.storage
            .save_profile(&self.profile_name, &payload)
            .map_err(Into::into)
    }

    /// Borrow the underlying game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Borrow the state mutably. Callers that mutate through this must
    /// [`Self::save`] themselves.
    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Apply a closure to the mutable game state without persisting.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.state)
    }

    /// Progression snapshot for display.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.state.progress()
    }

    /// Most-recent-first round history.
    #[must_use]
    pub const fn history(&self) -> &VecDeque<RoundRecord> {
        &self.state.history
    }

    /// Current profile settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Name of the profile blob this session persists to.
    #[must_use]
    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Borrow the underlying engine.
    #[must_use]
    pub const fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Seed driving the opponent stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.engine.seed()
    }

    /// Whether a two-player round is waiting on its second move.
    #[must_use]
    pub const fn awaiting_second_move(&self) -> bool {
        self.engine.awaiting_second_move()
    }

    /// Deterministically reseed the opponent stream.
    pub fn reseed(&mut self, seed: u64) {
        self.engine.reseed(seed);
    }

    /// Consume the session, returning the underlying game state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(crate::constants::DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::cell::Cell;

    /// Clock that ticks forward one millisecond per call.
    #[derive(Debug, Clone, Default)]
    struct StepClock {
        ticks: Cell<u64>,
    }

    impl Clock for StepClock {
        fn now_ms(&self) -> u64 {
            let now = self.ticks.get();
            self.ticks.set(now + 1);
            now
        }
    }

    fn open_duel(store: &MemoryStore) -> GameSession<MemoryStore, StepClock> {
        let (mut session, events) =
            GameSession::open(store.clone(), StepClock::default(), "slot-a", 7)
                .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));
        assert!(events.is_empty());
        session
            .set_mode(GameMode::VsPlayer)
            .unwrap_or_else(|err| panic!("set_mode persists: {err}"));
        session
    }

    fn play_round(
        session: &mut GameSession<MemoryStore, StepClock>,
        first: Move,
        second: Move,
    ) -> RoundProgress {
        session
            .play(first)
            .unwrap_or_else(|err| panic!("{first} is unlocked: {err}"));
        session
            .play(second)
            .unwrap_or_else(|err| panic!("{second} is unlocked: {err}"))
    }

    #[test]
    fn fresh_profile_starts_from_defaults() {
        let store = MemoryStore::default();
        let (session, events) = GameSession::open(store, StepClock::default(), "slot-a", 7)
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));
        assert!(events.is_empty());
        assert_eq!(*session.state(), GameState::default());
    }

    #[test]
    fn resolved_rounds_are_persisted_and_reloadable() {
        let store = MemoryStore::default();
        let mut session = open_duel(&store);
        play_round(&mut session, Move::Rock, Move::Scissors);

        let (reloaded, events) = GameSession::open(store, StepClock::default(), "slot-a", 7)
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));
        assert!(events.is_empty());
        assert_eq!(reloaded.state(), session.state());
        assert_eq!(reloaded.state().scores.player, 1);
    }

    #[test]
    fn awaiting_phase_does_not_touch_storage() {
        let store = MemoryStore::default();
        let mut session = open_duel(&store);
        let before = store
            .load_profile("slot-a")
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));

        let progress = session
            .play(Move::Rock)
            .unwrap_or_else(|err| panic!("rock is unlocked: {err}"));
        assert_eq!(progress, RoundProgress::AwaitingOpponent);
        let after = store
            .load_profile("slot-a")
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));
        assert_eq!(before, after);
    }

    #[test]
    fn corrupt_blob_recovers_to_defaults_and_overwrites() {
        let store = MemoryStore::default();
        store
            .save_profile("slot-a", "{not json")
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));

        let (session, events) =
            GameSession::open(store.clone(), StepClock::default(), "slot-a", 7)
                .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));
        assert_eq!(events.as_slice(), &[GameEvent::ProfileRecovered]);
        assert_eq!(*session.state(), GameState::default());

        let payload = store
            .load_profile("slot-a")
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"))
            .unwrap_or_else(|| panic!("recovery persists a fresh blob"));
        let decoded: GameState = serde_json::from_str(&payload)
            .unwrap_or_else(|err| panic!("recovered blob decodes: {err}"));
        assert_eq!(decoded, GameState::default());
    }

    #[test]
    fn unknown_powerup_name_is_a_typed_error() {
        let store = MemoryStore::default();
        let mut session = open_duel(&store);
        let err = session
            .activate_powerup_named("mirror")
            .expect_err("mirror is not a powerup");
        assert_eq!(
            err.downcast_ref::<PowerupError>(),
            Some(&PowerupError::Unknown(String::from("mirror")))
        );
    }

    #[test]
    fn mode_switch_cancels_a_parked_move() {
        let store = MemoryStore::default();
        let mut session = open_duel(&store);
        session
            .play(Move::Rock)
            .unwrap_or_else(|err| panic!("rock is unlocked: {err}"));
        assert!(session.awaiting_second_move());

        session
            .set_mode(GameMode::VsComputer)
            .unwrap_or_else(|err| panic!("set_mode persists: {err}"));
        assert!(!session.awaiting_second_move());
        assert_eq!(session.state().scores.rounds_total(), 0);
    }

    #[test]
    fn reset_restores_defaults_and_persists() {
        let store = MemoryStore::default();
        let mut session = open_duel(&store);
        play_round(&mut session, Move::Rock, Move::Scissors);
        session
            .activate_powerup(PowerupKind::Peek)
            .unwrap_or_else(|err| panic!("peek has charges: {err}"));

        let events = session
            .reset()
            .unwrap_or_else(|err| panic!("reset persists: {err}"));
        assert_eq!(events.as_slice(), &[GameEvent::ProfileReset]);
        assert_eq!(*session.state(), GameState::default());

        let (reloaded, _) = GameSession::open(store, StepClock::default(), "slot-a", 7)
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));
        assert_eq!(*reloaded.state(), GameState::default());
    }

    #[test]
    fn settings_edits_persist() {
        let store = MemoryStore::default();
        let mut session = open_duel(&store);
        session
            .update_settings(|settings| {
                settings.player_name = String::from("MORGAN");
                settings.sound = false;
            })
            .unwrap_or_else(|err| panic!("settings persist: {err}"));

        let (reloaded, _) = GameSession::open(store, StepClock::default(), "slot-a", 7)
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));
        assert_eq!(reloaded.settings().player_name, "MORGAN");
        assert!(!reloaded.settings().sound);
    }

    #[test]
    fn locked_move_error_survives_the_facade() {
        let store = MemoryStore::default();
        let (mut session, _) = GameSession::open(store, StepClock::default(), "slot-a", 7)
            .unwrap_or_else(|err| panic!("memory store cannot fail: {err}"));
        let err = session.play(Move::Spock).expect_err("spock locked at level 1");
        assert_eq!(
            err.downcast_ref::<crate::RoundError>(),
            Some(&crate::RoundError::MoveLocked(Move::Spock))
        );
    }
}
