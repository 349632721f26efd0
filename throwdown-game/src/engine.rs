//! Round resolution engine.
//!
//! `MatchEngine` owns the opponent RNG stream and the duel hand-off slot.
//! All gameplay mutation flows through it: submitting a move, activating a
//! powerup. Persistence and clocks live a layer up in
//! [`GameSession`](crate::session::GameSession); the engine only needs a
//! timestamp handed in per round.

use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use thiserror::Error;

use crate::constants::XP_PER_WIN;
use crate::event::{EventList, GameEvent, MoveList};
use crate::history::RoundRecord;
use crate::moves::{Move, Outcome};
use crate::powerups::{PowerupError, PowerupKind};
use crate::progress::{self, LevelReward};
use crate::state::{GameState, ProgressSnapshot};
use crate::{achievements, opponent};

/// Errors surfaced while submitting a move for resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    /// The submitted move is not part of the profile's unlocked roster.
    #[error("move '{0}' is not unlocked yet")]
    MoveLocked(Move),
}

/// Result of submitting a move to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundProgress {
    /// First half of a two-player duel is parked; waiting on the second move.
    AwaitingOpponent,
    /// The round resolved and the profile was updated.
    Resolved(RoundOutcome),
}

impl RoundProgress {
    /// Resolved outcome, if the round completed.
    #[must_use]
    pub const fn outcome(&self) -> Option<&RoundOutcome> {
        match self {
            Self::AwaitingOpponent => None,
            Self::Resolved(outcome) => Some(outcome),
        }
    }
}

/// Everything a caller needs to render one resolved round.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RoundOutcome {
    /// The history entry appended for this round.
    pub record: RoundRecord,
    /// Progression snapshot taken after all rewards were applied.
    pub progress: ProgressSnapshot,
    /// Ordered side effects: resolution, level-ups, unlocks, achievements.
    pub events: EventList,
}

/// RNG wrapper that counts draw calls for QA instrumentation.
#[derive(Debug, Clone)]
struct CountingRng<R: RngCore> {
    rng: R,
    draws: u64,
}

impl<R: RngCore> CountingRng<R> {
    const fn count(&mut self) {
        self.draws = self.draws.saturating_add(1);
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.count();
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.count();
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.count();
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.count();
        self.rng.try_fill_bytes(dest)
    }
}

/// Derive a per-stream seed from the user seed and a domain tag.
///
/// Uses HMAC-SHA256 so distinct tags yield statistically independent streams
/// while remaining reproducible for a given user seed.
fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Deterministic match resolver.
///
/// Holds the opponent RNG stream (seeded from the user seed via a domain
/// tag) and the pending first move of a two-player duel. Player profile data
/// stays in [`GameState`]; the engine mutates it through explicit calls.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    rng: CountingRng<ChaCha20Rng>,
    pending_duel: Option<Move>,
    seed: u64,
}

impl MatchEngine {
    /// Build an engine whose opponent stream derives from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CountingRng {
                rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"opponent")),
                draws: 0,
            },
            pending_duel: None,
            seed,
        }
    }

    /// Seed the engine was constructed with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of RNG draws consumed so far.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws
    }

    /// Whether a duel is half-submitted and waiting on the second move.
    #[must_use]
    pub const fn awaiting_second_move(&self) -> bool {
        self.pending_duel.is_some()
    }

    /// Drop a half-submitted duel move, e.g. when the mode changes.
    pub const fn clear_pending_duel(&mut self) {
        self.pending_duel = None;
    }

    /// Reseed the opponent stream and forget any half-submitted duel.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = CountingRng {
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"opponent")),
            draws: 0,
        };
        self.pending_duel = None;
    }

    /// Submit the next move.
    ///
    /// Against the computer this resolves immediately. In two-player mode the
    /// first call parks the move and returns
    /// [`RoundProgress::AwaitingOpponent`]; the second call resolves both. A
    /// rejected move never disturbs a parked one.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::MoveLocked`] when the move is outside the
    /// profile's unlocked roster. The profile is untouched on error.
    pub fn submit_move(
        &mut self,
        state: &mut GameState,
        player_move: Move,
        now_ms: u64,
    ) -> Result<RoundProgress, RoundError> {
        if !state.is_unlocked(player_move) {
            return Err(RoundError::MoveLocked(player_move));
        }

        if state.mode.is_duel() {
            let Some(first) = self.pending_duel.take() else {
                self.pending_duel = Some(player_move);
                return Ok(RoundProgress::AwaitingOpponent);
            };
            // Scored from the first submitter's side; the second move plays
            // the opponent role.
            return Ok(RoundProgress::Resolved(self.resolve(
                state,
                first,
                player_move,
                now_ms,
            )));
        }

        let roster = state.unlocked_moves();
        let opponent_move = if state.mode.uses_difficulty() {
            opponent::biased_move(&mut self.rng, player_move, state.difficulty, roster)
        } else {
            opponent::uniform_move(&mut self.rng, roster)
        };
        Ok(RoundProgress::Resolved(self.resolve(
            state,
            player_move,
            opponent_move,
            now_ms,
        )))
    }

    /// Arm a powerup for the next round.
    ///
    /// Spends one charge, counts the use, and records the kind so the next
    /// resolved round carries the attribution. Arming again before the round
    /// resolves replaces the pending kind.
    ///
    /// # Errors
    ///
    /// Returns [`PowerupError::Exhausted`] when no charges remain; the
    /// inventory and usage counter are untouched.
    pub fn activate_powerup(
        &mut self,
        state: &mut GameState,
        kind: PowerupKind,
    ) -> Result<EventList, PowerupError> {
        if !state.powerups.spend(kind) {
            return Err(PowerupError::Exhausted(kind));
        }
        state.powerups_used = state.powerups_used.saturating_add(1);
        state.pending_powerup = Some(kind);
        if debug_log_enabled() {
            println!(
                "Powerup armed: {kind} ({} charges left)",
                state.powerups.charges(kind)
            );
        }
        let mut events = EventList::new();
        events.push(GameEvent::PowerupActivated { kind });
        Ok(events)
    }

    fn resolve(
        &mut self,
        state: &mut GameState,
        player_move: Move,
        opponent_move: Move,
        now_ms: u64,
    ) -> RoundOutcome {
        let outcome = player_move.duel(opponent_move);
        let record = RoundRecord {
            player_move,
            opponent_move,
            outcome,
            powerup: state.pending_powerup.take(),
            timestamp_ms: now_ms,
        };
        state.record_round(record);

        let mut events = EventList::new();
        events.push(GameEvent::RoundResolved { outcome });

        if outcome == Outcome::Win {
            push_level_events(&mut events, &progress::grant_xp(state, XP_PER_WIN));
        }

        for id in achievements::unlock_earned(state) {
            events.push(GameEvent::AchievementUnlocked {
                id,
                xp_bonus: id.xp_bonus(),
            });
            push_level_events(&mut events, &progress::grant_xp(state, id.xp_bonus()));
        }

        if debug_log_enabled() {
            println!(
                "Round: {player_move} vs {opponent_move} -> {outcome} | level {} xp {} streak {}",
                state.level, state.xp, state.streak.current
            );
        }

        RoundOutcome {
            record,
            progress: state.progress(),
            events,
        }
    }
}

fn push_level_events(events: &mut EventList, crossed: &[(u32, LevelReward)]) {
    for &(level, reward) in crossed {
        events.push(GameEvent::LevelUp { level });
        if reward == LevelReward::ExtendedMoves {
            let mut moves = MoveList::new();
            moves.extend(
                Move::EXTENDED
                    .iter()
                    .filter(|m| !Move::BASE.contains(m))
                    .copied(),
            );
            events.push(GameEvent::MovesUnlocked { moves });
        }
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
