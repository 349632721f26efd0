//! Opponent move selection policies.
//!
//! Difficulty shapes the draw only in vs-computer mode. The configured
//! bias chance is the total probability of the biased outcome: the
//! fallback draw never re-rolls a bias target, so easy hands the player a
//! winnable move exactly 70% of the time, not 70% plus a share of the
//! fallback.

use rand::Rng;
use smallvec::SmallVec;

use crate::constants::{EASY_BLUNDER_CHANCE, HARD_COUNTER_CHANCE, IMPOSSIBLE_COUNTER_CHANCE};
use crate::moves::Move;
use crate::state::Difficulty;

type Pool = SmallVec<[Move; 4]>;

/// Uniform draw over a roster.
pub(crate) fn uniform_move<R: Rng>(rng: &mut R, roster: &[Move]) -> Move {
    roster[rng.gen_range(0..roster.len())]
}

/// Difficulty-weighted draw reacting to the player's submitted move.
pub(crate) fn biased_move<R: Rng>(
    rng: &mut R,
    player_move: Move,
    difficulty: Difficulty,
    roster: &'static [Move],
) -> Move {
    match difficulty {
        Difficulty::Medium => uniform_move(rng, roster),
        // The blunder fallback stays on the classic roster.
        Difficulty::Easy => weighted_pick(
            rng,
            EASY_BLUNDER_CHANCE,
            &player_move.victims(),
            roster,
            &Move::BASE,
        ),
        Difficulty::Hard => weighted_pick(
            rng,
            HARD_COUNTER_CHANCE,
            &player_move.counters(),
            roster,
            roster,
        ),
        Difficulty::Impossible => weighted_pick(
            rng,
            IMPOSSIBLE_COUNTER_CHANCE,
            &player_move.counters(),
            roster,
            roster,
        ),
    }
}

/// With probability `chance` draw uniformly from the unlocked `targets`,
/// otherwise uniformly from the non-target rest of `fallback`.
fn weighted_pick<R: Rng>(
    rng: &mut R,
    chance: f64,
    targets: &[Move],
    unlocked: &'static [Move],
    fallback: &'static [Move],
) -> Move {
    let legal: Pool = targets
        .iter()
        .copied()
        .filter(|m| unlocked.contains(m))
        .collect();
    let rest: Pool = fallback
        .iter()
        .copied()
        .filter(|m| !legal.contains(m))
        .collect();

    if !legal.is_empty() && (rest.is_empty() || rng.gen_bool(chance)) {
        uniform_move(rng, &legal)
    } else if rest.is_empty() {
        uniform_move(rng, unlocked)
    } else {
        uniform_move(rng, &rest)
    }
}
