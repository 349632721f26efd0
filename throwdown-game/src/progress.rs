//! XP accounting and the level reward ladder.
//!
//! The threshold for leaving level L is `100 * L`, so one large grant can
//! cross several levels; every crossed level pays its reward, not just the
//! first.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::EXTENDED_MOVES_LEVEL;
use crate::powerups::PowerupKind;
use crate::state::GameState;

/// Payout applied when a level is crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LevelReward {
    /// Extra charges of one powerup kind.
    Powerup { kind: PowerupKind, amount: u32 },
    /// Extra charges of every powerup kind.
    Bundle { amount: u32 },
    /// Lizard and spock join the roster.
    ExtendedMoves,
}

/// Fixed payouts for named levels; every other level pays `FALLBACK_REWARD`.
const REWARD_LADDER: &[(u32, LevelReward)] = &[
    (
        2,
        LevelReward::Powerup {
            kind: PowerupKind::Double,
            amount: 2,
        },
    ),
    (
        3,
        LevelReward::Powerup {
            kind: PowerupKind::Shield,
            amount: 1,
        },
    ),
    (EXTENDED_MOVES_LEVEL, LevelReward::ExtendedMoves),
    (10, LevelReward::Bundle { amount: 2 }),
];

const FALLBACK_REWARD: LevelReward = LevelReward::Bundle { amount: 1 };

#[must_use]
pub fn reward_for_level(level: u32) -> LevelReward {
    REWARD_LADDER
        .iter()
        .find(|(at, _)| *at == level)
        .map_or(FALLBACK_REWARD, |(_, reward)| *reward)
}

/// Add XP and run the compounding level-up loop.
///
/// Returns every `(new_level, reward)` pair crossed by this grant, in
/// ascending order. The loop terminates because the threshold grows with
/// the level while the remaining XP only shrinks.
pub(crate) fn grant_xp(state: &mut GameState, amount: u32) -> SmallVec<[(u32, LevelReward); 2]> {
    state.xp = state.xp.saturating_add(amount);
    let mut crossed: SmallVec<[(u32, LevelReward); 2]> = SmallVec::new();
    while state.xp >= state.level_threshold() {
        state.xp -= state.level_threshold();
        state.level += 1;
        let reward = reward_for_level(state.level);
        apply_reward(state, reward);
        crossed.push((state.level, reward));
    }
    crossed
}

fn apply_reward(state: &mut GameState, reward: LevelReward) {
    match reward {
        LevelReward::Powerup { kind, amount } => state.powerups.grant(kind, amount),
        LevelReward::Bundle { amount } => state.powerups.grant_all(amount),
        LevelReward::ExtendedMoves => state.extended_moves = true,
    }
}
