//! Declarative achievement catalog.
//!
//! Every entry is a predicate over the profile plus a one-time XP bonus.
//! The engine sweeps the catalog after each resolved round; unlocks are
//! write-once, so an entry can never pay out twice.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    ACHIEVEMENT_ADAPTIVE_XP, ACHIEVEMENT_FIRST_WIN_XP, ACHIEVEMENT_MASTER_XP,
    ACHIEVEMENT_STREAK_XP, MASTER_ACHIEVEMENT_WINS, STREAK_ACHIEVEMENT_LENGTH,
};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementId {
    FirstWin,
    Streak,
    Master,
    Adaptive,
}

impl AchievementId {
    pub const ALL: [AchievementId; 4] = [
        AchievementId::FirstWin,
        AchievementId::Streak,
        AchievementId::Master,
        AchievementId::Adaptive,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstWin => "first-win",
            AchievementId::Streak => "streak",
            AchievementId::Master => "master",
            AchievementId::Adaptive => "adaptive",
        }
    }

    /// Catalog entry for this id. `CATALOG` is ordered by discriminant.
    #[must_use]
    pub fn spec(self) -> &'static AchievementSpec {
        &CATALOG[self as usize]
    }

    #[must_use]
    pub fn xp_bonus(self) -> u32 {
        self.spec().xp_bonus
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-win" => Ok(AchievementId::FirstWin),
            "streak" => Ok(AchievementId::Streak),
            "master" => Ok(AchievementId::Master),
            "adaptive" => Ok(AchievementId::Adaptive),
            _ => Err(()),
        }
    }
}

impl From<AchievementId> for String {
    fn from(value: AchievementId) -> Self {
        value.as_str().to_string()
    }
}

/// One catalog entry: identity, presentation title, bonus and predicate.
pub struct AchievementSpec {
    pub id: AchievementId,
    pub title: &'static str,
    pub xp_bonus: u32,
    check: fn(&GameState) -> bool,
}

impl AchievementSpec {
    #[must_use]
    pub fn earned_by(&self, state: &GameState) -> bool {
        (self.check)(state)
    }
}

fn any_win(state: &GameState) -> bool {
    state.scores.player >= 1
}

fn hot_streak(state: &GameState) -> bool {
    state.streak.current >= STREAK_ACHIEVEMENT_LENGTH
}

fn win_collector(state: &GameState) -> bool {
    state.scores.player >= MASTER_ACHIEVEMENT_WINS
}

fn full_base_coverage(state: &GameState) -> bool {
    state.moves_used.all_base_used()
}

pub const CATALOG: &[AchievementSpec] = &[
    AchievementSpec {
        id: AchievementId::FirstWin,
        title: "First Victory",
        xp_bonus: ACHIEVEMENT_FIRST_WIN_XP,
        check: any_win,
    },
    AchievementSpec {
        id: AchievementId::Streak,
        title: "On Fire!",
        xp_bonus: ACHIEVEMENT_STREAK_XP,
        check: hot_streak,
    },
    AchievementSpec {
        id: AchievementId::Master,
        title: "Master Strategist",
        xp_bonus: ACHIEVEMENT_MASTER_XP,
        check: win_collector,
    },
    AchievementSpec {
        id: AchievementId::Adaptive,
        title: "Adaptive Tactician",
        xp_bonus: ACHIEVEMENT_ADAPTIVE_XP,
        check: full_base_coverage,
    },
];

/// Unlock every catalog entry the profile now satisfies.
///
/// Returns the newly earned ids in catalog order. Ids already present in
/// the profile are skipped, which makes the sweep idempotent.
pub(crate) fn unlock_earned(state: &mut GameState) -> SmallVec<[AchievementId; 2]> {
    let mut earned: SmallVec<[AchievementId; 2]> = SmallVec::new();
    for spec in CATALOG {
        if !state.achievements.contains(&spec.id) && spec.earned_by(state) {
            earned.push(spec.id);
        }
    }
    for id in &earned {
        state.achievements.insert(*id);
    }
    earned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Outcome;

    #[test]
    fn catalog_is_indexed_by_id() {
        assert_eq!(CATALOG.len(), AchievementId::ALL.len());
        for (idx, spec) in CATALOG.iter().enumerate() {
            assert_eq!(spec.id as usize, idx, "{} out of order", spec.id);
        }
    }

    #[test]
    fn id_names_round_trip() {
        for &id in &AchievementId::ALL {
            assert_eq!(id.as_str().parse::<AchievementId>(), Ok(id));
        }
        assert!("combo".parse::<AchievementId>().is_err());
    }

    #[test]
    fn first_win_unlocks_once() {
        let mut state = GameState::default();
        assert!(unlock_earned(&mut state).is_empty());

        state.scores.record(Outcome::Win);
        state.streak.record(Outcome::Win);
        let earned = unlock_earned(&mut state);
        assert_eq!(earned.as_slice(), &[AchievementId::FirstWin]);
        assert!(state.achievements.contains(&AchievementId::FirstWin));

        assert!(
            unlock_earned(&mut state).is_empty(),
            "second sweep must not re-earn"
        );
    }

    #[test]
    fn streak_needs_five_in_a_row() {
        #![allow(clippy::field_reassign_with_default)]
        let mut state = GameState::default();
        state.streak.current = 4;
        assert!(!AchievementId::Streak.spec().earned_by(&state));
        state.streak.current = 5;
        assert!(AchievementId::Streak.spec().earned_by(&state));
    }

    #[test]
    fn master_needs_fifty_wins() {
        #![allow(clippy::field_reassign_with_default)]
        let mut state = GameState::default();
        state.scores.player = 49;
        assert!(!AchievementId::Master.spec().earned_by(&state));
        state.scores.player = 50;
        assert!(AchievementId::Master.spec().earned_by(&state));
    }

    #[test]
    fn adaptive_needs_every_base_move() {
        #![allow(clippy::field_reassign_with_default)]
        let mut state = GameState::default();
        state.moves_used.rock = 3;
        state.moves_used.paper = 1;
        assert!(!AchievementId::Adaptive.spec().earned_by(&state));
        state.moves_used.scissors = 1;
        assert!(AchievementId::Adaptive.spec().earned_by(&state));
    }

    #[test]
    fn multiple_entries_can_land_in_one_sweep() {
        #![allow(clippy::field_reassign_with_default)]
        let mut state = GameState::default();
        state.scores.player = MASTER_ACHIEVEMENT_WINS;
        state.streak.current = STREAK_ACHIEVEMENT_LENGTH;
        let earned = unlock_earned(&mut state);
        assert_eq!(
            earned.as_slice(),
            &[
                AchievementId::FirstWin,
                AchievementId::Streak,
                AchievementId::Master
            ]
        );
    }
}
