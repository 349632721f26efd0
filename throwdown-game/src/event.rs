//! Structured events raised by engine operations.
//!
//! Events are fire-and-forget hints for decorative collaborators (audio,
//! particles, toasts). The engine never reads them back; dropping the
//! whole list is always safe.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::achievements::AchievementId;
use crate::moves::{Move, Outcome};
use crate::powerups::PowerupKind;

/// Inline-capacity list for the handful of events one operation can raise.
pub type EventList = SmallVec<[GameEvent; 4]>;

/// Inline-capacity list for move unlock payloads.
pub type MoveList = SmallVec<[Move; 2]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    RoundResolved { outcome: Outcome },
    PowerupActivated { kind: PowerupKind },
    AchievementUnlocked { id: AchievementId, xp_bonus: u32 },
    LevelUp { level: u32 },
    MovesUnlocked { moves: MoveList },
    ProfileReset,
    /// A corrupt blob was replaced with a fresh default profile.
    ProfileRecovered,
}
