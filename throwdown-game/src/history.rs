//! Round records kept in the bounded history feed.
//!
//! History is a display log. Cumulative counters on the profile are the
//! source of truth; once the feed truncates they will disagree by design
//! of the cap, so nothing here is ever re-aggregated into stats.

use serde::{Deserialize, Serialize};

use crate::moves::{Move, Outcome};
use crate::powerups::PowerupKind;

/// One resolved round, newest entries sit at the front of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub player_move: Move,
    pub opponent_move: Move,
    pub outcome: Outcome,
    /// Powerup armed when the round resolved, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powerup: Option<PowerupKind>,
    /// Milliseconds since the Unix epoch, supplied by the platform clock.
    pub timestamp_ms: u64,
}

impl RoundRecord {
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }

    /// Compact single-line form for logs and reports.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.powerup {
            Some(p) => format!(
                "{} vs {} -> {} ({})",
                self.player_move, self.opponent_move, self.outcome, p
            ),
            None => format!(
                "{} vs {} -> {}",
                self.player_move, self.opponent_move, self.outcome
            ),
        }
    }
}
