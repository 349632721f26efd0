//! Centralized balance and tuning constants for Throwdown match logic.
//!
//! These values define the deterministic math for scoring and progression.
//! Keeping them together ensures that balance can only be adjusted via code
//! changes reviewed in version control, rather than through external assets.

// Logging ------------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "THROWDOWN_DEBUG_LOGS";

// Opponent bias ------------------------------------------------------------
pub(crate) const EASY_BLUNDER_CHANCE: f64 = 0.70;
pub(crate) const HARD_COUNTER_CHANCE: f64 = 0.70;
pub(crate) const IMPOSSIBLE_COUNTER_CHANCE: f64 = 0.95;

// Progression tuning -------------------------------------------------------
pub(crate) const XP_PER_WIN: u32 = 20;
pub(crate) const XP_LEVEL_STEP: u32 = 100;
pub(crate) const EXTENDED_MOVES_LEVEL: u32 = 5;

// Achievement thresholds ---------------------------------------------------
pub(crate) const ACHIEVEMENT_FIRST_WIN_XP: u32 = 25;
pub(crate) const ACHIEVEMENT_STREAK_XP: u32 = 50;
pub(crate) const ACHIEVEMENT_MASTER_XP: u32 = 100;
pub(crate) const ACHIEVEMENT_ADAPTIVE_XP: u32 = 75;
pub(crate) const STREAK_ACHIEVEMENT_LENGTH: u32 = 5;
pub(crate) const MASTER_ACHIEVEMENT_WINS: u32 = 50;

// Powerup inventory --------------------------------------------------------
pub(crate) const INITIAL_DOUBLE_CHARGES: u32 = 3;
pub(crate) const INITIAL_SHIELD_CHARGES: u32 = 2;
pub(crate) const INITIAL_PEEK_CHARGES: u32 = 1;

// History ------------------------------------------------------------------
pub(crate) const DEFAULT_HISTORY_LIMIT: usize = 10;

// Profile defaults ---------------------------------------------------------
pub(crate) const DEFAULT_PLAYER_NAME: &str = "PLAYER 1";
pub(crate) const DEFAULT_OPPONENT_NAME: &str = "COMPUTER";
