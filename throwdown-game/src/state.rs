//! Profile state: the single aggregate persisted between sessions.
//!
//! Every field carries a serde default so that blobs written by older
//! builds rehydrate cleanly: persisted values win field by field, missing
//! fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use crate::achievements::AchievementId;
use crate::constants::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_OPPONENT_NAME, DEFAULT_PLAYER_NAME, XP_LEVEL_STEP,
};
use crate::history::RoundRecord;
use crate::moves::{Move, Outcome};
use crate::numbers::percent_u32;
use crate::powerups::{PowerupInventory, PowerupKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    #[default]
    VsComputer,
    VsPlayer,
    Tournament,
    Survival,
}

impl GameMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GameMode::VsComputer => "vs-computer",
            GameMode::VsPlayer => "vs-player",
            GameMode::Tournament => "tournament",
            GameMode::Survival => "survival",
        }
    }

    /// Difficulty bias only applies against the computer opponent.
    #[must_use]
    pub const fn uses_difficulty(self) -> bool {
        matches!(self, GameMode::VsComputer)
    }

    /// Whether rounds resolve from two human submissions.
    #[must_use]
    pub const fn is_duel(self) -> bool {
        matches!(self, GameMode::VsPlayer)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vs-computer" => Ok(GameMode::VsComputer),
            "vs-player" => Ok(GameMode::VsPlayer),
            "tournament" => Ok(GameMode::Tournament),
            "survival" => Ok(GameMode::Survival),
            _ => Err(()),
        }
    }
}

impl From<GameMode> for String {
    fn from(value: GameMode) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Impossible,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Impossible => "impossible",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "impossible" => Ok(Difficulty::Impossible),
            _ => Err(()),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}

/// Cumulative round tallies. Authoritative even after history truncates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScoreBoard {
    #[serde(default)]
    pub player: u32,
    #[serde(default)]
    pub opponent: u32,
    #[serde(default)]
    pub ties: u32,
}

impl ScoreBoard {
    #[must_use]
    pub const fn rounds_total(&self) -> u32 {
        self.player + self.opponent + self.ties
    }

    pub(crate) const fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.player += 1,
            Outcome::Loss => self.opponent += 1,
            Outcome::Tie => self.ties += 1,
        }
    }
}

/// Consecutive-win tracking. `longest` is monotone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreakState {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub longest: u32,
}

impl StreakState {
    pub(crate) fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => {
                self.current += 1;
                self.longest = self.longest.max(self.current);
            }
            Outcome::Loss => self.current = 0,
            Outcome::Tie => {}
        }
    }
}

/// Lifetime pick counts per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MoveUsage {
    #[serde(default)]
    pub rock: u32,
    #[serde(default)]
    pub paper: u32,
    #[serde(default)]
    pub scissors: u32,
    #[serde(default)]
    pub lizard: u32,
    #[serde(default)]
    pub spock: u32,
}

impl MoveUsage {
    #[must_use]
    pub const fn count(&self, m: Move) -> u32 {
        match m {
            Move::Rock => self.rock,
            Move::Paper => self.paper,
            Move::Scissors => self.scissors,
            Move::Lizard => self.lizard,
            Move::Spock => self.spock,
        }
    }

    #[must_use]
    pub const fn all_base_used(&self) -> bool {
        self.rock > 0 && self.paper > 0 && self.scissors > 0
    }

    pub(crate) const fn bump(&mut self, m: Move) {
        match m {
            Move::Rock => self.rock += 1,
            Move::Paper => self.paper += 1,
            Move::Scissors => self.scissors += 1,
            Move::Lizard => self.lizard += 1,
            Move::Spock => self.spock += 1,
        }
    }
}

/// Presentation preferences carried in the profile blob. The engine
/// round-trips these untouched; only the UI layer interprets them.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_player_name")]
    pub player_name: String,
    #[serde(default = "default_opponent_name")]
    pub opponent_name: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_enabled")]
    pub sound: bool,
    #[serde(default = "default_enabled")]
    pub music: bool,
    #[serde(default = "default_enabled")]
    pub animations: bool,
    #[serde(default = "default_enabled")]
    pub effects: bool,
}

fn default_player_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}

fn default_opponent_name() -> String {
    DEFAULT_OPPONENT_NAME.to_string()
}

fn default_theme() -> String {
    String::from("default")
}

fn default_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            opponent_name: default_opponent_name(),
            theme: default_theme(),
            sound: true,
            music: true,
            animations: true,
            effects: true,
        }
    }
}

fn default_level() -> u32 {
    1
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub scores: ScoreBoard,
    #[serde(default)]
    pub streak: StreakState,
    #[serde(default = "default_level")]
    pub level: u32,
    /// XP accumulated toward the next level, remainder after level-ups.
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub powerups: PowerupInventory,
    #[serde(default)]
    pub powerups_used: u32,
    /// Powerup armed for the next round, attributed when it resolves.
    #[serde(default)]
    pub pending_powerup: Option<PowerupKind>,
    #[serde(default)]
    pub achievements: HashSet<AchievementId>,
    #[serde(default)]
    pub moves_used: MoveUsage,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Most-recent-first display feed, truncated to `history_limit`.
    #[serde(default)]
    pub history: VecDeque<RoundRecord>,
    /// Whether lizard and spock have been unlocked by level rewards.
    #[serde(default)]
    pub extended_moves: bool,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            scores: ScoreBoard::default(),
            streak: StreakState::default(),
            level: default_level(),
            xp: 0,
            powerups: PowerupInventory::default(),
            powerups_used: 0,
            pending_powerup: None,
            achievements: HashSet::new(),
            moves_used: MoveUsage::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            history: VecDeque::new(),
            extended_moves: false,
            settings: Settings::default(),
        }
    }
}

impl GameState {
    #[must_use]
    pub const fn unlocked_moves(&self) -> &'static [Move] {
        Move::roster(self.extended_moves)
    }

    #[must_use]
    pub fn is_unlocked(&self, m: Move) -> bool {
        self.unlocked_moves().contains(&m)
    }

    /// Total XP required to finish the current level.
    #[must_use]
    pub const fn level_threshold(&self) -> u32 {
        XP_LEVEL_STEP.saturating_mul(self.level)
    }

    /// XP still missing for the next level-up.
    #[must_use]
    pub const fn xp_to_next(&self) -> u32 {
        self.level_threshold().saturating_sub(self.xp)
    }

    /// Rounded share of wins across every resolved round, in percent.
    #[must_use]
    pub fn win_rate_percent(&self) -> i32 {
        percent_u32(self.scores.player, self.scores.rounds_total())
    }

    /// Fold one resolved round into tallies, usage and the history feed.
    pub(crate) fn record_round(&mut self, record: RoundRecord) {
        self.moves_used.bump(record.player_move);
        self.scores.record(record.outcome);
        self.streak.record(record.outcome);
        self.history.push_front(record);
        self.history.truncate(self.history_limit);
    }

    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            level: self.level,
            xp: self.xp,
            xp_to_next: self.xp_to_next(),
            scores: self.scores,
            streak: self.streak,
            win_rate_percent: self.win_rate_percent(),
        }
    }
}

/// Read-only progression summary bundled into each round outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub scores: ScoreBoard,
    pub streak: StreakState,
    pub win_rate_percent: i32,
}
