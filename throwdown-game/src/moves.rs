//! Move roster and duel resolution.
//!
//! The beats relation is total over the five-move roster; the classic
//! three-move game is the same table restricted to the base roster.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A throwable hand shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    Lizard,
    Spock,
}

impl Move {
    /// The classic three-move roster.
    pub const BASE: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// The full roster once lizard and spock are unlocked.
    pub const EXTENDED: [Move; 5] = [
        Move::Rock,
        Move::Paper,
        Move::Scissors,
        Move::Lizard,
        Move::Spock,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
            Move::Lizard => "lizard",
            Move::Spock => "spock",
        }
    }

    #[must_use]
    pub const fn roster(extended: bool) -> &'static [Move] {
        if extended { &Self::EXTENDED } else { &Self::BASE }
    }

    /// Whether this move defeats `other`.
    #[must_use]
    pub const fn beats(self, other: Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors | Move::Lizard)
                | (Move::Paper, Move::Rock | Move::Spock)
                | (Move::Scissors, Move::Paper | Move::Lizard)
                | (Move::Lizard, Move::Spock | Move::Paper)
                | (Move::Spock, Move::Scissors | Move::Rock)
        )
    }

    /// Moves this move defeats.
    #[must_use]
    pub const fn victims(self) -> [Move; 2] {
        match self {
            Move::Rock => [Move::Scissors, Move::Lizard],
            Move::Paper => [Move::Rock, Move::Spock],
            Move::Scissors => [Move::Paper, Move::Lizard],
            Move::Lizard => [Move::Spock, Move::Paper],
            Move::Spock => [Move::Scissors, Move::Rock],
        }
    }

    /// Moves that defeat this move.
    #[must_use]
    pub const fn counters(self) -> [Move; 2] {
        match self {
            Move::Rock => [Move::Paper, Move::Spock],
            Move::Paper => [Move::Scissors, Move::Lizard],
            Move::Scissors => [Move::Rock, Move::Spock],
            Move::Lizard => [Move::Rock, Move::Scissors],
            Move::Spock => [Move::Paper, Move::Lizard],
        }
    }

    /// Resolve a duel from this move's perspective.
    #[must_use]
    pub fn duel(self, other: Move) -> Outcome {
        if self == other {
            Outcome::Tie
        } else if self.beats(other) {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            "lizard" => Ok(Move::Lizard),
            "spock" => Ok(Move::Spock),
            _ => Err(()),
        }
    }
}

impl From<Move> for String {
    fn from(value: Move) -> Self {
        value.as_str().to_string()
    }
}

/// Result of a resolved round from the acting player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Tie => "tie",
        }
    }

    /// The same result seen from the other side of the table.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Outcome> for String {
    fn from(value: Outcome) -> Self {
        value.as_str().to_string()
    }
}
