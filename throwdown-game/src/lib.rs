//! Throwdown Game Engine
//!
//! Platform-agnostic core logic for the Throwdown hand-duel game.
//! This crate provides match resolution, progression, and persistence seams
//! without UI or platform-specific dependencies.

pub mod achievements;
pub mod constants;
pub mod engine;
pub mod event;
pub mod history;
pub mod moves;
pub mod numbers;
mod opponent;
pub mod powerups;
pub mod progress;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use achievements::{AchievementId, AchievementSpec};
pub use engine::{MatchEngine, RoundError, RoundOutcome, RoundProgress};
pub use event::{EventList, GameEvent, MoveList};
pub use history::RoundRecord;
pub use moves::{Move, Outcome};
pub use powerups::{PowerupError, PowerupInventory, PowerupKind};
pub use progress::{LevelReward, reward_for_level};
pub use session::GameSession;
pub use state::{
    Difficulty, GameMode, GameState, MoveUsage, ProgressSnapshot, ScoreBoard, Settings,
    StreakState,
};

/// Trait for abstracting profile persistence.
/// Platform-specific implementations should provide this.
pub trait ProfileStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write one named profile blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn save_profile(&self, profile_name: &str, payload: &str) -> Result<(), Self::Error>;

    /// Read one named profile blob, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load_profile(&self, profile_name: &str) -> Result<Option<String>, Self::Error>;

    /// Remove one named profile blob. Removing an absent blob is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be removed.
    fn clear_profile(&self, profile_name: &str) -> Result<(), Self::Error>;
}

/// Trait for abstracting wall-clock reads, keeping the engine free of
/// platform time calls. Implementations return epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// In-memory profile store for tests and headless embedding.
///
/// Clones share the same backing map, so a session and a test can watch
/// the same blobs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

impl ProfileStorage for MemoryStore {
    type Error = std::convert::Infallible;

    fn save_profile(&self, profile_name: &str, payload: &str) -> Result<(), Self::Error> {
        self.blobs
            .borrow_mut()
            .insert(profile_name.to_string(), payload.to_string());
        Ok(())
    }

    fn load_profile(&self, profile_name: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.blobs.borrow().get(profile_name).cloned())
    }

    fn clear_profile(&self, profile_name: &str) -> Result<(), Self::Error> {
        self.blobs.borrow_mut().remove(profile_name);
        Ok(())
    }
}
