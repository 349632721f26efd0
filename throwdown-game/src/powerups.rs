//! Consumable powerups: inventory accounting and activation errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{INITIAL_DOUBLE_CHARGES, INITIAL_PEEK_CHARGES, INITIAL_SHIELD_CHARGES};

/// A limited-use consumable the player can arm before a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupKind {
    Double,
    Shield,
    Peek,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Double, PowerupKind::Shield, PowerupKind::Peek];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PowerupKind::Double => "double",
            PowerupKind::Shield => "shield",
            PowerupKind::Peek => "peek",
        }
    }
}

impl fmt::Display for PowerupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerupKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "double" => Ok(PowerupKind::Double),
            "shield" => Ok(PowerupKind::Shield),
            "peek" => Ok(PowerupKind::Peek),
            _ => Err(()),
        }
    }
}

/// Activation failures. Neither variant leaves any state change behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PowerupError {
    #[error("unknown powerup '{0}'")]
    Unknown(String),
    #[error("no {0} charges left")]
    Exhausted(PowerupKind),
}

/// Remaining charges per powerup kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupInventory {
    #[serde(default = "default_double_charges")]
    pub double: u32,
    #[serde(default = "default_shield_charges")]
    pub shield: u32,
    #[serde(default = "default_peek_charges")]
    pub peek: u32,
}

fn default_double_charges() -> u32 {
    INITIAL_DOUBLE_CHARGES
}

fn default_shield_charges() -> u32 {
    INITIAL_SHIELD_CHARGES
}

fn default_peek_charges() -> u32 {
    INITIAL_PEEK_CHARGES
}

impl Default for PowerupInventory {
    fn default() -> Self {
        Self {
            double: INITIAL_DOUBLE_CHARGES,
            shield: INITIAL_SHIELD_CHARGES,
            peek: INITIAL_PEEK_CHARGES,
        }
    }
}

impl PowerupInventory {
    #[must_use]
    pub const fn charges(&self, kind: PowerupKind) -> u32 {
        match kind {
            PowerupKind::Double => self.double,
            PowerupKind::Shield => self.shield,
            PowerupKind::Peek => self.peek,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.double + self.shield + self.peek
    }

    /// Consume one charge, or report `false` when none remain.
    pub(crate) const fn spend(&mut self, kind: PowerupKind) -> bool {
        let slot = match kind {
            PowerupKind::Double => &mut self.double,
            PowerupKind::Shield => &mut self.shield,
            PowerupKind::Peek => &mut self.peek,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub(crate) const fn grant(&mut self, kind: PowerupKind, amount: u32) {
        match kind {
            PowerupKind::Double => self.double += amount,
            PowerupKind::Shield => self.shield += amount,
            PowerupKind::Peek => self.peek += amount,
        }
    }

    pub(crate) const fn grant_all(&mut self, amount: u32) {
        self.double += amount;
        self.shield += amount;
        self.peek += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_stock_charges() {
        let inv = PowerupInventory::default();
        assert_eq!(inv.double, 3);
        assert_eq!(inv.shield, 2);
        assert_eq!(inv.peek, 1);
        assert_eq!(inv.total(), 6);
    }

    #[test]
    fn spend_stops_at_zero() {
        let mut inv = PowerupInventory::default();
        assert!(inv.spend(PowerupKind::Peek));
        assert_eq!(inv.peek, 0);
        assert!(!inv.spend(PowerupKind::Peek));
        assert_eq!(inv.peek, 0);
    }

    #[test]
    fn grants_accumulate() {
        let mut inv = PowerupInventory::default();
        inv.grant(PowerupKind::Shield, 2);
        assert_eq!(inv.shield, 4);
        inv.grant_all(1);
        assert_eq!((inv.double, inv.shield, inv.peek), (4, 5, 2));
    }

    #[test]
    fn kind_names_round_trip() {
        for &kind in &PowerupKind::ALL {
            assert_eq!(kind.as_str().parse::<PowerupKind>(), Ok(kind));
        }
        assert!("laser".parse::<PowerupKind>().is_err());
    }

    #[test]
    fn missing_fields_rehydrate_with_stock_counts() {
        let inv: PowerupInventory = serde_json::from_str(r#"{"double":0}"#).unwrap();
        assert_eq!(inv.double, 0);
        assert_eq!(inv.shield, 2);
        assert_eq!(inv.peek, 1);
    }
}
