//! Dice formulas for randomized prototype fields
//!
//! Catalog files cannot hold closures, so randomized stats are written as
//! formulas like "2d6+3" and turned into deferred values at load time.
//! Rolling takes an injected roller so the domain stays free of RNG state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected XdY or XdY+Z
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
    /// Modifier pushes the roll range past `i32`
    #[error("Modifier value overflow")]
    ModifierOverflow,
}

/// A parsed dice formula like "2d6+3"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Number of dice to roll (X in XdY)
    pub dice_count: u8,
    /// Size of each die (Y in XdY)
    pub die_size: u8,
    /// Modifier added after rolling (+Z or -Z)
    pub modifier: i32,
}

impl DiceFormula {
    pub fn new(dice_count: u8, die_size: u8, modifier: i32) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        let highest = (dice_count as i32) * (die_size as i32);
        if highest.checked_add(modifier).is_none() {
            return Err(DiceParseError::ModifierOverflow);
        }
        Ok(Self {
            dice_count,
            die_size,
            modifier,
        })
    }

    /// Parse "XdY", "XdY+Z", "XdY-Z" or the "dY" shorthand.
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_ascii_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let (count_str, rest) = input.split_once('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let dice_count: u8 = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", count_str))
            })?
        };

        let (size_str, modifier) = match rest.find(['+', '-']) {
            Some(0) => {
                return Err(DiceParseError::InvalidFormat(format!(
                    "Invalid die size: '{}'",
                    rest
                )))
            }
            Some(pos) => {
                let (size, signed) = rest.split_at(pos);
                let modifier: i32 = signed.trim_start_matches('+').parse().map_err(|_| {
                    DiceParseError::InvalidFormat(format!("Invalid modifier: '{}'", signed))
                })?;
                (size, modifier)
            }
            None => (rest, 0),
        };

        let die_size: u8 = size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", size_str))
        })?;

        Self::new(dice_count, die_size, modifier)
    }

    /// Roll using `roller(min, max)`, which must return a value in `min..=max`.
    pub fn roll_with(&self, mut roller: impl FnMut(i32, i32) -> i32) -> i32 {
        let dice_total = (0..self.dice_count)
            .map(|_| roller(1, self.die_size as i32))
            .fold(0i32, i32::saturating_add);
        dice_total.saturating_add(self.modifier)
    }

    /// Get the minimum possible roll
    pub fn min_roll(&self) -> i32 {
        (self.dice_count as i32).saturating_add(self.modifier)
    }

    /// Get the maximum possible roll
    pub fn max_roll(&self) -> i32 {
        (self.dice_count as i32 * self.die_size as i32).saturating_add(self.modifier)
    }
}

impl FromStr for DiceFormula {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            0 => write!(f, "{}d{}", self.dice_count, self.die_size),
            m if m > 0 => write!(f, "{}d{}+{}", self.dice_count, self.die_size, m),
            m => write!(f, "{}d{}{}", self.dice_count, self.die_size, m),
        }
    }
}
