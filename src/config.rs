//! Simulation configuration
//!
//! A single validated structure built once before the simulation starts.
//! Validation is eager: a bad strategy name or a non-positive physical
//! constant fails construction, never mid-run.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Error;

/// Paddle control policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Track the ball's x position
    Follow,
    /// Clear columns left to right
    Column,
    /// Clear rows bottom to top in a serpentine sweep
    Row,
    /// Target a seeded-random column among those still holding bricks
    Random,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Follow => "follow",
            StrategyKind::Column => "column",
            StrategyKind::Row => "row",
            StrategyKind::Random => "random",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "follow" => Ok(StrategyKind::Follow),
            "column" => Ok(StrategyKind::Column),
            "row" => Ok(StrategyKind::Row),
            "random" => Ok(StrategyKind::Random),
            other => Err(Error::config(format!(
                "unknown strategy '{other}' (expected follow|column|row|random)"
            ))),
        }
    }
}

/// Commit-count quantization into brick strength tiers
///
/// A day with zero commits yields no brick. Otherwise the strength is
/// 1 + the number of thresholds the count reaches, so the defaults map
/// 1-3 to strength 1, 4-9 to 2, 10-19 to 3 and 20+ to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthTiers {
    pub thresholds: [u32; 3],
}

impl Default for StrengthTiers {
    fn default() -> Self {
        Self {
            thresholds: [4, 10, 20],
        }
    }
}

impl StrengthTiers {
    /// Strength tier for a day's commit count; 0 means no brick.
    pub fn strength_for(&self, count: u32) -> u8 {
        if count == 0 {
            return 0;
        }
        1 + self.thresholds.iter().filter(|&&t| count >= t).count() as u8
    }

    /// Highest strength a brick can start with
    pub fn max_strength(&self) -> u8 {
        1 + self.thresholds.len() as u8
    }

    fn validate(&self) -> Result<(), Error> {
        if self.thresholds[0] < 2 {
            return Err(Error::config(
                "first strength threshold must be at least 2",
            ));
        }
        if !self.thresholds.is_sorted() || self.thresholds.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::config(
                "strength thresholds must be strictly increasing",
            ));
        }
        Ok(())
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Paddle control policy
    pub strategy: StrategyKind,
    /// Seed for strategy-owned randomness (fixed default for reproducibility)
    pub seed: u64,
    /// Tick cap: reaching it ends the run as Stalled
    pub max_ticks: u64,
    /// Ball speed, world units per tick
    pub ball_speed: f64,
    /// Maximum paddle travel per tick
    pub paddle_speed: f64,
    /// Paddle width, world units
    pub paddle_width: f64,
    /// Commit-count quantization
    pub tiers: StrengthTiers,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Random,
            seed: DEFAULT_SEED,
            max_ticks: MAX_TICKS,
            ball_speed: BALL_SPEED,
            paddle_speed: PADDLE_SPEED,
            paddle_width: PADDLE_WIDTH,
            tiers: StrengthTiers::default(),
        }
    }
}

impl SimConfig {
    /// Check every field before the simulation is built.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_ticks == 0 {
            return Err(Error::config("max_ticks must be positive"));
        }
        if !(self.ball_speed > 0.0) {
            return Err(Error::config("ball_speed must be positive"));
        }
        if !(self.paddle_speed > 0.0) {
            return Err(Error::config("paddle_speed must be positive"));
        }
        if !(self.paddle_width > 0.0) {
            return Err(Error::config("paddle_width must be positive"));
        }
        self.tiers.validate()
    }
}
