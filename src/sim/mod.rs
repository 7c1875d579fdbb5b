//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-based integration only (no wall-clock time)
//! - Seeded RNG only, owned by the strategy that needs it
//! - Stable iteration order (week-major grid order)
//! - No rendering or I/O dependencies

pub mod collision;
pub mod state;
pub mod strategy;
pub mod tick;

pub use collision::{Hit, Rect, paddle_bounce, reflect, sweep_point_plane, sweep_point_rect};
pub use state::{
    Ball, Brick, BrickView, BrickWall, FrameState, GamePhase, GameState, Outcome, Paddle,
    Playfield,
};
pub use strategy::Strategy;
pub use tick::{Simulation, TickEvents, tick};

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::NaiveDate;

    use crate::calendar::{ActivityCalendar, ActivityDay};
    use crate::config::SimConfig;

    use super::state::{BrickWall, GameState};

    /// Calendar starting on a fixed Sunday, one count per day
    pub(crate) fn calendar_from_counts(counts: &[u32]) -> ActivityCalendar {
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let days = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| ActivityDay {
                date: start + chrono::Days::new(i as u64),
                count,
            })
            .collect();
        ActivityCalendar::from_days(days).unwrap()
    }

    /// Config narrow enough for single-week playfields
    pub(crate) fn narrow_config() -> SimConfig {
        SimConfig {
            paddle_width: 24.0,
            ..SimConfig::default()
        }
    }

    pub(crate) fn state_from_counts(counts: &[u32], cfg: &SimConfig) -> GameState {
        let cal = calendar_from_counts(counts);
        let wall = BrickWall::from_calendar(&cal, &cfg.tiers);
        GameState::new(wall, cfg).unwrap()
    }
}
