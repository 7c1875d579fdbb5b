//! Game state and core simulation types
//!
//! Everything that must be reproducible lives here. The brick grid's shape
//! is fixed at construction; only brick strength and the destroyed flag
//! evolve afterwards.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::calendar::ActivityCalendar;
use crate::config::{SimConfig, StrengthTiers};
use crate::consts::*;
use crate::error::Error;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Inputs are being validated; never observable in an emitted frame
    Init,
    /// Active simulation
    Playing,
    /// All bricks destroyed (terminal)
    Cleared,
    /// Tick cap reached with bricks left (terminal)
    Stalled,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Cleared | GamePhase::Stalled)
    }
}

/// How a finished run ended
///
/// Stalled is a recognized completion, not an error - the caller decides
/// whether a partial game is still worth rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Cleared,
    Stalled,
}

/// One brick in the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    pub col: usize,
    pub row: usize,
    pub strength: u8,
    pub max_strength: u8,
    pub destroyed: bool,
}

impl Brick {
    /// Apply one hit. Returns true if this hit destroyed the brick.
    /// A destroyed brick is inert and never takes further damage.
    pub fn hit(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.strength = self.strength.saturating_sub(1);
        if self.strength == 0 {
            self.destroyed = true;
            return true;
        }
        false
    }
}

/// Fixed-shape brick grid built once from calendar data
///
/// Week-major layout: column = week index, row = weekday index. Days with
/// zero activity hold no brick and never count toward the remaining total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickWall {
    cols: usize,
    cells: Vec<Option<Brick>>,
}

impl BrickWall {
    /// Quantize a calendar into bricks.
    pub fn from_calendar(calendar: &ActivityCalendar, tiers: &StrengthTiers) -> Self {
        let cols = calendar.weeks();
        let mut cells = vec![None; cols * GRID_ROWS];
        for (i, day) in calendar.days().iter().enumerate() {
            let strength = tiers.strength_for(day.count);
            if strength > 0 {
                let (col, row) = (i / GRID_ROWS, i % GRID_ROWS);
                cells[col * GRID_ROWS + row] = Some(Brick {
                    col,
                    row,
                    strength,
                    max_strength: strength,
                    destroyed: false,
                });
            }
        }
        Self { cols, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        GRID_ROWS
    }

    pub fn brick(&self, col: usize, row: usize) -> Option<&Brick> {
        if row >= GRID_ROWS {
            return None;
        }
        self.cells.get(col * GRID_ROWS + row)?.as_ref()
    }

    pub fn brick_mut(&mut self, col: usize, row: usize) -> Option<&mut Brick> {
        if row >= GRID_ROWS {
            return None;
        }
        self.cells.get_mut(col * GRID_ROWS + row)?.as_mut()
    }

    /// Bricks not yet destroyed, in week-major order (stable for determinism)
    pub fn alive(&self) -> impl Iterator<Item = &Brick> {
        self.cells
            .iter()
            .filter_map(|c| c.as_ref())
            .filter(|b| !b.destroyed)
    }

    /// Count of bricks not yet destroyed
    pub fn remaining(&self) -> usize {
        self.alive().count()
    }

    pub fn is_cleared(&self) -> bool {
        self.alive().next().is_none()
    }

    /// Bricks the wall started with
    pub fn total(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    pub fn column_remaining(&self, col: usize) -> usize {
        self.alive().filter(|b| b.col == col).count()
    }

    pub fn row_remaining(&self, row: usize) -> usize {
        self.alive().filter(|b| b.row == row).count()
    }
}

/// The game ball
///
/// Velocity is world units per tick; its magnitude is conserved across all
/// collisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
}

/// The autonomous paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f64,
    /// Top edge (fixed)
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Paddle {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            DVec2::new(self.x, self.y),
            DVec2::new(self.x + self.width, self.y + self.height),
        )
    }

    /// Step toward `target_x` (left edge), clamped to the field and to the
    /// per-tick speed limit.
    pub fn move_toward(&mut self, target_x: f64, max_step: f64, field_width: f64) {
        let max_x = (field_width - self.width).max(0.0);
        let target = target_x.clamp(0.0, max_x);
        let delta = (target - self.x).clamp(-max_step, max_step);
        self.x += delta;
    }
}

/// World-coordinate layout of the playfield
///
/// y grows downward. Walls sit at x=0, x=width and y=0; the bottom bound at
/// y=height also reflects, so a paddle miss never ends the run early.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub cols: usize,
    pub width: f64,
    pub height: f64,
}

impl Playfield {
    pub fn new(cols: usize) -> Self {
        let width = 2.0 * WALL_INSET + cols as f64 * CELL_PITCH - CELL_GAP;
        let height = WALL_INSET + GRID_ROWS as f64 * CELL_PITCH - CELL_GAP + PADDLE_GAP;
        Self { cols, width, height }
    }

    /// World rectangle of a grid cell
    pub fn brick_rect(&self, col: usize, row: usize) -> Rect {
        let x0 = WALL_INSET + col as f64 * CELL_PITCH;
        let y0 = WALL_INSET + row as f64 * CELL_PITCH;
        Rect::new(
            DVec2::new(x0, y0),
            DVec2::new(x0 + CELL_SIZE, y0 + CELL_SIZE),
        )
    }

    /// Horizontal center of a column
    pub fn column_center_x(&self, col: usize) -> f64 {
        WALL_INSET + col as f64 * CELL_PITCH + CELL_SIZE / 2.0
    }

    /// Paddle top edge
    pub fn paddle_y(&self) -> f64 {
        self.height - PADDLE_RAISE
    }
}

/// Aggregate simulation state, exclusively owned by the running loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub playfield: Playfield,
    pub wall: BrickWall,
    pub ball: Ball,
    pub paddle: Paddle,
    pub score: u64,
    pub tick: u64,
    pub phase: GamePhase,
    pub destroyed_bricks: usize,
}

impl GameState {
    /// Validate inputs and place the entities.
    ///
    /// Transitions Init -> Playing, or straight to Cleared when the wall has
    /// nothing to destroy.
    pub fn new(wall: BrickWall, cfg: &SimConfig) -> Result<Self, Error> {
        if wall.cols() == 0 {
            return Err(Error::data("brick wall has no columns"));
        }
        let playfield = Playfield::new(wall.cols());
        if cfg.paddle_width > playfield.width {
            return Err(Error::config(format!(
                "paddle width {} exceeds playfield width {}",
                cfg.paddle_width, playfield.width
            )));
        }

        let paddle = Paddle {
            x: (playfield.width - cfg.paddle_width) / 2.0,
            y: playfield.paddle_y(),
            width: cfg.paddle_width,
            height: PADDLE_HEIGHT,
        };

        // Serve from just above the paddle center, angled slightly off
        // vertical so the opening rally is not a straight column bounce
        let angle = LAUNCH_ANGLE_DEG.to_radians();
        let ball = Ball {
            pos: DVec2::new(paddle.center_x(), paddle.y - BALL_RADIUS - 1.0),
            vel: DVec2::new(cfg.ball_speed * angle.sin(), -cfg.ball_speed * angle.cos()),
            radius: BALL_RADIUS,
        };

        let mut state = Self {
            playfield,
            wall,
            ball,
            paddle,
            score: 0,
            tick: 0,
            phase: GamePhase::Init,
            destroyed_bricks: 0,
        };
        state.phase = if state.wall.is_cleared() {
            GamePhase::Cleared
        } else {
            GamePhase::Playing
        };
        Ok(state)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Cleared => Some(Outcome::Cleared),
            GamePhase::Stalled => Some(Outcome::Stalled),
            _ => None,
        }
    }

    /// Immutable snapshot for frame emission
    pub fn snapshot(&self) -> FrameState {
        FrameState {
            tick: self.tick,
            phase: self.phase,
            score: self.score,
            ball: self.ball,
            paddle: self.paddle,
            bricks: self
                .wall
                .alive()
                .map(|b| BrickView {
                    col: b.col,
                    row: b.row,
                    strength: b.strength,
                    max_strength: b.max_strength,
                })
                .collect(),
            remaining: self.wall.remaining(),
        }
    }
}

/// A brick as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickView {
    pub col: usize,
    pub row: usize,
    pub strength: u8,
    pub max_strength: u8,
}

/// Snapshot of the game at a tick boundary - the unit handed to rendering.
/// Never mutated after emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Bricks still standing, week-major order
    pub bricks: Vec<BrickView>,
    pub remaining: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testutil::calendar_from_counts;

    #[test]
    fn test_wall_from_calendar_skips_zero_days() {
        // One week: two active days
        let cal = calendar_from_counts(&[0, 3, 0, 0, 12, 0, 0]);
        let wall = BrickWall::from_calendar(&cal, &StrengthTiers::default());

        assert_eq!(wall.cols(), 1);
        assert_eq!(wall.total(), 2);
        assert_eq!(wall.remaining(), 2);
        assert!(wall.brick(0, 0).is_none());
        assert_eq!(wall.brick(0, 1).unwrap().strength, 1);
        assert_eq!(wall.brick(0, 4).unwrap().strength, 3);
    }

    #[test]
    fn test_brick_hit_lifecycle() {
        let cal = calendar_from_counts(&[0, 0, 0, 0, 5, 0, 0]);
        let mut wall = BrickWall::from_calendar(&cal, &StrengthTiers::default());

        let brick = wall.brick_mut(0, 4).unwrap();
        assert_eq!(brick.strength, 2);
        assert!(!brick.hit());
        assert_eq!(brick.strength, 1);
        assert!(brick.hit());
        assert!(brick.destroyed);
        // Inert afterwards
        assert!(!brick.hit());
        assert_eq!(brick.strength, 0);

        assert_eq!(wall.remaining(), 0);
        assert!(wall.is_cleared());
        assert_eq!(wall.total(), 1);
    }

    #[test]
    fn test_column_major_placement() {
        // Two weeks; brick only on the second week's third day
        let mut counts = vec![0u32; 14];
        counts[7 + 2] = 1;
        let cal = calendar_from_counts(&counts);
        let wall = BrickWall::from_calendar(&cal, &StrengthTiers::default());

        assert_eq!(wall.cols(), 2);
        let brick = wall.brick(1, 2).unwrap();
        assert_eq!((brick.col, brick.row), (1, 2));
        assert_eq!(wall.column_remaining(0), 0);
        assert_eq!(wall.column_remaining(1), 1);
        assert_eq!(wall.row_remaining(2), 1);
    }

    #[test]
    fn test_empty_wall_starts_cleared() {
        let cal = calendar_from_counts(&[0; 7]);
        let wall = BrickWall::from_calendar(&cal, &StrengthTiers::default());
        let state = GameState::new(wall, &crate::sim::testutil::narrow_config()).unwrap();
        assert_eq!(state.phase, GamePhase::Cleared);
        assert_eq!(state.outcome(), Some(Outcome::Cleared));
    }

    #[test]
    fn test_paddle_wider_than_field_rejected() {
        let cal = calendar_from_counts(&[1; 7]);
        let wall = BrickWall::from_calendar(&cal, &StrengthTiers::default());
        // One-week field is far narrower than the default paddle
        let err = GameState::new(wall, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_initial_placement() {
        let cal = calendar_from_counts(&[1; 70]);
        let wall = BrickWall::from_calendar(&cal, &StrengthTiers::default());
        let cfg = SimConfig::default();
        let state = GameState::new(wall, &cfg).unwrap();

        assert_eq!(state.phase, GamePhase::Playing);
        let speed = state.ball.vel.length();
        assert!((speed - cfg.ball_speed).abs() < SPEED_EPSILON);
        // Serving upward from above the paddle
        assert!(state.ball.vel.y < 0.0);
        assert!(state.ball.pos.y < state.paddle.y);
        assert!((state.paddle.center_x() - state.playfield.width / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_paddle_move_clamps() {
        let mut paddle = Paddle {
            x: 10.0,
            y: 0.0,
            width: 20.0,
            height: 4.0,
        };
        // Speed clamp
        paddle.move_toward(100.0, 5.0, 100.0);
        assert_eq!(paddle.x, 15.0);
        // Field clamp
        paddle.move_toward(1000.0, 1000.0, 100.0);
        assert_eq!(paddle.x, 80.0);
        paddle.move_toward(-1000.0, 1000.0, 100.0);
        assert_eq!(paddle.x, 0.0);
    }
}
