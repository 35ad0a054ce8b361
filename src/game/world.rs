/// Per-level runtime state: brick grid, paddle, and one ball.
///
/// `step()` is a pure function of (state, input) called once per frame by
/// the turn animation, so turn-end conditions are testable without a
/// terminal. Velocities are in cells per frame; the caller derives them
/// from the level's cells-per-second speed and the configured frame rate.
///
/// Scoring (applied by the caller from `StepEvent`s):
///   brick hit 5, brick destroyed 10 more, level clear bonus 100.

use crate::level::info::{BrickKind, LevelInfo};

pub const SCORE_PER_HIT: u32 = 5;
pub const SCORE_PER_DESTROY: u32 = 10;
pub const LEVEL_CLEAR_BONUS: u32 = 100;

/// Bricks are anchored this many rows below the top of the board,
/// leaving room for the ball to travel above them.
const BRICK_TOP: usize = 2;

/// Paddle travel per frame, in cells.
const PADDLE_SPEED: f32 = 1.4;

#[derive(Clone, Copy, Debug)]
pub struct Brick {
    pub kind: BrickKind,
    pub hits_left: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TurnInput {
    pub left: bool,
    pub right: bool,
}

/// What happened during one `step`, for scoring and sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    WallBounce,
    PaddleBounce,
    BrickHit { destroyed: bool },
    BallLost,
    Cleared,
}

pub struct LevelWorld {
    pub width: usize,
    pub height: usize,
    pub bricks: Vec<Vec<Option<Brick>>>,
    /// Breakable bricks still standing; zero means the level is clear.
    pub bricks_left: usize,
    pub paddle_x: f32,
    pub paddle_width: usize,
    pub ball: Option<Ball>,
    /// Cells per frame, derived from the level's speed and the frame rate.
    pub ball_speed: f32,
}

impl LevelWorld {
    pub fn new(info: &LevelInfo, width: usize, height: usize, fps: u32) -> Self {
        let mut bricks = vec![vec![None; width]; height];
        let mut bricks_left = 0;

        for (dy, row) in info.rows.iter().enumerate() {
            let y = BRICK_TOP + dy;
            if y >= height {
                break;
            }
            // Center the layout horizontally.
            let x0 = width.saturating_sub(row.len()) / 2;
            for (dx, c) in row.chars().enumerate() {
                let x = x0 + dx;
                if x >= width {
                    break;
                }
                if let Some(kind) = BrickKind::from_char(c) {
                    bricks[y][x] = Some(Brick { kind, hits_left: kind.hit_points() });
                    if kind.is_breakable() {
                        bricks_left += 1;
                    }
                }
            }
        }

        LevelWorld {
            width,
            height,
            bricks,
            bricks_left,
            paddle_x: width as f32 / 2.0,
            paddle_width: info.paddle_width.max(3),
            ball: None,
            ball_speed: info.ball_speed as f32 / fps.max(1) as f32,
        }
    }

    pub fn cleared(&self) -> bool {
        self.bricks_left == 0
    }

    pub fn paddle_row(&self) -> usize {
        self.height - 1
    }

    /// Leftmost and rightmost cells covered by the paddle.
    pub fn paddle_span(&self) -> (f32, f32) {
        let half = self.paddle_width as f32 / 2.0;
        (self.paddle_x - half, self.paddle_x + half)
    }

    /// Place the ball on the paddle and launch it upward.
    pub fn serve(&mut self) {
        self.ball = Some(Ball {
            x: self.paddle_x,
            y: self.paddle_row() as f32 - 1.0,
            vx: self.ball_speed * 0.35,
            vy: -self.ball_speed,
        });
    }

    /// Advance one frame. Returns the events it produced.
    pub fn step(&mut self, input: TurnInput) -> Vec<StepEvent> {
        let mut events = Vec::new();

        // Paddle
        if input.left {
            self.paddle_x -= PADDLE_SPEED;
        }
        if input.right {
            self.paddle_x += PADDLE_SPEED;
        }
        let half = self.paddle_width as f32 / 2.0;
        self.paddle_x = self.paddle_x.clamp(half, self.width as f32 - half);

        let Some(mut ball) = self.ball else {
            return events;
        };

        // Horizontal move + side walls
        ball.x += ball.vx;
        if ball.x < 0.5 {
            ball.x = 0.5;
            ball.vx = ball.vx.abs();
            events.push(StepEvent::WallBounce);
        } else if ball.x > self.width as f32 - 0.5 {
            ball.x = self.width as f32 - 0.5;
            ball.vx = -ball.vx.abs();
            events.push(StepEvent::WallBounce);
        }
        if let Some(e) = self.collide_brick(&mut ball, true) {
            events.push(e);
        }

        // Vertical move + ceiling
        ball.y += ball.vy;
        if ball.y < 0.5 {
            ball.y = 0.5;
            ball.vy = ball.vy.abs();
            events.push(StepEvent::WallBounce);
        }
        if let Some(e) = self.collide_brick(&mut ball, false) {
            events.push(e);
        }

        // Paddle bounce
        if ball.vy > 0.0 && ball.y >= self.paddle_row() as f32 - 0.5 && ball.y < self.paddle_row() as f32 + 0.5 {
            let (lo, hi) = self.paddle_span();
            if ball.x >= lo && ball.x <= hi {
                self.deflect_off_paddle(&mut ball);
                events.push(StepEvent::PaddleBounce);
            }
        }

        // Bottom edge: ball lost
        if ball.y > self.height as f32 {
            self.ball = None;
            events.push(StepEvent::BallLost);
            return events;
        }

        self.ball = Some(ball);
        if self.cleared() && !events.contains(&StepEvent::Cleared) {
            events.push(StepEvent::Cleared);
        }
        events
    }

    /// Hit test against the brick at the ball's cell. Flips the axis the
    /// ball was moving along; `horizontal` selects which move preceded
    /// this check.
    fn collide_brick(&mut self, ball: &mut Ball, horizontal: bool) -> Option<StepEvent> {
        let cx = ball.x.floor();
        let cy = ball.y.floor();
        if cx < 0.0 || cy < 0.0 {
            return None;
        }
        let (x, y) = (cx as usize, cy as usize);
        if y >= self.height || x >= self.width {
            return None;
        }
        let brick = self.bricks[y][x].as_mut()?;

        let destroyed = if brick.kind.is_breakable() {
            brick.hits_left = brick.hits_left.saturating_sub(1);
            brick.hits_left == 0
        } else {
            false
        };
        if destroyed {
            self.bricks[y][x] = None;
            self.bricks_left -= 1;
        }

        if horizontal {
            ball.vx = -ball.vx;
            ball.x += ball.vx;
        } else {
            ball.vy = -ball.vy;
            ball.y += ball.vy;
        }
        Some(StepEvent::BrickHit { destroyed })
    }

    /// Classic five-region paddle: the further from the center the ball
    /// lands, the shallower the outgoing angle.
    fn deflect_off_paddle(&self, ball: &mut Ball) {
        let half = self.paddle_width as f32 / 2.0;
        let rel = ((ball.x - self.paddle_x) / half).clamp(-1.0, 1.0);
        let region = (rel * 2.0).round() / 2.0; // -1, -0.5, 0, 0.5, 1
        ball.vx = region * self.ball_speed * 0.8;
        ball.vy = -(self.ball_speed * self.ball_speed - ball.vx * ball.vx)
            .max(0.01)
            .sqrt();
        ball.y = self.paddle_row() as f32 - 1.0;
    }
}
