/// Immutable level template.
///
/// A `LevelInfo` is never mutated by play; each turn constructs a fresh
/// `LevelWorld` from it, so a level-set can be replayed from the menu (or
/// a level re-entered after a lost ball) without stale brick state.

/// Brick legend used by level-definition files.
///
///   `#` one-hit brick    `%` two-hit brick
///   `=` unbreakable      ` ` empty
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BrickKind {
    Soft,
    Tough,
    Solid,
}

impl BrickKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(BrickKind::Soft),
            '%' => Some(BrickKind::Tough),
            '=' => Some(BrickKind::Solid),
            _ => None,
        }
    }

    /// Hits needed to destroy; unbreakable bricks never count toward the
    /// level's clear condition.
    pub fn hit_points(self) -> u8 {
        match self {
            BrickKind::Soft => 1,
            BrickKind::Tough => 2,
            BrickKind::Solid => u8::MAX,
        }
    }

    pub fn is_breakable(self) -> bool {
        !matches!(self, BrickKind::Solid)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelInfo {
    pub name: String,
    /// Brick rows, top to bottom, in the legend above.
    pub rows: Vec<String>,
    /// Ball speed in cells per second.
    pub ball_speed: u32,
    /// Paddle width in cells.
    pub paddle_width: usize,
}

pub const DEFAULT_BALL_SPEED: u32 = 18;
pub const DEFAULT_PADDLE_WIDTH: usize = 10;
