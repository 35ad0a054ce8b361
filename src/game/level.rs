/// Per-level runtime: owns one `LevelWorld` built from an immutable
/// `LevelInfo` template and plays it one turn at a time.
///
/// A turn is one life's worth of play: serve, then run until the ball is
/// lost (lives -1) or the last breakable brick is gone (clear bonus).
/// Brick damage persists across turns of the same level; ball and paddle
/// reset each turn.

use std::io;

use crossterm::event::KeyCode;
use crossterm::style::Color;

use crate::animation::runner::AnimationRunner;
use crate::animation::Animation;
use crate::game::counter::Counter;
use crate::game::world::{
    LevelWorld, StepEvent, TurnInput, LEVEL_CLEAR_BONUS, SCORE_PER_DESTROY, SCORE_PER_HIT,
};
use crate::level::info::{BrickKind, LevelInfo};
use crate::ui::input::InputState;
use crate::ui::renderer::{palette, Renderer};
use crate::ui::sound::SoundEngine;

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

/// Serve countdown, in seconds.
const COUNTDOWN_SECS: u32 = 2;

pub struct GameLevel {
    name: String,
    world: LevelWorld,
    fps: u32,
    cleared_scored: bool,
    #[cfg(test)]
    forfeit_serves: bool,
}

impl GameLevel {
    /// `info` is the caller's fresh clone of the level template.
    pub fn new(info: LevelInfo, board_w: usize, board_h: usize, fps: u32) -> Self {
        let world = LevelWorld::new(&info, board_w, board_h, fps);
        GameLevel {
            name: info.name,
            world,
            fps,
            cleared_scored: false,
            #[cfg(test)]
            forfeit_serves: false,
        }
    }

    pub fn bricks_left(&self) -> usize {
        self.world.bricks_left
    }

    /// Forfeit every serve: the ball is dropped again before the first
    /// frame, so each turn settles as ball-lost without the animation
    /// loop ever running a frame.
    #[cfg(test)]
    pub(crate) fn forfeit_serves(&mut self) {
        self.forfeit_serves = true;
    }

    /// Play one turn. Decrements `lives` on a lost ball; adds the clear
    /// bonus to `score` when the last brick goes.
    pub fn play_one_turn(
        &mut self,
        runner: &mut AnimationRunner,
        lives: &mut Counter,
        score: &mut Counter,
        sound: Option<&SoundEngine>,
    ) -> io::Result<()> {
        self.world.paddle_x = self.world.width as f32 / 2.0;
        self.world.serve();

        #[allow(unused_mut)]
        let mut countdown = COUNTDOWN_SECS * self.fps;
        #[cfg(test)]
        if self.forfeit_serves {
            self.world.ball = None;
            countdown = 0;
        }

        let mut turn = TurnAnimation {
            world: &mut self.world,
            name: &self.name,
            lives_shown: lives.get(),
            score,
            sound,
            countdown,
            fps: self.fps,
        };
        runner.run(&mut turn)?;
        if runner.quit_requested() {
            return Ok(());
        }

        if self.world.cleared() {
            if !self.cleared_scored {
                self.cleared_scored = true;
                score.increase(LEVEL_CLEAR_BONUS);
            }
            if let Some(s) = sound {
                s.play_level_clear();
            }
        } else if self.world.ball.is_none() {
            lives.decrease(1);
            if let Some(s) = sound {
                s.play_ball_lost();
            }
        }
        Ok(())
    }
}

struct TurnAnimation<'a> {
    world: &'a mut LevelWorld,
    name: &'a str,
    lives_shown: u32,
    score: &'a mut Counter,
    sound: Option<&'a SoundEngine>,
    countdown: u32,
    fps: u32,
}

impl TurnAnimation<'_> {
    fn apply_events(&mut self, events: &[StepEvent]) {
        for &event in events {
            match event {
                StepEvent::BrickHit { destroyed } => {
                    self.score.increase(SCORE_PER_HIT);
                    if destroyed {
                        self.score.increase(SCORE_PER_DESTROY);
                    }
                    if let Some(s) = self.sound {
                        if destroyed {
                            s.play_shatter();
                        } else {
                            s.play_brick();
                        }
                    }
                }
                StepEvent::WallBounce | StepEvent::PaddleBounce => {
                    if let Some(s) = self.sound {
                        s.play_bounce();
                    }
                }
                StepEvent::BallLost | StepEvent::Cleared => {}
            }
        }
    }

    fn draw(&self, r: &mut Renderer) {
        let (tw, th) = r.size();
        let w = self.world.width;
        let h = self.world.height;
        let ox = tw.saturating_sub(w) / 2;
        let oy = th.saturating_sub(h + 2) / 2 + 2;

        // HUD
        let hud = format!(
            "Lives: {}   Score: {}   Level: {}",
            self.lives_shown,
            self.score.get(),
            self.name
        );
        r.text_centered(oy.saturating_sub(2), &hud, palette::TEXT, palette::BG);

        // Border: top and sides; the bottom stays open.
        for x in 0..w {
            r.put(ox + x, oy - 1, '─', palette::DIM, palette::BG);
        }
        if ox > 0 {
            r.put(ox - 1, oy - 1, '┌', palette::DIM, palette::BG);
            for y in 0..h {
                r.put(ox - 1, oy + y, '│', palette::DIM, palette::BG);
            }
        }
        r.put(ox + w, oy - 1, '┐', palette::DIM, palette::BG);
        for y in 0..h {
            r.put(ox + w, oy + y, '│', palette::DIM, palette::BG);
        }

        // Bricks
        for y in 0..h {
            for x in 0..w {
                if let Some(brick) = self.world.bricks[y][x] {
                    let (ch, color) = match brick.kind {
                        BrickKind::Soft => ('▒', palette::BRICK_SOFT),
                        BrickKind::Tough if brick.hits_left > 1 => ('█', palette::BRICK_TOUGH),
                        BrickKind::Tough => ('▒', palette::BRICK_TOUGH),
                        BrickKind::Solid => ('█', palette::BRICK_SOLID),
                    };
                    r.put(ox + x, oy + y, ch, color, palette::BG);
                }
            }
        }

        // Paddle
        let (lo, hi) = self.world.paddle_span();
        let py = oy + self.world.paddle_row();
        for x in lo.round().max(0.0) as usize..=hi.round().max(0.0) as usize {
            if x < w {
                r.put(ox + x, py, '▀', palette::PADDLE, palette::BG);
            }
        }

        // Ball
        if let Some(ball) = self.world.ball {
            let bx = ball.x.floor().max(0.0) as usize;
            let by = ball.y.floor().max(0.0) as usize;
            if bx < w && by < h {
                r.put(ox + bx, oy + by, '●', palette::BALL, palette::BG);
            }
        }

        // Serve countdown overlays the board center.
        if self.countdown > 0 {
            let n = self.countdown / self.fps + 1;
            let label = format!("  {n}  ");
            r.text_centered(oy + h / 2, &label, palette::TITLE, Color::Rgb { r: 40, g: 40, b: 60 });
        }
    }
}

impl Animation for TurnAnimation<'_> {
    fn frame(&mut self, r: &mut Renderer, input: &InputState) -> io::Result<()> {
        if self.countdown > 0 {
            self.countdown -= 1;
        } else {
            let events = self.world.step(TurnInput {
                left: input.any_held(KEYS_LEFT),
                right: input.any_held(KEYS_RIGHT),
            });
            self.apply_events(&events);
        }
        self.draw(r);
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.countdown == 0 && (self.world.ball.is_none() || self.world.cleared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::info::{DEFAULT_BALL_SPEED, DEFAULT_PADDLE_WIDTH};

    fn info(rows: &[&str]) -> LevelInfo {
        LevelInfo {
            name: "t".into(),
            rows: rows.iter().map(|s| s.to_string()).collect(),
            ball_speed: DEFAULT_BALL_SPEED,
            paddle_width: DEFAULT_PADDLE_WIDTH,
        }
    }

    #[test]
    fn zero_brick_level_starts_clear() {
        let level = GameLevel::new(info(&["  ", "=="]), 40, 20, 60);
        assert_eq!(level.bricks_left(), 0);
    }

    #[test]
    fn turn_stops_once_the_ball_is_lost() {
        let mut level = GameLevel::new(info(&["##"]), 40, 20, 60);
        level.world.ball = None;
        let mut score = Counter::new(0);
        let turn = TurnAnimation {
            world: &mut level.world,
            name: "t",
            lives_shown: 7,
            score: &mut score,
            sound: None,
            countdown: 0,
            fps: 60,
        };
        assert!(turn.should_stop());
    }

    #[test]
    fn brick_events_translate_to_score() {
        let mut level = GameLevel::new(info(&["##"]), 40, 20, 60);
        let mut score = Counter::new(0);
        let mut turn = TurnAnimation {
            world: &mut level.world,
            name: "t",
            lives_shown: 7,
            score: &mut score,
            sound: None,
            countdown: 0,
            fps: 60,
        };
        turn.apply_events(&[
            StepEvent::BrickHit { destroyed: false },
            StepEvent::BrickHit { destroyed: true },
            StepEvent::PaddleBounce,
        ]);
        assert_eq!(score.get(), SCORE_PER_HIT * 2 + SCORE_PER_DESTROY);
    }
}
