/// Fixed-rate animation loop.
///
/// One runner owns the terminal renderer and the keyboard tracker for the
/// life of the session. `run` drives any `Animation` at the configured
/// frame rate until it signals completion; Ctrl-C anywhere latches a quit
/// flag that every caller up the stack observes, so teardown always goes
/// through `main`.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEventKind};
use crossterm::style::Color;

use crate::animation::Animation;
use crate::ui::input::InputState;
use crate::ui::renderer::{palette, Renderer};

pub struct AnimationRunner {
    pub renderer: Renderer,
    pub input: InputState,
    frame_time: Duration,
    quit: bool,
}

impl AnimationRunner {
    pub fn new(renderer: Renderer, fps: u32) -> Self {
        AnimationRunner {
            renderer,
            input: InputState::new(),
            frame_time: Duration::from_secs(1) / fps.max(1),
            quit: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        self.renderer.init()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        self.renderer.cleanup()
    }

    /// Set once Ctrl-C is seen; never cleared. Callers unwind to `main`.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Drive `anim` until it stops or quit is requested.
    pub fn run(&mut self, anim: &mut dyn Animation) -> io::Result<()> {
        while !anim.should_stop() && !self.quit {
            let start = Instant::now();

            self.input.drain_events();
            if self.input.ctrl_c() {
                self.quit = true;
                break;
            }

            self.renderer.begin();
            anim.frame(&mut self.renderer, &self.input)?;
            self.renderer.present()?;

            let used = start.elapsed();
            if used < self.frame_time {
                std::thread::sleep(self.frame_time - used);
            }
        }
        Ok(())
    }

    /// Modal line prompt drawn over a blank screen. Enter confirms,
    /// Esc cancels (`None`). Runs its own frame loop at the same rate.
    pub fn prompt_string(&mut self, question: &str) -> io::Result<Option<String>> {
        let mut buf = String::new();
        loop {
            let start = Instant::now();
            self.input.drain_events();
            if self.input.ctrl_c() {
                self.quit = true;
                return Ok(None);
            }

            for key in self.input.raw_events() {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => return Ok(Some(buf.trim().to_string())),
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Backspace => {
                        buf.pop();
                    }
                    KeyCode::Char(c) => accept_name_char(&mut buf, c),
                    _ => {}
                }
            }

            self.draw_prompt(question, &buf)?;

            let used = start.elapsed();
            if used < self.frame_time {
                std::thread::sleep(self.frame_time - used);
            }
        }
    }

    fn draw_prompt(&mut self, question: &str, buf: &str) -> io::Result<()> {
        let r = &mut self.renderer;
        r.begin();
        let (w, h) = r.size();
        let box_w = (question.len().max(30) + 6).min(w);
        let box_x = w.saturating_sub(box_w) / 2;
        let box_y = (h / 2).saturating_sub(2);

        r.fill(box_x, box_y, box_w, 5, Color::Rgb { r: 35, g: 35, b: 55 });
        r.text(box_x + 2, box_y + 1, question, palette::TITLE, Color::Rgb { r: 35, g: 35, b: 55 });
        let field = format!("{buf}_");
        r.text(box_x + 2, box_y + 3, &field, palette::TEXT, Color::Rgb { r: 35, g: 35, b: 55 });
        r.text_centered(
            box_y + 6,
            "Enter to confirm, Esc to skip",
            palette::DIM,
            palette::BG,
        );
        r.present()
    }
}

/// Longest name the prompt accepts, in characters (not bytes, so names
/// of multibyte characters get the same length as ASCII ones).
const NAME_LIMIT: usize = 24;

fn accept_name_char(buf: &mut String, c: char) {
    if !c.is_control() && buf.chars().count() < NAME_LIMIT {
        buf.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_is_capped_in_characters_not_bytes() {
        let mut buf = String::new();
        for _ in 0..NAME_LIMIT + 10 {
            accept_name_char(&mut buf, 'ß');
        }
        assert_eq!(buf.chars().count(), NAME_LIMIT);
        assert!(buf.len() > NAME_LIMIT);
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut buf = String::new();
        accept_name_char(&mut buf, '\t');
        accept_name_char(&mut buf, 'a');
        assert_eq!(buf, "a");
    }
}
