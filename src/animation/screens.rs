/// Static post-run screens. Neither stops on its own; both are shown
/// behind a space-to-dismiss gate.

use std::io;

use crate::animation::Animation;
use crate::scores::ScoreEntry;
use crate::ui::input::InputState;
use crate::ui::renderer::{palette, Renderer};

/// Shown after a level run, win or lose.
pub struct EndScreen {
    won: bool,
    score: u32,
    lives: u32,
}

impl EndScreen {
    pub fn new(won: bool, score: u32, lives: u32) -> Self {
        EndScreen { won, score, lives }
    }
}

impl Animation for EndScreen {
    fn frame(&mut self, r: &mut Renderer, _input: &InputState) -> io::Result<()> {
        let (_, h) = r.size();
        let mid = h / 2;

        let (banner, color) = if self.won {
            ("YOU WIN!", palette::TITLE)
        } else {
            ("GAME OVER", palette::WARN)
        };
        r.text_centered(mid.saturating_sub(3), banner, color, palette::BG);
        r.text_centered(
            mid.saturating_sub(1),
            &format!("Your score is {}", self.score),
            palette::TEXT,
            palette::BG,
        );
        r.text_centered(
            mid,
            &format!("Lives remaining: {}", self.lives),
            palette::DIM,
            palette::BG,
        );
        r.text_centered(mid + 3, "Press SPACE to continue", palette::DIM, palette::BG);
        Ok(())
    }

    fn should_stop(&self) -> bool {
        false
    }
}

/// The high-scores table view.
pub struct HighScoresScreen {
    entries: Vec<ScoreEntry>,
}

impl HighScoresScreen {
    pub fn new(entries: &[ScoreEntry]) -> Self {
        HighScoresScreen { entries: entries.to_vec() }
    }
}

impl Animation for HighScoresScreen {
    fn frame(&mut self, r: &mut Renderer, _input: &InputState) -> io::Result<()> {
        let (_, h) = r.size();
        let top = (h / 2).saturating_sub(self.entries.len().max(1) / 2 + 3);

        r.text_centered(top, "HIGH SCORES", palette::TITLE, palette::BG);
        r.text_centered(top + 1, "───────────", palette::DIM, palette::BG);

        if self.entries.is_empty() {
            r.text_centered(top + 3, "no scores yet", palette::DIM, palette::BG);
        }
        for (i, entry) in self.entries.iter().enumerate() {
            let name = if entry.name.is_empty() { "???" } else { &entry.name };
            let line = format!("{:>2}. {:<24} {:>6}", i + 1, name, entry.score);
            r.text_centered(top + 3 + i, &line, palette::TEXT, palette::BG);
        }

        r.text_centered(
            top + 5 + self.entries.len(),
            "Press SPACE to continue",
            palette::DIM,
            palette::BG,
        );
        Ok(())
    }

    fn should_stop(&self) -> bool {
        false
    }
}
