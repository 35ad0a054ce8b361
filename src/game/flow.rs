/// Session orchestration: the outer menu loop, the level-run supervisor,
/// and the post-run end flow.
///
/// The flow never exits the process itself. Exit is a sentinel menu
/// action; `start` returns on it (or on Ctrl-C) and `main` unwinds the
/// terminal through its normal teardown path.

use std::io;
use std::path::Path;

use log::warn;

use crate::animation::key_stop::KeyStopAnimation;
use crate::animation::menu::{MenuEntry, MenuScreen};
use crate::animation::runner::AnimationRunner;
use crate::animation::screens::{EndScreen, HighScoresScreen};
use crate::config::GameConfig;
use crate::game::counter::Counter;
use crate::game::level::GameLevel;
use crate::level::info::LevelInfo;
use crate::level::set::read_level_sets;
use crate::scores::{HighScoresTable, ScoreEntry, DEFAULT_CAPACITY};
use crate::ui::sound::SoundEngine;

/// Payload of a menu selection.
pub enum MenuAction {
    Play(Vec<LevelInfo>),
    ShowHighScores,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    LivesExhausted,
}

/// Lives/score pair shared by every level of one run. Created on entry
/// to `run_levels`, dropped when the end flow is done with it.
pub struct SessionState {
    pub lives: Counter,
    pub score: Counter,
}

pub struct GameFlow {
    runner: AnimationRunner,
    config: GameConfig,
    scores: HighScoresTable,
    sound: Option<SoundEngine>,
    #[cfg(test)]
    forfeit_turns: bool,
}

impl GameFlow {
    pub fn new(runner: AnimationRunner, config: GameConfig, sound: Option<SoundEngine>) -> Self {
        let scores = HighScoresTable::load_or_create(&config.highscores_file, DEFAULT_CAPACITY);
        GameFlow {
            runner,
            config,
            scores,
            sound,
            #[cfg(test)]
            forfeit_turns: false,
        }
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        self.runner.cleanup()
    }

    /// The session loop: build menu, wait for a selection, execute it,
    /// repeat. Only the Exit action (or Ctrl-C) returns.
    pub fn start(&mut self, set_path: &Path) -> io::Result<()> {
        loop {
            // Rebuilt every lap so edits to the level-set file show up
            // without a restart.
            let menu = self.build_menu(set_path);
            let Some(action) = self.run_menu(menu)? else {
                return Ok(());
            };
            match action {
                MenuAction::Play(levels) => {
                    let (outcome, state) = self.run_levels(&levels)?;
                    if self.runner.quit_requested() {
                        return Ok(());
                    }
                    self.end_flow(outcome, &state)?;
                }
                MenuAction::ShowHighScores => self.show_high_scores()?,
                MenuAction::Quit => return Ok(()),
            }
            if self.runner.quit_requested() {
                return Ok(());
            }
        }
    }

    /// Top-level menu: Start Game (level-set sub-menu), High Scores,
    /// Exit. A level-set parse failure disables Start for this lap and
    /// never touches the scores table.
    fn build_menu(&self, set_path: &Path) -> MenuScreen<MenuAction> {
        let mut menu = MenuScreen::new("B R I C K  B R E A K");
        match read_level_sets(set_path) {
            Ok(sets) => {
                let mut sub = MenuScreen::new("Select Level Set");
                for set in sets {
                    sub.add_action(set.key, set.name, MenuAction::Play(set.levels));
                }
                menu.add_submenu('s', "Start Game", sub);
            }
            Err(e) => {
                warn!("cannot read level sets from {}: {e}", set_path.display());
                menu.add_disabled('s', "Start Game (level sets unavailable)");
            }
        }
        menu.add_action('h', "High Scores", MenuAction::ShowHighScores);
        menu.add_action('q', "Exit", MenuAction::Quit);
        menu
    }

    /// Run the menu (and any sub-menu it yields) to a concrete action.
    /// `None` means quit was requested mid-menu.
    fn run_menu(&mut self, mut menu: MenuScreen<MenuAction>) -> io::Result<Option<MenuAction>> {
        loop {
            self.runner.run(&mut menu)?;
            if self.runner.quit_requested() {
                return Ok(None);
            }
            match menu.take_choice() {
                Some(MenuEntry::Action(action)) => return Ok(Some(action)),
                Some(MenuEntry::SubMenu(sub)) => menu = sub,
                None => return Ok(None),
            }
        }
    }

    /// Play `levels` in order against one shared lives/score pair.
    /// Stops early, without advancing, once lives hit zero.
    pub fn run_levels(&mut self, levels: &[LevelInfo]) -> io::Result<(RunOutcome, SessionState)> {
        let mut state = SessionState {
            lives: Counter::new(self.config.lives),
            score: Counter::new(0),
        };

        for info in levels {
            // Fresh runtime from the immutable template, so a set can be
            // replayed from the menu without stale brick state.
            let mut level = GameLevel::new(
                info.clone(),
                self.config.board_width,
                self.config.board_height,
                self.config.fps,
            );
            #[cfg(test)]
            if self.forfeit_turns {
                level.forfeit_serves();
            }
            while state.lives.get() > 0
                && level.bricks_left() > 0
                && !self.runner.quit_requested()
            {
                level.play_one_turn(
                    &mut self.runner,
                    &mut state.lives,
                    &mut state.score,
                    self.sound.as_ref(),
                )?;
            }
            if self.runner.quit_requested() {
                break;
            }
            if state.lives.get() == 0 {
                if let Some(s) = &self.sound {
                    s.play_game_over();
                }
                return Ok((RunOutcome::LivesExhausted, state));
            }
        }
        Ok((RunOutcome::Completed, state))
    }

    /// End screen, conditional name capture, then the scores view.
    fn end_flow(&mut self, outcome: RunOutcome, state: &SessionState) -> io::Result<()> {
        let score = state.score.get();
        let mut end = KeyStopAnimation::space(EndScreen::new(
            outcome == RunOutcome::Completed,
            score,
            state.lives.get(),
        ));
        self.runner.run(&mut end)?;
        if self.runner.quit_requested() {
            return Ok(());
        }

        if self.scores.rank(score).is_some() {
            let name = match self.runner.prompt_string("What is your name?")? {
                Some(name) => name,
                // Esc still records the score, under an empty name.
                None if !self.runner.quit_requested() => String::new(),
                None => return Ok(()),
            };
            self.scores.add(ScoreEntry::new(name, score));
            if let Err(e) = self.scores.save(&self.config.highscores_file) {
                warn!(
                    "cannot save high scores to {}: {e}",
                    self.config.highscores_file.display()
                );
            }
        }

        self.show_high_scores()
    }

    /// Display of the in-memory table; no file I/O on this path.
    fn show_high_scores(&mut self) -> io::Result<()> {
        let mut screen = KeyStopAnimation::space(HighScoresScreen::new(self.scores.entries()));
        self.runner.run(&mut screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::renderer::Renderer;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("brickbreak_flow_{}_{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn flow_with_config(dir: &Path) -> GameFlow {
        let mut config = GameConfig::default();
        config.highscores_file = dir.join("highscores.toml");
        let runner = AnimationRunner::new(Renderer::new(), config.fps);
        GameFlow::new(runner, config, None)
    }

    #[test]
    fn empty_level_list_completes_immediately() {
        let dir = scratch_dir("empty");
        let mut flow = flow_with_config(&dir);
        let (outcome, state) = flow.run_levels(&[]).unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(state.lives.get(), flow.config.lives);
        assert_eq!(state.score.get(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn zero_brick_levels_complete_without_playing_a_turn() {
        let dir = scratch_dir("zerobrick");
        let mut flow = flow_with_config(&dir);
        let levels = vec![LevelInfo {
            name: "hollow".into(),
            rows: vec!["   ".into()],
            ball_speed: 18,
            paddle_width: 10,
        }];
        // No turn means no animation loop, so this is safe headless.
        let (outcome, state) = flow.run_levels(&levels).unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(state.lives.get(), flow.config.lives);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn lost_turns_exhaust_lives_without_advancing() {
        let dir = scratch_dir("exhaust");
        let mut flow = flow_with_config(&dir);
        // Every serve is forfeited, so level one burns a life per turn
        // and is never cleared.
        flow.forfeit_turns = true;
        let levels = vec![
            LevelInfo {
                name: "first".into(),
                rows: vec!["#".into()],
                ball_speed: 18,
                paddle_width: 10,
            },
            LevelInfo {
                name: "second".into(),
                rows: vec!["##".into()],
                ball_speed: 18,
                paddle_width: 10,
            },
        ];
        let (outcome, state) = flow.run_levels(&levels).unwrap();
        assert_eq!(outcome, RunOutcome::LivesExhausted);
        assert_eq!(state.lives.get(), 0);
        // No brick was ever hit and no clear bonus awarded, on either level.
        assert_eq!(state.score.get(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn menu_disables_start_when_the_set_file_is_missing() {
        let dir = scratch_dir("badset");
        let flow = flow_with_config(&dir);
        let menu = flow.build_menu(&dir.join("nonexistent.txt"));
        let start = &menu.items()[0];
        assert_eq!(start.key, 's');
        assert!(!start.enabled);
        // High Scores and Exit stay usable.
        assert!(menu.items()[1].enabled);
        assert!(menu.items()[2].enabled);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn menu_offers_one_entry_per_level_set() {
        let dir = scratch_dir("goodset");
        std::fs::write(dir.join("easy.txt"), "# One\n##\n").unwrap();
        std::fs::write(dir.join("hard.txt"), "# Two\n%%\n").unwrap();
        let set_path = dir.join("sets.txt");
        std::fs::write(&set_path, "e:Easy\neasy.txt\nh:Hard\nhard.txt\n").unwrap();

        let flow = flow_with_config(&dir);
        let mut menu = flow.build_menu(&set_path);
        assert_eq!(menu.items().len(), 3);
        match menu.items_mut()[0].entry.take() {
            Some(MenuEntry::SubMenu(sub)) => {
                assert_eq!(sub.items().len(), 2);
                assert_eq!(sub.items()[0].key, 'e');
                assert_eq!(sub.items()[1].key, 'h');
            }
            _ => panic!("expected Start to hold a sub-menu"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
