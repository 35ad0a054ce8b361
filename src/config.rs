/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Lives granted at the start of a level run.
    pub lives: u32,
    /// Target frame rate of every animation.
    pub fps: u32,
    pub board_width: usize,
    pub board_height: usize,
    /// Default level-set file; an explicit CLI argument overrides it.
    pub level_set: PathBuf,
    pub highscores_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            lives: default_lives(),
            fps: default_fps(),
            board_width: default_board_width(),
            board_height: default_board_height(),
            level_set: PathBuf::from(default_level_set()),
            highscores_file: PathBuf::from(default_highscores_file()),
        }
    }
}

// ── TOML schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    board: TomlBoard,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_fps")]
    fps: u32,
    #[serde(default = "default_level_set")]
    level_set: String,
    #[serde(default = "default_highscores_file")]
    highscores_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_board_width")]
    width: usize,
    #[serde(default = "default_board_height")]
    height: usize,
}

fn default_lives() -> u32 { 7 }
fn default_fps() -> u32 { 60 }
fn default_board_width() -> usize { 78 }
fn default_board_height() -> usize { 22 }
fn default_level_set() -> String { "level_sets.txt".into() }
fn default_highscores_file() -> String { "highscores.toml".into() }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            lives: default_lives(),
            fps: default_fps(),
            level_set: default_level_set(),
            highscores_file: default_highscores_file(),
        }
    }
}

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard { width: default_board_width(), height: default_board_height() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`, searching the exe directory first
    /// and then the CWD. Missing file or keys fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig {
            lives: toml_cfg.game.lives,
            fps: toml_cfg.game.fps.clamp(10, 240),
            board_width: toml_cfg.board.width.max(20),
            board_height: toml_cfg.board.height.max(10),
            level_set: PathBuf::from(toml_cfg.game.level_set),
            highscores_file: PathBuf::from(toml_cfg.game.highscores_file),
        }
    }
}

fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    log::warn!("config.toml parse error: {e}; using defaults");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                log::warn!("cannot read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}
