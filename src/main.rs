/// Entry point: terminal setup, session loop, guaranteed teardown.

mod animation;
mod config;
mod game;
mod level;
mod scores;
mod ui;

use std::path::PathBuf;

use animation::runner::AnimationRunner;
use config::GameConfig;
use game::flow::GameFlow;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

fn main() {
    env_logger::init();

    let config = GameConfig::load();
    let set_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.level_set.clone());

    let mut runner = AnimationRunner::new(Renderer::new(), config.fps);
    if let Err(e) = runner.init() {
        eprintln!("Terminal init failed: {e}");
        std::process::exit(1);
    }

    let sound = SoundEngine::new();
    let mut flow = GameFlow::new(runner, config, sound);

    // Run the session, then always restore the terminal before reporting
    // any error.
    let result = flow.start(&set_path);
    if let Err(e) = flow.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
        std::process::exit(1);
    }

    println!("Thanks for playing Brick Break!");
}
