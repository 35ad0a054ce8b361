/// Cooperative animations: anything that can draw one frame per tick and
/// say when it is finished. The runner owns the frame loop; every screen
/// in the game (menu, countdown, play turn, end screen, scores) is an
/// `Animation` driven by the same loop.

pub mod key_stop;
pub mod menu;
pub mod runner;
pub mod screens;

use std::io;

use crate::ui::input::InputState;
use crate::ui::renderer::Renderer;

pub trait Animation {
    /// Draw one frame and react to this frame's input.
    fn frame(&mut self, r: &mut Renderer, input: &InputState) -> io::Result<()>;

    /// True once the animation has finished; the runner then returns.
    fn should_stop(&self) -> bool;
}
