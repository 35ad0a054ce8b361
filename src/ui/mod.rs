/// Terminal I/O: keyboard tracking, diff rendering, sound.

pub mod input;
pub mod renderer;
pub mod sound;
