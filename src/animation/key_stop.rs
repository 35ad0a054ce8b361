/// Press-to-dismiss gate around another animation.
///
/// Forwards every frame to the wrapped animation and stops it on the
/// first fresh press of the configured key. The gate starts disarmed;
/// while the key is still held over from a previous screen it stays
/// disarmed, so only a genuine press transition observed *after* the gate
/// begins receiving input dismisses the screen.

use std::io;

use crossterm::event::KeyCode;

use crate::animation::Animation;
use crate::ui::input::InputState;
use crate::ui::renderer::Renderer;

pub struct KeyStopAnimation<A: Animation> {
    inner: A,
    key: KeyCode,
    armed: bool,
    stopped: bool,
}

impl<A: Animation> KeyStopAnimation<A> {
    pub fn new(key: KeyCode, inner: A) -> Self {
        KeyStopAnimation { inner, key, armed: false, stopped: false }
    }

    /// Space is the dismiss key everywhere in the game.
    pub fn space(inner: A) -> Self {
        Self::new(KeyCode::Char(' '), inner)
    }
}

impl<A: Animation> Animation for KeyStopAnimation<A> {
    fn frame(&mut self, r: &mut Renderer, input: &InputState) -> io::Result<()> {
        self.inner.frame(r, input)?;
        if !self.armed {
            // Wait until the key is observed up before accepting presses.
            if !input.is_held(self.key) {
                self.armed = true;
            }
        } else if input.was_pressed(self.key) {
            self.stopped = true;
        }
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.stopped || self.inner.should_stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventKind, KeyModifiers};

    struct Forever;

    impl Animation for Forever {
        fn frame(&mut self, _r: &mut Renderer, _input: &InputState) -> io::Result<()> {
            Ok(())
        }
        fn should_stop(&self) -> bool {
            false
        }
    }

    const SPACE: KeyCode = KeyCode::Char(' ');

    fn frame_with(gate: &mut KeyStopAnimation<Forever>, input: &InputState) {
        let mut r = Renderer::new();
        gate.frame(&mut r, input).unwrap();
    }

    #[test]
    fn fresh_press_dismisses() {
        let mut input = InputState::new();
        let mut gate = KeyStopAnimation::space(Forever);

        input.begin_frame();
        frame_with(&mut gate, &input);
        assert!(!gate.should_stop());

        input.begin_frame();
        input.record(KeyEvent::new(SPACE, KeyModifiers::NONE));
        frame_with(&mut gate, &input);
        assert!(gate.should_stop());
    }

    #[test]
    fn key_held_over_from_previous_screen_is_ignored() {
        let mut input = InputState::new();
        let mut gate = KeyStopAnimation::space(Forever);

        // Space was pressed before the gate started and is still held.
        input.begin_frame();
        input.record(KeyEvent::new(SPACE, KeyModifiers::NONE));
        frame_with(&mut gate, &input);
        assert!(!gate.should_stop());

        // Still held on the next frame (repeat event).
        input.begin_frame();
        input.record(KeyEvent::new(SPACE, KeyModifiers::NONE));
        frame_with(&mut gate, &input);
        assert!(!gate.should_stop());

        // Released, then pressed again: now it dismisses.
        input.begin_frame();
        input.record(KeyEvent::new_with_kind(SPACE, KeyModifiers::NONE, KeyEventKind::Release));
        frame_with(&mut gate, &input);
        assert!(!gate.should_stop());

        input.begin_frame();
        input.record(KeyEvent::new(SPACE, KeyModifiers::NONE));
        frame_with(&mut gate, &input);
        assert!(gate.should_stop());
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut input = InputState::new();
        let mut gate = KeyStopAnimation::space(Forever);

        input.begin_frame();
        frame_with(&mut gate, &input);

        input.begin_frame();
        input.record(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        frame_with(&mut gate, &input);
        assert!(!gate.should_stop());
    }
}
