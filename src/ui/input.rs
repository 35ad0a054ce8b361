/// Keyboard state tracker.
///
/// Distinguishes held keys (continuous paddle movement) from fresh
/// presses (menu selection, space-to-dismiss). A press only counts as
/// fresh on the not-held → held transition, so a key still held from a
/// previous screen does not re-trigger.
///
/// Terminals that report Release events clear keys immediately; the rest
/// fall back to a hold timeout refreshed by key-repeat events.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Without a Press/Repeat event for this long, a key counts as released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    held: HashMap<KeyCode, Instant>,
    fresh: Vec<KeyCode>,
    raw: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            held: HashMap::with_capacity(16),
            fresh: Vec::with_capacity(8),
            raw: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.begin_frame();
        while event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key);
            }
        }
        self.expire();
    }

    /// Reset per-frame state. Split out of `drain_events` so tests can
    /// feed synthetic events through `record`.
    pub fn begin_frame(&mut self) {
        self.fresh.clear();
        self.raw.clear();
    }

    /// Fold one key event into the tracker.
    pub fn record(&mut self, key: KeyEvent) {
        self.raw.push(key);
        match key.kind {
            KeyEventKind::Release => {
                self.held.remove(&key.code);
            }
            _ => {
                let was_held = self.held_now(key.code);
                self.held.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self) {
        let now = Instant::now();
        self.held.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held_now(code)
    }

    /// Did this key transition to held during the current frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh.contains(&code)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Keys freshly pressed this frame, in arrival order.
    pub fn fresh_presses(&self) -> &[KeyCode] {
        &self.fresh
    }

    /// Raw events this frame, for text entry.
    pub fn raw_events(&self) -> &[KeyEvent] {
        &self.raw
    }

    pub fn ctrl_c(&self) -> bool {
        self.raw.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }

    fn held_now(&self, code: KeyCode) -> bool {
        self.held
            .get(&code)
            .is_some_and(|t| t.elapsed() < HOLD_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn first_press_is_fresh() {
        let mut input = InputState::new();
        input.begin_frame();
        input.record(press(KeyCode::Char(' ')));
        assert!(input.was_pressed(KeyCode::Char(' ')));
        assert!(input.is_held(KeyCode::Char(' ')));
    }

    #[test]
    fn repeat_while_held_is_not_fresh() {
        let mut input = InputState::new();
        input.begin_frame();
        input.record(press(KeyCode::Char(' ')));
        input.begin_frame();
        input.record(press(KeyCode::Char(' ')));
        assert!(!input.was_pressed(KeyCode::Char(' ')));
        assert!(input.is_held(KeyCode::Char(' ')));
    }

    #[test]
    fn press_after_release_is_fresh_again() {
        let mut input = InputState::new();
        input.begin_frame();
        input.record(press(KeyCode::Char(' ')));
        input.begin_frame();
        input.record(release(KeyCode::Char(' ')));
        assert!(!input.is_held(KeyCode::Char(' ')));
        input.begin_frame();
        input.record(press(KeyCode::Char(' ')));
        assert!(input.was_pressed(KeyCode::Char(' ')));
    }

    #[test]
    fn ctrl_c_is_detected() {
        let mut input = InputState::new();
        input.begin_frame();
        input.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.ctrl_c());
    }
}
