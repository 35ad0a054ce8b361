/// Keyboard-driven menu screen.
///
/// Each item binds a single key to either an action payload or a nested
/// sub-menu. The screen stops once an enabled item's key is pressed; the
/// caller takes the choice and either executes the payload or runs the
/// sub-menu in its place.

use std::io;

use crossterm::event::KeyCode;

use crate::animation::Animation;
use crate::ui::input::InputState;
use crate::ui::renderer::{palette, Renderer};

pub enum MenuEntry<T> {
    Action(T),
    SubMenu(MenuScreen<T>),
}

pub struct MenuItem<T> {
    pub key: char,
    pub label: String,
    pub entry: Option<MenuEntry<T>>,
    /// Disabled items are drawn dimmed and ignore their key.
    pub enabled: bool,
}

pub struct MenuScreen<T> {
    title: String,
    items: Vec<MenuItem<T>>,
    chosen: Option<usize>,
    tick: u32,
}

impl<T> MenuScreen<T> {
    pub fn new(title: impl Into<String>) -> Self {
        MenuScreen { title: title.into(), items: Vec::new(), chosen: None, tick: 0 }
    }

    pub fn add_action(&mut self, key: char, label: impl Into<String>, action: T) {
        self.items.push(MenuItem {
            key,
            label: label.into(),
            entry: Some(MenuEntry::Action(action)),
            enabled: true,
        });
    }

    pub fn add_submenu(&mut self, key: char, label: impl Into<String>, sub: MenuScreen<T>) {
        self.items.push(MenuItem {
            key,
            label: label.into(),
            entry: Some(MenuEntry::SubMenu(sub)),
            enabled: true,
        });
    }

    pub fn add_disabled(&mut self, key: char, label: impl Into<String>) {
        self.items.push(MenuItem { key, label: label.into(), entry: None, enabled: false });
    }

    #[cfg(test)]
    pub fn items(&self) -> &[MenuItem<T>] {
        &self.items
    }

    #[cfg(test)]
    pub fn items_mut(&mut self) -> &mut [MenuItem<T>] {
        &mut self.items
    }

    /// Consume the selected entry, if any. Resets the screen so it could
    /// run again.
    pub fn take_choice(&mut self) -> Option<MenuEntry<T>> {
        let idx = self.chosen.take()?;
        self.items[idx].entry.take()
    }

    fn match_key(&self, code: KeyCode) -> Option<usize> {
        let KeyCode::Char(c) = code else { return None };
        self.items
            .iter()
            .position(|item| item.enabled && (item.key == c || item.key.eq_ignore_ascii_case(&c)))
    }
}

impl<T> Animation for MenuScreen<T> {
    fn frame(&mut self, r: &mut Renderer, input: &InputState) -> io::Result<()> {
        self.tick = self.tick.wrapping_add(1);

        for &code in input.fresh_presses() {
            if let Some(idx) = self.match_key(code) {
                self.chosen = Some(idx);
                break;
            }
        }

        let (_, h) = r.size();
        let top = (h / 2).saturating_sub(self.items.len() + 3);

        r.text_centered(top, &self.title, palette::TITLE, palette::BG);
        r.text_centered(
            top + 1,
            &"─".repeat(self.title.chars().count()),
            palette::DIM,
            palette::BG,
        );

        for (i, item) in self.items.iter().enumerate() {
            let y = top + 3 + i * 2;
            let (key_color, label_color) = if item.enabled {
                (palette::ACCENT, palette::TEXT)
            } else {
                (palette::DIM, palette::DIM)
            };
            let line = format!("({}) {}", item.key, item.label);
            let x = r.size().0.saturating_sub(line.chars().count()) / 2;
            r.text(x, y, &line, label_color, palette::BG);
            r.text(x, y, &format!("({})", item.key), key_color, palette::BG);
        }

        // Blinking hint.
        if (self.tick / 30) % 2 == 0 {
            r.text_centered(
                top + 4 + self.items.len() * 2,
                "press a key to choose",
                palette::DIM,
                palette::BG,
            );
        }
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.chosen.is_some()
    }
}
