//! Virtual keyboard keys and the widgets they type into.

use tracing::info;

use xr_component::Component;
use xr_scene::SpatialId;

use crate::interactable::{Interactable, InteractionCx};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyboardState {
    #[default]
    None,
    Pressed,
    Hover,
    Show,
    Hide,
}

/// One key of a virtual keyboard. Every key entity of a keyboard shares the
/// same `root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyboard {
    pub state: KeyboardState,
    /// Set on the first frame of a press, cleared on release.
    pub was_pressed: bool,
    /// Group node holding all keys of this keyboard.
    pub root: SpatialId,
    pub camera: Option<SpatialId>,
    pub is_logged_in: bool,
}

impl Keyboard {
    #[must_use]
    pub fn new(root: SpatialId) -> Self {
        Self {
            state: KeyboardState::None,
            was_pressed: false,
            root,
            camera: None,
            is_logged_in: false,
        }
    }
}

impl Component for Keyboard {
    fn type_name() -> &'static str {
        "Keyboard"
    }
}

impl Interactable for Keyboard {
    fn on_hover(&mut self, _cx: &mut InteractionCx<'_>) {
        if self.state != KeyboardState::Hover {
            self.state = KeyboardState::Hover;
        }
    }

    fn on_unhover(&mut self) {
        if self.state == KeyboardState::Hover {
            self.state = KeyboardState::None;
        }
    }

    fn on_select(&mut self, _cx: &mut InteractionCx<'_>) {
        self.state = KeyboardState::Pressed;
    }

    fn on_close(&mut self, cx: &mut InteractionCx<'_>) {
        info!(entity = %cx.entity, root = %self.root, "keyboard close requested");
    }

    fn on_release(&mut self) -> bool {
        self.state = KeyboardState::None;
        self.was_pressed = false;
        true
    }
}

/// Receives key labels from a keyboard.
pub trait KeyWidget {
    fn handle_key(&mut self, label: &str);

    /// Current contents.
    fn text(&self) -> &str;
}

/// Single-line text field.
///
/// `backspace` deletes the last character, `space` inserts a blank, `clear`
/// empties the field, `shift` toggles upper case for the next character.
/// Any other label is typed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEntry {
    text: String,
    shift: bool,
    max_len: Option<usize>,
}

impl TextEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.max_len.is_some_and(|max| self.text.chars().count() >= max) {
                return;
            }
            self.text.push(c);
        }
    }
}

impl KeyWidget for TextEntry {
    fn handle_key(&mut self, label: &str) {
        match label {
            "backspace" => {
                self.text.pop();
            }
            "space" => self.push_str(" "),
            "clear" => self.text.clear(),
            "shift" => self.shift = !self.shift,
            _ if self.shift => {
                self.shift = false;
                self.push_str(&label.to_uppercase());
            }
            _ => self.push_str(label),
        }
    }

    fn text(&self) -> &str {
        &self.text
    }
}
