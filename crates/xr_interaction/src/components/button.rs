use tracing::debug;

use xr_component::Component;

use crate::interactable::{Interactable, InteractionCx};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    None,
    Hovered,
    Pressed,
    Released,
}

/// A pressable button. The click itself fires from the button system once
/// the state reaches [`ButtonState::Released`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Button {
    pub state: ButtonState,
}

impl Component for Button {
    fn type_name() -> &'static str {
        "Button"
    }
}

impl Interactable for Button {
    fn on_hover(&mut self, cx: &mut InteractionCx<'_>) {
        if self.state != ButtonState::Hovered {
            self.state = ButtonState::Hovered;
            cx.pulse(cx.config.hover_pulse);
        }
    }

    fn on_unhover(&mut self) {
        if self.state == ButtonState::Hovered {
            self.state = ButtonState::None;
        }
    }

    fn on_select(&mut self, cx: &mut InteractionCx<'_>) {
        debug!(entity = %cx.entity, "button pressed");
        self.state = ButtonState::Pressed;
    }

    fn on_release(&mut self) -> bool {
        if self.state == ButtonState::Released {
            return false;
        }
        self.state = ButtonState::Released;
        true
    }
}
