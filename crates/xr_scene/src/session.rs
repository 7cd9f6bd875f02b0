//! The immersive session collaborator.
//!
//! The interaction runtime only needs four things from a session: whether it
//! is running, the currently tracked input sources, the active reference
//! space and a best-effort haptic channel. [`XrSession`] captures exactly
//! that. [`HeadlessSession`] is an in-memory implementation used by the demo
//! binary and the tests; clones share state so a driver can feed input while
//! the runtime owns its own handle.

use std::cell::RefCell;
use std::rc::Rc;

use xr_math::{Mat4, Quat, Vec3};

/// Which hand an input source is held in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Handedness {
    #[default]
    None,
    Left,
    Right,
}

impl Handedness {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::None => "none",
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadButton {
    pub pressed: bool,
    pub value: f32,
}

impl GamepadButton {
    #[must_use]
    pub fn pressed() -> Self {
        Self {
            pressed: true,
            value: 1.0,
        }
    }
}

/// Buttons and axes of a tracked controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gamepad {
    pub buttons: Vec<GamepadButton>,
    /// Stick axes. Index 2 is the horizontal and 3 the vertical axis of the
    /// thumbstick.
    pub axes: Vec<f32>,
    pub has_haptics: bool,
}

impl Gamepad {
    /// A gamepad with `buttons` released buttons and four centred axes.
    #[must_use]
    pub fn with_buttons(buttons: usize) -> Self {
        Self {
            buttons: vec![GamepadButton::default(); buttons],
            axes: vec![0.0; 4],
            has_haptics: true,
        }
    }

    /// Axis value, `0.0` for axes the hardware does not report.
    #[must_use]
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).is_some_and(|b| b.pressed)
    }
}

/// A tracked input source as reported for the current frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSource {
    pub handedness: Handedness,
    pub gamepad: Option<Gamepad>,
}

/// Position and orientation without scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub position: Vec3,
    pub orientation: Quat,
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    #[must_use]
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// `self` followed by `other`, expressed in `self`'s parent frame.
    #[must_use]
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        RigidTransform {
            position: self.position + self.orientation * other.position,
            orientation: (self.orientation * other.orientation).normalize(),
        }
    }

    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The spatial origin the session reports poses against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReferenceSpace {
    pub origin: RigidTransform,
}

impl ReferenceSpace {
    /// A new reference space whose origin is this one's shifted by `offset`.
    #[must_use]
    pub fn offset(&self, offset: &RigidTransform) -> ReferenceSpace {
        ReferenceSpace {
            origin: self.origin.compose(offset),
        }
    }
}

/// One haptic pulse request as recorded by [`HeadlessSession`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    pub handedness: Handedness,
    pub intensity: f32,
    pub duration_ms: u32,
}

/// The session surface the interaction runtime depends on.
pub trait XrSession {
    /// `true` while an immersive session is running.
    fn is_active(&self) -> bool;

    /// Input sources tracked this frame.
    fn input_sources(&self) -> Vec<InputSource>;

    /// The active reference space, if the session has one.
    fn reference_space(&self) -> Option<ReferenceSpace>;

    fn set_reference_space(&mut self, space: ReferenceSpace);

    /// Fire a haptic pulse on the source held in `handedness`. Returns
    /// `false` when no such source exposes haptics.
    fn pulse(&mut self, handedness: Handedness, intensity: f32, duration_ms: u32) -> bool;
}

#[derive(Debug, Default)]
struct SessionState {
    active: bool,
    sources: Vec<InputSource>,
    reference_space: Option<ReferenceSpace>,
    pulses: Vec<HapticPulse>,
}

/// In-memory session. Cloning yields another handle to the same session.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSession {
    state: Rc<RefCell<SessionState>>,
}

impl HeadlessSession {
    /// A session that has not been started.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the session with an identity reference space.
    pub fn start(&self) {
        let mut state = self.state.borrow_mut();
        state.active = true;
        state.reference_space.get_or_insert_with(ReferenceSpace::default);
    }

    pub fn end(&self) {
        let mut state = self.state.borrow_mut();
        state.active = false;
        state.sources.clear();
    }

    /// Replace the input source for `source.handedness`, or add it.
    pub fn set_source(&self, source: InputSource) {
        let mut state = self.state.borrow_mut();
        match state
            .sources
            .iter_mut()
            .find(|s| s.handedness == source.handedness)
        {
            Some(existing) => *existing = source,
            None => state.sources.push(source),
        }
    }

    /// Press or release one button of the source held in `handedness`.
    /// Unknown sources and missing gamepads are ignored; the button list
    /// grows as needed.
    pub fn set_button(&self, handedness: Handedness, index: usize, pressed: bool) {
        let mut state = self.state.borrow_mut();
        let Some(gamepad) = state
            .sources
            .iter_mut()
            .find(|s| s.handedness == handedness)
            .and_then(|s| s.gamepad.as_mut())
        else {
            return;
        };
        if gamepad.buttons.len() <= index {
            gamepad.buttons.resize(index + 1, GamepadButton::default());
        }
        gamepad.buttons[index] = GamepadButton {
            pressed,
            value: if pressed { 1.0 } else { 0.0 },
        };
    }

    /// Set the stick axes of the source held in `handedness`.
    pub fn set_axes(&self, handedness: Handedness, axes: &[f32]) {
        let mut state = self.state.borrow_mut();
        if let Some(gamepad) = state
            .sources
            .iter_mut()
            .find(|s| s.handedness == handedness)
            .and_then(|s| s.gamepad.as_mut())
        {
            gamepad.axes = axes.to_vec();
        }
    }

    /// Every pulse fired so far.
    #[must_use]
    pub fn pulses(&self) -> Vec<HapticPulse> {
        self.state.borrow().pulses.clone()
    }
}

impl XrSession for HeadlessSession {
    fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    fn input_sources(&self) -> Vec<InputSource> {
        let state = self.state.borrow();
        if state.active {
            state.sources.clone()
        } else {
            Vec::new()
        }
    }

    fn reference_space(&self) -> Option<ReferenceSpace> {
        self.state.borrow().reference_space
    }

    fn set_reference_space(&mut self, space: ReferenceSpace) {
        self.state.borrow_mut().reference_space = Some(space);
    }

    fn pulse(&mut self, handedness: Handedness, intensity: f32, duration_ms: u32) -> bool {
        let mut state = self.state.borrow_mut();
        let has_haptics = state.sources.iter().any(|s| {
            s.handedness == handedness && s.gamepad.as_ref().is_some_and(|g| g.has_haptics)
        });
        if has_haptics {
            state.pulses.push(HapticPulse {
                handedness,
                intensity,
                duration_ms,
            });
        }
        has_haptics
    }
}
