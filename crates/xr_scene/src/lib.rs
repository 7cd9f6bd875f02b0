//! # xr_scene
//!
//! The collaborators the interaction runtime talks to but does not own:
//!
//! - [`graph`]: ray-testable nodes addressed by [`SpatialId`], with
//!   visibility, materials, user data and bounds.
//! - [`camera`]: perspective cameras and screen-to-world rays.
//! - [`session`]: input sources, haptics and the reference space that
//!   teleportation offsets.
//! - [`speech`]: text-to-speech output.

pub mod camera;
pub mod graph;
pub mod node;
pub mod session;
pub mod speech;

pub use camera::{PerspectiveCamera, Viewport};
pub use graph::{Environment, RayHit, SceneGraph};
pub use node::{Material, Node, NodeData, Shape, SpatialId, TextureId};
pub use session::{
    Gamepad, GamepadButton, HapticPulse, Handedness, HeadlessSession, InputSource,
    ReferenceSpace, RigidTransform, XrSession,
};
pub use speech::{LogSpeech, SpeechError, SpeechSynth};
