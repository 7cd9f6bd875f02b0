//! Shared fixtures for unit tests.

use xr_component::World;
use xr_scene::{HeadlessSession, LogSpeech, SceneGraph};

use crate::config::InteractionConfig;
use crate::interactable::InteractableRegistry;
use crate::system::{Host, System, SystemContext};
use crate::tick::{TickConfig, TickLoop};

/// A host over `scene` with a started headless session. The returned
/// session handle shares state with the host's.
pub fn host(scene: SceneGraph, world: &mut World) -> (Host, HeadlessSession) {
    let session = HeadlessSession::new();
    session.start();
    let mut host = Host::new(
        scene,
        Box::new(session.clone()),
        Box::new(LogSpeech::new()),
        InteractionConfig::default(),
    );
    host.interactables = InteractableRegistry::with_builtin(world);
    (host, session)
}

/// Execute `system` once.
pub fn run(system: &mut dyn System, world: &mut World, host: &mut Host) {
    let mut ctx = SystemContext {
        tick_id: 1,
        delta: 1.0 / 60.0,
        time: 1.0 / 60.0,
        world,
        host,
    };
    system.execute(&mut ctx);
}

/// A frame driver over `scene` with an idle headless session.
pub fn tick_loop(scene: SceneGraph) -> (TickLoop, HeadlessSession) {
    let session = HeadlessSession::new();
    let host = Host::new(
        scene,
        Box::new(session.clone()),
        Box::new(LogSpeech::new()),
        InteractionConfig::default(),
    );
    (TickLoop::new(TickConfig::default(), host), session)
}
