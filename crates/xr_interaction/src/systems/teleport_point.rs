//! Teleport point effects: arrival and hover tint.

use tracing::{info, warn};

use xr_component::{Query, World};
use xr_scene::Environment;

use crate::components::{SpatialHandle, TeleportPoint, TeleportPointState};
use crate::system::{System, SystemContext};

#[derive(Debug, Default)]
pub struct TeleportPointSystem;

impl TeleportPointSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl System for TeleportPointSystem {
    fn name(&self) -> &'static str {
        "teleport-point"
    }

    fn init(&mut self, world: &mut World) {
        world.register_component::<TeleportPoint>();
    }

    fn execute(&mut self, ctx: &mut SystemContext<'_>) {
        let query = Query::new().with::<TeleportPoint>().with::<SpatialHandle>();
        for entity in ctx.world.query(&query) {
            let Some(node) = ctx.world.get::<SpatialHandle>(entity).map(|h| h.node) else {
                continue;
            };
            let Some(point) = ctx.world.get_mut::<TeleportPoint>(entity) else {
                continue;
            };
            let host = &mut *ctx.host;
            let config = &host.config;

            match point.state {
                TeleportPointState::Teleport => {
                    let data = host
                        .scene
                        .node(node)
                        .map(|n| n.data.clone())
                        .unwrap_or_default();

                    if let Some(root) = point.scene
                        && let Some(texture) = data.texture
                    {
                        host.scene.set_environment(
                            root,
                            Environment {
                                background: Some(texture),
                                lighting: Some(texture),
                            },
                        );
                    }
                    for (index, &group) in point.groups.iter().enumerate() {
                        host.scene.set_visible(group, data.target == Some(index));
                    }
                    if let Some(text) = data.speech.as_deref() {
                        host.speech.cancel();
                        if let Err(err) = host.speech.speak(text, &config.speech_lang) {
                            warn!(entity = %entity, error = %err, "speech cue failed");
                        }
                    }

                    point.state = TeleportPointState::None;
                    info!(entity = %entity, target = ?data.target, "arrived at teleport point");
                }
                TeleportPointState::Hover => {
                    if host.scene.color(node) != Some(config.teleport_highlight_color) {
                        host.scene.set_color(node, config.teleport_highlight_color);
                    }
                }
                TeleportPointState::None => {
                    if host.scene.color(node) != Some(config.teleport_neutral_color) {
                        host.scene.set_color(node, config.teleport_neutral_color);
                    }
                }
            }
        }
    }
}
