//! # xr_app
//!
//! Headless demo of the interaction runtime. Resolves the session-support
//! probe once, builds a small scene with every feature, replays a scripted
//! input sequence at a fixed frame rate and logs where everything ended up.

mod demo;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use xr_interaction::components::{Carousel, KeyWidget, Keyboard, TeleportPoint};
use xr_interaction::{
    Host, InteractionConfig, PointerCapability, SessionSupport, TickConfig, TickLoop,
};
use xr_scene::{Handedness, HeadlessSession, LogSpeech, XrSession};

use demo::Step;

/// Answer the simulated runtime gives to the session-support probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SessionMode {
    Supported,
    Unsupported,
    Failed,
}

#[derive(Parser)]
#[command(name = "xr_app", about = "Headless XR interaction demo")]
struct Args {
    /// Number of frames to run
    #[arg(short, long, default_value_t = 160)]
    frames: u64,

    /// Frames per second
    #[arg(short, long, default_value_t = 60.0)]
    tick_rate: f64,

    /// Session-support probe answer
    #[arg(short, long, value_enum, default_value_t = SessionMode::Supported)]
    session: SessionMode,

    /// JSON file overriding the interaction constants
    #[arg(short, long)]
    config: Option<PathBuf>,
}

async fn probe(mode: SessionMode) -> Result<bool, String> {
    tokio::time::sleep(Duration::from_millis(10)).await;
    match mode {
        SessionMode::Supported => Ok(true),
        SessionMode::Unsupported => Ok(false),
        SessionMode::Failed => Err("no immersive runtime".to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("xr_app=info".parse()?))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => InteractionConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => InteractionConfig::default(),
    };

    let support = SessionSupport::from_probe(probe(args.session).await);
    let capability = support.pointer_capability();
    info!(?support, ?capability, "session support resolved");

    let (scene, features, nodes, clicks) = demo::build(capability);
    let script = demo::script(capability, &scene, &nodes);

    let session = HeadlessSession::new();
    if capability == PointerCapability::Session {
        demo::start_session(&session);
    }
    let host = Host::new(
        scene,
        Box::new(session.clone()),
        Box::new(LogSpeech::new()),
        config,
    );
    let tick_config = TickConfig {
        tick_rate: args.tick_rate,
        max_ticks: args.frames,
    };
    let mut tick_loop = TickLoop::new(tick_config, host);

    let errors = tick_loop.add_features(support, features);
    if !errors.is_empty() {
        warn!(count = errors.len(), "some features were skipped");
    }

    run(&mut tick_loop, &session, &nodes, &script).await?;
    report(&tick_loop, &session, &nodes, clicks.get());
    Ok(())
}

/// Tick at the configured rate, applying each scripted step just before its
/// frame.
async fn run(
    tick_loop: &mut TickLoop,
    session: &HeadlessSession,
    nodes: &demo::DemoNodes,
    script: &[(u64, Step)],
) -> Result<()> {
    let config = *tick_loop.config();
    let budget = config
        .tick_duration()
        .context("--tick-rate must be a positive number of frames per second")?;
    let mut interval = tokio::time::interval(budget);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        tick_rate = config.tick_rate,
        frames = config.max_ticks,
        steps = script.len(),
        "starting demo"
    );

    for frame in 0..config.max_ticks {
        interval.tick().await;
        let start = Instant::now();

        for (_, step) in script.iter().filter(|(at, _)| *at == frame) {
            apply(tick_loop, session, nodes, *step);
        }
        tick_loop.tick(budget.as_secs_f64());

        let elapsed = start.elapsed();
        if elapsed > budget {
            warn!(
                tick_id = tick_loop.tick_id(),
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "tick exceeded time budget"
            );
        }
    }
    Ok(())
}

fn apply(
    tick_loop: &mut TickLoop,
    session: &HeadlessSession,
    nodes: &demo::DemoNodes,
    step: Step,
) {
    match step {
        Step::Aim(target) => demo::aim(&mut tick_loop.host_mut().scene, nodes.right, target),
        Step::Button { index, pressed } => {
            session.set_button(Handedness::Right, index, pressed);
        }
        Step::Stick { handedness, axes } => session.set_axes(handedness, &axes),
        Step::MouseMove(client) => {
            tick_loop.pointer_move(client);
        }
        Step::Click => {
            if tick_loop.click().is_none() {
                info!("click missed");
            }
        }
    }
}

fn report(
    tick_loop: &TickLoop,
    session: &HeadlessSession,
    nodes: &demo::DemoNodes,
    clicks: u32,
) {
    let world = tick_loop.world();
    let host = tick_loop.host();
    let scene = &host.scene;

    if let Some(space) = session.reference_space() {
        info!(
            position = ?space.origin.position,
            orientation = ?space.origin.orientation,
            "reference space"
        );
    }
    info!(
        player = ?scene.world_position(nodes.player),
        marker = ?scene.world_position(nodes.marker),
        "rig"
    );

    let text = host
        .handlers
        .widget(nodes.keyboard)
        .map(|w| w.text().to_string())
        .unwrap_or_default();
    let logged_in = world
        .entities_with::<Keyboard>()
        .iter()
        .any(|&e| world.get::<Keyboard>(e).is_some_and(|k| k.is_logged_in));
    info!(clicks, text = %text, logged_in, "ui");

    for entity in world.entities_with::<Carousel>() {
        if let Some(carousel) = world.get::<Carousel>(entity) {
            info!(
                entity = %entity,
                logged_in = carousel.is_logged_in,
                visible = scene.is_visible(nodes.container),
                scroll = ?scene.local(nodes.container).map(|t| t.position.x),
                "carousel"
            );
        }
    }

    for (index, &group) in nodes.groups.iter().enumerate() {
        info!(group = index, visible = scene.is_visible(group), "teleport group");
    }
    for entity in world.entities_with::<TeleportPoint>() {
        if let Some(point) = world.get::<TeleportPoint>(entity) {
            info!(entity = %entity, state = ?point.state, "teleport point");
        }
    }
    info!(
        ticks = tick_loop.tick_id(),
        elapsed = tick_loop.time(),
        environment = ?scene.environment(nodes.root),
        "demo complete"
    );
}
