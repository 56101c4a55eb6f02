//! Easy Player - EasyEngine demo binary
//!
//! Opens a window and flies a ship with the keyboard or a gamepad.
//!
//! Usage:
//!   easy-player [--config <engine.toml>] [--fps <n>] [--title <text>]

use anyhow::{Context, Result};
use clap::Parser;
use easy_engine::{Engine, EngineConfig, NullGraphics};
use easy_input::{GamepadBackend, GilrsBackend, NullGamepadBackend};
use easy_player::{Demo, WinitPlatform};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "easy-player")]
#[command(about = "EasyEngine demo player - fly a ship with keyboard or gamepad")]
struct Args {
    /// Path to an engine config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target frames per second (overrides the config file)
    #[arg(long)]
    fps: Option<u32>,

    /// Window title (overrides the config file)
    #[arg(long)]
    title: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.timing.target_fps = fps;
    }
    if let Some(title) = args.title {
        config.window.title = title;
    }
    config.validate().context("Invalid configuration")?;

    let platform = WinitPlatform::new(&config.window).context("Failed to create window")?;
    let mut engine = Engine::new(
        config,
        platform,
        Box::new(NullGraphics::new()),
        gamepad_backend(),
    )
    .context("Failed to start engine")?;
    let _demo = Demo::install(&engine);

    println!("Controls:");
    println!("  Arrows / WASD  - Steer");
    println!("  Shift          - Boost");
    println!("  Space          - Fire");
    println!("  Escape         - Exit");
    println!("  Gamepad        - Left stick, right trigger, A, Start");

    engine.run().context("Main loop failed")?;
    Ok(())
}

fn gamepad_backend() -> Box<dyn GamepadBackend> {
    match GilrsBackend::new() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            log::warn!("{e}; continuing without gamepads");
            Box::new(NullGamepadBackend)
        }
    }
}
