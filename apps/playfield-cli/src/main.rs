mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use playfield_assets::{AssetManifest, FileAssetLoader, load_scene_assets};
use playfield_input::InputBuffer;
use playfield_kernel::{FrameOrchestrator, KernelError, RapierPhysics, SceneSetup, SimConfig, SoundCue};
use playfield_render::DebugTextRenderer;
use playfield_tools::FrameInspector;
use tracing_subscriber::EnvFilter;

use crate::script::InputScript;

#[derive(Parser)]
#[command(name = "playfield-cli", about = "Headless host for the playfield simulation core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the default simulation config as YAML
    Config,
    /// Drive the frame loop headlessly
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Host seconds between frames
        #[arg(long, default_value = "0.016")]
        dt: f64,
        /// RNG seed for the spawn scheduler
        #[arg(short, long)]
        seed: Option<u64>,
        /// Downward gravity of the physics world
        #[arg(long, default_value = "98.0")]
        gravity: f32,
        /// YAML simulation config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Asset root directory; without it every asset is assumed present
        #[arg(long)]
        assets: Option<PathBuf>,
        /// JSON asset manifest, relative paths resolve under --assets
        #[arg(long, requires = "assets")]
        manifest: Option<PathBuf>,
        /// JSON list of {frame, event} host events
        #[arg(long)]
        input: Option<PathBuf>,
        /// Print a summary every N frames (0 = only at the end)
        #[arg(long, default_value = "60")]
        report_every: u64,
        /// Print the text rendering of the last frame
        #[arg(long)]
        show_frame: bool,
    },
}

fn load_config(path: Option<&PathBuf>, seed: Option<u64>) -> anyhow::Result<SimConfig> {
    let mut config = match path {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_yaml_str(&src)?
        }
        None => SimConfig::default(),
    };
    if seed.is_some() {
        config.spawn.seed = seed;
    }
    Ok(config)
}

fn load_setup(assets: Option<&PathBuf>, manifest: Option<&PathBuf>) -> anyhow::Result<SceneSetup> {
    let Some(root) = assets else {
        return Ok(SceneSetup::default());
    };
    let manifest = match manifest {
        Some(path) => AssetManifest::load(path)
            .with_context(|| format!("reading manifest {}", path.display()))?,
        None => AssetManifest::default(),
    };
    let mut loader = FileAssetLoader::new(root);
    let loaded = pollster::block_on(load_scene_assets(&mut loader, &manifest));
    tracing::info!(
        registered = loader.store().len(),
        unavailable = loaded.warnings.len(),
        root = %root.display(),
        "assets loaded"
    );
    Ok(SceneSetup {
        avatar: loaded.has_avatar(),
        music: loaded.background_music.is_some(),
        sprite: loaded.sprite_texture.is_some(),
        particles: loaded.particle_texture.is_some(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("playfield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", playfield_kernel::crate_info());
            println!("input: {}", playfield_input::crate_info());
            println!("render: {}", playfield_render::crate_info());
            println!("assets: {}", playfield_assets::crate_info());
            println!("tools: {}", playfield_tools::crate_info());
        }
        Commands::Config => {
            print!("{}", serde_yaml::to_string(&SimConfig::default())?);
        }
        Commands::Run {
            frames,
            dt,
            seed,
            gravity,
            config,
            assets,
            manifest,
            input,
            report_every,
            show_frame,
        } => {
            let config = load_config(config.as_ref(), seed)?;
            let setup = load_setup(assets.as_ref(), manifest.as_ref())?;
            let script = match &input {
                Some(path) => InputScript::load(path)?,
                None => InputScript::default(),
            };

            let physics = RapierPhysics::new(Vec3::new(0.0, -gravity, 0.0))
                .map_err(KernelError::PhysicsInit)?;
            let mut orchestrator = FrameOrchestrator::new(config, physics, setup)?;
            let mut renderer = DebugTextRenderer::new();
            let mut buffer = InputBuffer::new();

            tracing::info!(frames, dt, events = script.len(), "run started");
            for frame in 1..=frames {
                for event in script.events_for(frame) {
                    buffer.push(event.clone());
                }
                let input = buffer.snapshot();
                let report = orchestrator.step(dt, &input, &mut renderer)?;

                if let Some(id) = report.spawned {
                    tracing::info!(frame, entity = %id.short(), "spawned");
                }
                if let Some(mode) = report.mode_change {
                    tracing::info!(frame, ?mode, "mode changed");
                }
                for cue in &report.sound_cues {
                    match cue {
                        SoundCue::Music { looped, volume } => {
                            tracing::info!(frame, looped, volume, "play background music")
                        }
                        SoundCue::Jump => tracing::info!(
                            frame,
                            t = report.clock.elapsed_time,
                            "play jump sound"
                        ),
                    }
                }
                if report_every > 0 && frame % report_every == 0 {
                    println!("{}", FrameInspector::summary(&orchestrator));
                }
            }

            println!("{}", FrameInspector::summary(&orchestrator));
            for body in FrameInspector::list_dynamic(&orchestrator) {
                println!("  {body}");
            }
            if show_frame {
                print!("{}", renderer.last_frame());
            }
        }
    }

    Ok(())
}
