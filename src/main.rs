//! Invaders headless runner
//!
//! Drives the simulation at a fixed frame rate with scripted or autopilot
//! input, renders each frame into a recording renderer and prints a summary.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;

use invaders::Settings;
use invaders::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use invaders::platform::{
    FsTextureLoader, HeadlessTextureLoader, InputEvent, Key, ScriptedPlatform, TextureLoader,
    gather_input, load_assets,
};
use invaders::renderer::{RecordingRenderer, build_frame, render_frame};
use invaders::sim::{GameEvent, GameState, tick};

#[derive(Parser, Debug)]
#[command(name = "invaders")]
#[command(about = "Run the Space Invaders simulation headless")]
struct Cli {
    /// RNG seed (overrides the settings file; random when neither is set)
    #[arg(long)]
    seed: Option<u64>,
    /// Rendered frames to run
    #[arg(long, default_value_t = 3_600)]
    frames: u64,
    /// Rendered frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the PNG assets; placeholder textures when omitted
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Let the autopilot play
    #[arg(long, default_value_t = false)]
    autopilot: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Invaders (headless) starting...");

    let settings = Settings::load_or_default(cli.config.as_deref())?;

    let mut loader: Box<dyn TextureLoader> = match &cli.assets {
        Some(root) => Box::new(FsTextureLoader::new(root)),
        None => Box::new(HeadlessTextureLoader::new(256, 64)),
    };
    let assets = load_assets(loader.as_mut(), &settings.assets)?;

    let seed = cli.seed.or(settings.seed).unwrap_or_else(clock_seed);
    log::info!("Seed {seed}");
    let mut state = GameState::new(&settings, &assets.level, seed);

    // Without the autopilot, press space once to leave the menu
    let mut platform = if cli.autopilot {
        ScriptedPlatform::default()
    } else {
        ScriptedPlatform::new(vec![vec![InputEvent::KeyDown(Key::Space)]])
    };
    let mut renderer = RecordingRenderer::new();

    let frame_dt = (1.0 / cli.fps.max(1.0)).min(MAX_FRAME_DT);
    let mut accumulator = 0.0;
    let mut kills = 0usize;
    let mut hits = 0usize;

    for _ in 0..cli.frames {
        let frame = gather_input(&mut platform, cli.autopilot);
        if frame.quit {
            break;
        }
        let mut input = frame.tick;

        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;

            // Fire is a key-down event; it applies to one tick only
            input.fire = false;

            for event in &state.events {
                match event {
                    GameEvent::EnemyDestroyed { .. } => kills += 1,
                    GameEvent::PlayerHit { .. } => hits += 1,
                    _ => {}
                }
                log::debug!("tick {}: {:?}", state.time_ticks, event);
            }
        }

        render_frame(&mut renderer, &build_frame(&state, assets.font.id));

        if state.mode.is_terminal() {
            break;
        }
    }

    println!("seed:     {}", state.seed);
    println!("mode:     {:?}", state.mode);
    println!("time:     {:.2}s ({} ticks)", state.time, state.time_ticks);
    println!("frames:   {}", renderer.frames);
    println!("score:    {}", state.level.score);
    println!("kills:    {kills}");
    println!("hits:     {hits}");
    println!("lives:    {}", state.level.player.lives);
    println!("last HUD: {}", renderer.texts.join(" | "));

    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
