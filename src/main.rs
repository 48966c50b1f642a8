//! Sprite stage demo driver.
//!
//! Runs a [`Stage`] headless for a fixed number of ticks against a
//! [`RecordingSurface`]:
//!
//! - a few "wanderer" clips seek random waypoints inside their boundary and
//!   pick a new one every time they arrive
//! - one "blinker" clip plays a frame range, stops, and shows a message
//!
//! With `--trace`, every tick's draw commands are printed to stdout as one
//! JSON line. Logging goes through `env_logger` (`RUST_LOG=debug` for more).
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config stage.ini --ticks 60 --trace
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use spritestage::components::clip::Clip;
use spritestage::components::rect::Rect;
use spritestage::components::spritesheet::SpriteSheet;
use spritestage::components::target::Target;
use spritestage::events::clip::ClipEvent;
use spritestage::resources::stageconfig::StageConfig;
use spritestage::stage::Stage;
use spritestage::surface::RecordingSurface;

/// Image handles are texture keys in this demo.
type TexKey = String;

const FRAME_SIZE: f32 = 32.0;
const WALK_FRAMES: usize = 4;
const BLINK_FRAMES: usize = 6;

/// Headless sprite stage demo.
#[derive(Parser)]
#[command(version, about = "Runs a sprite stage headless and reports what it draws.")]
struct Cli {
    /// INI configuration file. Missing file means defaults.
    #[arg(long, value_name = "PATH", default_value = "./stage.ini")]
    config: PathBuf,

    /// Override the number of ticks from the config file.
    #[arg(long)]
    ticks: Option<u32>,

    /// Seed for waypoint selection.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print each tick's draw commands as a JSON line.
    #[arg(long)]
    trace: bool,
}

fn random_target(rng: &mut fastrand::Rng, boundary: &Rect) -> Target<TexKey> {
    let top = boundary.top + rng.f32() * boundary.height();
    let left = boundary.left + rng.f32() * boundary.width();
    Target::new(top, left)
}

fn build_stage(config: &StageConfig, rng: &mut fastrand::Rng) -> Stage<TexKey> {
    let mut stage = Stage::from_config(config);
    let size = stage.size();
    let boundary = Rect::new(0.0, 0.0, size.width - FRAME_SIZE, size.height - FRAME_SIZE);

    let walk = Arc::new(SpriteSheet::from_strip(
        "walk",
        "walker.png".to_string(),
        FRAME_SIZE,
        FRAME_SIZE,
        WALK_FRAMES,
    ));

    for i in 0..config.clips {
        let name = format!("wanderer-{i}");
        let mut clip = Clip::new(name.clone(), boundary, i as i32);
        clip.set_animation_clip(0.0, 0.0, 0, Arc::clone(&walk));
        if let Err(e) = clip.switch_animation_clip("walk", 0) {
            error!("{}: {}", name, e);
            continue;
        }
        clip.set_pos(rng.f32() * boundary.height(), rng.f32() * boundary.width());
        clip.set_speed(config.speed);
        clip.push_target(random_target(rng, &boundary));
        clip.play();
        stage.add_clip(clip);

        let mut wander_rng = fastrand::Rng::with_seed(rng.u64(..));
        stage.register_event_handler(name, move |clip, event| {
            if let ClipEvent::ArrivedAtTarget { top, left } = event {
                info!("{} reached ({:.1}, {:.1})", clip.name(), top, left);
                let boundary = clip.boundary();
                clip.push_target(random_target(&mut wander_rng, &boundary));
            }
        });
    }

    let blink = Arc::new(SpriteSheet::from_strip(
        "blink",
        "blinker.png".to_string(),
        FRAME_SIZE,
        FRAME_SIZE,
        BLINK_FRAMES,
    ));
    let mut blinker = Clip::new("blinker", boundary, config.clips as i32);
    blinker.set_animation_clip(0.0, 0.0, 0, blink);
    if let Err(e) = blinker.switch_animation_clip("blink", 0) {
        error!("blinker: {}", e);
    } else {
        blinker.set_pos(size.height / 2.0, size.width / 2.0);
        blinker.play_range(0, BLINK_FRAMES - 1, |clip| clip.set_message("done"));
        stage.add_clip(blinker);
        stage.register_event_handler("blinker", |clip, event| {
            if let ClipEvent::AnimationStopped { frame } = event {
                info!("{} stopped on frame {}", clip.name(), frame);
            }
        });
    }

    stage
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = StageConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}; using defaults", e);
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }

    let mut rng = fastrand::Rng::with_seed(cli.seed);
    let mut stage = build_stage(&config, &mut rng);
    let ratio = stage.ratio();
    info!(
        "stage {}x{} in viewport {}x{}: scale={} top={} left={}",
        config.stage_width,
        config.stage_height,
        config.viewport_width,
        config.viewport_height,
        ratio.scale,
        ratio.top,
        ratio.left
    );

    let mut surface = RecordingSurface::<TexKey>::new();
    let mut draw_calls = 0usize;
    for tick in 0..config.ticks {
        stage.draw(&mut surface);
        let commands = surface.take();
        draw_calls += commands.len();
        if cli.trace {
            match serde_json::to_string(&commands) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    error!("tick {}: failed to serialize draw commands: {}", tick, e);
                    std::process::exit(1);
                }
            }
        }
    }

    for name in stage.clip_names() {
        if let Some(clip) = stage.clip(&name) {
            info!(
                "{}: pos=({:.1}, {:.1}) frame={:?} halted={} message={:?}",
                name,
                clip.top(),
                clip.left(),
                clip.current_frame(),
                clip.is_halted(),
                clip.message()
            );
        }
    }
    info!("{} ticks, {} draw calls", stage.ticks(), draw_calls);
}
