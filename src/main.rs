// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod config;
mod display;
mod game;
mod util;

use config::Config;
use display::{Display, InputEvent, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use game::GameState;
use sdl2::keyboard::Keycode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use util::{FpsCounter, Rng};

struct Options {
    width: u32,
    height: u32,
    vsync: bool,
    seed: Option<u64>,
    config_path: Option<String>,
    show_fps: bool,
}

/// Parse command line arguments
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
        seed: None,
        config_path: None,
        show_fps: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => opts.vsync = false,
            "--fps" => opts.show_fps = true,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        opts.width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        opts.height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 1920x1080)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            opts.width = w;
                            opts.height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--seed" => {
                if i + 1 < args.len() {
                    if let Ok(seed) = args[i + 1].parse::<u64>() {
                        opts.seed = Some(seed);
                    }
                    i += 1;
                }
            },
            "--config" => {
                if i + 1 < args.len() {
                    opts.config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: carom [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W       Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H      Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --seed N              Seed ball placement (default: time-based)");
                println!("  --config FILE         Load tunables from a JSON file");
                println!("  --fps                 Print the rolling FPS average");
                println!("  --help                Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    opts
}

fn main() -> Result<(), String> {
    let opts = parse_args();

    let config = match &opts.config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.validate(opts.width, opts.height)?;

    let seed = opts.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED)
    });
    let mut rng = Rng::new(seed);

    let (mut display, texture_creator) =
        Display::with_options("carom", opts.width, opts.height, opts.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, opts.width, opts.height)?;

    let mut state = GameState::new(&config, &mut rng, opts.width, opts.height);

    println!("=== carom ===");
    println!("Resolution: {}x{}", opts.width, opts.height);
    if opts.vsync {
        println!("VSync: ON (presentation locked to refresh). Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!(
        "Balls: {}  step interval: {} ms  seed: {}",
        config.num_balls, config.frame_interval_ms, seed
    );
    println!("Controls:");
    println!("  Any key - Pause/resume the simulation");
    println!("  Escape  - Quit");

    let mut fps_counter = FpsCounter::new(60);
    let mut frames: u64 = 0;
    let start = Instant::now();

    'main: loop {
        let (_dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(_) => {
                    // A single toggle; the key identity doesn't matter.
                    if state.toggle_finished() {
                        println!("Key pressed. Finished - redrawing only.");
                    } else {
                        println!("Key pressed. Restarting.");
                    }
                },
            }
        }

        // Draw into the texture's pixel memory through a borrowed buffer.
        target.draw_frame(|buffer| {
            state.draw(buffer);
            Ok(())
        })?;

        // The simulation runs on its own clock, decoupled from draw rate.
        let now_ms = start.elapsed().as_millis() as u64;
        state.advance(now_ms);

        display.present(&target)?;

        frames += 1;
        if opts.show_fps && frames % 120 == 0 {
            println!(
                "FPS {:.1} avg  {:.1} ms  ({} steps)",
                avg_fps,
                fps_counter.avg_frame_time_ms(),
                state.frame_count()
            );
        }
    }

    Ok(())
}
