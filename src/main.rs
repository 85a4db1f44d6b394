//! Gridhop entry point
//!
//! Headless demo: runs the bundled map at 60 Hz with a scripted
//! "hold right and hop" intent and reports the outcome. A real frontend
//! would poll a keyboard into an `Intent` and draw the level snapshot
//! between frames; this binary stands in for that collaborator.

use gridhop::sim::{FrameDriver, Intent, Level, Status};

/// The bundled demo map, exercising the full symbol alphabet
const DEMO_MAP: &[&str] = &[
    "                      ",
    "                      ",
    "  x                x  ",
    "  x   o  @  o o    x  ",
    "  x        xxxxx   x  ",
    "  xxxxx            x  ",
    "      x            x  ",
    "      x  x         x  ",
    "      !    v       x  ",
    "      xxxxxxxx!!xxxx  ",
    "                      ",
    "                      ",
    "                      ",
];

/// Simulated frame cadence (milliseconds)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after one simulated minute
const MAX_FRAMES: u32 = 60 * 60;

fn main() {
    env_logger::init();

    let mut level = match Level::from_map(DEMO_MAP, 0xC0FFEE) {
        Ok(level) => level,
        Err(err) => {
            log::error!("bad demo map: {err}");
            std::process::exit(1);
        }
    };

    let intent = Intent {
        move_right: true,
        jump: true,
        ..Intent::default()
    };

    let mut driver = FrameDriver::new();
    let mut now = 0.0;
    let mut frames = 0;
    while frames < MAX_FRAMES {
        now += FRAME_MS;
        frames += 1;
        if !driver.frame(&mut level, now, &intent) {
            break;
        }
        // Renderer duty in a headless run
        level.clear_touched();
    }

    match level.status() {
        Status::InProgress => println!("still in progress after {frames} frames"),
        outcome => println!("{outcome:?} after {frames} frames ({:.1}s)", now / 1000.0),
    }

    if log::log_enabled!(log::Level::Debug) {
        log::debug!(
            "final state: {}",
            serde_json::to_string(&level).unwrap_or_default()
        );
    }
}
