//! runlet: a tiny 2D platformer prototype
//!
//! Run, double-jump, dash, shoot, with an easing follow camera drawing
//! through a low-resolution back buffer. Assets are optional: without an
//! asset folder everything renders as flat rectangles.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod animation;
mod app;
mod camera;
mod input;
mod physics;
mod player;
mod settings;
mod sprite;
mod ui;
mod weapon;

use std::path::Path;
use std::sync::OnceLock;

use macroquad::logging::{error, info, warn};
use macroquad::prelude::*;

use animation::AnimationLibrary;
use app::App;
use settings::{Settings, SETTINGS_PATH};

const ENTITY_ASSET_DIR: &str = "assets/images/entities";
const ANIMATION_META: &str = "assets/animations.ron";

/// Actions the player entity plays; all must exist when assets are used.
const PLAYER_ACTIONS: &[&str] = &["idle", "run", "jump"];

/// Settings are needed by `window_conf` before `main` runs.
static SETTINGS: OnceLock<Settings> = OnceLock::new();

fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| Settings::load_or_default(SETTINGS_PATH))
}

fn window_conf() -> Conf {
    let s = settings();
    Conf {
        window_title: format!("runlet v{}", VERSION),
        window_width: s.resolution.0,
        window_height: s.resolution.1,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

/// Load the animation library, or None for rect-only rendering when the
/// asset folder is absent entirely. A present-but-broken folder is an
/// error the caller treats as fatal.
fn load_assets() -> Result<Option<AnimationLibrary>, animation::AssetError> {
    let base = Path::new(ENTITY_ASSET_DIR);
    if !base.exists() {
        warn!("no asset folder at {}, rendering rects", ENTITY_ASSET_DIR);
        return Ok(None);
    }
    let library = AnimationLibrary::load(base, Path::new(ANIMATION_META))?;
    library.validate("player", PLAYER_ACTIONS)?;
    info!("animation library loaded");
    Ok(Some(library))
}

#[macroquad::main(window_conf)]
async fn main() {
    let settings = settings().clone();

    let library = match load_assets() {
        Ok(library) => library,
        Err(e) => {
            error!("asset loading failed: {}", e);
            return;
        }
    };

    let devices = input::detect_devices(settings.key_bindings(), settings.pad_bindings());
    let target_fps = settings.target_fps.max(1);
    let mut app = App::new(settings, library, devices);

    let mut last_time = get_time();
    loop {
        let frame_start = get_time();
        // Normalized ticks: 1.0 per frame at the target rate.
        let dt = ((frame_start - last_time) * target_fps as f64) as f32;
        last_time = frame_start;

        app.handle_input();
        app.update(dt);
        app.render();

        if app.quit {
            break;
        }

        // Sleep for the bulk of the remaining frame time, spin-wait the
        // last stretch for precision.
        let target_frame_time = 1.0 / target_fps as f64;
        let elapsed = get_time() - frame_start;
        if target_frame_time - elapsed > 0.0 {
            #[cfg(not(target_arch = "wasm32"))]
            {
                let spin_margin = 0.002; // 2ms
                while get_time() - frame_start + spin_margin < target_frame_time {
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                while get_time() - frame_start < target_frame_time {
                    std::hint::spin_loop();
                }
            }
            #[cfg(target_arch = "wasm32")]
            {
                while get_time() - frame_start < target_frame_time {
                    // Busy wait - browser will handle frame pacing
                }
            }
        }

        next_frame().await;
    }
}
