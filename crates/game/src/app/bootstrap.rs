use std::path::{Path, PathBuf};

use ledge_engine::{
    load_level_file, resolve_app_paths, BodyTuning, LevelLayout, LoopConfig, Navigator,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::navigation::LevelNavigator;
use super::settings::{load_settings, Settings};

const SETTINGS_ENV_VAR: &str = "LEDGE_SETTINGS";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) start_level: LevelLayout,
    pub(crate) tuning: BodyTuning,
    pub(crate) navigator: Box<dyn Navigator>,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Ledge Startup ===");

    let paths = resolve_app_paths().map_err(|error| error.to_string())?;
    let settings_path = settings_path_from_env()
        .unwrap_or_else(|| paths.root.join("assets").join("settings.json"));
    let settings = load_settings(&settings_path)?;
    info!(
        path = %settings_path.display(),
        start_level = %settings.start_level,
        "settings_loaded"
    );

    let start_level = load_start_level(&paths.levels_dir, &settings)?;
    let navigator = LevelNavigator::new(paths.levels_dir, settings.player);

    Ok(AppWiring {
        config: settings.loop_config(),
        start_level,
        tuning: settings.player,
        navigator: Box::new(navigator),
    })
}

/// Loaded before the window opens so a broken start level fails startup. The simulation
/// itself is built once the window's real size is known.
fn load_start_level(levels_dir: &Path, settings: &Settings) -> Result<LevelLayout, String> {
    let path = levels_dir.join(&settings.start_level);
    load_level_file(&path).map_err(|error| error.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn settings_path_from_env() -> Option<PathBuf> {
    std::env::var(SETTINGS_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}
