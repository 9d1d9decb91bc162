use std::path::{Path, PathBuf};

use ledge_engine::{load_level_file, BodyTuning, NavigationCommand, Navigator, Viewport, ZoneTarget};
use tracing::{info, warn};

const LEVEL_TARGET_PREFIX: &str = "level:";

/// Resolves `level:<file>` targets against the levels directory. Anything else is treated
/// as an external destination and leaves the current level running.
pub(crate) struct LevelNavigator {
    levels_dir: PathBuf,
    tuning: BodyTuning,
}

impl LevelNavigator {
    pub(crate) fn new(levels_dir: PathBuf, tuning: BodyTuning) -> Self {
        Self { levels_dir, tuning }
    }
}

impl Navigator for LevelNavigator {
    fn navigate(&mut self, target: &ZoneTarget, viewport: Viewport) -> NavigationCommand {
        let Some(file_name) = level_file_from_target(target.as_str()) else {
            info!(zone_target = %target, "external_navigation_requested");
            return NavigationCommand::Stay;
        };

        let path = self.levels_dir.join(file_name);
        match load_level_file(&path) {
            Ok(layout) => {
                info!(path = %path.display(), "level_switch");
                let simulation = layout.into_simulation(self.tuning, viewport);
                NavigationCommand::SwitchTo(Box::new(simulation))
            }
            Err(error) => {
                warn!(zone_target = %target, error = %error, "level_switch_failed");
                NavigationCommand::Stay
            }
        }
    }
}

/// Returns the level file named by a `level:` target. Names that would escape the levels
/// directory are rejected.
fn level_file_from_target(target: &str) -> Option<&Path> {
    let name = target.strip_prefix(LEVEL_TARGET_PREFIX)?.trim();
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
        return None;
    }
    Some(Path::new(name))
}
