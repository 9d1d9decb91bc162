use std::fmt::Display;
use std::fs;
use std::path::Path;

use ledge_engine::{BodyTuning, LoopConfig};
use serde::{Deserialize, Serialize};

pub(crate) type SettingsResult<T> = Result<T, String>;

pub(crate) const DEFAULT_START_LEVEL: &str = "intro.xml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        let loop_defaults = LoopConfig::default();
        Self {
            title: loop_defaults.window_title,
            width: loop_defaults.window_width,
            height: loop_defaults.window_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub window: WindowSettings,
    pub target_tps: u32,
    pub player: BodyTuning,
    pub start_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            target_tps: LoopConfig::default().target_tps,
            player: BodyTuning::default(),
            start_level: DEFAULT_START_LEVEL.to_string(),
        }
    }
}

impl Settings {
    pub(crate) fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            window_title: self.window.title.clone(),
            window_width: self.window.width,
            window_height: self.window.height,
            target_tps: self.target_tps,
            ..LoopConfig::default()
        }
    }
}

/// Reads settings from `path`, or returns defaults when the file does not exist.
pub(crate) fn load_settings(path: &Path) -> SettingsResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read settings '{}': {error}", path.display()))?;
    let settings = parse_settings_json(&raw)?;
    validate_settings(&settings)?;
    Ok(settings)
}

pub(crate) fn parse_settings_json(raw: &str) -> SettingsResult<Settings> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, Settings>(&mut deserializer) {
        Ok(settings) => Ok(settings),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse settings json: {source}"))
            } else {
                Err(format!("parse settings json at {path}: {source}"))
            }
        }
    }
}

fn validation_err(path: &str, message: impl Into<String>) -> String {
    format!("validation failed at {path}: {}", message.into())
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> String {
    validation_err(path, format!("expected {expected}, got {actual}"))
}

pub(crate) fn validate_settings(settings: &Settings) -> SettingsResult<()> {
    if settings.window.width == 0 {
        return Err(expected_actual("window.width", "> 0", settings.window.width));
    }
    if settings.window.height == 0 {
        return Err(expected_actual(
            "window.height",
            "> 0",
            settings.window.height,
        ));
    }
    if settings.target_tps == 0 {
        return Err(expected_actual("target_tps", "> 0", settings.target_tps));
    }
    if settings.start_level.trim().is_empty() {
        return Err(validation_err("start_level", "must not be empty"));
    }

    let player = &settings.player;
    for (path, value) in [
        ("player.width", player.width),
        ("player.height", player.height),
        ("player.gravity", player.gravity),
        ("player.vertical_speed_cap", player.vertical_speed_cap),
        ("player.horizontal_speed", player.horizontal_speed),
        ("player.lift_acceleration", player.lift_acceleration),
        ("player.jump_impulse", player.jump_impulse),
    ] {
        if !value.is_finite() {
            return Err(expected_actual(path, "finite number", value));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let settings = parse_settings_json("{}").expect("parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.player.gravity, 0.5);
        assert_eq!(settings.start_level, "intro.xml");
    }

    #[test]
    fn partial_player_tuning_keeps_other_defaults() {
        let settings =
            parse_settings_json(r#"{ "player": { "gravity": 0.25, "jump_impulse": 8 } }"#)
                .expect("parse");

        assert_eq!(settings.player.gravity, 0.25);
        assert_eq!(settings.player.jump_impulse, 8.0);
        assert_eq!(settings.player.vertical_speed_cap, 10.0);
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn unknown_field_reports_json_path() {
        let err = parse_settings_json(r#"{ "player": { "gravty": 1.0 } }"#).expect_err("error");
        assert!(err.contains("player"), "{err}");
        assert!(err.contains("gravty"), "{err}");
    }

    #[test]
    fn wrong_type_reports_json_path() {
        let err = parse_settings_json(r#"{ "window": { "width": "wide" } }"#).expect_err("error");
        assert!(err.contains("window.width"), "{err}");
    }

    #[test]
    fn zero_window_size_fails_validation() {
        let mut settings = Settings::default();
        settings.window.height = 0;

        let err = validate_settings(&settings).expect_err("error");
        assert!(err.contains("window.height"), "{err}");
    }

    #[test]
    fn zero_tick_rate_fails_validation() {
        let settings = Settings {
            target_tps: 0,
            ..Settings::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn loop_config_carries_window_and_tick_rate() {
        let settings = parse_settings_json(
            r#"{ "window": { "title": "Test", "width": 640, "height": 480 }, "target_tps": 30 }"#,
        )
        .expect("parse");

        let config = settings.loop_config();
        assert_eq!(config.window_title, "Test");
        assert_eq!((config.window_width, config.window_height), (640, 480));
        assert_eq!(config.target_tps, 30);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = Path::new("/definitely/not/here/settings.json");
        let settings = load_settings(path).expect("load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn shipped_settings_match_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/settings.json");
        let settings = load_settings(&path).expect("load shipped settings");
        assert_eq!(settings, Settings::default());
    }
}
