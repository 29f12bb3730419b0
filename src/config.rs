//=========================================================================
// Configuration
//=========================================================================
//
// Runtime settings loaded from a TOML file.
//
// Layout:
// ```text
//   [engine]   tps, channel_capacity, fixed_timestep, max_fixed_steps
//   [window]   title, width, height
//   [player]   move_speed, interact_distance
//   [input]    interact_button, close_key, reload_key, smoothing
// ```
//
// Every field has a default, so an empty file (or no file) is valid.
// Command-line flags override file values in the binary.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::input::{AxisSmoothing, KeyCode, MouseButton};
use crate::error::{NotesError, Result};

//=== Config ==============================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub input: InputConfig,
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| NotesError::io(path, e))?;
        let config: Self = toml::from_str(&source).map_err(|e| NotesError::parse(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;
        if !(engine.tps > 0.0) {
            return Err(invalid(format!("engine.tps must be positive, got {}", engine.tps)));
        }
        if engine.channel_capacity == 0 {
            return Err(invalid("engine.channel_capacity must be positive".into()));
        }
        if !(engine.fixed_timestep > 0.0) {
            return Err(invalid(format!(
                "engine.fixed_timestep must be positive, got {}",
                engine.fixed_timestep
            )));
        }
        if engine.max_fixed_steps == 0 {
            return Err(invalid("engine.max_fixed_steps must be at least 1".into()));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let player = &self.player;
        if !player.move_speed.is_finite() || player.move_speed < 0.0 {
            return Err(invalid(format!(
                "player.move_speed must be a non-negative number, got {}",
                player.move_speed
            )));
        }
        if !player.look_sensitivity.is_finite() || player.look_sensitivity < 0.0 {
            return Err(invalid(format!(
                "player.look_sensitivity must be a non-negative number, got {}",
                player.look_sensitivity
            )));
        }
        if let Some(distance) = player.interact_distance {
            if !(distance > 0.0) {
                return Err(invalid(format!(
                    "player.interact_distance must be positive, got {}",
                    distance
                )));
            }
        }

        if let Some(smoothing) = &self.input.smoothing {
            if !(smoothing.sensitivity > 0.0) || !(smoothing.gravity > 0.0) {
                return Err(invalid("input.smoothing rates must be positive".into()));
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> NotesError {
    NotesError::InvalidConfig(message)
}

//=== Sections ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logic ticks per second.
    pub tps: f64,

    /// Platform → core channel capacity, in frames.
    pub channel_capacity: usize,

    /// Physics step in seconds.
    pub fixed_timestep: f32,

    /// Step cap per tick; backlog beyond it is dropped.
    pub max_fixed_steps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            fixed_timestep: 0.02,
            max_fixed_steps: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Aetheric Notes".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl WindowConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Units per second at full axis deflection.
    pub move_speed: f32,

    /// Reach of the read ray. Unlimited when absent.
    pub interact_distance: Option<f32>,

    /// Radians of yaw per pixel of horizontal pointer movement.
    pub look_sensitivity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            interact_distance: None,
            look_sensitivity: 0.003,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub interact_button: MouseButton,
    pub close_key: KeyCode,
    pub reload_key: KeyCode,

    /// Axis response curve; raw digital axes when absent.
    pub smoothing: Option<AxisSmoothing>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            interact_button: MouseButton::Left,
            close_key: KeyCode::Escape,
            reload_key: KeyCode::KeyR,
            smoothing: None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.player.move_speed, 5.0);
        assert_eq!(config.engine.fixed_timestep, 0.02);
        assert_eq!(config.input.close_key, KeyCode::Escape);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [player]
            move_speed = 3.5
            interact_distance = 4.0

            [input]
            close_key = "Backspace"

            [input.smoothing]
            sensitivity = 6.0
            "#,
        )
        .unwrap();

        assert_eq!(config.player.move_speed, 3.5);
        assert_eq!(config.player.interact_distance, Some(4.0));
        assert_eq!(config.input.close_key, KeyCode::Backspace);
        assert_eq!(config.input.interact_button, MouseButton::Left);

        let smoothing = config.input.smoothing.unwrap();
        assert_eq!(smoothing.sensitivity, 6.0);
        assert_eq!(smoothing.gravity, AxisSmoothing::default().gravity);
        assert_eq!(config.engine.tps, 60.0);
    }

    #[test]
    fn validation_rejects_bad_values() {
        for source in [
            "[engine]\ntps = 0.0",
            "[engine]\nchannel_capacity = 0",
            "[engine]\nfixed_timestep = -0.02",
            "[engine]\nmax_fixed_steps = 0",
            "[window]\nwidth = 0",
            "[player]\nmove_speed = -1.0",
            "[player]\ninteract_distance = 0.0",
            "[player]\nlook_sensitivity = -0.1",
        ] {
            let err = Config::from_toml_str(source).unwrap_err();
            assert!(matches!(err, NotesError::InvalidConfig(_)), "{source}: {err}");
        }
    }

    #[test]
    fn unknown_key_name_is_a_parse_error() {
        let err = Config::from_toml_str("[input]\nclose_key = \"Esc\"").unwrap_err();
        assert!(matches!(err, NotesError::Toml(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\ntitle = \"Archive\"\nwidth = 640\nheight = 480").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.window.title, "Archive");
        assert!((config.window.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, NotesError::Io { .. }));
    }

    #[test]
    fn shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.player.move_speed, 5.0);
        assert_eq!(config.player.interact_distance, Some(6.0));
        assert!(config.player.look_sensitivity > 0.0);
        assert_eq!(config.input, InputConfig::default());
    }
}
