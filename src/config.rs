use crate::gauge::action::TapAction;
use crate::gauge::host::EntityId;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/ring-gauge.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn into_srgb(self) -> Srgb<f64> {
        self.0.into_format()
    }
}

impl FromStr for HexColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0.red, self.0.green, self.0.blue
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GaugeConfig {
    #[serde(default)]
    pub entity: Option<EntityId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default = "default_stroke")]
    pub stroke: f64,
    #[serde(default = "default_start_angle")]
    pub start_angle: f64,
    #[serde(default = "default_end_angle")]
    pub end_angle: f64,
    #[serde(default)]
    pub value_min: f64,
    #[serde(default = "default_value_max")]
    pub value_max: f64,
    /// Milliseconds.
    #[serde(default = "default_throttle_delay")]
    pub throttle_delay: u64,
    #[serde(default = "default_true")]
    pub show_percentage: bool,
    #[serde(default = "default_true")]
    pub show_state: bool,
    #[serde(default = "default_gradient_start")]
    pub gradient_start: HexColor,
    #[serde(default = "default_gradient_end")]
    pub gradient_end: HexColor,
    #[serde(default)]
    pub tap_action: TapAction,
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
}

fn default_size() -> f64 {
    180.0
}

fn default_stroke() -> f64 {
    14.0
}

fn default_start_angle() -> f64 {
    300.0
}

fn default_end_angle() -> f64 {
    120.0
}

fn default_value_max() -> f64 {
    255.0
}

fn default_throttle_delay() -> u64 {
    50
}

fn default_true() -> bool {
    true
}

fn default_gradient_start() -> HexColor {
    HexColor::new(0xff, 0xd5, 0x4f)
}

fn default_gradient_end() -> HexColor {
    HexColor::new(0xfe, 0x50, 0x00)
}

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            entity: None,
            name: None,
            image: None,
            size: default_size(),
            stroke: default_stroke(),
            start_angle: default_start_angle(),
            end_angle: default_end_angle(),
            value_min: 0.0,
            value_max: default_value_max(),
            throttle_delay: default_throttle_delay(),
            show_percentage: true,
            show_state: true,
            gradient_start: default_gradient_start(),
            gradient_end: default_gradient_end(),
            tap_action: TapAction::default(),
            socket_path: default_socket_path(),
        }
    }
}

impl GaugeConfig {
    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay)
    }

    /// Applies an entity given on the command line over the configured one.
    pub fn with_entity(mut self, entity: Option<&EntityId>) -> Self {
        if let Some(entity) = entity {
            self.entity = Some(entity.clone());
        }
        self
    }

    /// Checks everything a gauge needs and hands back its target entity.
    pub fn validate(&self) -> Result<EntityId, ConfigError> {
        let entity = self
            .entity
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingEntity)?;

        for (name, value) in [
            ("start_angle", self.start_angle),
            ("end_angle", self.end_angle),
        ] {
            if !(0.0..360.0).contains(&value) {
                return Err(ConfigError::AngleOutOfRange { name, value });
            }
        }

        if !(self.value_max > self.value_min) {
            return Err(ConfigError::EmptyValueRange {
                min: self.value_min,
                max: self.value_max,
            });
        }

        if !(self.size.is_finite() && self.stroke > 0.0 && self.stroke * 1.5 < self.size) {
            return Err(ConfigError::InvalidSize {
                size: self.size,
                stroke: self.stroke,
            });
        }

        Ok(entity)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("No entity configured: set `entity` to the entity this gauge controls")]
    MissingEntity,
    #[error("{name} must be within [0, 360) degrees, got {value}")]
    AngleOutOfRange { name: &'static str, value: f64 },
    #[error("value_max ({max}) must be greater than value_min ({min})")]
    EmptyValueRange { min: f64, max: f64 },
    #[error("stroke ({stroke}) must be positive and leave room inside size ({size})")]
    InvalidSize { size: f64, stroke: f64 },
    #[error("Invalid color '{0}', expected a hex value such as #ffd54f")]
    InvalidColor(String),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "ring-gauge", "ring-gauge")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config_from(path: &Path) -> Result<GaugeConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("RING_GAUGE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Writes the commented default config to `path` unless a file is already there.
pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
