use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::network::ForceParams;
use crate::util::parse_hex_color;

pub const DEFAULT_ACCENT: &str = "#00FFD1";
pub const DEFAULT_ROTATION_SPEED: f32 = 0.15;
pub const MAX_SATELLITES: usize = 256;
pub const MAX_ROTATION_SPEED: f32 = 2.0;

const LOW_TIER_MAX_WIDTH: f32 = 1024.0;
const MOBILE_PLATFORMS: [&str; 8] = [
    "android",
    "ios",
    "iphone",
    "ipad",
    "ipod",
    "webos",
    "blackberry",
    "iemobile",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid accent color {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("rotation speed must be finite, got {0}")]
    InvalidRotationSpeed(f32),

    #[error("force parameter {name} is out of range: {value}")]
    InvalidForce { name: &'static str, value: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    High,
    Low,
}

impl PerformanceTier {
    pub fn detect(viewport_width: f32, platform: &str) -> Self {
        let platform = platform.to_ascii_lowercase();
        let mobile = MOBILE_PLATFORMS
            .iter()
            .any(|token| platform.contains(token));

        let tier = if viewport_width < LOW_TIER_MAX_WIDTH || mobile {
            Self::Low
        } else {
            Self::High
        };
        debug!(viewport_width, platform = %platform, ?tier, "detected performance tier");
        tier
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }

    pub fn default_satellites(self) -> usize {
        match self {
            Self::High => 24,
            Self::Low => 12,
        }
    }

    pub fn full_detail(self) -> bool {
        matches!(self, Self::High)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub satellites: Option<usize>,
    pub tier: Option<PerformanceTier>,
    pub auto_rotate: Option<bool>,
    pub rotation_speed: Option<f32>,
    pub accent_color: Option<String>,
    pub seed: Option<u64>,
    pub forces: ForceParams,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub satellites: Option<usize>,
    pub tier: Option<PerformanceTier>,
    pub auto_rotate: Option<bool>,
    pub rotation_speed: Option<f32>,
    pub accent_color: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub satellites: usize,
    pub tier: PerformanceTier,
    pub auto_rotate: bool,
    pub rotation_speed: f32,
    pub accent_color: [u8; 3],
    pub seed: Option<u64>,
    pub forces: ForceParams,
}

impl SceneConfig {
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
        detected: PerformanceTier,
    ) -> Result<Self, ConfigError> {
        let tier = overrides.tier.or(file.tier).unwrap_or(detected);

        let mut satellites = overrides
            .satellites
            .or(file.satellites)
            .unwrap_or_else(|| tier.default_satellites());
        if satellites > MAX_SATELLITES {
            warn!(
                requested = satellites,
                limit = MAX_SATELLITES,
                "satellite count capped"
            );
            satellites = MAX_SATELLITES;
        }

        let mut rotation_speed = overrides
            .rotation_speed
            .or(file.rotation_speed)
            .unwrap_or(DEFAULT_ROTATION_SPEED);
        if !rotation_speed.is_finite() {
            return Err(ConfigError::InvalidRotationSpeed(rotation_speed));
        }
        if rotation_speed.abs() > MAX_ROTATION_SPEED {
            warn!(
                requested = rotation_speed,
                limit = MAX_ROTATION_SPEED,
                "rotation speed capped"
            );
            rotation_speed = rotation_speed.clamp(-MAX_ROTATION_SPEED, MAX_ROTATION_SPEED);
        }

        if let Some((name, value)) = file.forces.first_invalid() {
            return Err(ConfigError::InvalidForce { name, value });
        }

        let accent_text = overrides
            .accent_color
            .or(file.accent_color)
            .unwrap_or_else(|| DEFAULT_ACCENT.to_owned());
        let accent_color =
            parse_hex_color(&accent_text).ok_or(ConfigError::InvalidColor(accent_text))?;

        Ok(Self {
            satellites,
            tier,
            auto_rotate: overrides.auto_rotate.or(file.auto_rotate).unwrap_or(false),
            rotation_speed,
            accent_color,
            seed: overrides.seed.or(file.seed),
            forces: file.forces,
        })
    }
}
