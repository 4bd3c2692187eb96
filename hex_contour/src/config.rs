//! Configuration for contour construction and point classification.
//!
//! Loaded from `contour_config.json` with support for an environment variable override.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_CONTOUR_CONFIG: &str = include_str!("data/contour_config.json");

/// Root configuration for the contour engine.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContourConfig {
    pub hex: HexConfig,
    pub rivers: RiverConfig,
    pub spline: SplineConfig,
}

impl ContourConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_CONTOUR_CONFIG)
                .expect("builtin contour config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ContourConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ContourConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ContourConfig::from_json_str(&contents)?;
        Ok(config)
    }

    /// Half-width of a traced river made of `section_count` sections.
    pub fn river_half_width(&self, section_count: usize) -> f32 {
        let rivers = &self.rivers;
        let grown = rivers.min_half_width
            + rivers.half_width_per_section * section_count.saturating_sub(1) as f32;
        grown.clamp(rivers.min_half_width, rivers.max_half_width.max(rivers.min_half_width))
    }
}

/// Hex cell dimensions.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HexConfig {
    /// Centre-to-corner distance.
    pub outer_radius: f32,
    /// Fraction of the hex (centre outward) that never blends with neighbours.
    pub solid_factor: f32,
}

impl Default for HexConfig {
    fn default() -> Self {
        Self {
            outer_radius: 10.0,
            solid_factor: 0.75,
        }
    }
}

/// River channel and bank settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiverConfig {
    /// Distance from a bank over which river texture fades out on land.
    pub bank_width: f32,
    pub min_half_width: f32,
    pub max_half_width: f32,
    pub half_width_per_section: f32,
    /// Close the channel onto the corner at river sources.
    pub taper_sources: bool,
    /// Close the channel onto the corner at river mouths.
    pub taper_mouths: bool,
    /// Interior points sampled along each bank contour.
    pub bank_samples: usize,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            bank_width: 2.5,
            min_half_width: 1.2,
            max_half_width: 2.4,
            half_width_per_section: 0.1,
            taper_sources: true,
            taper_mouths: true,
            bank_samples: 3,
        }
    }
}

/// Control-point settings for river splines.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplineConfig {
    pub tangent_scale: f32,
    pub outside_curve_scale: f32,
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            tangent_scale: 0.33,
            outside_curve_scale: 0.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum ContourConfigError {
    #[error("failed to parse contour config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read contour config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle for accessing the contour configuration.
#[derive(Resource, Debug, Clone)]
pub struct ContourConfigHandle(pub Arc<ContourConfig>);

impl ContourConfigHandle {
    pub fn new(config: Arc<ContourConfig>) -> Self {
        Self(config)
    }

    pub fn get(&self) -> Arc<ContourConfig> {
        Arc::clone(&self.0)
    }

    pub fn replace(&mut self, config: Arc<ContourConfig>) {
        self.0 = config;
    }
}

impl Default for ContourConfigHandle {
    fn default() -> Self {
        Self::new(ContourConfig::builtin())
    }
}

/// Load contour configuration from `CONTOUR_CONFIG_PATH` or the default path.
pub fn load_contour_config_from_env() -> (Arc<ContourConfig>, Option<PathBuf>) {
    let override_path = env::var("CONTOUR_CONFIG_PATH").ok().map(PathBuf::from);
    let default_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data/contour_config.json");

    load_contour_config(override_path.unwrap_or(default_path))
}

/// Load `path`, falling back to the builtin configuration when it cannot be read.
pub fn load_contour_config(path: PathBuf) -> (Arc<ContourConfig>, Option<PathBuf>) {
    match ContourConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "hex_contour::config",
                path = %path.display(),
                "contour_config.loaded=file"
            );
            (Arc::new(config), Some(path))
        }
        Err(err) => {
            tracing::warn!(
                target: "hex_contour::config",
                path = %path.display(),
                error = %err,
                "contour_config.load_failed"
            );
            tracing::info!(target: "hex_contour::config", "contour_config.loaded=builtin");
            (ContourConfig::builtin(), None)
        }
    }
}
