use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::BASE_SURFACE_WIDTH;
use crate::foundation::error::{WishlyError, WishlyResult};
use crate::placement::model::PlacementLimits;
use crate::render::plan::SpeckleSpec;
use crate::render::text::{FontBook, FontFace};

/// Engine knobs. Loadable from JSON; every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum render surface width; the surface grows with the display.
    pub base_width: u32,
    pub placement: PlacementLimits,
    pub title_font: Option<PathBuf>,
    pub body_font: Option<PathBuf>,
    /// Fixed speckle seed; `None` seeds from entropy.
    pub speckle_seed: Option<u64>,
    pub speckles: SpeckleSpec,
    /// Storage directory; `None` uses the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_width: BASE_SURFACE_WIDTH,
            placement: PlacementLimits::default(),
            title_font: None,
            body_font: None,
            speckle_seed: None,
            speckles: SpeckleSpec::default(),
            data_dir: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `WISHLY_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load a JSON config file, then apply environment overrides.
    pub fn from_path(path: &Path) -> WishlyResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&raw)
            .map_err(|e| WishlyError::serde(format!("config '{}': {e}", path.display())))?;
        Ok(cfg.with_env_overrides())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty("WISHLY_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty("WISHLY_TITLE_FONT") {
            self.title_font = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty("WISHLY_BODY_FONT") {
            self.body_font = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty("WISHLY_SPECKLE_SEED") {
            match v.trim().parse::<u64>() {
                Ok(seed) => self.speckle_seed = Some(seed),
                Err(_) => tracing::warn!(value = %v, "ignoring non-numeric WISHLY_SPECKLE_SEED"),
            }
        }
        self
    }

    pub fn validate(&self) -> WishlyResult<()> {
        if self.base_width == 0 || self.base_width > u32::from(u16::MAX) {
            return Err(WishlyError::validation("base_width must be in 1..=65535"));
        }
        let p = &self.placement;
        if !(p.min_scale.is_finite() && p.max_scale.is_finite())
            || p.min_scale <= 0.0
            || p.min_scale > p.max_scale
        {
            return Err(WishlyError::validation(
                "placement scale range must be finite with 0 < min <= max",
            ));
        }
        if !(0.0..=1.0).contains(&p.keep_visible) {
            return Err(WishlyError::validation("keep_visible must be within [0, 1]"));
        }
        if !(self.speckles.min_radius >= 0.0 && self.speckles.max_radius >= self.speckles.min_radius)
        {
            return Err(WishlyError::validation(
                "speckle radii must satisfy 0 <= min <= max",
            ));
        }
        Ok(())
    }

    /// Load the configured font files. Unset paths leave that slot empty.
    pub fn load_fonts(&self) -> WishlyResult<FontBook> {
        Ok(FontBook {
            title: self.title_font.as_deref().map(FontFace::from_path).transpose()?,
            body: self.body_font.as_deref().map(FontFace::from_path).transpose()?,
        })
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(crate::persist::store::FileStore::default_dir)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
