use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::frames::{FrameNaming, LoadOptions},
    fade::visibility::FadeOptions,
    foundation::core::Anchor,
    foundation::error::{ReelError, ReelResult},
    render::cpu::CpuSurfaceOpts,
};

/// Number of frames in the stock sequence.
pub const DEFAULT_FRAME_COUNT: u32 = 150;

/// Environment variable overriding [`LoadOptions::threads`].
pub const LOAD_THREADS_ENV: &str = "SCROLLREEL_LOAD_THREADS";

/// Everything needed to stand up a reel, loadable from JSON.
///
/// Every field has a default, so `{}` is a valid config for the stock 150-frame sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    pub frame_count: u32,
    pub naming: FrameNaming,
    pub anchor: Anchor,
    pub load: LoadOptions,
    pub fade: FadeOptions,
    pub surface: SurfaceConfig,
}

/// CPU surface settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    /// Straight RGBA8 clear color; `None` clears to transparent.
    pub clear_rgba: Option<[u8; 4]>,
    pub paint_cache_capacity: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        let opts = CpuSurfaceOpts::default();
        Self {
            clear_rgba: opts.clear_rgba,
            paint_cache_capacity: opts.paint_cache_capacity,
        }
    }
}

impl From<SurfaceConfig> for CpuSurfaceOpts {
    fn from(c: SurfaceConfig) -> Self {
        CpuSurfaceOpts {
            clear_rgba: c.clear_rgba,
            paint_cache_capacity: c.paint_cache_capacity,
        }
    }
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            naming: FrameNaming::default(),
            anchor: Anchor::CENTER,
            load: LoadOptions::default(),
            fade: FadeOptions::default(),
            surface: SurfaceConfig::default(),
        }
    }
}

impl ReelConfig {
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.frame_count == 0 {
            return Err(ReelError::validation("frame_count must be >= 1"));
        }
        self.naming.validate(self.frame_count)?;
        if self.load.threads == Some(0) {
            return Err(ReelError::validation(
                "load.threads must be >= 1 (omit it for the default)",
            ));
        }
        self.fade.validate()?;
        Ok(())
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides using `lookup` as the environment.
    ///
    /// Unparseable or zero values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(threads) = lookup(LOAD_THREADS_ENV)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            tracing::debug!(threads, "loader threads overridden from environment");
            self.load.threads = Some(threads);
        }
    }

    pub fn surface_opts(&self) -> CpuSurfaceOpts {
        self.surface.into()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
