use crate::error::{StudioError, StudioResult};
use crate::render::combined_renderer::AutoScale;
use crate::wave::kind::WaveKind;
use crate::wave::WaveLimits;
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "WAVE_STUDIO_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "wave_studio.toml";

/// Finest horizontal sampling step, in pixels.
pub const MIN_SAMPLE_STEP: f32 = 0.05;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub min_frequency: f64,
    pub max_frequency: f64,
    pub reference_frequency: f64,
    pub default_frequency: f64,
    pub default_amplitude: f64,
    pub default_wave_type: WaveKind,
    pub visible_cycles: u32,
    pub max_visible_cycles: u32,
    pub base_frequency: f64,
    pub initial_waves: usize,
    pub master_volume: f64,
    pub sample_step: f32,
    pub wave_padding: f32,
    pub combined_padding: f32,
    pub min_scaling_factor: f64,
    pub default_scale: f64,
    pub silence_threshold: f64,
    pub sample_rate: f64,
    pub log_level: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            min_frequency: 20.0,
            max_frequency: 2000.0,
            reference_frequency: 440.0,
            default_frequency: 220.0,
            default_amplitude: 50.0,
            default_wave_type: WaveKind::Sine,
            visible_cycles: 10,
            max_visible_cycles: 50,
            base_frequency: 20.0,
            initial_waves: 6,
            master_volume: 50.0,
            sample_step: 0.5,
            wave_padding: 5.0,
            combined_padding: 20.0,
            min_scaling_factor: 0.2,
            default_scale: 1.0,
            silence_threshold: 1e-9,
            sample_rate: 48_000.0,
            log_level: "info".to_string(),
        }
    }
}

impl StudioConfig {
    pub fn from_toml(text: &str, path: &Path) -> StudioResult<Self> {
        let config: StudioConfig = toml::from_str(text).map_err(|source| StudioError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> StudioResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| StudioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Config file named by `WAVE_STUDIO_CONFIG`, else `./wave_studio.toml`
    /// when it exists, else `None`.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    }

    /// Loads the located config, or the defaults if there is none or it is broken.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::locate() else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{}, using default settings", err);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> StudioResult<()> {
        if !(self.min_frequency > 0.0) {
            return Err(StudioError::invalid("min_frequency", "must be positive"));
        }
        if !(self.max_frequency > self.min_frequency) {
            return Err(StudioError::invalid(
                "max_frequency",
                "must be greater than min_frequency",
            ));
        }
        if self.max_visible_cycles == 0 {
            return Err(StudioError::invalid("max_visible_cycles", "must be at least 1"));
        }
        if !(self.sample_step >= MIN_SAMPLE_STEP) {
            return Err(StudioError::invalid(
                "sample_step",
                format!("must be at least {MIN_SAMPLE_STEP}"),
            ));
        }
        if !self.master_volume.is_finite() {
            return Err(StudioError::invalid("master_volume", "must be a number"));
        }
        if !(self.sample_rate > 0.0) {
            return Err(StudioError::invalid("sample_rate", "must be positive"));
        }
        if !(self.min_scaling_factor > 0.0) || !(self.default_scale > 0.0) {
            return Err(StudioError::invalid(
                "min_scaling_factor",
                "scales must be positive",
            ));
        }
        if self.silence_threshold < 0.0 {
            return Err(StudioError::invalid("silence_threshold", "must not be negative"));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> StudioResult<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| {
                StudioError::invalid("log_level", format!("unknown level '{}'", self.log_level))
            })
    }

    pub fn limits(&self) -> WaveLimits {
        WaveLimits {
            min_frequency: self.min_frequency,
            max_frequency: self.max_frequency,
            max_visible_cycles: self.max_visible_cycles,
        }
    }

    pub fn auto_scale(&self) -> AutoScale {
        AutoScale {
            min_scaling_factor: self.min_scaling_factor,
            default_scale: self.default_scale,
            silence_threshold: self.silence_threshold,
        }
    }
}
