use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::mip::ChannelReducer;
use crate::audio::spectrum::{AnalysisWindow, SpectrumRange};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub waveform: WaveformConfig,
    #[serde(default)]
    pub spectrum: SpectrumConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Deserialize)]
pub struct WaveformConfig {
    #[serde(default)]
    pub reducer: ChannelReducer,
    /// Sample frames folded into one level-0 value.
    #[serde(default = "default_unit_frames")]
    pub unit_frames: usize,
    #[serde(default)]
    pub source: WaveformSource,
}

/// Where per-pixel waveform values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveformSource {
    #[default]
    Pyramid,
    Direct,
}

#[derive(Debug, Deserialize)]
pub struct SpectrumConfig {
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default)]
    pub window: AnalysisWindow,
    #[serde(default)]
    pub range: SpectrumRange,
    #[serde(default)]
    pub smoothing: f32,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            reducer: ChannelReducer::default(),
            unit_frames: default_unit_frames(),
            source: WaveformSource::default(),
        }
    }
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            window: AnalysisWindow::default(),
            range: SpectrumRange::default(),
            smoothing: 0.0,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            fps: default_fps(),
        }
    }
}

fn default_unit_frames() -> usize { 1 }
fn default_fft_size() -> usize { 4096 }
fn default_width() -> u32 { 1920 }
fn default_fps() -> u32 { 60 }

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// `./wavecue.toml`, then the XDG-style and platform config directories.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("wavecue.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("wavecue").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("wavecue").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
