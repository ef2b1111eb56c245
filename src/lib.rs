//! Frame-driven analysis core for an audio playback visualizer.
//!
//! Turns decoded PCM and a word-timed cue file into what a renderer draws
//! each frame: per-pixel waveform amplitudes from a multi-resolution
//! pyramid, per-bin spectrum magnitudes from a fixed-size FFT, and the
//! caption word under the playhead.
//!
//! Everything here is single-threaded and synchronous. Pyramid and caption
//! data are built once per load and only read afterwards.

pub mod audio;
pub mod config;
pub mod error;
pub mod render;
pub mod subtitle;

pub use error::{Error, Result};
