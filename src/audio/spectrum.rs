use serde::Deserialize;

use super::fft::PingPongFft;
use super::provider::SampleProvider;
use crate::error::Result;

/// Taper applied to the sample window before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisWindow {
    #[default]
    Rectangular,
    Hann,
}

impl AnalysisWindow {
    fn coefficients(self, size: usize) -> Vec<f32> {
        match self {
            AnalysisWindow::Rectangular => vec![1.0; size],
            AnalysisWindow::Hann => hann_window(size),
        }
    }
}

/// Which bins the per-pixel output is spread over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectrumRange {
    /// All `N` bins, mirror image included.
    #[default]
    Full,
    /// Bins `0..N/2` only.
    Nyquist,
}

/// Per-frame magnitude spectrum of the audio under the playhead.
pub struct SpectrumAnalyzer {
    fft: PingPongFft,
    window: Vec<f32>,
    range: SpectrumRange,
    /// Weight of the previous frame's value, `0.0` disables smoothing.
    smoothing: f32,
    magnitudes: Vec<f32>,
    bins: Vec<f32>,
    last: Option<(usize, usize)>,
}

impl SpectrumAnalyzer {
    pub fn new(
        size: usize,
        window: AnalysisWindow,
        range: SpectrumRange,
        smoothing: f32,
    ) -> Result<Self> {
        let fft = PingPongFft::new(size)?;
        Ok(Self {
            fft,
            window: window.coefficients(size),
            range,
            smoothing: smoothing.clamp(0.0, 0.99),
            magnitudes: vec![0.0; size],
            bins: Vec::new(),
            last: None,
        })
    }

    pub fn size(&self) -> usize {
        self.fft.size()
    }

    /// Transform the `N` frames starting at `offset`. Frames past the end of
    /// the track count as silence. Returns all `N` bin magnitudes.
    pub fn analyze<P: SampleProvider + ?Sized>(&mut self, provider: &P, offset: usize) -> &[f32] {
        let input = self.fft.input_mut();
        for (i, (slot, coeff)) in input.iter_mut().zip(&self.window).enumerate() {
            let sample = provider.mono(offset.saturating_add(i));
            slot.re = sample * coeff;
            slot.im = 0.0;
        }

        let bins = self.fft.process();
        for (mag, bin) in self.magnitudes.iter_mut().zip(bins) {
            *mag = bin.norm();
        }
        &self.magnitudes
    }

    /// `width` magnitudes sampled across the configured bin range for the
    /// window at `offset`. Reuses the previous result while neither input
    /// changed.
    pub fn refresh<P: SampleProvider + ?Sized>(
        &mut self,
        provider: &P,
        offset: usize,
        width: usize,
    ) -> &[f32] {
        if self.last == Some((offset, width)) {
            return &self.bins;
        }

        let width_changed = self.last.map_or(true, |(_, w)| w != width);
        self.last = Some((offset, width));
        self.analyze(provider, offset);

        let span = match self.range {
            SpectrumRange::Full => self.magnitudes.len(),
            SpectrumRange::Nyquist => self.magnitudes.len() / 2,
        };

        if width_changed {
            self.bins.clear();
            self.bins.resize(width, 0.0);
        }

        let keep = if width_changed { 0.0 } else { self.smoothing };
        for (x, out) in self.bins.iter_mut().enumerate() {
            let raw = self.magnitudes[x * span / width];
            *out = raw * (1.0 - keep) + *out * keep;
        }

        &self.bins
    }

    /// Forget the cached window, e.g. after a seek or a new track.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}
