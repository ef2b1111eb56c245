use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;

use crate::audio::mip::{ChannelReducer, MipPyramid};
use crate::audio::provider::{PlaybackClock, SampleProvider};
use crate::audio::select::{scan_direct, MipSelector};
use crate::audio::spectrum::SpectrumAnalyzer;
use crate::config::{Config, WaveformSource};
use crate::error::{Error, Result};
use crate::subtitle::caption::{CaptionStore, Chunk};
use crate::subtitle::cursor;

/// Everything the drawing layer needs for one frame. Borrowed from the
/// [`Visualizer`] and valid until its next `frame` call.
#[derive(Debug, Serialize)]
pub struct FrameView<'a> {
    pub time: f32,
    pub cursor_x: u32,
    pub waveform: &'a [f32],
    pub spectrum: &'a [f32],
    pub caption_index: Option<usize>,
    pub caption: Option<Cow<'a, str>>,
}

/// Per-frame glue between the playback clock and the analysis caches.
///
/// Owns the track's pyramid and captions once loaded; waveform pixels are
/// only resampled when the width changes and the spectrum only when the
/// playhead moves to a new sample offset.
pub struct Visualizer<P> {
    provider: P,
    pyramid: MipPyramid,
    selector: MipSelector,
    source: WaveformSource,
    reducer: ChannelReducer,
    direct: Option<(usize, Vec<f32>)>,
    analyzer: SpectrumAnalyzer,
    captions: CaptionStore,
    chunk: Chunk,
}

impl<P: SampleProvider> Visualizer<P> {
    pub fn new(provider: P, config: &Config) -> Result<Self> {
        if provider.sample_rate() == 0 {
            return Err(Error::InvalidSampleRate(0));
        }
        if provider.frame_count() == 0 {
            return Err(Error::EmptyAudio);
        }

        let waveform = &config.waveform;
        let pyramid = match waveform.source {
            WaveformSource::Pyramid => {
                MipPyramid::build(&provider, waveform.reducer, waveform.unit_frames)
            }
            WaveformSource::Direct => MipPyramid::default(),
        };

        let spectrum = &config.spectrum;
        let analyzer = SpectrumAnalyzer::new(
            spectrum.fft_size,
            spectrum.window,
            spectrum.range,
            spectrum.smoothing,
        )?;

        log::info!(
            "Visualizer ready: {:.1}s, waveform from {:?}, {}-point FFT",
            provider.duration(),
            waveform.source,
            spectrum.fft_size
        );

        Ok(Self {
            provider,
            pyramid,
            selector: MipSelector::new(),
            source: waveform.source,
            reducer: waveform.reducer,
            direct: None,
            analyzer,
            captions: CaptionStore::new(),
            chunk: Chunk::default(),
        })
    }

    /// Parse a cue file and make its words the displayed captions.
    pub fn load_captions(&mut self, path: &Path) -> Result<Chunk> {
        let chunk = self.captions.parse_file(path)?;
        self.chunk = chunk;
        Ok(chunk)
    }

    /// Parse in-memory cue bytes and make them the displayed captions.
    pub fn parse_captions(&mut self, input: &[u8]) -> Chunk {
        let chunk = self.captions.parse(input);
        self.chunk = chunk;
        chunk
    }

    /// Switch to a chunk previously parsed into this visualizer's store.
    pub fn set_active_chunk(&mut self, chunk: Chunk) {
        self.chunk = chunk;
    }

    pub fn captions(&self) -> &CaptionStore {
        &self.captions
    }

    pub fn pyramid(&self) -> &MipPyramid {
        &self.pyramid
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn duration(&self) -> f32 {
        self.provider.duration()
    }

    /// Seek `clock` to the time under pixel `x` of a `width`-wide bar.
    pub fn seek_to_pixel(&self, clock: &mut dyn PlaybackClock, x: u32, width: u32) {
        let time = cursor::seek_time(x, width, clock.duration());
        log::debug!("Seek to {:.3}s (x={})", time, x);
        clock.seek(time);
    }

    /// Refresh the caches for the clock's current time and hand out the
    /// results for drawing `width` pixels.
    pub fn frame(&mut self, clock: &dyn PlaybackClock, width: u32) -> FrameView<'_> {
        let time = clock.time_played();
        let width_px = width as usize;

        let offset = cursor::sample_offset(time, self.provider.sample_rate());
        let spectrum = self.analyzer.refresh(&self.provider, offset, width_px);

        let waveform: &[f32] = match self.source {
            WaveformSource::Pyramid => self.selector.select(&self.pyramid, width_px),
            WaveformSource::Direct => {
                if self.direct.as_ref().map(|(w, _)| *w) != Some(width_px) {
                    let pixels = scan_direct(&self.provider, self.reducer, width_px);
                    self.direct = Some((width_px, pixels));
                }
                self.direct
                    .as_ref()
                    .map(|(_, pixels)| pixels.as_slice())
                    .unwrap_or(&[])
            }
        };

        let words = self.captions.words(self.chunk);
        let caption_index = cursor::active_word(words, time);
        let caption = caption_index.map(|i| self.captions.text(&words[i]));

        FrameView {
            time,
            cursor_x: cursor::cursor_x(time, clock.duration(), width),
            waveform,
            spectrum,
            caption_index,
            caption,
        }
    }
}
