//! Multi-resolution amplitude pyramid for zoom-independent waveform drawing.
//!
//! Level 0 holds one amplitude per unit of `unit_frames` sample frames;
//! every following level averages adjacent pairs of the one before it, down
//! to a single value. All levels live back to back in one flat array.

use serde::Deserialize;

use super::provider::SampleProvider;

/// How the two channels of a frame fold into one amplitude in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelReducer {
    /// Louder of the two channels.
    #[default]
    Max,
    /// Sum of both channels, normalized by the two-channel full scale.
    Sum,
}

impl ChannelReducer {
    pub fn reduce(self, [l, r]: [i16; 2]) -> f32 {
        let (l, r) = (l.unsigned_abs() as f32, r.unsigned_abs() as f32);
        let amp = match self {
            ChannelReducer::Max => l.max(r) / 32768.0,
            ChannelReducer::Sum => (l + r) / 65536.0,
        };
        amp.min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    pub offset: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MipPyramid {
    levels: Vec<MipLevel>,
    values: Vec<f32>,
}

impl MipPyramid {
    /// Scan the whole track once. O(n) over all levels.
    pub fn build<P: SampleProvider + ?Sized>(
        provider: &P,
        reducer: ChannelReducer,
        unit_frames: usize,
    ) -> Self {
        let unit_frames = unit_frames.max(1);
        let frames = provider.frame_count();
        let base_len = frames.div_ceil(unit_frames);

        let mut values = Vec::with_capacity(base_len * 2);
        for unit in 0..base_len {
            let start = unit * unit_frames;
            let end = (start + unit_frames).min(frames);
            let sum: f32 = (start..end)
                .map(|i| reducer.reduce(provider.frame(i)))
                .sum();
            values.push((sum / (end - start) as f32).min(1.0));
        }

        let pyramid = Self::from_base(values);
        log::debug!(
            "Built waveform pyramid: {} frames, {} levels, {} values",
            frames,
            pyramid.levels.len(),
            pyramid.values.len()
        );
        pyramid
    }

    /// Build every coarser level on top of precomputed level-0 amplitudes.
    pub fn from_base(mut values: Vec<f32>) -> Self {
        let mut levels = Vec::new();
        if values.is_empty() {
            return Self { levels, values };
        }

        let mut level = MipLevel {
            offset: 0,
            size: values.len(),
        };
        levels.push(level);

        while level.size > 1 {
            let next = MipLevel {
                offset: values.len(),
                size: level.size / 2,
            };
            values.reserve(next.size);
            for i in 0..next.size {
                let a = values[level.offset + 2 * i];
                let b = values[level.offset + 2 * i + 1];
                values.push((a + b) * 0.5);
            }
            levels.push(next);
            level = next;
        }

        Self { levels, values }
    }

    /// Finest first, coarsest (size 1) last.
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    pub fn level_values(&self, level: usize) -> &[f32] {
        let MipLevel { offset, size } = self.levels[level];
        &self.values[offset..offset + size]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
