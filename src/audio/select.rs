use super::mip::{ChannelReducer, MipPyramid};
use super::provider::SampleProvider;

/// Index of the level used to draw `width` pixels.
///
/// Walks from the coarsest level toward finer ones and stops at the first
/// level holding at least `width` values, falling back to level 0.
pub fn choose_level(pyramid: &MipPyramid, width: usize) -> Option<usize> {
    let levels = pyramid.levels();
    if levels.is_empty() {
        return None;
    }
    let found = levels.iter().rposition(|level| level.size >= width);
    Some(found.unwrap_or(0))
}

/// Per-pixel waveform amplitudes, resampled from the pyramid only when the
/// target width changes.
#[derive(Debug, Default)]
pub struct MipSelector {
    width: Option<usize>,
    level: Option<usize>,
    pixels: Vec<f32>,
}

impl MipSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exactly `width` amplitudes; a zero width yields none and an empty
    /// pyramid yields silence.
    pub fn select(&mut self, pyramid: &MipPyramid, width: usize) -> &[f32] {
        if self.width != Some(width) {
            self.resample(pyramid, width);
        }
        &self.pixels
    }

    /// Drop the cached pixels, e.g. after a new track was loaded.
    pub fn invalidate(&mut self) {
        self.width = None;
        self.level = None;
    }

    pub fn level(&self) -> Option<usize> {
        self.level
    }

    fn resample(&mut self, pyramid: &MipPyramid, width: usize) {
        self.pixels.clear();
        self.pixels.reserve(width);
        self.width = Some(width);
        self.level = choose_level(pyramid, width);

        let Some(level) = self.level else {
            self.pixels.resize(width, 0.0);
            return;
        };

        let values = pyramid.level_values(level);
        let size = values.len();
        self.pixels
            .extend((0..width).map(|x| values[x * size / width]));

        log::debug!(
            "Waveform resampled to {} px from level {} ({} values)",
            width,
            level,
            size
        );
    }
}

/// Straight per-pixel scan of the raw frames, averaging the reduced
/// amplitude of each frame in a pixel's stride. Costs a full pass over the
/// track and is meant for comparison against the pyramid or short clips.
pub fn scan_direct<P: SampleProvider + ?Sized>(
    provider: &P,
    reducer: ChannelReducer,
    width: usize,
) -> Vec<f32> {
    let frames = provider.frame_count();
    if width == 0 {
        return Vec::new();
    }
    // More pixels than frames still needs a non-empty stride.
    let stride = (frames / width).max(1);

    (0..width)
        .map(|x| {
            let start = (x * stride).min(frames);
            let end = if x + 1 == width {
                frames
            } else {
                ((x + 1) * stride).min(frames)
            };
            if start >= end {
                return 0.0;
            }
            let sum: f32 = (start..end).map(|i| reducer.reduce(provider.frame(i))).sum();
            sum / (end - start) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pyramid(n: usize) -> MipPyramid {
        MipPyramid::from_base((0..n).map(|i| i as f32 / n as f32).collect())
    }

    #[test]
    fn returns_exactly_width_samples() {
        let pyramid = pyramid(1000);
        let mut selector = MipSelector::new();
        for width in [1usize, 2, 3, 100, 499, 500, 501, 1000, 1920, 4096] {
            let pixels = selector.select(&pyramid, width).to_vec();
            assert_eq!(pixels.len(), width);
            let level = selector.level().unwrap_or_default();
            let size = pyramid.levels()[level].size;
            for x in 0..width {
                assert!(x * size / width < size);
            }
        }
    }

    #[test]
    fn picks_coarsest_sufficient_level() {
        let pyramid = pyramid(1000);
        // sizes: 1000, 500, 250, 125, 62, 31, 15, 7, 3, 1
        assert_eq!(choose_level(&pyramid, 1), Some(9));
        assert_eq!(choose_level(&pyramid, 2), Some(8));
        assert_eq!(choose_level(&pyramid, 125), Some(3));
        assert_eq!(choose_level(&pyramid, 126), Some(2));
        assert_eq!(choose_level(&pyramid, 1001), Some(0));
        assert_eq!(choose_level(&MipPyramid::default(), 10), None);
    }

    #[test]
    fn nearest_neighbour_indices() {
        let pyramid = MipPyramid::from_base(vec![0.1, 0.2, 0.3, 0.4]);
        let mut selector = MipSelector::new();
        assert_eq!(selector.select(&pyramid, 8), &[0.1, 0.1, 0.2, 0.2, 0.3, 0.3, 0.4, 0.4]);
        assert_eq!(selector.select(&pyramid, 4), &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn degenerate_inputs() {
        let mut selector = MipSelector::new();
        assert!(selector.select(&pyramid(10), 0).is_empty());
        assert_eq!(selector.select(&MipPyramid::default(), 3), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn cache_survives_until_width_changes() {
        let a = MipPyramid::from_base(vec![1.0, 1.0]);
        let b = MipPyramid::from_base(vec![0.0, 0.0]);
        let mut selector = MipSelector::new();
        assert_eq!(selector.select(&a, 2), &[1.0, 1.0]);
        // Same width: cached values, even for a different pyramid.
        assert_eq!(selector.select(&b, 2), &[1.0, 1.0]);
        selector.invalidate();
        assert_eq!(selector.select(&b, 2), &[0.0, 0.0]);
    }

    struct Frames(Vec<[i16; 2]>);

    impl SampleProvider for Frames {
        fn frame_count(&self) -> usize {
            self.0.len()
        }
        fn sample_rate(&self) -> u32 {
            8000
        }
        fn frame(&self, index: usize) -> [i16; 2] {
            self.0[index]
        }
    }

    #[test]
    fn direct_scan_with_more_pixels_than_frames() {
        let frames = Frames(vec![[16384, 0], [-32768, 0]]);
        let pixels = scan_direct(&frames, ChannelReducer::Max, 5);
        assert_eq!(pixels, vec![0.5, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn direct_scan_last_pixel_takes_remainder() {
        let frames = Frames(vec![[16384, 0]; 7]);
        let pixels = scan_direct(&frames, ChannelReducer::Max, 3);
        assert_eq!(pixels, vec![0.5, 0.5, 0.5]);
        assert!(scan_direct(&frames, ChannelReducer::Max, 0).is_empty());
    }
}
