/// Read-only access to decoded 16-bit stereo PCM.
///
/// Implemented by whatever owns the decoded audio; the visualizer core
/// never mutates or retains the samples beyond a frame.
pub trait SampleProvider {
    fn frame_count(&self) -> usize;
    fn sample_rate(&self) -> u32;
    /// Left and right samples of frame `index`; `index < frame_count()`.
    fn frame(&self, index: usize) -> [i16; 2];

    fn duration(&self) -> f32 {
        if self.sample_rate() == 0 {
            return 0.0;
        }
        self.frame_count() as f32 / self.sample_rate() as f32
    }

    /// Channel average of frame `index` in `[-1, 1]`, or silence past the end.
    fn mono(&self, index: usize) -> f32 {
        if index >= self.frame_count() {
            return 0.0;
        }
        let [l, r] = self.frame(index);
        (unit(l) + unit(r)) * 0.5
    }
}

/// Map a 16-bit sample to `[-1, 1]`.
pub fn unit(sample: i16) -> f32 {
    sample as f32 / 32768.0
}

/// Current playback position, owned by the audio backend.
pub trait PlaybackClock {
    /// Seconds played so far.
    fn time_played(&self) -> f32;
    /// Total length in seconds.
    fn duration(&self) -> f32;
    fn seek(&mut self, time: f32);
}

/// Clock advanced by the caller, for headless runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedClock {
    played: f32,
    duration: f32,
    paused: bool,
}

impl SimulatedClock {
    pub fn new(duration: f32) -> Self {
        Self {
            played: 0.0,
            duration: duration.max(0.0),
            paused: false,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.paused {
            self.played = (self.played + dt).min(self.duration);
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn finished(&self) -> bool {
        self.played >= self.duration
    }
}

impl PlaybackClock for SimulatedClock {
    fn time_played(&self) -> f32 {
        self.played
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn seek(&mut self, time: f32) {
        self.played = time.clamp(0.0, self.duration);
    }
}

impl<T: SampleProvider + ?Sized> SampleProvider for &T {
    fn frame_count(&self) -> usize {
        (**self).frame_count()
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn frame(&self, index: usize) -> [i16; 2] {
        (**self).frame(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(usize);

    impl SampleProvider for Constant {
        fn frame_count(&self) -> usize {
            self.0
        }
        fn sample_rate(&self) -> u32 {
            4
        }
        fn frame(&self, _: usize) -> [i16; 2] {
            [16384, -16384]
        }
    }

    #[test]
    fn mono_is_zero_past_end() {
        let p = Constant(2);
        assert_eq!(p.mono(0), 0.0);
        assert_eq!(p.mono(10), 0.0);
        assert_eq!(p.duration(), 0.5);
    }

    #[test]
    fn unit_range() {
        assert_eq!(unit(i16::MIN), -1.0);
        assert!(unit(i16::MAX) < 1.0);
    }

    #[test]
    fn clock_clamps() {
        let mut clock = SimulatedClock::new(2.0);
        clock.advance(1.5);
        clock.set_paused(true);
        clock.advance(1.0);
        assert_eq!(clock.time_played(), 1.5);
        clock.set_paused(false);
        clock.advance(1.0);
        assert!(clock.finished());
        clock.seek(-3.0);
        assert_eq!(clock.time_played(), 0.0);
    }
}
