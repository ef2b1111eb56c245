//! Drives the visualizer over an in-memory track the way a render loop would.

use wavecue::audio::{PlaybackClock, SampleProvider, SimulatedClock};
use wavecue::config::{Config, WaveformSource};
use wavecue::render::Visualizer;
use wavecue::Error;

const RATE: u32 = 8000;

/// Two seconds: one second of silence, then a full-scale 1 kHz tone.
struct TestTrack {
    frames: Vec<[i16; 2]>,
}

impl TestTrack {
    fn new() -> Self {
        let frames = (0..RATE as usize * 2)
            .map(|i| {
                if i < RATE as usize {
                    [0, 0]
                } else {
                    let phase = 2.0 * std::f32::consts::PI * 1000.0 * i as f32 / RATE as f32;
                    let s = (phase.sin() * 32000.0) as i16;
                    [s, s]
                }
            })
            .collect();
        Self { frames }
    }
}

impl SampleProvider for TestTrack {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }
    fn sample_rate(&self) -> u32 {
        RATE
    }
    fn frame(&self, index: usize) -> [i16; 2] {
        self.frames[index]
    }
}

struct Empty;

impl SampleProvider for Empty {
    fn frame_count(&self) -> usize {
        0
    }
    fn sample_rate(&self) -> u32 {
        RATE
    }
    fn frame(&self, _: usize) -> [i16; 2] {
        [0, 0]
    }
}

const CUES: &str = "WEBVTT\n\n\
    00:00:00.250 --> 00:00:01.000\n\
    \n\
    quiet<00:00:00.500><c> part</c>\n\
    \n\
    00:00:01.000 --> 00:00:02.000\n\
    quiet part\n\
    loud<00:00:01.500><c> part</c>\n";

fn config(fft_size: usize) -> Config {
    let mut cfg = Config::default();
    cfg.spectrum.fft_size = fft_size;
    cfg
}

#[test]
fn empty_audio_is_fatal() {
    let err = Visualizer::new(Empty, &Config::default()).err();
    assert!(matches!(err, Some(Error::EmptyAudio)));
}

#[test]
fn invalid_fft_size_is_fatal() {
    let err = Visualizer::new(TestTrack::new(), &config(1000)).err();
    assert!(matches!(err, Some(Error::InvalidFftSize(1000))));
}

#[test]
fn frames_follow_playback() {
    let mut vis = Visualizer::new(TestTrack::new(), &config(256)).unwrap();
    let chunk = vis.parse_captions(CUES.as_bytes());
    assert_eq!(chunk.word_count, 4);

    let mut clock = SimulatedClock::new(vis.duration());
    assert_eq!(clock.duration(), 2.0);

    let view = vis.frame(&clock, 400);
    assert_eq!(view.waveform.len(), 400);
    assert_eq!(view.spectrum.len(), 400);
    assert!(view.spectrum.iter().all(|&m| m == 0.0));
    assert_eq!(view.caption, None);
    assert_eq!(view.cursor_x, 0);

    clock.seek(0.6);
    let view = vis.frame(&clock, 400);
    assert_eq!(view.caption.as_deref(), Some(" part"));
    assert_eq!(view.caption_index, Some(1));

    clock.seek(1.25);
    let view = vis.frame(&clock, 400);
    assert_eq!(view.caption.as_deref(), Some("loud"));
    assert_eq!(view.cursor_x, 250);
    // 1 kHz at 8 kHz over 256 points lands on bin 32, pixel 50 of 400.
    let peak = view
        .spectrum
        .iter()
        .enumerate()
        .take(200)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();
    assert!((49..=51).contains(&peak), "peak at pixel {}", peak);

    // Left half of the waveform is the silent second.
    assert!(view.waveform[..190].iter().all(|&a| a == 0.0));
    assert!(view.waveform[210..].iter().all(|&a| a > 0.0 && a <= 1.0));
}

#[test]
fn seek_to_pixel_moves_clock() {
    let track = TestTrack::new();
    let vis = Visualizer::new(&track, &Config::default()).unwrap();
    let mut clock = SimulatedClock::new(vis.duration());
    vis.seek_to_pixel(&mut clock, 300, 400);
    assert_eq!(clock.time_played(), 1.5);
}

#[test]
fn direct_source_matches_width() {
    let mut cfg = config(512);
    cfg.waveform.source = WaveformSource::Direct;
    let mut vis = Visualizer::new(TestTrack::new(), &cfg).unwrap();
    assert!(vis.pyramid().is_empty());

    let clock = SimulatedClock::new(vis.duration());
    for width in [1u32, 640, 20_000] {
        let view = vis.frame(&clock, width);
        assert_eq!(view.waveform.len(), width as usize);
        assert!(view.waveform.iter().all(|a| (0.0..=1.0).contains(a)));
    }
}

#[test]
fn zero_width_frame_is_empty() {
    let mut vis = Visualizer::new(TestTrack::new(), &config(64)).unwrap();
    let clock = SimulatedClock::new(vis.duration());
    let view = vis.frame(&clock, 0);
    assert!(view.waveform.is_empty());
    assert!(view.spectrum.is_empty());
}

#[test]
fn playback_to_the_end_keeps_last_word() {
    let mut vis = Visualizer::new(TestTrack::new(), &config(4096)).unwrap();
    vis.parse_captions(CUES.as_bytes());
    let mut clock = SimulatedClock::new(vis.duration());

    let mut last = None;
    while !clock.finished() {
        let view = vis.frame(&clock, 128);
        if let Some(i) = view.caption_index {
            assert!(last.map_or(true, |prev| prev <= i));
            last = Some(i);
        }
        clock.advance(1.0 / 30.0);
    }
    assert_eq!(last, Some(3));
}
