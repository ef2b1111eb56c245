use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::provider::SampleProvider;

/// Fully decoded track as interleaved 16-bit stereo.
pub struct PcmBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl PcmBuffer {
    /// Build from interleaved stereo samples. A trailing half frame is dropped.
    pub fn from_interleaved(mut samples: Vec<i16>, sample_rate: u32) -> Self {
        samples.truncate(samples.len() & !1);
        Self {
            samples,
            sample_rate,
        }
    }
}

impl SampleProvider for PcmBuffer {
    fn frame_count(&self) -> usize {
        self.samples.len() / 2
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn frame(&self, index: usize) -> [i16; 2] {
        [self.samples[index * 2], self.samples[index * 2 + 1]]
    }
}

pub fn decode_audio(path: &Path) -> Result<PcmBuffer> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut stereo: Vec<i16> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(err)) => {
                log::debug!("Skipping undecodable packet: {}", err);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<i16>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();
        let channels = spec.channels.count().max(1);

        // Mono is duplicated to both sides; anything wider keeps its front pair.
        if channels == 1 {
            stereo.reserve(samples.len() * 2);
            for &s in samples {
                stereo.extend_from_slice(&[s, s]);
            }
        } else {
            stereo.reserve(samples.len() / channels * 2);
            for frame in samples.chunks_exact(channels) {
                stereo.extend_from_slice(&frame[..2]);
            }
        }
    }

    let pcm = PcmBuffer::from_interleaved(stereo, sample_rate);

    log::info!(
        "Decoded audio: {} frames, {} channel(s) -> stereo, {}Hz, {:.1}s",
        pcm.frame_count(),
        channels,
        sample_rate,
        pcm.duration()
    );

    Ok(pcm)
}
