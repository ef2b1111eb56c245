mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use wavecue::audio::decode::decode_audio;
use wavecue::audio::{PlaybackClock, SimulatedClock};
use wavecue::config::{self, Config};
use wavecue::render::Visualizer;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    let mut cfg = Config::default();
    if let Some(path) = cli.config.clone().or_else(config::find_config) {
        match config::load_config(&path) {
            Ok(loaded) => {
                log::info!("Loaded config from {}", path.display());
                cfg = loaded;
            }
            Err(err) => log::warn!("{:#}", err),
        }
    }

    // Config values apply only when the CLI is at its default.
    if cli.width == 1920 { cli.width = cfg.playback.width; }
    if cli.fps == 60 { cli.fps = cfg.playback.fps; }
    if cli.fft_size == 4096 { cli.fft_size = cfg.spectrum.fft_size; }
    cfg.playback.width = cli.width;
    cfg.playback.fps = cli.fps;
    cfg.spectrum.fft_size = cli.fft_size;

    if cli.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    log::info!("wavecue - waveform, spectrum and captions");
    log::info!("Input: {}", cli.input.display());
    log::info!("Width: {}px @ {}fps", cli.width, cli.fps);

    let pcm = decode_audio(&cli.input)?;
    let mut visualizer = Visualizer::new(pcm, &cfg).context("Cannot visualize decoded audio")?;

    if let Some(ref path) = cli.captions {
        let chunk = visualizer.load_captions(path)?;
        if chunk.is_empty() {
            log::warn!("No timed words found in {}", path.display());
        }
    }

    let mut clock = SimulatedClock::new(visualizer.duration());

    if let Some(time) = cli.inspect {
        clock.seek(time);
        let view = visualizer.frame(&clock, cli.width);
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    clock.seek(cli.start);
    let dt = 1.0 / cli.fps as f32;
    let remaining = (visualizer.duration() - clock.time_played()).max(0.0);
    let total_frames = (remaining * cli.fps as f32).ceil() as u64;

    let pb = ProgressBar::new(total_frames);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")?
            .progress_chars("=>-"),
    );

    let mut shown: Option<usize> = None;
    let mut peak_magnitude = 0.0f32;
    let mut frames = 0u64;

    while frames < total_frames {
        let view = visualizer.frame(&clock, cli.width);

        peak_magnitude = view.spectrum.iter().copied().fold(peak_magnitude, f32::max);
        if view.caption_index != shown {
            shown = view.caption_index;
            if let Some(ref text) = view.caption {
                pb.suspend(|| log::info!("[{:7.2}s] {}", view.time, text.trim()));
            }
        }

        clock.advance(dt);
        frames += 1;
        pb.set_position(frames);
    }

    pb.finish_with_message("Playback complete");

    log::info!(
        "Done: {} frames, {} pyramid levels, peak spectrum magnitude {:.2}",
        frames,
        visualizer.pyramid().levels().len(),
        peak_magnitude
    );
    Ok(())
}
