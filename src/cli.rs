use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wavecue", about = "Headless waveform, spectrum and caption frame driver")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Word-timed cue file to display as captions
    #[arg(short, long)]
    pub captions: Option<PathBuf>,

    /// Config file (defaults to wavecue.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drawing width in pixels
    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    /// Frames per second of the simulated playback
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// FFT size (power of two)
    #[arg(long, default_value_t = 4096)]
    pub fft_size: usize,

    /// Playback start time in seconds
    #[arg(long, default_value_t = 0.0)]
    pub start: f32,

    /// Print the frame at this time as JSON and exit
    #[arg(long)]
    pub inspect: Option<f32>,
}
