use std::path::PathBuf;

/// Failures the visualization core surfaces to its caller.
///
/// Malformed caption input is never an error: the parser recovers locally
/// and reports an empty chunk instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("audio source has no frames")]
    EmptyAudio,

    #[error("audio source reports an invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("FFT size must be a power of two no smaller than 2, got {0}")]
    InvalidFftSize(usize),

    #[error("failed to read caption file {path}")]
    CaptionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
