pub mod decode;
pub mod fft;
pub mod mip;
pub mod provider;
pub mod select;
pub mod spectrum;

pub use provider::{PlaybackClock, SampleProvider, SimulatedClock};
