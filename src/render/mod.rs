pub mod frame;

pub use frame::{FrameView, Visualizer};
