pub mod caption;
pub mod cursor;
pub mod vtt;

pub use caption::{CaptionStore, Chunk, TextArena, Word};
