use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;

use crate::error::{Error, Result};

/// Append-only byte store owning every caption's text.
///
/// Entries are addressed by `(offset, len)` and stay valid for the life of
/// the arena, since nothing is ever removed.
#[derive(Debug, Default, Clone)]
pub struct TextArena {
    bytes: Vec<u8>,
}

impl TextArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Copy `text` into the arena and return the offset it starts at.
    pub fn push(&mut self, text: &[u8]) -> usize {
        let offset = self.bytes.len();
        self.bytes.reserve(text.len());
        self.bytes.extend_from_slice(text);
        offset
    }

    pub fn get(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One timed word of caption text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Word {
    pub text_offset: usize,
    pub text_len: usize,
    /// Seconds.
    pub start: f32,
    /// Seconds.
    pub end: f32,
}

impl Word {
    /// True while `time` lies inside the word's own `[start, end]` span.
    pub fn contains(&self, time: f32) -> bool {
        self.start <= time && time <= self.end
    }
}

/// The word range produced by one parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Chunk {
    pub word_offset: usize,
    pub word_count: usize,
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.word_offset..self.word_offset + self.word_count
    }
}

/// Shared arena and word list; several cue files may be parsed into one store.
#[derive(Debug, Default, Clone)]
pub struct CaptionStore {
    pub(crate) text: TextArena,
    pub(crate) words: Vec<Word>,
}

impl CaptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a cue file from disk. The file bytes are dropped once parsed.
    pub fn parse_file(&mut self, path: &Path) -> Result<Chunk> {
        let bytes = std::fs::read(path).map_err(|source| Error::CaptionIo {
            path: path.to_path_buf(),
            source,
        })?;
        let chunk = self.parse(&bytes);
        log::info!(
            "Loaded {} caption words from {}",
            chunk.word_count,
            path.display()
        );
        Ok(chunk)
    }

    /// Parse cue-file bytes, appending their words to this store.
    pub fn parse(&mut self, input: &[u8]) -> Chunk {
        super::vtt::parse_into(self, input)
    }

    pub fn words(&self, chunk: Chunk) -> &[Word] {
        &self.words[chunk.range()]
    }

    pub fn all_words(&self) -> &[Word] {
        &self.words
    }

    pub fn text_bytes(&self, word: &Word) -> &[u8] {
        self.text.get(word.text_offset, word.text_len)
    }

    /// Word text; invalid UTF-8 in the source file is replaced, not rejected.
    pub fn text(&self, word: &Word) -> Cow<'_, str> {
        String::from_utf8_lossy(self.text_bytes(word))
    }

    pub fn arena(&self) -> &TextArena {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_offsets_stay_valid_after_growth() {
        let mut arena = TextArena::with_capacity(2);
        let a = arena.push(b"hello");
        let b = arena.push(b" world");
        assert_eq!(arena.get(a, 5), b"hello");
        assert_eq!(arena.get(b, 6), b" world");
        assert_eq!(arena.len(), 11);
    }

    #[test]
    fn chunks_address_their_own_words() {
        let mut store = CaptionStore::new();
        let first = store.parse(b"00:00:01.000 --> 00:00:02.000\nx\none\n");
        let second = store.parse(b"00:00:05.000 --> 00:00:06.000\nx\ntwo<00:00:05.500><c> three</c>\n");

        assert_eq!(first, Chunk { word_offset: 0, word_count: 1 });
        assert_eq!(second, Chunk { word_offset: 1, word_count: 2 });
        assert_eq!(store.text(&store.words(first)[0]), "one");
        let texts: Vec<_> = store.words(second).iter().map(|w| store.text(w)).collect();
        assert_eq!(texts, vec!["two", " three"]);
    }

    #[test]
    fn word_contains_is_inclusive() {
        let word = Word { text_offset: 0, text_len: 0, start: 1.0, end: 2.0 };
        assert!(word.contains(1.0));
        assert!(word.contains(2.0));
        assert!(!word.contains(2.5));
    }

    #[test]
    fn missing_file_is_reported() {
        let mut store = CaptionStore::new();
        let err = store
            .parse_file(Path::new("/definitely/not/here.vtt"))
            .unwrap_err();
        assert!(matches!(err, Error::CaptionIo { .. }));
    }
}
