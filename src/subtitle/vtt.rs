//! Word-level cue file parser.
//!
//! Handles blocks of the form
//!
//! ```text
//! 00:00:01.000 --> 00:00:03.000 align:start position:0%
//! legacy caption line (skipped)
//! hello<00:00:02.000><c> world</c>
//! ```
//!
//! in a single forward pass. Anything that does not fit is skipped line by
//! line until the next time range header, so a damaged file degrades to
//! fewer words rather than an error.

use super::caption::{CaptionStore, Chunk, Word};

const ARROW: &[u8] = b" --> ";
const CLASS_OPEN: &[u8] = b"<c>";
const CLASS_CLOSE: &[u8] = b"</c>";

/// Byte cursor over the raw file. Every helper either consumes a complete
/// token or leaves the position where the mismatch was found; none of them
/// ever steps past a line terminator unless asked to.
struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), Some(b'\n' | b'\r'))
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, token: &[u8]) -> bool {
        if self.input[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consume the rest of the current line including its `\n`, returning the
    /// line content without the terminator.
    fn next_line(&mut self) -> &'a [u8] {
        let start = self.pos;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == b'\n' {
                return &self.input[start..self.pos - 1];
            }
        }
        &self.input[start..self.pos]
    }

    /// Consume a `\r\n`, `\n` or lone `\r` terminator.
    fn finish_line(&mut self) {
        let cr = self.eat(b'\r');
        if !self.eat(b'\n') && !cr {
            self.pos += 1;
        }
    }

    /// Skip past the next `>` on the current line, or up to the line end.
    fn skip_tag(&mut self) {
        while let Some(c) = self.peek() {
            if c == b'\n' || c == b'\r' {
                return;
            }
            self.pos += 1;
            if c == b'>' {
                return;
            }
        }
    }

    /// Plain text up to the next tag or line end.
    fn text_run(&mut self) -> &'a [u8] {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, b'<' | b'\n' | b'\r') {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn number(&mut self, digits: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..digits {
            let c = self.peek().filter(u8::is_ascii_digit)?;
            self.pos += 1;
            value = value * 10 + u32::from(c - b'0');
        }
        Some(value)
    }

    /// Fixed-width `HH:MM:SS.mmm`, in milliseconds. `None` on any deviation.
    fn timestamp(&mut self) -> Option<u32> {
        let hours = self.number(2)?;
        self.eat(b':').then_some(())?;
        let mins = self.number(2)?;
        self.eat(b':').then_some(())?;
        let secs = self.number(2)?;
        self.eat(b'.').then_some(())?;
        let millis = self.number(3)?;

        Some(millis + secs * 1000 + mins * 60_000 + hours * 3_600_000)
    }

    fn time_range(&mut self) -> Option<(u32, u32)> {
        let start = self.timestamp()?;
        self.eat_str(ARROW).then_some(())?;
        let end = self.timestamp()?;
        Some((start, end))
    }
}

fn millis_to_secs(ms: u32) -> f32 {
    ms as f32 / 1000.0
}

struct Parser<'s, 'a> {
    cursor: Cursor<'a>,
    store: &'s mut CaptionStore,
    last_start: f32,
    cues: usize,
    skipped_lines: usize,
}

impl<'s, 'a> Parser<'s, 'a> {
    fn run(&mut self) {
        while !self.cursor.is_empty() {
            let before = self.cursor.pos;

            let Some((start, end)) = self.cursor.time_range() else {
                self.cursor.next_line();
                self.skipped_lines += 1;
                debug_assert!(self.cursor.pos > before);
                continue;
            };

            // Cue settings after the range are not interpreted.
            self.cursor.next_line();

            let legacy = self.cursor.next_line();
            if contains(legacy, CLASS_OPEN) {
                log::warn!(
                    "Cue at {:.3}s has timed words on its legacy line; the block may lack that line and its words are dropped",
                    millis_to_secs(start)
                );
            }

            self.cues += 1;
            self.payload(start, end);
        }
    }

    fn payload(&mut self, block_start: u32, block_end: u32) {
        if self.cursor.is_empty() {
            return;
        }
        if self.cursor.at_line_end() {
            self.cursor.finish_line();
            return;
        }

        let mut word = self.begin_word(block_start);

        loop {
            match self.cursor.peek() {
                None => break,
                Some(b'\n' | b'\r') => {
                    self.cursor.finish_line();
                    break;
                }
                Some(b'<') => self.cursor.pos += 1,
                Some(_) => {
                    let run = self.cursor.text_run();
                    self.extend_word(&mut word, run);
                    continue;
                }
            }

            let Some(stamp) = self.cursor.timestamp() else {
                self.cursor.skip_tag();
                continue;
            };

            if !self.cursor.eat(b'>') {
                // Corrupted timestamp tag: give up on the rest of this line.
                self.cursor.next_line();
                break;
            }

            if !self.cursor.eat_str(CLASS_OPEN) {
                continue;
            }

            word.end = millis_to_secs(stamp);
            self.store.words.push(word);
            word = self.begin_word(stamp);

            self.cursor.eat_str(CLASS_CLOSE);
        }

        word.end = millis_to_secs(block_end);
        self.store.words.push(word);
    }

    fn begin_word(&mut self, start_ms: u32) -> Word {
        let run = self.cursor.text_run();
        let text_offset = self.store.text.push(run);

        let start = millis_to_secs(start_ms).max(self.last_start);
        self.last_start = start;

        Word {
            text_offset,
            text_len: run.len(),
            start,
            end: start,
        }
    }

    fn extend_word(&mut self, word: &mut Word, run: &[u8]) {
        let offset = self.store.text.push(run);
        debug_assert_eq!(offset, word.text_offset + word.text_len);
        word.text_len += run.len();
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Parse `input` and append its words to `store`.
pub(crate) fn parse_into(store: &mut CaptionStore, input: &[u8]) -> Chunk {
    let word_offset = store.words.len();

    let mut parser = Parser {
        cursor: Cursor::new(input),
        store,
        last_start: f32::NEG_INFINITY,
        cues: 0,
        skipped_lines: 0,
    };
    parser.run();

    let (cues, skipped) = (parser.cues, parser.skipped_lines);
    let word_count = store.words.len() - word_offset;
    log::debug!(
        "Parsed {} cues into {} words ({} non-header lines skipped)",
        cues,
        word_count,
        skipped
    );

    Chunk {
        word_offset,
        word_count,
    }
}
