// parser.rs

use bytes::BytesMut;
use itertools::Itertools;

/// Marker that, as the final standalone word, sends a job to the background.
pub const BACKGROUND_MARKER: &str = "&";
/// Recall punctuation. Always a word of its own.
pub const BANG: &str = "!";

/// One line of user input in a fixed-size buffer.
///
/// Tokenizing rewrites delimiters in place and hands out [`Tokens`] that
/// borrow the buffer, so they cannot survive the next [`CommandLine::fill`].
pub struct CommandLine {
    buf: BytesMut,
    max_line: usize,
}

impl CommandLine {
    pub fn new(max_line: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(max_line),
            max_line,
        }
    }

    /// Replaces the buffer contents with `input`, truncated to `max_line - 1`
    /// bytes on a character boundary.
    pub fn fill(&mut self, input: &str) {
        let mut end = input.len().min(self.max_line.saturating_sub(1));
        while !input.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.clear();
        self.buf.extend_from_slice(input[..end].as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Splits the buffer into words. Space, tab and newline are overwritten
    /// with NUL and end the current word; `!` is always a word by itself.
    /// A trailing standalone `&` is removed and sets the background flag.
    pub fn tokenize(&mut self) -> Tokens<'_> {
        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut start: Option<usize> = None;
        for i in 0..self.buf.len() {
            match self.buf[i] {
                b' ' | b'\t' | b'\n' => {
                    self.buf[i] = b'\0';
                    if let Some(s) = start.take() {
                        spans.push((s, i));
                    }
                }
                b'!' => {
                    if let Some(s) = start.take() {
                        spans.push((s, i));
                    }
                    spans.push((i, i + 1));
                }
                _ => {
                    if start.is_none() {
                        start = Some(i);
                    }
                }
            }
        }
        if let Some(s) = start {
            spans.push((s, self.buf.len()));
        }

        // Delimiters are ASCII, so every span still falls on a char boundary.
        let text = match std::str::from_utf8(&self.buf) {
            Ok(text) => text,
            Err(_) => return Tokens::default(),
        };
        let mut words: Vec<&str> = spans.into_iter().map(|(s, e)| &text[s..e]).collect();
        let background = words.last() == Some(&BACKGROUND_MARKER);
        if background {
            words.pop();
        }
        Tokens { words, background }
    }
}

/// Words cut from a [`CommandLine`]. Every word is non-empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    words: Vec<&'a str>,
    background: bool,
}

impl<'a> Tokens<'a> {
    pub fn words(&self) -> &[&'a str] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn first(&self) -> Option<&'a str> {
        self.words.first().copied()
    }

    pub fn run_in_background(&self) -> bool {
        self.background
    }

    pub fn set_background(&mut self, background: bool) {
        self.background = background;
    }

    /// The line as it is logged: words joined by single spaces, without the
    /// background marker.
    pub fn to_text(&self) -> String {
        self.words.iter().join(" ")
    }
}
