//! Color markup scanning.
//!
//! Two marker forms are recognized:
//!
//! - legacy: `&` followed by one hex digit (`&c`, `&7`, `&F`)
//! - hex: `&#` followed by exactly six hex digits (`&#FF8800`)
//!
//! Text is first normalized so every legacy marker becomes its hex form, then
//! split into segments at each hex marker. Anything that is not a complete
//! marker, including a lone `&` or `&#` with too few digits, is plain text.

use std::fmt::Write;

use super::color::{hex_value, Rgb, DEFAULT_COLOR, LEGACY_COLORS};
use super::message::{ColorSegment, RichMessage};

/// Length of `&#RRGGBB`.
const HEX_MARKER_LEN: usize = 8;

/// Length of `&X`.
const LEGACY_MARKER_LEN: usize = 2;

/// A piece of scanned markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of text containing no markers.
    Text(&'a str),
    /// A legacy `&X` marker.
    Legacy { code: char, color: Rgb },
    /// A `&#RRGGBB` marker, with its source text.
    Hex { raw: &'a str, color: Rgb },
}

/// Index-driven markup scanner.
///
/// Yields maximal text runs and markers in source order.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    legacy: bool,
}

impl<'a> Scanner<'a> {
    /// Scanner recognizing both legacy and hex markers.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            legacy: true,
        }
    }

    /// Scanner recognizing hex markers only.
    pub fn hex_only(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            legacy: false,
        }
    }

    /// Marker starting at byte `at`, with its length.
    fn marker_at(&self, at: usize) -> Option<(Token<'a>, usize)> {
        let bytes = self.input.as_bytes();
        if bytes.get(at) != Some(&b'&') {
            return None;
        }

        match bytes.get(at + 1) {
            Some(&b'#') => {
                let digits = bytes.get(at + 2..at + HEX_MARKER_LEN)?;
                let color = Rgb::from_hex_digits(digits)?;
                let raw = &self.input[at..at + HEX_MARKER_LEN];
                Some((Token::Hex { raw, color }, HEX_MARKER_LEN))
            }
            Some(&b) if self.legacy => {
                let index = hex_value(b)?;
                let token = Token::Legacy {
                    code: b as char,
                    color: LEGACY_COLORS[index as usize],
                };
                Some((token, LEGACY_MARKER_LEN))
            }
            _ => None,
        }
    }

    /// End of the text run starting at `start`: the next marker or end of input.
    fn text_end(&self, start: usize) -> usize {
        let bytes = self.input.as_bytes();
        let mut end = start + 1;

        while end < bytes.len() {
            match bytes[end..].iter().position(|&b| b == b'&') {
                Some(offset) => {
                    end += offset;
                    if self.marker_at(end).is_some() {
                        return end;
                    }
                    end += 1;
                }
                None => return bytes.len(),
            }
        }

        bytes.len()
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }

        if let Some((token, len)) = self.marker_at(self.pos) {
            self.pos += len;
            return Some(token);
        }

        let start = self.pos;
        self.pos = self.text_end(start);
        Some(Token::Text(&self.input[start..self.pos]))
    }
}

/// Rewrite every legacy marker into its `&#RRGGBB` form.
///
/// Existing hex markers and all other text are copied unchanged.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for token in Scanner::new(text) {
        match token {
            Token::Text(s) => out.push_str(s),
            Token::Hex { raw, .. } => out.push_str(raw),
            Token::Legacy { color, .. } => {
                // Writing to a String cannot fail.
                let _ = write!(out, "&{color}");
            }
        }
    }

    out
}

/// Split normalized text into colored segments at each hex marker.
///
/// Text before the first marker is [`DEFAULT_COLOR`]. Markers are consumed
/// and empty runs between adjacent markers produce no segment, so the result
/// is empty when the text holds nothing but markers.
pub fn build_segments(normalized: &str) -> Vec<ColorSegment> {
    let mut segments = Vec::new();
    let mut color = DEFAULT_COLOR;

    for token in Scanner::hex_only(normalized) {
        match token {
            Token::Text(s) => {
                if !s.is_empty() {
                    segments.push(ColorSegment::new(s, color));
                }
            }
            Token::Hex { color: next, .. } | Token::Legacy { color: next, .. } => {
                color = next;
            }
        }
    }

    segments
}

/// Normalize and segment `text` into a [`RichMessage`].
///
/// If no segment carries any text, the whole of `text` is kept as one
/// default-colored segment so the result is never empty.
pub fn parse_colors(text: &str) -> RichMessage {
    let normalized = normalize(text);
    let segments = build_segments(&normalized);
    RichMessage::from_segments(segments, text)
}
