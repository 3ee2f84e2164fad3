//! Rich chat messages.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::color::{Rgb, DEFAULT_COLOR};

/// Escape character for ANSI sequences.
const ESC: char = '\x1b';

/// A run of text in a single color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorSegment {
    /// Segment text, without any markers.
    pub text: String,
    /// Color of the whole segment.
    pub color: Rgb,
}

impl ColorSegment {
    /// Create a new segment.
    pub fn new(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// A formatted chat message ready for delivery.
///
/// Never empty: a message with one segment is a single styled string, and
/// longer messages are an ordered join of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichMessage {
    /// A single colored string.
    Styled(ColorSegment),
    /// Two or more segments in display order.
    Joined(Vec<ColorSegment>),
}

impl RichMessage {
    /// A single-segment message.
    pub fn styled(text: impl Into<String>, color: Rgb) -> Self {
        Self::Styled(ColorSegment::new(text, color))
    }

    /// Build a message from scanned segments.
    ///
    /// With no segments, `original` becomes one segment in the default color.
    pub fn from_segments(mut segments: Vec<ColorSegment>, original: &str) -> Self {
        if segments.len() > 1 {
            return Self::Joined(segments);
        }
        match segments.pop() {
            Some(segment) => Self::Styled(segment),
            None => Self::styled(original, DEFAULT_COLOR),
        }
    }

    /// Segments in display order.
    pub fn segments(&self) -> &[ColorSegment] {
        match self {
            Self::Styled(segment) => std::slice::from_ref(segment),
            Self::Joined(segments) => segments,
        }
    }

    /// Check if the message is a single styled string.
    pub fn is_styled(&self) -> bool {
        matches!(self, Self::Styled(_))
    }

    /// Message text with colors dropped.
    pub fn plain_text(&self) -> String {
        self.segments().iter().map(|s| s.text.as_str()).collect()
    }

    /// Render with 24-bit ANSI foreground colors.
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for segment in self.segments() {
            let Rgb(r, g, b) = segment.color;
            out.push_str(&format!("{ESC}[38;2;{r};{g};{b}m{}", segment.text));
        }
        out.push_str(&format!("{ESC}[0m"));
        out
    }
}

impl fmt::Display for RichMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

/// Serializes as a text component: `{"text","color"}` for a styled message,
/// `{"text":"","extra":[...]}` for a join.
impl Serialize for RichMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Styled(segment) => segment.serialize(serializer),
            Self::Joined(segments) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("text", "")?;
                map.serialize_entry("extra", segments)?;
                map.end()
            }
        }
    }
}
