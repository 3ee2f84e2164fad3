//! Chat formatting for chatfmt.
//!
//! This module turns a sender, their permission groups and a raw message into
//! a colored [`RichMessage`]:
//! - Group templates selected in configuration order
//! - `%player%` / `%message%` placeholders
//! - Legacy `&0`-`&f` and hex `&#RRGGBB` color codes
//! - Event hook that replaces the host's default chat rendering

mod color;
mod event;
mod formatter;
mod group;
mod markup;
mod message;
mod placeholder;
mod settings;

pub use color::{legacy_color, ColorParseError, Rgb, DEFAULT_COLOR, LEGACY_COLORS};
pub use event::{
    default_render, register, ChatEvent, ChatEventBus, ChatSender, DeliveredMessage, FormatterFn,
};
pub use formatter::{format_message, ChatFormatter};
pub use group::{resolve_template, GroupProvider, StaticGroups, TemplateTable};
pub use markup::{build_segments, normalize, parse_colors, Scanner, Token};
pub use message::{ColorSegment, RichMessage};
pub use placeholder::{substitute, MESSAGE_TOKEN, PLAYER_TOKEN};
pub use settings::{ChatSettings, SharedChatSettings};
