//! chatfmt - group-aware chat formatting
//!
//! Formats chat messages for game servers: picks a template by permission
//! group, fills in the sender and message, and resolves `&` color codes into
//! colored segments.

pub mod chat;
pub mod config;
pub mod error;
pub mod logging;

pub use chat::{
    format_message, register, ChatEvent, ChatEventBus, ChatFormatter, ChatSender, ChatSettings,
    ColorSegment, GroupProvider, RichMessage, Rgb, SharedChatSettings, StaticGroups,
    TemplateTable,
};
pub use config::Config;
pub use error::{ChatFmtError, Result};
