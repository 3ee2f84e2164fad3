//! Chat event hook.
//!
//! The host hands each outgoing chat message to a [`ChatEventBus`], which
//! renders it with the registered formatter (or the default rendering when
//! none is registered) and broadcasts the result to subscribers using tokio's
//! broadcast channel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use super::color::DEFAULT_COLOR;
use super::formatter::ChatFormatter;
use super::message::RichMessage;

/// Maximum number of messages to buffer in the broadcast channel.
const CHANNEL_CAPACITY: usize = 100;

/// Identity of a chat sender.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatSender {
    /// Stable identity, used to look up permission groups.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

impl ChatSender {
    /// Create a new sender.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An outgoing chat message before rendering.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    /// Who sent the message.
    pub sender: ChatSender,
    /// Raw message content.
    pub content: String,
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,
}

impl ChatEvent {
    /// Create a new chat event.
    pub fn new(sender: ChatSender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A rendered chat message as delivered to subscribers.
#[derive(Debug, Clone)]
pub struct DeliveredMessage {
    /// Who sent the message.
    pub sender: ChatSender,
    /// Rendered message.
    pub message: RichMessage,
    /// When the original message was sent.
    pub timestamp: DateTime<Utc>,
}

/// Callback replacing the default chat rendering.
pub type FormatterFn = Arc<dyn Fn(&ChatSender, &str) -> RichMessage + Send + Sync>;

/// Rendering used when no formatter is registered: `<name> content` in white.
pub fn default_render(sender: &ChatSender, content: &str) -> RichMessage {
    RichMessage::styled(format!("<{}> {}", sender.name, content), DEFAULT_COLOR)
}

/// Host-side chat event hook.
pub struct ChatEventBus {
    /// Registered formatter, if any.
    formatter: Option<FormatterFn>,
    /// Broadcast sender for rendered messages.
    sender: broadcast::Sender<DeliveredMessage>,
}

impl ChatEventBus {
    /// Create a bus with no formatter registered.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            formatter: None,
            sender,
        }
    }

    /// Install `formatter`, replacing any previous one.
    pub fn register_formatter(&mut self, formatter: FormatterFn) {
        self.formatter = Some(formatter);
    }

    /// Check if a formatter is registered.
    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    /// Get a receiver for rendered messages.
    pub fn subscribe(&self) -> broadcast::Receiver<DeliveredMessage> {
        self.sender.subscribe()
    }

    /// Render `event` without delivering it.
    pub fn render(&self, event: &ChatEvent) -> RichMessage {
        match &self.formatter {
            Some(formatter) => formatter(&event.sender, &event.content),
            None => default_render(&event.sender, &event.content),
        }
    }

    /// Render `event` and broadcast it to all subscribers.
    ///
    /// Returns the rendered message; delivery with no subscribers is not an error.
    pub fn dispatch(&self, event: ChatEvent) -> RichMessage {
        let message = self.render(&event);
        // Send only fails when nobody is subscribed
        let _ = self.sender.send(DeliveredMessage {
            sender: event.sender,
            message: message.clone(),
            timestamp: event.timestamp,
        });
        message
    }
}

impl Default for ChatEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Register `formatter` on `bus` if formatting is enabled.
///
/// The enabled flag is checked once here; returns whether the formatter was
/// registered.
pub fn register(bus: &mut ChatEventBus, formatter: Arc<ChatFormatter>) -> bool {
    if !formatter.is_enabled() {
        return false;
    }

    bus.register_formatter(Arc::new(move |sender: &ChatSender, content: &str| {
        formatter.format(sender, content)
    }));
    info!("Chat formatting enabled.");
    true
}
