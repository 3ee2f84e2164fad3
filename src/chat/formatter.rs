//! Chat formatting pipeline.
//!
//! template selection -> placeholder substitution -> color normalization ->
//! segmentation. Every step is a pure function and the pipeline never fails.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::event::ChatSender;
use super::group::{GroupProvider, TemplateTable};
use super::markup::parse_colors;
use super::message::RichMessage;
use super::placeholder::substitute;
use super::settings::SharedChatSettings;

/// Format `message` from `player` using the template for `memberships`.
pub fn format_message(
    player: &str,
    memberships: &HashSet<String>,
    message: &str,
    table: &TemplateTable,
    fallback: &str,
) -> RichMessage {
    let template = table.resolve(memberships, fallback);
    parse_colors(&substitute(template, player, message))
}

/// Formats chat for senders using the current settings snapshot.
pub struct ChatFormatter {
    settings: SharedChatSettings,
    groups: Arc<dyn GroupProvider>,
}

impl ChatFormatter {
    /// Create a formatter reading `settings` and looking up groups in `groups`.
    pub fn new(settings: SharedChatSettings, groups: Arc<dyn GroupProvider>) -> Self {
        Self { settings, groups }
    }

    /// Settings handle used by this formatter.
    pub fn settings(&self) -> &SharedChatSettings {
        &self.settings
    }

    /// Whether formatting is enabled in the current snapshot.
    pub fn is_enabled(&self) -> bool {
        self.settings.current().enabled
    }

    /// Format one message from `sender`.
    pub fn format(&self, sender: &ChatSender, message: &str) -> RichMessage {
        let memberships = self.groups.groups_for(&sender.id);
        let settings = self.settings.current();
        let template = settings.template_for(&memberships);

        debug!(
            player = %sender.name,
            groups = memberships.len(),
            template,
            "Formatting chat message"
        );

        parse_colors(&substitute(template, &sender.name, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::color::Rgb;
    use crate::chat::group::StaticGroups;
    use crate::chat::settings::ChatSettings;
    use crate::config::DEFAULT_CHAT_FORMAT;
    use uuid::Uuid;

    fn groups(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn pairs(message: &RichMessage) -> Vec<(&str, String)> {
        message
            .segments()
            .iter()
            .map(|s| (s.text.as_str(), s.color.to_string()))
            .collect()
    }

    #[test]
    fn test_no_markers_single_white_segment() {
        let message = format_message(
            "Ann",
            &HashSet::new(),
            "hi",
            &TemplateTable::new(),
            "%player%: %message%",
        );
        assert!(message.is_styled());
        assert_eq!(pairs(&message), vec![("Ann: hi", "#FFFFFF".to_string())]);
    }

    #[test]
    fn test_player_name_token_stays_literal() {
        let message = format_message(
            "%message%",
            &HashSet::new(),
            "x",
            &TemplateTable::new(),
            "%player%",
        );
        assert_eq!(pairs(&message), vec![("%message%", "#FFFFFF".to_string())]);
    }

    #[test]
    fn test_default_fallback_format() {
        let message = format_message(
            "Ann",
            &groups(&["admin"]),
            "hello",
            &TemplateTable::new(),
            DEFAULT_CHAT_FORMAT,
        );
        assert_eq!(
            pairs(&message),
            vec![
                ("Ann", "#AAAAAA".to_string()),
                (": hello", "#FFFFFF".to_string()),
            ]
        );
    }

    #[test]
    fn test_group_template_priority() {
        let table: TemplateTable = [("admin", "&c[A] %player%"), ("vip", "&6[V] %player%")]
            .into_iter()
            .collect();
        let message = format_message("Ann", &groups(&["vip", "admin"]), "", &table, "x");
        assert_eq!(pairs(&message), vec![("[A] Ann", "#FF5555".to_string())]);
    }

    #[test]
    fn test_message_color_codes_are_applied() {
        let message = format_message(
            "Ann",
            &HashSet::new(),
            "&aok",
            &TemplateTable::new(),
            "%player%: %message%",
        );
        assert_eq!(
            pairs(&message),
            vec![("Ann: ", "#FFFFFF".to_string()), ("ok", "#55FF55".to_string())]
        );
    }

    #[test]
    fn test_empty_message_and_template() {
        let message = format_message("Ann", &HashSet::new(), "", &TemplateTable::new(), "");
        assert_eq!(message.segments().len(), 1);
        assert_eq!(message.plain_text(), "");
    }

    #[test]
    fn test_chat_formatter_uses_provider_groups() {
        let alice = ChatSender::new(Uuid::new_v4(), "Alice");
        let bob = ChatSender::new(Uuid::new_v4(), "Bob");
        let provider = StaticGroups::new().with(alice.id, ["VIP"]);

        let table: TemplateTable = [("vip", "&#FFAA00%player%&f> %message%")]
            .into_iter()
            .collect();
        let settings =
            SharedChatSettings::new(ChatSettings::new(true, "%player%: %message%", table));
        let formatter = ChatFormatter::new(settings, Arc::new(provider));

        let vip = formatter.format(&alice, "hi");
        assert_eq!(
            pairs(&vip),
            vec![("Alice", "#FFAA00".to_string()), ("> hi", "#FFFFFF".to_string())]
        );

        let plain = formatter.format(&bob, "hi");
        assert_eq!(plain, RichMessage::styled("Bob: hi", Rgb::WHITE));
    }

    #[test]
    fn test_chat_formatter_sees_reloaded_settings() {
        let sender = ChatSender::new(Uuid::new_v4(), "Ann");
        let settings = SharedChatSettings::default();
        let formatter = ChatFormatter::new(settings.clone(), Arc::new(StaticGroups::new()));
        assert!(formatter.is_enabled());

        settings.replace(ChatSettings::new(false, "&c%message%", TemplateTable::new()));

        assert!(!formatter.is_enabled());
        assert_eq!(
            formatter.format(&sender, "boom"),
            RichMessage::styled("boom", Rgb::RED)
        );
    }
}
