//! Chat settings snapshots.
//!
//! Formatting reads one immutable [`ChatSettings`] per call. Reloading builds
//! a new snapshot and swaps it in whole, so a call in flight keeps using the
//! snapshot it started with.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::group::TemplateTable;
use crate::config::{ChatConfig, Config};

/// Immutable chat formatting settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Whether the formatter should be registered with the host.
    pub enabled: bool,
    /// Template used when no group matches.
    pub fallback: String,
    /// Group templates in priority order.
    pub table: TemplateTable,
}

impl ChatSettings {
    /// Create a snapshot from its parts.
    pub fn new(enabled: bool, fallback: impl Into<String>, table: TemplateTable) -> Self {
        Self {
            enabled,
            fallback: fallback.into(),
            table,
        }
    }

    /// Template for a sender in `memberships`.
    pub fn template_for(&self, memberships: &HashSet<String>) -> &str {
        self.table.resolve(memberships, &self.fallback)
    }
}

impl From<&ChatConfig> for ChatSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            enabled: config.enabled,
            fallback: config.fallback_format.clone(),
            table: config.formats.iter().collect(),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

/// Shared handle to the current [`ChatSettings`].
///
/// Cloning the handle shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedChatSettings {
    current: Arc<RwLock<Arc<ChatSettings>>>,
}

impl SharedChatSettings {
    /// Create a handle publishing `settings`.
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// The snapshot currently published.
    pub fn current(&self) -> Arc<ChatSettings> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Publish `settings`, returning the snapshot it replaced.
    pub fn replace(&self, settings: ChatSettings) -> Arc<ChatSettings> {
        self.publish(Arc::new(settings))
    }

    fn publish(&self, next: Arc<ChatSettings>) -> Arc<ChatSettings> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Reload from a configuration file and publish the result.
    ///
    /// Uses [`Config::load_or_default`], so a broken file publishes defaults.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> Arc<ChatSettings> {
        let config = Config::load_or_default(path);
        let next = Arc::new(ChatSettings::from(&config.chat));
        self.publish(Arc::clone(&next));
        info!(
            enabled = next.enabled,
            formats = next.table.len(),
            "Chat settings reloaded"
        );
        next
    }
}

impl From<ChatSettings> for SharedChatSettings {
    fn from(settings: ChatSettings) -> Self {
        Self::new(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CHAT_FORMAT;

    fn groups(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_settings() {
        let settings = ChatSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.fallback, DEFAULT_CHAT_FORMAT);
        assert!(settings.table.is_empty());
    }

    #[test]
    fn test_from_config_keeps_order() {
        let config = Config::parse(
            r#"
[chat.formats]
vip = "V"
admin = "A"
"#,
        )
        .unwrap();

        let settings = ChatSettings::from(&config.chat);
        let order: Vec<&str> = settings.table.iter().map(|(g, _)| g).collect();
        assert_eq!(order, vec!["vip", "admin"]);
        assert_eq!(settings.template_for(&groups(&["admin", "vip"])), "V");
    }

    #[test]
    fn test_template_for_fallback() {
        let settings = ChatSettings::default();
        assert_eq!(settings.template_for(&groups(&["admin"])), DEFAULT_CHAT_FORMAT);
    }

    #[test]
    fn test_replace_swaps_whole_snapshot() {
        let shared = SharedChatSettings::new(ChatSettings::default());
        let before = shared.current();

        let table: TemplateTable = [("admin", "A")].into_iter().collect();
        let previous = shared.replace(ChatSettings::new(false, "F", table));

        assert!(Arc::ptr_eq(&before, &previous));
        let after = shared.current();
        assert!(!after.enabled);
        assert_eq!(after.fallback, "F");
        assert_eq!(after.table.len(), 1);

        // The old snapshot is untouched.
        assert!(before.enabled);
        assert!(before.table.is_empty());
    }

    #[test]
    fn test_clones_share_slot() {
        let shared = SharedChatSettings::default();
        let other = shared.clone();
        other.replace(ChatSettings::new(true, "X", TemplateTable::new()));
        assert_eq!(shared.current().fallback, "X");
    }

    #[test]
    fn test_reload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[chat]\nfallback-format = \"%player% said %message%\"\n[chat.formats]\nmod = \"M\"\n",
        )
        .unwrap();

        let shared = SharedChatSettings::default();
        let current = shared.reload(&path);

        assert_eq!(current.fallback, "%player% said %message%");
        assert_eq!(current.table.get("mod"), Some("M"));
        assert!(Arc::ptr_eq(&current, &shared.current()));
    }

    #[test]
    fn test_reload_broken_file_publishes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat.formats]\nmod = \"M\"\n").unwrap();

        let shared = SharedChatSettings::default();
        shared.reload(&path);
        assert_eq!(shared.current().table.len(), 1);

        std::fs::write(&path, "[chat.formats\nmod = ").unwrap();
        let current = shared.reload(&path);
        assert!(current.table.is_empty());
        assert_eq!(current.fallback, DEFAULT_CHAT_FORMAT);
    }
}
