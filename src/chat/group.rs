//! Group-based template selection.
//!
//! A [`TemplateTable`] maps lower-cased group names to chat formats in
//! configuration order. The first group the sender belongs to wins, whatever
//! order the sender's own groups are reported in.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use uuid::Uuid;

/// Ordered group name to template mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTable {
    formats: IndexMap<String, String>,
}

impl TemplateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of configured groups.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Check if no groups are configured.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Template configured for `group`, if any.
    pub fn get(&self, group: &str) -> Option<&str> {
        self.formats.get(&group.to_lowercase()).map(String::as_str)
    }

    /// Iterate `(group, template)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.formats.iter().map(|(g, t)| (g.as_str(), t.as_str()))
    }

    /// Select the template for a sender in `memberships`.
    ///
    /// Returns the template of the earliest configured group the sender
    /// belongs to (case-insensitive), or `fallback` if none match.
    pub fn resolve<'a>(&'a self, memberships: &HashSet<String>, fallback: &'a str) -> &'a str {
        if self.formats.is_empty() || memberships.is_empty() {
            return fallback;
        }

        let lowered: Vec<String> = memberships.iter().map(|g| g.to_lowercase()).collect();
        self.formats
            .iter()
            .find(|(group, _)| lowered.iter().any(|m| m == *group))
            .map(|(_, template)| template.as_str())
            .unwrap_or(fallback)
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateTable
where
    K: AsRef<str>,
    V: Into<String>,
{
    /// Later duplicates of a group keep the first position but take the new template.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let formats = iter
            .into_iter()
            .map(|(group, template)| (group.as_ref().to_lowercase(), template.into()))
            .collect();
        Self { formats }
    }
}

/// Select the template for `memberships` from `table`, or `fallback`.
pub fn resolve_template<'a>(
    memberships: &HashSet<String>,
    table: &'a TemplateTable,
    fallback: &'a str,
) -> &'a str {
    table.resolve(memberships, fallback)
}

/// Source of a sender's permission groups.
///
/// Implemented by the host's permission system.
pub trait GroupProvider: Send + Sync {
    /// Groups the sender with `id` belongs to.
    fn groups_for(&self, id: &Uuid) -> HashSet<String>;
}

/// In-memory group assignments.
#[derive(Debug, Clone, Default)]
pub struct StaticGroups {
    groups: HashMap<Uuid, HashSet<String>>,
}

impl StaticGroups {
    /// Create an empty provider where every sender has no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `groups` to `id`, replacing any previous assignment.
    pub fn assign<I, S>(&mut self, id: Uuid, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(id, groups.into_iter().map(Into::into).collect());
    }

    /// Builder form of [`StaticGroups::assign`].
    pub fn with<I, S>(mut self, id: Uuid, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assign(id, groups);
        self
    }
}

impl GroupProvider for StaticGroups {
    fn groups_for(&self, id: &Uuid) -> HashSet<String> {
        self.groups.get(id).cloned().unwrap_or_default()
    }
}
