//! Records owned by the host browser and by this tool's side stores.
//!
//! All JSON shapes are camelCase and timestamps travel as epoch milliseconds,
//! matching what the extension persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Build a UTC timestamp from epoch milliseconds, falling back to the epoch
/// for values chrono cannot represent.
pub fn timestamp_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

// --- Rules -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Case-sensitive equality on the full URL.
    Exact,
    /// URL host equals the pattern or is a subdomain of it.
    Domain,
    /// Glob over the full URL: `*` any run, `?` one character.
    #[serde(alias = "glob")]
    Wildcard,
    /// Regular expression searched in the full URL.
    Regex,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Domain => "domain",
            MatchType::Wildcard => "wildcard",
            MatchType::Regex => "regex",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Open matching URLs in the rule's container.
    #[default]
    Include,
    /// Force matching URLs out of any container.
    Exclude,
    /// Only allow matching URLs inside the rule's container.
    Restrict,
}

impl RuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Include => "include",
            RuleType::Exclude => "exclude",
            RuleType::Restrict => "restrict",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSource {
    #[default]
    User,
    Preset,
    Import,
    Bookmark,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub source: RuleSource,
}

/// A routing rule: when `pattern` matches a URL under `match_type`, the URL
/// belongs to `container_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub pattern: String,
    pub match_type: MatchType,
    #[serde(default)]
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Higher wins. `None` ranks below every explicit priority.
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub metadata: RuleMetadata,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    /// Create an enabled include rule with no container and no priority.
    pub fn new(id: impl Into<String>, pattern: impl Into<String>, match_type: MatchType) -> Self {
        let now = Utc::now();
        Rule {
            id: id.into(),
            pattern: pattern.into(),
            match_type,
            rule_type: RuleType::Include,
            container_id: None,
            priority: None,
            enabled: true,
            created: now,
            modified: now,
            metadata: RuleMetadata::default(),
        }
    }

    /// Check that the pattern is non-empty and compiles for its match type.
    pub fn validate(&self) -> crate::Result<()> {
        crate::engine::CompiledPattern::compile(self).map(|_| ())
    }
}

// --- Containers --------------------------------------------------------------

/// A container as this tool tracks it. `cookie_store_id` is the host handle
/// used to actually open tabs; `id` stays stable across host re-creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    pub cookie_store_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub temporary: bool,
    #[serde(default)]
    pub sync_enabled: bool,
}

// --- Metadata overlays -------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Side record for one host bookmark. Title, URL and position are never
/// copied here; they are read live from the host tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkMetadata {
    pub bookmark_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub auto_open: bool,
    #[serde(default)]
    pub metadata: BookmarkNotes,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub modified: DateTime<Utc>,
}

/// Side record for one host folder. `container_id` and `tags` are defaults
/// for children without their own record, applied only when
/// `inherit_settings` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderMetadata {
    pub folder_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub inherit_settings: bool,
    #[serde(default)]
    pub metadata: BookmarkNotes,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub modified: DateTime<Utc>,
}

// --- Host bookmark tree ------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Bookmark,
    Folder,
    Separator,
}

/// One node of the host bookmark forest, in host order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub index: u32,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    pub fn bookmark(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        BookmarkNode {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            parent_id: None,
            index: 0,
            date_added: None,
            node_type: NodeType::Bookmark,
            children: Vec::new(),
        }
    }

    /// Build a folder; children get their `parent_id` and `index` filled in.
    pub fn folder(id: impl Into<String>, title: impl Into<String>, children: Vec<BookmarkNode>) -> Self {
        let id = id.into();
        let children = children
            .into_iter()
            .enumerate()
            .map(|(idx, mut child)| {
                child.parent_id = Some(id.clone());
                child.index = idx as u32;
                child
            })
            .collect();
        BookmarkNode {
            id,
            title: title.into(),
            url: None,
            parent_id: None,
            index: 0,
            date_added: None,
            node_type: NodeType::Folder,
            children,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.node_type == NodeType::Folder
    }

    /// A real bookmark: bookmark-typed and carrying a URL.
    pub fn is_link(&self) -> bool {
        self.node_type == NodeType::Bookmark && self.url.is_some()
    }
}

// Host trees have no depth limit; the derived drop glue would recurse once per
// level, so both tree types tear their children down through a worklist.
impl Drop for BookmarkNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

// --- Combined view -----------------------------------------------------------

/// Read-only merge of a host node with this tool's metadata, rebuilt on every
/// query by [`crate::combine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub index: u32,
    #[serde(with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkView>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Folders only: whether children inherit this folder's defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherit_settings: Option<bool>,

    /// Container the rule set would pick for `url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_container: Option<String>,
    /// Ancestor titles, root first, immediate parent last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<Vec<String>>,
    /// Folder whose defaults were applied to this bookmark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<String>,
}

impl Drop for BookmarkView {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut view) = pending.pop() {
            pending.append(&mut view.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_json_uses_extension_shape() {
        let json = r#"{
            "id": "r1",
            "pattern": "*.example.com/*",
            "matchType": "glob",
            "ruleType": "exclude",
            "containerId": "work",
            "priority": 3,
            "created": 1700000000000,
            "modified": 1700000005000,
            "metadata": {"source": "preset"}
        }"#;

        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.match_type, MatchType::Wildcard);
        assert_eq!(rule.rule_type, RuleType::Exclude);
        assert_eq!(rule.container_id.as_deref(), Some("work"));
        assert_eq!(rule.priority, Some(3));
        assert!(rule.enabled);
        assert_eq!(rule.modified, timestamp_millis(1_700_000_005_000));
        assert_eq!(rule.metadata.source, RuleSource::Preset);
    }

    #[test]
    fn missing_pattern_is_rejected_at_the_boundary() {
        let json = r#"{"id": "r1", "matchType": "exact", "created": 0, "modified": 0}"#;
        assert!(serde_json::from_str::<Rule>(json).is_err());
    }

    #[test]
    fn host_node_without_type_defaults_to_bookmark() {
        let json = r#"{"id": "b1", "title": "Docs", "url": "https://docs.rs", "index": 2}"#;
        let node: BookmarkNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type, NodeType::Bookmark);
        assert!(node.is_link());
        assert!(node.children.is_empty());
    }

    #[test]
    fn folder_constructor_links_children() {
        let folder = BookmarkNode::folder(
            "f",
            "Folder",
            vec![BookmarkNode::bookmark("a", "A", "https://a.test"), BookmarkNode::bookmark("b", "B", "https://b.test")],
        );
        assert_eq!(folder.children[1].parent_id.as_deref(), Some("f"));
        assert_eq!(folder.children[1].index, 1);
    }

    #[test]
    fn absent_priority_sorts_below_any_explicit_priority() {
        assert!(None < Some(i32::MIN));
    }
}
