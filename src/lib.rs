//! URL-to-container routing, duplicate rule detection and bookmark metadata
//! reconciliation for a browser companion tool.
//!
//! The host browser owns bookmarks and containers; this crate owns routing
//! rules and metadata overlays keyed by host ids, and answers three kinds of
//! questions over snapshots of both:
//!
//! - which container should this URL open in ([`resolve`], [`CompiledRules`],
//!   [`route_navigation`]),
//! - which rules are redundant ([`find_duplicate_rules`]),
//! - what does the bookmark tree look like with our metadata on top
//!   ([`combine`], [`flatten_bookmark_tree`] and friends).
//!
//! Every operation is a pure function of its inputs.

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod model;
mod snapshot;

pub mod store;

pub use api::{NavigationDecision, Options, combine, combine_with, route_navigation};
pub use engine::{
    CompiledPattern, CompiledRules, Diagnostic, DiagnosticKind, DuplicateGroup, DuplicateKey, KeepSuggestion,
    MatchTypeSet, PreOrder, ResolveTrace, RuleIndex, UrlInfo, ViewFields, find_duplicate_rules, find_node,
    flatten_bookmark_tree, get_bookmark_ids_in_folder, get_bookmark_ids_in_folders, get_duplicate_count,
    get_folder_ids, matches, precedence, resolve, suggest_all, suggest_rules_to_keep,
};
pub use error::{Error, Result};
pub use model::{
    BookmarkMetadata, BookmarkNode, BookmarkNotes, BookmarkView, Container, FolderMetadata, MatchType, NodeType,
    Rule, RuleMetadata, RuleSource, RuleType, timestamp_millis,
};
pub use snapshot::Snapshot;
