//! Routing and reconciliation engine.
//!
//! This module is the *public entry point* for everything that decides where
//! a URL opens and how bookmarks are presented. It is split into focused
//! submodules under `src/engine/` while keeping public paths stable (for
//! example `crate::engine::CompiledRules` and `crate::engine::PreOrder`).
//!
//! ## How the parts work together
//!
//! ```text
//! rules (all) ──┐
//!               │  CompiledRules::new          (compiled_rules.rs)
//!               │    - CompiledPattern::compile (pattern.rs)
//!               │    - broken patterns -> Diagnostic
//!               └──────────────┬──────────────
//!                              │
//! url ── UrlInfo::scan ────────┼─ candidates from domain index + scanned list
//!        (scan.rs)             │
//!                              v
//!                   CompiledRules::resolve (resolve.rs)
//!                     - pattern match
//!                     - priority > modified > input order
//!                              │
//!                              v
//!                        Option<&Rule>
//!
//! rules ── find_duplicate_rules (dedup.rs) ── DuplicateGroup ── KeepSuggestion
//!
//! host tree ── PreOrder (tree.rs) ── flatten / folder queries
//!     │
//!     └── combine_view (reconcile.rs) ◀── metadata stores + CompiledRules
//!                 │
//!                 v
//!          Vec<BookmarkView>
//! ```
//!
//! Everything here is synchronous and works on borrowed snapshots: nothing
//! mutates its inputs and nothing keeps state between calls, so any of it can
//! run concurrently from several callers.
//!
//! ## Responsibilities by module
//!
//! - `pattern.rs`: per-rule matching for the four match types.
//! - `scan.rs`: extracts the URL host once per query.
//! - `compiled_rules.rs`: compiles and indexes a rule set, collects
//!   diagnostics.
//! - `resolve.rs`: the precedence policy and resolution entry points.
//! - `dedup.rs`: routing-equivalence keys, duplicate groups, keep
//!   suggestions.
//! - `tree.rs`: iterative traversal of the host bookmark forest.
//! - `reconcile.rs`: the combined bookmark view.
//! - `metrics.rs`: opt-in resolution traces.
//!
//! ## Debugging
//!
//! Compilation failures are logged at `warn`, decisions at `debug`, through
//! `tracing`. The `routemark` binary reads its filter from `ROUTEMARK_LOG`.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/pattern.rs"]
mod pattern;
#[path = "engine/reconcile.rs"]
mod reconcile;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/scan.rs"]
mod scan;
#[path = "engine/tree.rs"]
mod tree;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use compiled_rules::{CompiledRules, Diagnostic, DiagnosticKind, MatchTypeSet, RuleIndex};
pub use dedup::{
    DuplicateGroup, DuplicateKey, KeepSuggestion, find_duplicate_rules, get_duplicate_count, suggest_all,
    suggest_rules_to_keep,
};
pub use metrics::ResolveTrace;
pub use pattern::{CompiledPattern, matches};
pub use reconcile::{ViewFields, combine_view};
pub use resolve::{precedence, resolve};
pub use scan::UrlInfo;
pub use tree::{
    PreOrder, find_node, flatten_bookmark_tree, get_bookmark_ids_in_folder, get_bookmark_ids_in_folders,
    get_folder_ids,
};
