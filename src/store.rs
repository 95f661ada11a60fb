//! Store seams.
//!
//! Persistence lives outside this crate. These traits fix the shapes the core
//! reads through, and `MemoryStore` backs them in tests and in the CLI.
//!
//! Metadata records are keyed by host ids this crate does not control, so a
//! record can outlive its bookmark. That is expected: lookups tolerate it and
//! [`find_dangling_metadata`] / [`prune_dangling_metadata`] clean up.

use crate::engine::PreOrder;
use crate::{BookmarkMetadata, BookmarkNode, Container, FolderMetadata, Rule};
use std::collections::{BTreeMap, HashSet};

/// Record keyed by a host bookmark or folder id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for BookmarkMetadata {
    fn key(&self) -> &str {
        &self.bookmark_id
    }
}

impl Keyed for FolderMetadata {
    fn key(&self) -> &str {
        &self.folder_id
    }
}

/// Key-value access to metadata overlays.
pub trait MetadataStore<T> {
    fn get(&self, id: &str) -> Option<&T>;
    fn put(&mut self, id: String, record: T);
    fn delete(&mut self, id: &str) -> Option<T>;
    fn list(&self) -> Vec<&T>;
}

/// In-memory metadata store, listed in key order.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    records: BTreeMap<String, T>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        MemoryStore { records: BTreeMap::new() }
    }
}

impl<T: Keyed> MemoryStore<T> {
    /// Build from records; a later record with the same key replaces an
    /// earlier one.
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Self {
        let records = records.into_iter().map(|r| (r.key().to_string(), r)).collect();
        MemoryStore { records }
    }
}

impl<T> MemoryStore<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> MetadataStore<T> for MemoryStore<T> {
    fn get(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }

    fn put(&mut self, id: String, record: T) {
        self.records.insert(id, record);
    }

    fn delete(&mut self, id: &str) -> Option<T> {
        self.records.remove(id)
    }

    fn list(&self) -> Vec<&T> {
        self.records.values().collect()
    }
}

/// Read access to the rule collection.
pub trait RuleStore {
    fn list(&self) -> &[Rule];
}

impl RuleStore for [Rule] {
    fn list(&self) -> &[Rule] {
        self
    }
}

impl RuleStore for Vec<Rule> {
    fn list(&self) -> &[Rule] {
        self
    }
}

/// Outcome of looking a container id up. `Missing` is a normal outcome: the
/// host may have removed the container behind our back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerLookup<'c> {
    Found(&'c Container),
    Missing(&'c str),
}

impl<'c> ContainerLookup<'c> {
    /// Display name, `"unknown"` for missing containers.
    pub fn display_name(&self) -> &'c str {
        match self {
            ContainerLookup::Found(container) => &container.name,
            ContainerLookup::Missing(_) => "unknown",
        }
    }
}

/// Read access to containers, used for display and for opening tabs; never
/// for matching.
pub trait ContainerStore {
    fn list(&self) -> &[Container];

    fn lookup<'c>(&'c self, id: &'c str) -> ContainerLookup<'c> {
        match self.list().iter().find(|c| c.id == id) {
            Some(container) => ContainerLookup::Found(container),
            None => ContainerLookup::Missing(id),
        }
    }
}

impl ContainerStore for [Container] {
    fn list(&self) -> &[Container] {
        self
    }
}

impl ContainerStore for Vec<Container> {
    fn list(&self) -> &[Container] {
        self
    }
}

/// Supplier of the current host bookmark forest.
pub trait BookmarkTreeProvider {
    fn tree(&self) -> &[BookmarkNode];
}

/// Keys of metadata records whose bookmark or folder no longer exists in
/// `tree`.
pub fn find_dangling_metadata<T: Keyed, S: MetadataStore<T> + ?Sized>(tree: &[BookmarkNode], store: &S) -> Vec<String> {
    let live: HashSet<&str> = PreOrder::new(tree).map(|node| node.id.as_str()).collect();
    store.list().into_iter().map(Keyed::key).filter(|key| !live.contains(key)).map(str::to_string).collect()
}

/// Delete dangling records from `store`, returning how many were removed.
pub fn prune_dangling_metadata<T: Keyed, S: MetadataStore<T> + ?Sized>(tree: &[BookmarkNode], store: &mut S) -> usize {
    let dangling = find_dangling_metadata(tree, &*store);
    for id in &dangling {
        store.delete(id);
    }
    if !dangling.is_empty() {
        tracing::info!(removed = dangling.len(), "pruned dangling metadata");
    }
    dangling.len()
}

/// Enabled or not, rules that point at a container the store does not know.
pub fn find_unknown_container_refs<'r, C: ContainerStore + ?Sized>(rules: &'r [Rule], containers: &C) -> Vec<&'r Rule> {
    rules
        .iter()
        .filter(|rule| {
            rule.container_id
                .as_deref()
                .is_some_and(|id| matches!(containers.lookup(id), ContainerLookup::Missing(_)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rule, timestamp_millis};

    fn meta(id: &str) -> BookmarkMetadata {
        BookmarkMetadata {
            bookmark_id: id.to_string(),
            container_id: None,
            tags: vec![],
            auto_open: false,
            metadata: Default::default(),
            created: timestamp_millis(0),
            modified: timestamp_millis(0),
        }
    }

    fn container(id: &str, name: &str) -> Container {
        Container {
            id: id.to_string(),
            name: name.to_string(),
            icon: "briefcase".to_string(),
            color: "blue".to_string(),
            cookie_store_id: format!("firefox-container-{id}"),
            created: timestamp_millis(0),
            modified: timestamp_millis(0),
            temporary: false,
            sync_enabled: false,
        }
    }

    #[test]
    fn memory_store_round_trips_records() {
        let mut store = MemoryStore::from_records([meta("b"), meta("a")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").map(|m| m.bookmark_id.as_str()), Some("a"));

        store.put("c".to_string(), meta("c"));
        let keys: Vec<&str> = store.list().into_iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);

        assert!(store.delete("a").is_some());
        assert!(store.get("a").is_none());
        assert!(store.delete("a").is_none());
    }

    #[test]
    fn dangling_records_are_found_and_pruned() {
        let tree = vec![BookmarkNode::folder(
            "f",
            "Folder",
            vec![BookmarkNode::bookmark("kept", "Kept", "https://kept.test")],
        )];
        let mut store = MemoryStore::from_records([meta("kept"), meta("gone"), meta("f")]);

        assert_eq!(find_dangling_metadata(&tree, &store), vec!["gone".to_string()]);
        assert_eq!(prune_dangling_metadata(&tree, &mut store), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(prune_dangling_metadata(&tree, &mut store), 0);
    }

    #[test]
    fn missing_containers_are_a_variant_not_an_error() {
        let containers = vec![container("work", "Work")];
        assert_eq!(containers.lookup("work").display_name(), "Work");
        assert_eq!(containers.lookup("ghost"), ContainerLookup::Missing("ghost"));
        assert_eq!(containers.lookup("ghost").display_name(), "unknown");
    }

    #[test]
    fn rules_pointing_at_unknown_containers_are_reported() {
        let containers = vec![container("work", "Work")];
        let rules = vec![
            rule!(id: "ok", pattern: "a.test", match_type: Domain, container: "work"),
            rule!(id: "stale", pattern: "b.test", match_type: Domain, container: "deleted"),
            rule!(id: "none", pattern: "c.test", match_type: Domain, rule_type: Exclude),
        ];
        let stale: Vec<&str> = find_unknown_container_refs(&rules, &containers).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(stale, vec!["stale"]);
    }
}
