use crate::store::{BookmarkTreeProvider, ContainerStore, MemoryStore, RuleStore};
use crate::{BookmarkMetadata, BookmarkNode, Container, FolderMetadata, Result, Rule};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// A fully materialized copy of everything the engine reads: rules,
/// containers, the host bookmark forest and both metadata overlays.
///
/// This is the JSON the extension's storage layer exports; the CLI evaluates
/// it offline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub bookmarks: Vec<BookmarkNode>,
    #[serde(default)]
    pub bookmark_metadata: Vec<BookmarkMetadata>,
    #[serde(default)]
    pub folder_metadata: Vec<FolderMetadata>,
}

impl Snapshot {
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn bookmark_store(&self) -> MemoryStore<BookmarkMetadata> {
        MemoryStore::from_records(self.bookmark_metadata.iter().cloned())
    }

    pub fn folder_store(&self) -> MemoryStore<FolderMetadata> {
        MemoryStore::from_records(self.folder_metadata.iter().cloned())
    }
}

impl RuleStore for Snapshot {
    fn list(&self) -> &[Rule] {
        &self.rules
    }
}

impl ContainerStore for Snapshot {
    fn list(&self) -> &[Container] {
        &self.containers
    }
}

impl BookmarkTreeProvider for Snapshot {
    fn tree(&self) -> &[BookmarkNode] {
        &self.bookmarks
    }
}
