use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Description written into documents that were created or opened without one
pub const DEFAULT_DESCRIPTION: &str = "thicket task database";

/// Nested tag mapping, the persisted shape of a tag forest: tag name to the
/// mapping of its children, recursively. A childless tag is an empty mapping;
/// there is no separate leaf marker, so "no children" and "children dropped"
/// are indistinguishable on disk.
///
/// Backed by [`IndexMap`] so sibling order is insertion order and survives a
/// save/load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagMap(pub IndexMap<String, TagMap>);

/// One persisted task entry: creation time plus the encoded tag forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub time: i64,
    #[serde(default)]
    pub tags: TagMap,
}

/// The whole persisted document. In memory both keys are always present;
/// [`RawDocument`] handles files where they are not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub description: String,
    pub tasks: IndexMap<String, TaskEntry>,
}

impl Document {
    /// A fresh document with the default description and no tasks
    pub fn empty() -> Self {
        Document {
            description: DEFAULT_DESCRIPTION.to_string(),
            tasks: IndexMap::new(),
        }
    }
}

/// Deserialization shape of the document: either top-level key may be
/// missing so empty and hand-started files open cleanly.
#[derive(Debug, Default, Deserialize)]
pub struct RawDocument {
    pub description: Option<String>,
    pub tasks: Option<IndexMap<String, TaskEntry>>,
}

impl RawDocument {
    /// Back-fill whatever is missing. The flag reports that something was
    /// filled in — callers surface it as an unsaved schema migration, which
    /// is how the back-fill gets persisted exactly once.
    pub fn into_document(self) -> (Document, bool) {
        let migrated = self.description.is_none() || self.tasks.is_none();
        let doc = Document {
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            tasks: self.tasks.unwrap_or_default(),
        };
        (doc, migrated)
    }
}
