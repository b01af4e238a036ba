//
// document_store.rs
//
// Concurrent store of open/indexed documents. Each document keeps its full
// text and its parse tree; changes re-parse the whole document (full-text
// sync only).
//

use std::path::PathBuf;

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;
use tree_sitter::Tree;

use crate::parser_pool;

/// A parsed document
pub struct Document {
    pub text: String,
    pub tree: Option<Tree>,
    pub version: Option<i32>,
}

impl Document {
    pub fn new(text: String, version: Option<i32>) -> Self {
        let tree = parser_pool::parse(&text);
        Self {
            text,
            tree,
            version,
        }
    }

    pub fn replace_text(&mut self, text: String, version: Option<i32>) {
        self.tree = parser_pool::parse(&text);
        self.text = text;
        self.version = version;
    }
}

/// An immutable per-query snapshot of one document.
///
/// Cloned out of the store so queries never hold map guards while they run.
#[derive(Clone)]
pub struct DocumentSnapshot {
    pub path: PathBuf,
    pub text: String,
    pub tree: Tree,
}

#[derive(Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, uri: Url, text: String, version: Option<i32>) {
        self.documents.insert(uri, Document::new(text, version));
    }

    pub fn replace_text(&self, uri: &Url, text: String, version: Option<i32>) {
        match self.documents.get_mut(uri) {
            Some(mut doc) => doc.replace_text(text, version),
            None => self.open(uri.clone(), text, version),
        }
    }

    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Snapshot one document. `None` when the document is unknown, has no
    /// file path, or failed to parse.
    pub fn snapshot(&self, uri: &Url) -> Option<DocumentSnapshot> {
        let doc = self.documents.get(uri)?;
        let path = uri.to_file_path().ok()?;
        Some(DocumentSnapshot {
            path,
            text: doc.text.clone(),
            tree: doc.tree.clone()?,
        })
    }

    /// Snapshot every parseable document, ordered by path so downstream
    /// "first match" behavior is deterministic.
    pub fn snapshot_all(&self) -> Vec<DocumentSnapshot> {
        let mut snapshots: Vec<DocumentSnapshot> = self
            .documents
            .iter()
            .filter_map(|entry| {
                let path = entry.key().to_file_path().ok()?;
                let tree = entry.value().tree.clone()?;
                Some(DocumentSnapshot {
                    path,
                    text: entry.value().text.clone(),
                    tree,
                })
            })
            .collect();
        snapshots.sort_by(|a, b| a.path.cmp(&b.path));
        snapshots
    }
}
