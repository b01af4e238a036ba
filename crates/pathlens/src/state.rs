//
// state.rs
//
// Shared server state: the document store and the workspace folders it was
// seeded from. Queries never mutate state; they take per-document
// snapshots out of the store.
//

use std::fs;
use std::path::Path;
use std::sync::RwLock;

use tower_lsp::lsp_types::Url;
use walkdir::WalkDir;

use crate::document_store::DocumentStore;

#[derive(Default)]
pub struct WorldState {
    pub documents: DocumentStore,
    pub workspace_folders: RwLock<Vec<Url>>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whether a workspace file participates in indexing.
fn is_indexable_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts" | "tsx" | "js")
    )
}

fn is_hidden_or_vendored(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "node_modules")
        .unwrap_or(false)
}

/// Pre-load every TypeScript/JavaScript file under the workspace folders so
/// the base-directory registry can see declarations in files the editor has
/// not opened.
pub fn scan_workspace(state: &WorldState) {
    let folders: Vec<Url> = match state.workspace_folders.read() {
        Ok(folders) => folders.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };

    for folder in folders {
        let Ok(root) = folder.to_file_path() else {
            log::warn!("Skipping non-file workspace folder: {}", folder);
            continue;
        };
        let mut loaded = 0usize;
        for entry in WalkDir::new(&root)
            .into_iter()
            .filter_entry(|e| !is_hidden_or_vendored(e))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_indexable_source(path) {
                continue;
            }
            let Ok(uri) = Url::from_file_path(path) else {
                continue;
            };
            if state.documents.contains(&uri) {
                continue;
            }
            match fs::read_to_string(path) {
                Ok(text) => {
                    state.documents.open(uri, text, None);
                    loaded += 1;
                }
                Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
            }
        }
        log::info!("Indexed {} file(s) under {}", loaded, root.display());
    }
}
