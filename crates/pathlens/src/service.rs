//
// service.rs
//
// The three query operations exposed through the tunnel. Each takes the
// target document plus a byte-offset cursor position, rebuilds the
// base-directory registry from the current document snapshots, and answers
// with `None` whenever no structural pattern fires.
//

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::Url;

use crate::document_store::{DocumentSnapshot, DocumentStore};
use crate::matchers::{match_file_name_content_obj, match_file_path_obj, match_path_call};
use crate::path_expression::PathExpression;
use crate::registry::PathFnRegistry;
use crate::syntax::{encloses, find_node_or_ancestor, find_smallest_node_at, is_multi_line};

/// Response of `findRelativeFileNodeAt`: the path expression under the
/// cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeFileNodeResponse {
    /// The base-directory template as declared, e.g. `$dir/target`.
    pub base_dir: String,
    /// The decoded relative path.
    pub relative_path: String,
    /// Resolved base directory joined with the relative path.
    pub full_path: String,
    /// Source span of the decoded value, `[start, endExclusive]`.
    pub string_value_range: [usize; 2],
    /// Source span of the path segment the cursor touches.
    pub cursor_segment_range: [usize; 2],
    /// Directory to list for completions at the cursor.
    pub full_dir_path_before_cursor: String,
}

/// Response of `findFilePathObjAt`: a `{ filePath: ... }` object literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePathObjResponse {
    pub base_dir: String,
    pub relative_path: String,
    pub full_path: String,
    /// Span from the first to the last matched property.
    pub replace_range: [usize; 2],
    pub is_multi_line: bool,
}

/// Response of `findFileNameFileContentObjAt`: a
/// `{ fileName, fileContent }` object literal plus a producing function to
/// synthesize a path call with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNameFileContentObjResponse {
    pub file_name: String,
    pub file_content: String,
    pub relative_file_path_fn_name: String,
    pub relative_file_path_base_dir: String,
    pub replace_range: [usize; 2],
    pub is_multi_line: bool,
}

struct QueryInput {
    documents: Vec<DocumentSnapshot>,
    target: usize,
}

impl QueryInput {
    fn gather(store: &DocumentStore, uri: &Url) -> Option<Self> {
        let documents = store.snapshot_all();
        let target_path = uri.to_file_path().ok()?;
        let target = documents.iter().position(|d| d.path == target_path)?;
        Some(Self { documents, target })
    }

    fn doc(&self) -> &DocumentSnapshot {
        &self.documents[self.target]
    }
}

/// Find the path-call expression whose string literal is under the cursor.
pub fn find_relative_file_node_at(
    store: &DocumentStore,
    uri: &Url,
    position: usize,
) -> Option<RelativeFileNodeResponse> {
    let input = QueryInput::gather(store, uri)?;
    let doc = input.doc();
    let registry = PathFnRegistry::collect(&input.documents);

    let node_at_cursor = find_smallest_node_at(doc.tree.root_node(), position)?;
    let matched =
        find_node_or_ancestor(node_at_cursor, |n| match_path_call(&registry, n, &doc.text))?;

    // Only fires when the cursor is on the path literal itself.
    if !encloses(matched.literal_node, node_at_cursor) {
        return None;
    }

    let expr = PathExpression::new(&matched, &doc.text);
    let cursor = expr.cursor_info(position)?;
    Some(RelativeFileNodeResponse {
        base_dir: expr.base_dir_template.clone(),
        relative_path: expr.relative_path().to_string(),
        full_path: expr.full_path.clone(),
        string_value_range: expr.value_range().to_pair(),
        cursor_segment_range: cursor.cursor_segment_range.to_pair(),
        full_dir_path_before_cursor: cursor.full_dir_path_before_cursor,
    })
}

/// Find the enclosing `{ filePath: pathFn('...') }` object literal.
pub fn find_file_path_obj_at(
    store: &DocumentStore,
    uri: &Url,
    position: usize,
) -> Option<FilePathObjResponse> {
    let input = QueryInput::gather(store, uri)?;
    let doc = input.doc();
    let registry = PathFnRegistry::collect(&input.documents);

    let node_at_cursor = find_smallest_node_at(doc.tree.root_node(), position)?;
    let matched = find_node_or_ancestor(node_at_cursor, |n| {
        match_file_path_obj(&registry, n, &doc.text)
    })?;

    let expr = PathExpression::new(&matched.path_call, &doc.text);
    Some(FilePathObjResponse {
        base_dir: expr.base_dir_template.clone(),
        relative_path: expr.relative_path().to_string(),
        full_path: expr.full_path.clone(),
        replace_range: matched.replace_range.to_pair(),
        is_multi_line: is_multi_line(matched.object_node),
    })
}

/// Find the enclosing `{ fileName, fileContent }` object literal and a
/// producing path function to offer for the extraction.
pub fn find_file_name_file_content_obj_at(
    store: &DocumentStore,
    uri: &Url,
    position: usize,
) -> Option<FileNameFileContentObjResponse> {
    let input = QueryInput::gather(store, uri)?;
    let doc = input.doc();

    let node_at_cursor = find_smallest_node_at(doc.tree.root_node(), position)?;
    let matched =
        find_node_or_ancestor(node_at_cursor, |n| match_file_name_content_obj(n, &doc.text))?;

    // The refactor needs a function to synthesize the call with; without
    // one discoverable, the shape alone is not actionable.
    let registry = PathFnRegistry::collect(&input.documents);
    let producer = registry.entries().first()?;

    Some(FileNameFileContentObjResponse {
        file_name: matched.file_name,
        file_content: matched.file_content,
        relative_file_path_fn_name: producer.fn_name.clone(),
        relative_file_path_base_dir: producer.resolved_base_path(),
        replace_range: matched.replace_range.to_pair(),
        is_multi_line: is_multi_line(matched.object_node),
    })
}
