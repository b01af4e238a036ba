//
// path_expression.rs
//
// Composes a matched path call into cursor-aware queries: decoded literal,
// path segmentation, resolved base directory and full path, plus offset
// translation between source and decoded-value coordinates.
//

use tree_sitter::Node;

use crate::matchers::PathCallMatch;
use crate::offset_range::OffsetRange;
use crate::path_segments::ParsedPath;
use crate::quoted_string::ParsedString;
use crate::syntax::node_text;

/// A path-call expression resolved for one query. Built fresh per query and
/// discarded with the response; never cached.
pub struct PathExpression<'tree> {
    pub call_node: Node<'tree>,
    pub literal_node: Node<'tree>,
    /// The base-directory template exactly as declared.
    pub base_dir_template: String,
    /// The template with `$dir` substituted by the declaring file's
    /// directory.
    pub resolved_base_path: String,
    /// Base path joined with the decoded relative path.
    pub full_path: String,
    parsed: ParsedString,
    segments: ParsedPath,
}

/// Cursor-dependent facts about a path expression.
pub struct CursorInfo {
    /// Source range of the path segment the cursor touches.
    pub cursor_segment_range: OffsetRange,
    /// The directory to list for completions at the cursor: base path
    /// joined with the segments preceding the touched one.
    pub full_dir_path_before_cursor: String,
}

impl<'tree> PathExpression<'tree> {
    pub fn new(matched: &PathCallMatch<'tree>, text: &str) -> Self {
        let parsed = ParsedString::parse(node_text(matched.literal_node, text));
        let segments = ParsedPath::parse(parsed.value());
        let resolved_base_path = matched.decl.resolved_base_path();
        let full_path = join_path(&resolved_base_path, &segments.text());
        Self {
            call_node: matched.call_node,
            literal_node: matched.literal_node,
            base_dir_template: matched.decl.base_dir_template.clone(),
            resolved_base_path,
            full_path,
            parsed,
            segments,
        }
    }

    /// The decoded relative path.
    pub fn relative_path(&self) -> &str {
        self.parsed.value()
    }

    /// The decoded value's span in source coordinates: both value bounds
    /// mapped through the literal's offset correspondence and shifted by
    /// the literal node's position.
    pub fn value_range(&self) -> OffsetRange {
        OffsetRange::of_length(self.parsed.value().len())
            .map_bounds(|pos| self.parsed.value_to_source(pos))
            .delta(self.literal_node.start_byte() as isize)
    }

    /// Facts about the segment under `absolute_pos` (a source offset within
    /// the file containing the literal).
    pub fn cursor_info(&self, absolute_pos: usize) -> Option<CursorInfo> {
        let pos_in_literal = absolute_pos.saturating_sub(self.literal_node.start_byte());
        let value_pos = self.parsed.source_to_value(pos_in_literal);
        let segment = self.segments.literal_segment_touching(value_pos)?;
        let segment_idx = self.segments.index_of(segment)?;

        let cursor_segment_range = OffsetRange::new(
            self.parsed.value_to_source(segment.range.start),
            self.parsed.value_to_source(segment.range.end_exclusive),
        )
        .delta(self.literal_node.start_byte() as isize);

        let full_dir_path_before_cursor =
            join_path(&self.resolved_base_path, &self.segments.sub_path(segment_idx));

        Some(CursorInfo {
            cursor_segment_range,
            full_dir_path_before_cursor,
        })
    }
}

/// Join a base path and a relative path textually, collapsing the join
/// separator only (no normalization of `.` or `..`). A leading separator on
/// `relative` never discards the base.
fn join_path(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return relative.to_string();
    }
    let sep_before = base.ends_with(['/', '\\']);
    let sep_after = relative.starts_with(['/', '\\']);
    match (sep_before, sep_after) {
        (true, true) => format!("{base}{}", &relative[1..]),
        (false, false) => format!("{base}/{relative}"),
        _ => format!("{base}{relative}"),
    }
}
