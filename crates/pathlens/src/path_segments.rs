//
// path_segments.rs
//
// Splits a decoded path value into literal and separator segments, keeping
// offsets into the decoded value for each segment.
//

use crate::offset_range::OffsetRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Literal,
    Separator,
}

/// One segment of a path value, with its range within that value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub kind: SegmentKind,
    pub value: String,
    pub range: OffsetRange,
}

/// A decoded path value split into alternating literal and separator
/// segments.
///
/// Separators are single `/` or `\` characters. Empty literal segments are
/// inserted so that every separator has an adjoining literal on both sides:
/// two separators are never adjacent, and the sequence never starts or ends
/// with a separator. Concatenating all segment values reproduces the input
/// exactly.
#[derive(Debug, Clone)]
pub struct ParsedPath {
    segments: Vec<PathSegment>,
}

impl ParsedPath {
    pub fn parse(value: &str) -> Self {
        let mut segments: Vec<PathSegment> = Vec::new();
        let bytes = value.as_bytes();
        let mut i = 0;
        while i < value.len() {
            if bytes[i] == b'/' || bytes[i] == b'\\' {
                push_empty_literal_unless_after_literal(&mut segments, i);
                segments.push(PathSegment {
                    kind: SegmentKind::Separator,
                    value: value[i..i + 1].to_string(),
                    range: OffsetRange::new(i, i + 1),
                });
                i += 1;
            } else {
                let mut len = 1;
                while i + len < value.len() && bytes[i + len] != b'/' && bytes[i + len] != b'\\' {
                    len += 1;
                }
                segments.push(PathSegment {
                    kind: SegmentKind::Literal,
                    value: value[i..i + len].to_string(),
                    range: OffsetRange::new(i, i + len),
                });
                i += len;
            }
        }
        push_empty_literal_unless_after_literal(&mut segments, value.len());

        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The literal segment "under" `pos`, with each literal's range extended
    /// one position past its end so a cursor sitting on the separator right
    /// after a literal still counts as inside that literal.
    ///
    /// Total over `0..=value.len()`: there is always a touching literal.
    pub fn literal_segment_touching(&self, pos: usize) -> Option<&PathSegment> {
        self.segments
            .iter()
            .find(|s| s.kind == SegmentKind::Literal && s.range.delta_end(1).contains(pos))
    }

    /// Index of a segment within this path.
    pub fn index_of(&self, segment: &PathSegment) -> Option<usize> {
        self.segments.iter().position(|s| s == segment)
    }

    /// Concatenation of the first `idx_end_exclusive` segments' values: the
    /// path up to, but not including, a given segment.
    pub fn sub_path(&self, idx_end_exclusive: usize) -> String {
        self.segments[..idx_end_exclusive.min(self.segments.len())]
            .iter()
            .map(|s| s.value.as_str())
            .collect()
    }

    /// The full path value, reassembled from the segments.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.value.as_str()).collect()
    }
}

/// Keep literals and separators alternating: unless the last segment emitted
/// is a literal, insert an empty literal at `pos` before the next separator
/// (or at the end of the input). Covers an empty input, a separator at the
/// very start, and adjacent separators alike.
fn push_empty_literal_unless_after_literal(segments: &mut Vec<PathSegment>, pos: usize) {
    let after_literal = segments
        .last()
        .is_some_and(|last| last.kind == SegmentKind::Literal);
    if !after_literal {
        segments.push(PathSegment {
            kind: SegmentKind::Literal,
            value: String::new(),
            range: OffsetRange::empty_at(pos),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(p: &ParsedPath) -> Vec<&str> {
        p.segments().iter().map(|s| s.value.as_str()).collect()
    }

    #[test]
    fn test_simple_path_segments() {
        let p = ParsedPath::parse("foo/bar.txt");
        assert_eq!(values(&p), vec!["foo", "/", "bar.txt"]);
        assert_eq!(p.sub_path(2), "foo/");
    }

    #[test]
    fn test_empty_value_yields_one_empty_literal() {
        let p = ParsedPath::parse("");
        assert_eq!(p.segments().len(), 1);
        assert_eq!(p.segments()[0].kind, SegmentKind::Literal);
        assert_eq!(p.segments()[0].range, OffsetRange::new(0, 0));
    }

    #[test]
    fn test_adjacent_separators_get_an_empty_literal_between() {
        let p = ParsedPath::parse("a//b");
        assert_eq!(values(&p), vec!["a", "/", "", "/", "b"]);
    }

    #[test]
    fn test_leading_and_trailing_separators_get_empty_literals() {
        let p = ParsedPath::parse("/a/");
        assert_eq!(values(&p), vec!["", "/", "a", "/", ""]);
    }

    #[test]
    fn test_leading_separator_still_has_a_touching_literal_at_zero() {
        let p = ParsedPath::parse("/foo");
        assert_eq!(values(&p), vec!["", "/", "foo"]);
        let s = p.literal_segment_touching(0).expect("always defined");
        assert_eq!(s.range, OffsetRange::new(0, 0));
        let s = p.literal_segment_touching(1).expect("always defined");
        assert_eq!(s.value, "foo");
    }

    #[test]
    fn test_backslash_is_a_separator_too() {
        let p = ParsedPath::parse("a\\b/c");
        assert_eq!(values(&p), vec!["a", "\\", "b", "/", "c"]);
    }

    #[test]
    fn test_touching_literal_walk() {
        // Mirrors the original bracketed-cursor walk over "foo/a/baz.txt".
        let p = ParsedPath::parse("foo/a/baz.txt");
        let spans: Vec<(usize, usize)> = (0..=p.text().len())
            .map(|i| {
                let s = p.literal_segment_touching(i).expect("always defined");
                (s.range.start, s.range.end_exclusive)
            })
            .collect();
        let expected: Vec<(usize, usize)> = [
            (0, 3), // [|foo]
            (0, 3),
            (0, 3),
            (0, 3), // [foo|] — cursor at the separator still touches "foo"
            (4, 5), // [|a]
            (4, 5),
            (6, 13), // [|baz.txt]
            (6, 13),
            (6, 13),
            (6, 13),
            (6, 13),
            (6, 13),
            (6, 13),
            (6, 13),
        ]
        .to_vec();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_touching_literal_of_empty_path() {
        let p = ParsedPath::parse("");
        assert!(p.literal_segment_touching(0).is_some());
    }

    #[test]
    fn test_sub_path_walk() {
        let p = ParsedPath::parse("foo/a/baz.txt");
        let subs: Vec<String> = (0..=p.segments().len()).map(|i| p.sub_path(i)).collect();
        assert_eq!(subs, vec!["", "foo", "foo/", "foo/a", "foo/a/", "foo/a/baz.txt"]);
    }

    proptest! {
        // Segment values concatenate back to the input.
        #[test]
        fn prop_segments_reconstruct_the_value(value in "[a-z./\\\\]{0,16}") {
            let p = ParsedPath::parse(&value);
            prop_assert_eq!(p.text(), value);
        }

        // A touching literal exists at every position in 0..=len.
        #[test]
        fn prop_touching_literal_is_total(value in "[a-z./\\\\]{0,16}") {
            let p = ParsedPath::parse(&value);
            for pos in 0..=value.len() {
                prop_assert!(p.literal_segment_touching(pos).is_some());
            }
        }

        // sub_path(0) is empty; sub_path(len) is the whole value.
        #[test]
        fn prop_sub_path_bounds(value in "[a-z./\\\\]{0,16}") {
            let p = ParsedPath::parse(&value);
            prop_assert_eq!(p.sub_path(0), "");
            prop_assert_eq!(p.sub_path(p.segments().len()), value);
        }
    }
}
