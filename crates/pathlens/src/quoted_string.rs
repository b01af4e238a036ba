//
// quoted_string.rs
//
// Decodes a quoted string literal, keeping a bidirectional offset
// correspondence between the raw literal source (quotes included) and the
// decoded string value.
//

use crate::offset_range::OffsetRange;

/// Kind of one decoded part of a raw string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// A maximal run of plain characters, 1:1 between source and value.
    Literal,
    /// A backslash escape. Two source characters, usually one value character.
    EscapeSequence,
    /// A quote character. One source character, no value contribution.
    QuoteMeta,
}

/// One part of a decoded literal: its source range and its contribution to
/// the decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPart {
    pub kind: PartKind,
    pub range: OffsetRange,
    pub value: String,
}

/// A quoted string literal decoded into parts.
///
/// Invariants: concatenating the parts' values in order yields the decoded
/// value exactly, and the parts' source ranges tile the raw literal's span
/// with no gaps or overlaps.
#[derive(Debug, Clone)]
pub struct ParsedString {
    parts: Vec<StringPart>,
    source: String,
    value: String,
}

impl ParsedString {
    /// Decode a raw string literal, including its surrounding quotes.
    ///
    /// Recognized escapes are `\n`, `\r` and `\t`; any other escaped
    /// character decodes to that character itself. A trailing lone
    /// backslash becomes an escape part with an empty contribution.
    pub fn parse(source: &str) -> Self {
        let mut parts: Vec<StringPart> = Vec::new();
        let bytes = source.as_bytes();
        let mut i = 0;
        while i < source.len() {
            match bytes[i] {
                b'\\' => {
                    let rest = &source[i + 1..];
                    match rest.chars().next() {
                        Some(next) => {
                            let decoded = match next {
                                'n' => '\n',
                                'r' => '\r',
                                't' => '\t',
                                other => other,
                            };
                            let end = i + 1 + next.len_utf8();
                            parts.push(StringPart {
                                kind: PartKind::EscapeSequence,
                                range: OffsetRange::new(i, end),
                                value: decoded.to_string(),
                            });
                            i = end;
                        }
                        None => {
                            // Unterminated escape at the end of the literal.
                            parts.push(StringPart {
                                kind: PartKind::EscapeSequence,
                                range: OffsetRange::new(i, i + 1),
                                value: String::new(),
                            });
                            i += 1;
                        }
                    }
                }
                b'\'' | b'"' => {
                    parts.push(StringPart {
                        kind: PartKind::QuoteMeta,
                        range: OffsetRange::new(i, i + 1),
                        value: String::new(),
                    });
                    i += 1;
                }
                _ => {
                    let mut len = 1;
                    while i + len < source.len()
                        && bytes[i + len] != b'\\'
                        && bytes[i + len] != b'"'
                        && bytes[i + len] != b'\''
                    {
                        len += 1;
                    }
                    parts.push(StringPart {
                        kind: PartKind::Literal,
                        range: OffsetRange::new(i, i + len),
                        value: source[i..i + len].to_string(),
                    });
                    i += len;
                }
            }
        }

        let value = parts.iter().map(|p| p.value.as_str()).collect();
        Self {
            parts,
            source: source.to_string(),
            value,
        }
    }

    pub fn parts(&self) -> &[StringPart] {
        &self.parts
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The decoded string value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Map an offset in the raw literal source to an offset in the decoded
    /// value.
    ///
    /// Exact for positions inside `Literal` parts and at part boundaries.
    /// Interior positions of multi-character escapes are mapped with the
    /// same linear arithmetic; they do not correspond to a faithful
    /// decoded-space position. Positions past the last part map to the end
    /// of the value.
    pub fn source_to_value(&self, pos: usize) -> usize {
        let mut value_len_before = 0;
        for p in &self.parts {
            if p.range.contains(pos) {
                return value_len_before + (pos - p.range.start);
            }
            value_len_before += p.value.len();
        }
        self.value.len()
    }

    /// Map an offset in the decoded value to an offset in the raw literal
    /// source.
    ///
    /// Escape and quote parts are atomic: a value position landing on one
    /// snaps to the end of that part's source range. Positions past the
    /// value map to the end of the source.
    pub fn value_to_source(&self, pos: usize) -> usize {
        let mut value_len_before = 0;
        for p in &self.parts {
            if value_len_before + p.value.len() >= pos {
                return match p.kind {
                    PartKind::EscapeSequence | PartKind::QuoteMeta => p.range.end_exclusive,
                    PartKind::Literal => p.range.start + (pos - value_len_before),
                };
            }
            value_len_before += p.value.len();
        }
        self.source.len()
    }

    /// The source range strictly between the first and last quote part.
    ///
    /// Falls back to the full source range when fewer than two quote parts
    /// exist; an unterminated literal with a single quote yields a
    /// zero-length range at that quote's end.
    pub fn range_without_quotes(&self) -> OffsetRange {
        let first = self.parts.iter().find(|p| p.kind == PartKind::QuoteMeta);
        let last = self
            .parts
            .iter()
            .rev()
            .find(|p| p.kind == PartKind::QuoteMeta);
        match (first, last) {
            (Some(first), Some(last)) if first.range != last.range => {
                OffsetRange::new(first.range.end_exclusive, last.range.start)
            }
            (Some(only), Some(_)) => OffsetRange::empty_at(only.range.end_exclusive),
            _ => OffsetRange::new(0, self.source.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_value_decodes_verbatim() {
        let s = ParsedString::parse("\"foo.txt\"");
        assert_eq!(s.value(), "foo.txt");
    }

    #[test]
    fn test_escapes_decode_to_control_characters() {
        let s = ParsedString::parse("\"te\\tst\"");
        assert_eq!(s.value(), "te\tst");
        let s = ParsedString::parse("\"a\\nb\"");
        assert_eq!(s.value(), "a\nb");
        let s = ParsedString::parse("\"a\\rb\"");
        assert_eq!(s.value(), "a\rb");
    }

    #[test]
    fn test_unknown_escape_decodes_to_the_character_itself() {
        let s = ParsedString::parse(r#""a\\b""#);
        assert_eq!(s.value(), "a\\b");
        let s = ParsedString::parse(r#""a\qb""#);
        assert_eq!(s.value(), "aqb");
    }

    #[test]
    fn test_parts_tile_the_source_without_gaps() {
        let s = ParsedString::parse(r#""te\\st""#);
        let mut expected_start = 0;
        for p in s.parts() {
            assert_eq!(p.range.start, expected_start);
            expected_start = p.range.end_exclusive;
        }
        assert_eq!(expected_start, s.source().len());
    }

    // "a\nb" is six raw characters decoding to a three-character value.
    #[test]
    fn test_newline_escape_offset_mapping() {
        let s = ParsedString::parse("\"a\\nb\"");
        assert_eq!(s.source().len(), 6);
        assert_eq!(s.value(), "a\nb");
        assert_eq!(s.source_to_value(1), 0);
        assert_eq!(s.value_to_source(2), 5);
    }

    #[test]
    fn test_source_to_value_table() {
        // Mirrors the original srcToVal walk over "te\\st" (quoted).
        let s = ParsedString::parse(r#""te\\st""#);
        let got: Vec<usize> = (0..=s.source().len()).map(|i| s.source_to_value(i)).collect();
        assert_eq!(got, vec![0, 0, 1, 2, 3, 3, 4, 5, 5]);
    }

    #[test]
    fn test_value_to_source_table() {
        let s = ParsedString::parse(r#""te\\st""#);
        let got: Vec<usize> = (0..=s.value().len()).map(|i| s.value_to_source(i)).collect();
        assert_eq!(got, vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_range_without_quotes() {
        let s = ParsedString::parse("\"abc\"");
        assert_eq!(s.range_without_quotes(), OffsetRange::new(1, 4));
    }

    #[test]
    fn test_range_without_quotes_falls_back_to_full_range() {
        let s = ParsedString::parse("abc");
        assert_eq!(s.range_without_quotes(), OffsetRange::new(0, 3));
    }

    #[test]
    fn test_range_without_quotes_of_unterminated_literal() {
        let s = ParsedString::parse("\"abc");
        assert_eq!(s.range_without_quotes(), OffsetRange::empty_at(1));
    }

    #[test]
    fn test_position_past_the_last_part() {
        let s = ParsedString::parse("\"ab\"");
        assert_eq!(s.source_to_value(10), 2);
        assert_eq!(s.value_to_source(10), 4);
    }

    fn raw_literal() -> impl Strategy<Value = String> {
        "[a-z./ ]{0,12}".prop_map(|body| format!("\"{body}\""))
    }

    proptest! {
        // Round-trip holds at any offset strictly inside a Literal part.
        #[test]
        fn prop_roundtrip_inside_literal_parts(source in raw_literal()) {
            let s = ParsedString::parse(&source);
            for p in s.parts() {
                if p.kind == PartKind::Literal {
                    for pos in p.range.start..p.range.end_exclusive {
                        prop_assert_eq!(s.value_to_source(s.source_to_value(pos)), pos);
                    }
                }
            }
        }

        // The decoded value never outgrows the raw source.
        #[test]
        fn prop_value_never_longer_than_source(body in "[a-z\\\\nt./]{0,12}") {
            let source = format!("\"{body}\"");
            let s = ParsedString::parse(&source);
            prop_assert!(s.value().len() <= source.len());
        }
    }

    #[test]
    fn test_multi_character_escape_strictly_shrinks_value() {
        let s = ParsedString::parse("\"a\\nb\\tc\"");
        assert!(s.value().len() < s.source().len());
    }
}
