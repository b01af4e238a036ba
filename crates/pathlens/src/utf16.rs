//
// utf16.rs
//
// LSP positions count UTF-16 code units; the core works in byte offsets
// over the whole document text.
//

use tower_lsp::lsp_types::Position;

/// Convert a UTF-16 column offset (from LSP Position.character) to a byte
/// offset within the given line.
pub fn utf16_column_to_byte_offset(line: &str, utf16_col: u32) -> usize {
    let mut utf16_count = 0;
    for (byte_idx, ch) in line.char_indices() {
        if utf16_count >= utf16_col as usize {
            return byte_idx;
        }
        utf16_count += ch.len_utf16();
    }
    line.len()
}

/// Convert an LSP position to a byte offset in `text`. Positions past the
/// last line clamp to the end of the text.
pub fn position_to_byte_offset(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for (idx, line) in text.split('\n').enumerate() {
        if idx == position.line as usize {
            return line_start + utf16_column_to_byte_offset(line, position.character);
        }
        line_start += line.len() + 1;
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_column_is_identity() {
        assert_eq!(utf16_column_to_byte_offset("hello", 3), 3);
    }

    #[test]
    fn test_multibyte_column() {
        // 'é' is 2 bytes in UTF-8 but 1 UTF-16 code unit.
        assert_eq!(utf16_column_to_byte_offset("éx", 1), 2);
    }

    #[test]
    fn test_column_past_line_end_clamps() {
        assert_eq!(utf16_column_to_byte_offset("ab", 10), 2);
    }

    #[test]
    fn test_position_on_second_line() {
        let text = "ab\ncdef\ng";
        let pos = Position::new(1, 2);
        assert_eq!(position_to_byte_offset(text, pos), 5);
        assert_eq!(&text[5..6], "e");
    }

    #[test]
    fn test_position_past_last_line_clamps() {
        let text = "ab\ncd";
        assert_eq!(position_to_byte_offset(text, Position::new(9, 0)), text.len());
    }
}
