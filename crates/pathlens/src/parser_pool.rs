//
// parser_pool.rs
//
// Thread-local parser pool for efficient parser reuse
//

use std::cell::RefCell;
use tree_sitter::{Parser, Tree};

thread_local! {
    static PARSER: RefCell<Parser> = RefCell::new({
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .expect("Failed to set TypeScript language");
        parser
    });
}

/// Execute a function with a thread-local parser instance.
/// The parser is reused across calls on the same thread.
pub fn with_parser<F, R>(f: F) -> R
where
    F: FnOnce(&mut Parser) -> R,
{
    PARSER.with(|parser| f(&mut parser.borrow_mut()))
}

/// Parse a TypeScript/JavaScript source text into a fresh tree.
pub fn parse(text: &str) -> Option<Tree> {
    with_parser(|parser| parser.parse(text, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_initialized_with_typescript_language() {
        let result = with_parser(|parser| parser.parse("const x = 1;", None).is_some());
        assert!(result, "Parser should successfully parse TypeScript code");
    }

    #[test]
    fn test_parser_reuse_on_same_thread() {
        let result1 = with_parser(|parser| parser.parse("let a = 1;", None).is_some());
        let result2 = with_parser(|parser| parser.parse("let b = 2;", None).is_some());
        assert!(result1 && result2, "All parses should succeed");
    }

    #[test]
    fn test_parse_produces_a_program_root() {
        let tree = parse("function f(x: string) {}").expect("parse");
        assert_eq!(tree.root_node().kind(), "program");
    }
}
