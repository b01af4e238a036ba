//
// syntax.rs
//
// Generic traversal helpers over tree-sitter nodes: smallest node at a
// byte offset, ancestor climbing with a recognizer, and small accessors.
//
// Tree-sitter nodes already carry the shape the matchers need: an explicit
// kind tag, a byte range, and an ordered child list.
//

use tree_sitter::Node;

use crate::offset_range::OffsetRange;

/// Get the text content of a node.
pub fn node_text<'a>(node: Node<'_>, text: &'a str) -> &'a str {
    &text[node.byte_range()]
}

/// A node's byte span as an [`OffsetRange`].
pub fn node_range(node: Node<'_>) -> OffsetRange {
    OffsetRange::new(node.start_byte(), node.end_byte())
}

/// Whether a node spans more than one line.
pub fn is_multi_line(node: Node<'_>) -> bool {
    node.start_position().row != node.end_position().row
}

/// Find the smallest node whose span touches `pos`.
///
/// Containment is inclusive of the end offset, so a cursor sitting right
/// after a node (e.g. on a closing quote) still hits it. Descends through
/// every child whose span touches the position, keeping the deepest match;
/// among equally deep candidates the later sibling wins. Returns the node
/// itself when no child touches the position.
pub fn find_smallest_node_at(node: Node<'_>, pos: usize) -> Option<Node<'_>> {
    if !(node.start_byte() <= pos && pos <= node.end_byte()) {
        return None;
    }
    let mut result = node;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(deeper) = find_smallest_node_at(child, pos) {
            result = deeper;
        }
    }
    Some(result)
}

/// Apply `recognize` to `node` and each of its ancestors in turn, returning
/// the first defined result. A recognizer returning `None` is a plain
/// "keep climbing" signal, not a failure.
pub fn find_node_or_ancestor<'tree, T>(
    node: Node<'tree>,
    mut recognize: impl FnMut(Node<'tree>) -> Option<T>,
) -> Option<T> {
    let mut current = Some(node);
    while let Some(n) = current {
        if let Some(result) = recognize(n) {
            return Some(result);
        }
        current = n.parent();
    }
    None
}

/// First named child of `node` with the given kind.
pub fn child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Whether `outer`'s span contains `inner`'s span (or they are the same
/// node).
pub fn encloses(outer: Node<'_>, inner: Node<'_>) -> bool {
    outer.start_byte() <= inner.start_byte() && inner.end_byte() <= outer.end_byte()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_pool;

    #[test]
    fn test_smallest_node_at_identifier() {
        let text = "const abc = foo(1);";
        let tree = parser_pool::parse(text).expect("parse");
        let pos = text.find("abc").unwrap() + 1;
        let node = find_smallest_node_at(tree.root_node(), pos).expect("node");
        assert_eq!(node.kind(), "identifier");
        assert_eq!(node_text(node, text), "abc");
    }

    #[test]
    fn test_smallest_node_outside_root_span() {
        let text = "let x = 1;";
        let tree = parser_pool::parse(text).expect("parse");
        assert!(find_smallest_node_at(tree.root_node(), text.len() + 5).is_none());
    }

    #[test]
    fn test_smallest_node_inside_string_literal() {
        let text = "f('foo/bar.txt');";
        let tree = parser_pool::parse(text).expect("parse");
        let pos = text.find("bar").unwrap();
        let node = find_smallest_node_at(tree.root_node(), pos).expect("node");
        // The fragment, not the whole string node.
        assert_eq!(node.kind(), "string_fragment");
        let string_node = node.parent().expect("parent");
        assert_eq!(string_node.kind(), "string");
    }

    #[test]
    fn test_ancestor_climb_finds_call_expression() {
        let text = "f('foo');";
        let tree = parser_pool::parse(text).expect("parse");
        let pos = text.find("foo").unwrap();
        let node = find_smallest_node_at(tree.root_node(), pos).expect("node");
        let call = find_node_or_ancestor(node, |n| {
            (n.kind() == "call_expression").then_some(n)
        })
        .expect("call");
        assert_eq!(node_text(call, text), "f('foo')");
    }

    #[test]
    fn test_ancestor_climb_without_match_reaches_root() {
        let text = "let x = 1;";
        let tree = parser_pool::parse(text).expect("parse");
        let node = find_smallest_node_at(tree.root_node(), 4).expect("node");
        let none: Option<()> = find_node_or_ancestor(node, |_| None);
        assert!(none.is_none());
    }

    #[test]
    fn test_is_multi_line() {
        let text = "const o = {\n  a: 1,\n};";
        let tree = parser_pool::parse(text).expect("parse");
        let obj = find_smallest_node_at(tree.root_node(), text.find('{').unwrap())
            .and_then(|n| find_node_or_ancestor(n, |a| (a.kind() == "object").then_some(a)))
            .expect("object");
        assert!(is_multi_line(obj));
        assert!(!is_multi_line(tree.root_node().child(0).unwrap().child(0).unwrap()));
    }
}
