//
// matchers.rs
//
// Declarative structural pattern recognizers over the syntax tree:
//
// 1. Path-call: a call with exactly one string-literal argument whose
//    callee resolves in the base-directory registry.
// 2. Object-shape: a generic schema matcher (named field -> recognizer)
//    for object literals, used for the { filePath: ... } and
//    { fileName, fileContent } shapes.
//
// A failed recognizer is a normal "no match", never an error; ancestor
// climbing continues past it.
//

use tree_sitter::Node;

use crate::offset_range::OffsetRange;
use crate::quoted_string::ParsedString;
use crate::registry::{PathFnDecl, PathFnRegistry};
use crate::syntax::{node_range, node_text};

/// A successfully matched path-call expression.
#[derive(Debug, Clone)]
pub struct PathCallMatch<'tree> {
    pub call_node: Node<'tree>,
    /// The string-literal argument, quotes included.
    pub literal_node: Node<'tree>,
    pub decl: PathFnDecl,
}

/// Recognize `fn_name('relative/path')` at `node`.
///
/// Requires a plain-identifier callee, exactly one argument, a string
/// literal argument, and a registry entry for the callee. Any deviation
/// yields no match.
pub fn match_path_call<'tree>(
    registry: &PathFnRegistry,
    node: Node<'tree>,
    text: &str,
) -> Option<PathCallMatch<'tree>> {
    if node.kind() != "call_expression" {
        return None;
    }
    let callee = node.child_by_field_name("function")?;
    if callee.kind() != "identifier" {
        return None;
    }
    let args = node.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let arg_nodes: Vec<Node<'_>> = args.named_children(&mut cursor).collect();
    if arg_nodes.len() != 1 || arg_nodes[0].kind() != "string" {
        return None;
    }
    let decl = registry.lookup(node_text(callee, text))?.clone();
    Some(PathCallMatch {
        call_node: node,
        literal_node: arg_nodes[0],
        decl,
    })
}

/// A matched value inside an object shape.
#[derive(Debug, Clone)]
pub enum FieldValue<'tree> {
    Str(String),
    PathCall(PathCallMatch<'tree>),
}

/// One matched named field: the property node it came from and its value.
#[derive(Debug, Clone)]
pub struct MatchedField<'tree> {
    pub name: &'static str,
    pub property_node: Node<'tree>,
    pub value: FieldValue<'tree>,
}

/// Result of matching an object literal against a schema.
#[derive(Debug, Clone)]
pub struct ObjectShapeMatch<'tree> {
    pub object_node: Node<'tree>,
    /// In schema order.
    pub fields: Vec<MatchedField<'tree>>,
    /// Span from the first to the last matched property, in schema order.
    pub replace_range: OffsetRange,
}

pub type FieldRecognizer<'r, 'tree> = &'r dyn Fn(Node<'tree>) -> Option<FieldValue<'tree>>;

/// Match an object literal against a schema of named fields.
///
/// Every schema field must be present as a direct identifier-keyed property
/// whose initializer satisfies the field's recognizer; extra properties are
/// permitted. A missing field or a failing initializer fails the whole
/// match.
pub fn match_object_shape<'tree>(
    node: Node<'tree>,
    schema: &[(&'static str, FieldRecognizer<'_, 'tree>)],
    text: &str,
) -> Option<ObjectShapeMatch<'tree>> {
    if node.kind() != "object" {
        return None;
    }

    let mut cursor = node.walk();
    let pairs: Vec<Node<'tree>> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "pair")
        .collect();

    let mut fields = Vec::with_capacity(schema.len());
    for (name, recognize) in schema {
        let pair = pairs.iter().copied().find(|p| {
            p.child_by_field_name("key")
                .map(|k| k.kind() == "property_identifier" && node_text(k, text) == *name)
                .unwrap_or(false)
        })?;
        let value_node = pair.child_by_field_name("value")?;
        let value = recognize(value_node)?;
        fields.push(MatchedField {
            name,
            property_node: pair,
            value,
        });
    }

    let replace_range = fields
        .iter()
        .map(|f| node_range(f.property_node))
        .reduce(|a, b| a.join(b))?;

    Some(ObjectShapeMatch {
        object_node: node,
        fields,
        replace_range,
    })
}

/// `{ filePath: <path-call> }`
#[derive(Debug, Clone)]
pub struct FilePathObjMatch<'tree> {
    pub object_node: Node<'tree>,
    pub path_call: PathCallMatch<'tree>,
    pub replace_range: OffsetRange,
}

pub fn match_file_path_obj<'tree>(
    registry: &PathFnRegistry,
    node: Node<'tree>,
    text: &str,
) -> Option<FilePathObjMatch<'tree>> {
    let recognize_path_call =
        |n: Node<'tree>| match_path_call(registry, n, text).map(FieldValue::PathCall);
    let schema: [(&'static str, FieldRecognizer<'_, 'tree>); 1] =
        [("filePath", &recognize_path_call)];
    let m = match_object_shape(node, &schema, text)?;
    let path_call = m.fields.into_iter().find_map(|f| match f.value {
        FieldValue::PathCall(call) => Some(call),
        FieldValue::Str(_) => None,
    })?;
    Some(FilePathObjMatch {
        object_node: m.object_node,
        path_call,
        replace_range: m.replace_range,
    })
}

/// `{ fileName: <string>, fileContent: <string> }`
#[derive(Debug, Clone)]
pub struct FileNameContentObjMatch<'tree> {
    pub object_node: Node<'tree>,
    pub file_name: String,
    pub file_content: String,
    pub replace_range: OffsetRange,
}

pub fn match_file_name_content_obj<'tree>(
    node: Node<'tree>,
    text: &str,
) -> Option<FileNameContentObjMatch<'tree>> {
    let recognize_string = |n: Node<'tree>| {
        (n.kind() == "string").then(|| {
            FieldValue::Str(ParsedString::parse(node_text(n, text)).value().to_string())
        })
    };
    let schema: [(&'static str, FieldRecognizer<'_, 'tree>); 2] = [
        ("fileName", &recognize_string),
        ("fileContent", &recognize_string),
    ];
    let m = match_object_shape(node, &schema, text)?;

    let mut file_name = None;
    let mut file_content = None;
    for field in &m.fields {
        if let FieldValue::Str(value) = &field.value {
            match field.name {
                "fileName" => file_name = Some(value.clone()),
                "fileContent" => file_content = Some(value.clone()),
                _ => {}
            }
        }
    }

    Some(FileNameContentObjMatch {
        object_node: m.object_node,
        file_name: file_name?,
        file_content: file_content?,
        replace_range: m.replace_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_pool;
    use crate::syntax::{find_node_or_ancestor, find_smallest_node_at};
    use std::path::Path;
    use tree_sitter::Tree;

    const LIB: &str = "\
type RelativeFilePath<T extends string> = string & { baseDir?: T };
function fixturesFilePath(path: RelativeFilePath<'$dir/target'>) { }
";

    fn parse_with_registry(body: &str) -> (Tree, String, PathFnRegistry) {
        let text = format!("{LIB}{body}");
        let tree = parser_pool::parse(&text).expect("parse");
        let entries =
            crate::registry::collect_from_file(Path::new("/proj/src/lib.ts"), &tree, &text);
        let registry = PathFnRegistry::from_entries(entries);
        (tree, text, registry)
    }

    fn climb_from<'t, T>(
        tree: &'t Tree,
        text: &str,
        needle: &str,
        recognize: impl FnMut(Node<'t>) -> Option<T>,
    ) -> Option<T> {
        let pos = text.rfind(needle).expect("needle present");
        let node = find_smallest_node_at(tree.root_node(), pos)?;
        find_node_or_ancestor(node, recognize)
    }

    #[test]
    fn test_path_call_matches() {
        let (tree, text, registry) = parse_with_registry("fixturesFilePath('foo/bar.txt');\n");
        let m = climb_from(&tree, &text, "bar.txt", |n| match_path_call(&registry, n, &text))
            .expect("match");
        assert_eq!(m.decl.fn_name, "fixturesFilePath");
        assert_eq!(node_text(m.literal_node, &text), "'foo/bar.txt'");
    }

    #[test]
    fn test_path_call_rejects_two_arguments() {
        let (tree, text, registry) =
            parse_with_registry("fixturesFilePath('foo.txt', 'extra');\n");
        assert!(
            climb_from(&tree, &text, "foo.txt", |n| match_path_call(&registry, n, &text)).is_none()
        );
    }

    #[test]
    fn test_path_call_rejects_non_literal_argument() {
        let (tree, text, registry) = parse_with_registry("fixturesFilePath(someVar);\n");
        assert!(
            climb_from(&tree, &text, "someVar", |n| match_path_call(&registry, n, &text)).is_none()
        );
    }

    #[test]
    fn test_path_call_rejects_unregistered_callee() {
        let (tree, text, registry) = parse_with_registry("unknownFn('foo.txt');\n");
        assert!(
            climb_from(&tree, &text, "foo.txt", |n| match_path_call(&registry, n, &text)).is_none()
        );
    }

    #[test]
    fn test_file_path_obj_matches() {
        let (tree, text, registry) = parse_with_registry(
            "const data = {\n  filePath: fixturesFilePath('foo.txt'),\n};\n",
        );
        let m = climb_from(&tree, &text, "foo.txt", |n| {
            match_file_path_obj(&registry, n, &text)
        })
        .expect("match");
        assert_eq!(m.path_call.decl.base_dir_template, "$dir/target");
        let replaced = &text[m.replace_range.start..m.replace_range.end_exclusive];
        assert_eq!(replaced, "filePath: fixturesFilePath('foo.txt')");
    }

    #[test]
    fn test_name_content_obj_matches_with_extra_fields() {
        let (tree, text, _registry) = parse_with_registry(
            "const data = {\n  other: 1,\n  fileName: 'foo.txt',\n  fileContent: 'bar',\n};\n",
        );
        let m = climb_from(&tree, &text, "'bar'", |n| match_file_name_content_obj(n, &text))
            .expect("match");
        assert_eq!(m.file_name, "foo.txt");
        assert_eq!(m.file_content, "bar");
        let replaced = &text[m.replace_range.start..m.replace_range.end_exclusive];
        assert_eq!(replaced, "fileName: 'foo.txt',\n  fileContent: 'bar'");
    }

    #[test]
    fn test_name_content_obj_rejects_missing_field() {
        let (tree, text, _registry) =
            parse_with_registry("const data = {\n  fileName: 'foo.txt',\n};\n");
        assert!(
            climb_from(&tree, &text, "foo.txt", |n| match_file_name_content_obj(n, &text))
                .is_none()
        );
    }

    #[test]
    fn test_name_content_obj_rejects_non_string_initializer() {
        let (tree, text, _registry) = parse_with_registry(
            "const data = {\n  fileName: 'foo.txt',\n  fileContent: 42,\n};\n",
        );
        assert!(
            climb_from(&tree, &text, "foo.txt", |n| match_file_name_content_obj(n, &text))
                .is_none()
        );
    }
}
