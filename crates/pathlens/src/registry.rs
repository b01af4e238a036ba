//
// registry.rs
//
// Base-directory registry: one pass over every document's declarations
// collects each function whose sole parameter is typed with the
// RelativeFilePath<'...'> marker alias, together with its base-directory
// template and the directory of the declaring file. Recognizers then do
// plain name lookups instead of type introspection.
//

use std::path::{Path, PathBuf};

use tree_sitter::{Node, Tree};

use crate::document_store::DocumentSnapshot;
use crate::quoted_string::ParsedString;
use crate::syntax::{child_of_kind, node_text};

/// Name of the marker type alias that brands a string parameter as a
/// relative file path.
pub const MARKER_TYPE_NAME: &str = "RelativeFilePath";

/// Placeholder token inside a base-directory template that resolves to the
/// declaring file's directory.
pub const DIR_PLACEHOLDER: &str = "$dir";

/// A function declared to take a single `RelativeFilePath<'...'>` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFnDecl {
    pub fn_name: String,
    /// The template exactly as declared, e.g. `$dir/target`.
    pub base_dir_template: String,
    /// Directory of the file containing the declaration.
    pub declaring_dir: PathBuf,
}

impl PathFnDecl {
    /// The declared template with `$dir` replaced by the declaring file's
    /// directory.
    pub fn resolved_base_path(&self) -> String {
        self.base_dir_template
            .replace(DIR_PLACEHOLDER, &self.declaring_dir.to_string_lossy())
    }
}

/// All path-function declarations visible across a set of documents.
///
/// Built fresh per query; holds no references into the documents it was
/// collected from. No ordering guarantee across entries beyond the document
/// order it was fed.
#[derive(Debug, Default)]
pub struct PathFnRegistry {
    entries: Vec<PathFnDecl>,
}

impl PathFnRegistry {
    pub fn from_entries(entries: Vec<PathFnDecl>) -> Self {
        Self { entries }
    }

    pub fn collect(documents: &[DocumentSnapshot]) -> Self {
        let mut entries = Vec::new();
        for doc in documents {
            entries.extend(collect_from_file(&doc.path, &doc.tree, &doc.text));
        }
        Self { entries }
    }

    /// Look up a function by name. With the registry standing in for the
    /// type checker, any declaration with the callee's name matches.
    pub fn lookup(&self, fn_name: &str) -> Option<&PathFnDecl> {
        self.entries.iter().find(|e| e.fn_name == fn_name)
    }

    pub fn entries(&self) -> &[PathFnDecl] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan one file's declarations for path functions.
///
/// Recognized forms: `function` declarations, overload signatures, and
/// `const`-bound arrow functions. A candidate is skipped unless it has
/// exactly one required parameter whose declared type is an instantiation
/// of the marker alias with a literal-string type argument.
pub fn collect_from_file(path: &Path, tree: &Tree, text: &str) -> Vec<PathFnDecl> {
    let declaring_dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let mut entries = Vec::new();
    visit(tree.root_node(), text, &declaring_dir, &mut entries);
    entries
}

fn visit(node: Node<'_>, text: &str, declaring_dir: &Path, entries: &mut Vec<PathFnDecl>) {
    match node.kind() {
        "function_declaration" | "function_signature" => {
            if let (Some(name), Some(params)) = (
                node.child_by_field_name("name"),
                node.child_by_field_name("parameters"),
            ) {
                if let Some(template) = template_from_parameters(params, text) {
                    entries.push(PathFnDecl {
                        fn_name: node_text(name, text).to_string(),
                        base_dir_template: template,
                        declaring_dir: declaring_dir.to_path_buf(),
                    });
                }
            }
        }
        "variable_declarator" => {
            if let (Some(name), Some(value)) = (
                node.child_by_field_name("name"),
                node.child_by_field_name("value"),
            ) {
                if name.kind() == "identifier" && value.kind() == "arrow_function" {
                    if let Some(params) = value.child_by_field_name("parameters") {
                        if let Some(template) = template_from_parameters(params, text) {
                            entries.push(PathFnDecl {
                                fn_name: node_text(name, text).to_string(),
                                base_dir_template: template,
                                declaring_dir: declaring_dir.to_path_buf(),
                            });
                        }
                    }
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, text, declaring_dir, entries);
    }
}

/// Extract the base-directory template from a formal parameter list, or
/// `None` when the list does not match the marker shape: exactly one
/// required parameter, annotated `RelativeFilePath<'...'>`.
fn template_from_parameters(params: Node<'_>, text: &str) -> Option<String> {
    let mut cursor = params.walk();
    let parameters: Vec<Node<'_>> = params
        .named_children(&mut cursor)
        .filter(|c| c.kind().ends_with("parameter"))
        .collect();
    if parameters.len() != 1 || parameters[0].kind() != "required_parameter" {
        return None;
    }

    let annotation = parameters[0].child_by_field_name("type")?;
    let ty = annotation.named_child(0)?;
    if ty.kind() != "generic_type" {
        return None;
    }

    let name = ty
        .child_by_field_name("name")
        .or_else(|| ty.named_child(0))?;
    if node_text(name, text) != MARKER_TYPE_NAME {
        return None;
    }

    let type_args = ty
        .child_by_field_name("type_arguments")
        .or_else(|| child_of_kind(ty, "type_arguments"))?;
    let literal = child_of_kind(type_args, "literal_type")?;
    let string_node = child_of_kind(literal, "string")?;
    Some(
        ParsedString::parse(node_text(string_node, text))
            .value()
            .to_string(),
    )
}
