// lib.rs — crate root; the binary entry point lives in main.rs.
//
// Core layers, leaves first: offset_range -> quoted_string/path_segments
// -> syntax/registry -> matchers -> path_expression -> service -> tunnel.
// The backend module wires the tunnel into a tower-lsp server.

pub mod backend;
pub mod document_store;
pub mod matchers;
pub mod offset_range;
pub mod parser_pool;
pub mod path_expression;
pub mod path_segments;
pub mod quoted_string;
pub mod registry;
pub mod service;
pub mod state;
pub mod syntax;
pub mod tunnel;
pub mod utf16;
