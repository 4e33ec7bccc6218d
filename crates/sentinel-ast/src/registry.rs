//! Parser registry: turns source bytes into a [`SyntaxTree`] (§4.1).
//!
//! Tree-sitter parsers are not `Send`, so each thread keeps its own small pool
//! (one [`tree_sitter::Parser`] per [`Language`]) instead of constructing one
//! on every call. A parse failure never panics the caller; it yields
//! [`SentinelError::ParseFailure`] so the caller can fall back to regex-only
//! analysis (§4.7).

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use sentinel_foundation::error::SentinelError;
use tree_sitter::Parser;

use crate::language::Language;
use crate::line_index::LineIndex;
use crate::tree::SyntaxTree;

thread_local! {
    static PARSERS: RefCell<HashMap<&'static str, Parser>> = RefCell::new(HashMap::new());
}

/// Parses `bytes` as `language`, returning an opaque [`SyntaxTree`].
///
/// A tree-sitter parse that produces a tree with an error node is not treated
/// as failure here — callers that care about partial/malformed input should
/// inspect `tree.root()` themselves. Failure is reserved for the parser
/// genuinely refusing to run (grammar/language mismatch).
pub fn parse(language: Language, bytes: &[u8]) -> Result<SyntaxTree, SentinelError> {
    PARSERS.with(|cell| {
        let mut parsers = cell.borrow_mut();
        let parser = parsers.entry(language.canonical_name()).or_insert_with(|| {
            let mut p = Parser::new();
            p.set_language(&language.grammar())
                .expect("bundled grammar is always compatible with its tree-sitter ABI");
            p
        });

        let tree = parser.parse(bytes, None).ok_or_else(|| SentinelError::ParseFailure {
            language: language.canonical_name().to_string(),
            message: "tree-sitter returned no tree (parser cancelled or timed out)".to_string(),
        })?;

        Ok(SyntaxTree {
            inner: tree,
            source: Arc::from(bytes),
            line_index: LineIndex::new(bytes),
        })
    })
}
