//! Opaque syntax tree and node handles (§3).

use crate::line_index::{LineIndex, Position};
use std::sync::Arc;

/// An opaque, scoped handle onto a parsed file's syntax tree.
///
/// The tree borrows nothing; it owns its source bytes via `Arc<[u8]>` so that
/// [`Node`] handles derived from it can carry a lifetime tied to `&SyntaxTree`
/// without a second allocation. Dropping the `SyntaxTree` releases the
/// underlying tree-sitter tree — there is no separate "release" call needed
/// in Rust, but [`with_tree`](crate::registry::parse) scopes its use the same
/// way the specification's `withTree` does.
pub struct SyntaxTree {
    pub(crate) inner: tree_sitter::Tree,
    pub(crate) source: Arc<[u8]>,
    pub(crate) line_index: LineIndex,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        Node {
            inner: self.inner.root_node(),
            source: &self.source,
        }
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn position_of(&self, byte_offset: usize) -> Position {
        self.line_index.position_for(byte_offset)
    }

    /// Total node count in the tree, used by the security engine to decide
    /// whether to emit the "large AST" warning (§4.7 Limits).
    pub fn node_count(&self) -> usize {
        let mut count = 0usize;
        let mut cursor = self.inner.walk();
        loop {
            count += 1;
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return count;
                }
            }
        }
    }
}

/// A node in a [`SyntaxTree`], borrowing the tree's source bytes.
///
/// Invariant: `start_byte <= end_byte <= source.len()`.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    pub(crate) inner: tree_sitter::Node<'a>,
    pub(crate) source: &'a [u8],
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    pub fn start_byte(&self) -> usize {
        self.inner.start_byte()
    }

    pub fn end_byte(&self) -> usize {
        self.inner.end_byte()
    }

    /// The node's source text, per the invariant `start_byte <= end_byte <= |content|`.
    pub fn text(&self) -> &'a str {
        std::str::from_utf8(&self.source[self.inner.start_byte()..self.inner.end_byte()])
            .unwrap_or("")
    }

    pub fn is_named(&self) -> bool {
        self.inner.is_named()
    }

    pub fn child_by_field_name(&self, field: &str) -> Option<Node<'a>> {
        self.inner.child_by_field_name(field).map(|n| Node {
            inner: n,
            source: self.source,
        })
    }

    /// This node's syntactic parent, if any — used by callers that need to
    /// find the enclosing function/statement of a matched node.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.inner.parent().map(|n| Node {
            inner: n,
            source: self.source,
        })
    }

    pub fn children(&self) -> Vec<Node<'a>> {
        let mut cursor = self.inner.walk();
        self.inner
            .children(&mut cursor)
            .map(|n| Node {
                inner: n,
                source: self.source,
            })
            .collect()
    }

    /// Whether `offset` falls within this node's byte span (inclusive), used
    /// by scope-enforcement checks (§4.7 `mustHaveBefore`).
    pub fn contains_byte_offset(&self, offset: usize) -> bool {
        offset >= self.inner.start_byte() && offset <= self.inner.end_byte()
    }
}

/// Extracts the text of a node given the file bytes, independent of any
/// particular [`SyntaxTree`] — matches the specification's free `textOf` helper.
pub fn text_of<'a>(node: &Node<'a>, bytes: &'a [u8]) -> &'a str {
    std::str::from_utf8(&bytes[node.start_byte()..node.end_byte()]).unwrap_or("")
}

/// Standalone line/column lookup given raw file bytes, for callers that have
/// not retained a [`SyntaxTree`] (e.g. regex-only fallback paths).
pub fn line_of(bytes: &[u8], offset: usize) -> Position {
    LineIndex::new(bytes).position_for(offset)
}
