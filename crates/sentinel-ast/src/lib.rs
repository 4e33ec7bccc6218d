//! Parser Registry (C1) and AST Traversal & Queries (C2), §4.1.
//!
//! Exposes [`parse`] for turning source bytes into an opaque [`SyntaxTree`],
//! and [`visit`] for a pre-order walk with skip/stop control. Line/column
//! lookups go through a per-file [`LineIndex`] cached on the tree so repeated
//! lookups are `O(log n)` rather than re-scanning the file each time.

mod language;
mod line_index;
mod registry;
mod tree;
mod visitor;

pub use language::Language;
pub use line_index::{LineIndex, Position};
pub use registry::parse;
pub use tree::{line_of, text_of, Node, SyntaxTree};
pub use visitor::{visit, VisitControl, Visitor};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_visits_each_supported_language() {
        let cases = [
            (Language::Go, "package main\nfunc main() {}\n"),
            (Language::JavaScript, "function main() {}\n"),
            (Language::TypeScript, "function main(): void {}\n"),
            (Language::Python, "def main():\n    pass\n"),
        ];

        for (lang, src) in cases {
            let tree = parse(lang, src.as_bytes()).expect("parse should succeed");
            let mut count = 0usize;
            visit(&tree.root(), &mut |_node| {
                count += 1;
                VisitControl::Descend
            });
            assert!(count > 1, "{lang:?} tree should have more than one node");
        }
    }
}
