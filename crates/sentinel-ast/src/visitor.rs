//! Pre-order AST traversal with skip/stop control (§4.1).

use crate::tree::Node;

/// What the walker should do after a visitor call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    /// Continue into this node's children.
    Descend,
    /// Continue the walk, but do not descend into this node's subtree.
    SkipSubtree,
    /// Abort the walk entirely.
    Stop,
}

/// A visitor callback invoked once per node in pre-order.
pub trait Visitor<'a> {
    fn visit(&mut self, node: &Node<'a>) -> VisitControl;
}

impl<'a, F> Visitor<'a> for F
where
    F: FnMut(&Node<'a>) -> VisitControl,
{
    fn visit(&mut self, node: &Node<'a>) -> VisitControl {
        self(node)
    }
}

/// Performs a pre-order walk of `node` and its descendants, calling
/// `visitor` at each step. A `SkipSubtree` result prunes that node's
/// children; a `Stop` result aborts the remainder of the walk immediately,
/// including sibling subtrees not yet visited.
pub fn visit<'a>(node: &Node<'a>, visitor: &mut dyn Visitor<'a>) {
    match visitor.visit(node) {
        VisitControl::Stop => {}
        VisitControl::SkipSubtree => {}
        VisitControl::Descend => {
            for child in node.children() {
                let mut stopped = false;
                visit_inner(&child, visitor, &mut stopped);
                if stopped {
                    break;
                }
            }
        }
    }
}

fn visit_inner<'a>(node: &Node<'a>, visitor: &mut dyn Visitor<'a>, stopped: &mut bool) {
    if *stopped {
        return;
    }
    match visitor.visit(node) {
        VisitControl::Stop => {
            *stopped = true;
        }
        VisitControl::SkipSubtree => {}
        VisitControl::Descend => {
            for child in node.children() {
                visit_inner(&child, visitor, stopped);
                if *stopped {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Language};

    #[test]
    fn skip_subtree_excludes_children_but_continues_walk() {
        let src = "function outer() { inner(); }\nfunction second() {}\n";
        let tree = parse(Language::JavaScript, src.as_bytes()).unwrap();
        let mut kinds = Vec::new();
        let mut seen_top_level_functions = 0;
        visit(&tree.root(), &mut |node: &_| {
            if node.kind() == "function_declaration" {
                seen_top_level_functions += 1;
                kinds.push(node.kind());
                return VisitControl::SkipSubtree;
            }
            VisitControl::Descend
        });
        assert_eq!(seen_top_level_functions, 2);
    }

    #[test]
    fn stop_aborts_remaining_walk() {
        let src = "function a() {}\nfunction b() {}\nfunction c() {}\n";
        let tree = parse(Language::JavaScript, src.as_bytes()).unwrap();
        let mut seen = 0;
        visit(&tree.root(), &mut |node: &_| {
            if node.kind() == "function_declaration" {
                seen += 1;
                if seen == 1 {
                    return VisitControl::Stop;
                }
            }
            VisitControl::Descend
        });
        assert_eq!(seen, 1);
    }
}
