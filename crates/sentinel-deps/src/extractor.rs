//! Per-language dependency extraction (§4.2).
//!
//! Extraction is purely syntactic — it returns the raw import/require
//! target strings observed in a file, with no attempt at resolving them
//! against other files. [`crate::resolver`] does that.

use sentinel_ast::{Language, Node, SyntaxTree};
use sentinel_foundation::model::{Dependency, DependencyKind};

/// Extracts the raw dependencies of one file, given its already-parsed tree.
pub fn extract(from: &str, language: Language, tree: &SyntaxTree) -> Vec<Dependency> {
    match language {
        Language::Go => extract_go(from, tree),
        Language::JavaScript | Language::TypeScript => extract_js(from, tree),
        Language::Python => extract_python(from, tree),
    }
}

/// Strips a single layer of matching quotes (`"`, `'`, or `` ` ``) from `s`.
fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\'', '`'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn walk_collect(node: &Node, out: &mut Vec<Node>, matches: impl Fn(&Node) -> bool + Copy) {
    if matches(node) {
        out.push(*node);
    }
    for child in node.children() {
        walk_collect(&child, out, matches);
    }
}

fn nodes_of_kind<'a>(root: &Node<'a>, kind: &'static str) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    walk_collect(root, &mut out, |n| n.kind() == kind);
    out
}

fn extract_go(from: &str, tree: &SyntaxTree) -> Vec<Dependency> {
    nodes_of_kind(&tree.root(), "import_spec")
        .into_iter()
        .filter_map(|spec| {
            let path = spec.child_by_field_name("path")?;
            Some(Dependency {
                from: from.to_string(),
                to: strip_quotes(path.text()).to_string(),
                kind: DependencyKind::Import,
            })
        })
        .collect()
}

fn extract_js(from: &str, tree: &SyntaxTree) -> Vec<Dependency> {
    let mut deps = Vec::new();

    for stmt in nodes_of_kind(&tree.root(), "import_statement") {
        if let Some(source) = stmt.child_by_field_name("source") {
            deps.push(Dependency {
                from: from.to_string(),
                to: strip_quotes(source.text()).to_string(),
                kind: DependencyKind::Import,
            });
        }
    }

    for call in nodes_of_kind(&tree.root(), "call_expression") {
        let Some(function) = call.child_by_field_name("function") else {
            continue;
        };
        let callee = function.text();
        let is_require = callee == "require";
        let is_dynamic_import = callee == "import";
        if !is_require && !is_dynamic_import {
            continue;
        }
        let Some(arguments) = call.child_by_field_name("arguments") else {
            continue;
        };
        let Some(first_arg) = arguments.children().into_iter().find(|c| c.is_named()) else {
            continue;
        };
        if first_arg.kind() != "string" {
            continue;
        }
        deps.push(Dependency {
            from: from.to_string(),
            to: strip_quotes(first_arg.text()).to_string(),
            kind: if is_require {
                DependencyKind::Require
            } else {
                DependencyKind::Import
            },
        });
    }

    deps
}

fn extract_python(from: &str, tree: &SyntaxTree) -> Vec<Dependency> {
    let mut deps = Vec::new();

    for stmt in nodes_of_kind(&tree.root(), "import_statement") {
        for child in stmt.children() {
            let name = match child.kind() {
                "dotted_name" => child.text().to_string(),
                "aliased_import" => child
                    .child_by_field_name("name")
                    .map(|n| n.text().to_string())
                    .unwrap_or_default(),
                _ => continue,
            };
            if name.is_empty() {
                continue;
            }
            deps.push(Dependency {
                from: from.to_string(),
                to: name,
                kind: DependencyKind::Import,
            });
        }
    }

    for stmt in nodes_of_kind(&tree.root(), "import_from_statement") {
        if let Some(module) = stmt.child_by_field_name("module_name") {
            if module.kind() == "relative_import" {
                deps.push(Dependency {
                    from: from.to_string(),
                    to: module.text().to_string(),
                    kind: DependencyKind::RelativeImport,
                });
            } else {
                deps.push(Dependency {
                    from: from.to_string(),
                    to: module.text().to_string(),
                    kind: DependencyKind::FromImport,
                });
            }
            continue;
        }
        // Fallback: grammars that expose the relative-dots prefix as a
        // sibling token rather than inside a `relative_import` wrapper.
        let dots: String = stmt
            .children()
            .iter()
            .filter(|c| c.kind() == "import_prefix" || c.kind() == ".")
            .map(|c| c.text())
            .collect();
        if !dots.is_empty() {
            let tail = stmt
                .children()
                .into_iter()
                .find(|c| c.kind() == "dotted_name")
                .map(|n| n.text().to_string())
                .unwrap_or_default();
            deps.push(Dependency {
                from: from.to_string(),
                to: format!("{dots}{tail}"),
                kind: DependencyKind::RelativeImport,
            });
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_ast::parse;

    #[test]
    fn extracts_go_import_specs() {
        let src = b"package main\n\nimport (\n\t\"fmt\"\n\t\"os/exec\"\n)\n";
        let tree = parse(Language::Go, src).unwrap();
        let deps = extract("main.go", Language::Go, &tree);
        let targets: Vec<_> = deps.iter().map(|d| d.to.as_str()).collect();
        assert_eq!(targets, vec!["fmt", "os/exec"]);
    }

    #[test]
    fn extracts_js_import_and_require_and_dynamic_import() {
        let src = b"import x from \"./x\";\nconst y = require(\"y-pkg\");\nimport(\"./lazy\");\n";
        let tree = parse(Language::JavaScript, src).unwrap();
        let deps = extract("a.js", Language::JavaScript, &tree);
        assert!(deps.iter().any(|d| d.to == "./x" && d.kind == DependencyKind::Import));
        assert!(deps.iter().any(|d| d.to == "y-pkg" && d.kind == DependencyKind::Require));
        assert!(deps.iter().any(|d| d.to == "./lazy" && d.kind == DependencyKind::Import));
    }

    #[test]
    fn extracts_python_dotted_and_relative_imports() {
        let src = b"import a.b\nfrom a.b import c\nfrom . import x\n";
        let tree = parse(Language::Python, src).unwrap();
        let deps = extract("m.py", Language::Python, &tree);
        assert!(deps.iter().any(|d| d.to == "a.b" && d.kind == DependencyKind::Import));
        assert!(deps.iter().any(|d| d.to == "a.b" && d.kind == DependencyKind::FromImport));
        assert!(deps.iter().any(|d| d.kind == DependencyKind::RelativeImport));
    }
}
