//! Builds the module dependency graph from a set of files (§4.4).
//!
//! One node per file, except Go, where each **package directory** is the
//! node (§12 resolution 1). For every file: parse, extract raw
//! dependencies, resolve each against the analyzed set, and emit a
//! deduplicated edge. Parse failures degrade that file to zero edges
//! rather than aborting the whole build.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use sentinel_ast::Language;
use sentinel_foundation::model::{EdgeKind, File, ModuleEdge, ModuleKind, ModuleNode};

/// The module dependency graph: a [`DiGraph`] plus a path/package-id index.
#[derive(Debug)]
pub struct ModuleGraph {
    pub graph: DiGraph<ModuleNode, ModuleEdge>,
    pub nodes: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
    fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
        }
    }

    fn ensure_node(&mut self, id: &str, lines: usize, kind: ModuleKind) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(id) {
            // Later files contribute their line count to an existing Go
            // package node (one node aggregates every file in the dir).
            self.graph[idx].lines += lines;
            return idx;
        }
        let idx = self.graph.add_node(ModuleNode {
            id: id.to_string(),
            lines,
            kind,
        });
        self.nodes.insert(id.to_string(), idx);
        idx
    }

    pub fn node_id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].id
    }

    /// Number of modules `idx` imports (§4.5 god_module/tight_coupling checks).
    pub fn fan_out(&self, idx: NodeIndex) -> usize {
        self.graph
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .count()
    }

    /// Number of modules that import `idx` — "most-depended-upon" summaries (§11.1).
    pub fn fan_in(&self, idx: NodeIndex) -> usize {
        self.graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .count()
    }
}

/// Heuristic module classification from path segments, used by the
/// architecture analyzer's optional layering rule (§4.5).
fn classify(id: &str) -> ModuleKind {
    let lower = id.to_ascii_lowercase();
    if lower.contains("test") || lower.contains("spec") {
        ModuleKind::Test
    } else if lower.contains("util") || lower.contains("helper") {
        ModuleKind::Utility
    } else if lower.contains("service") || lower.contains("/svc/") {
        ModuleKind::Service
    } else if lower.contains("component") {
        ModuleKind::Component
    } else {
        ModuleKind::Module
    }
}

fn line_count(content: &str) -> usize {
    content.lines().count()
}

/// Builds the graph for `files`, parsing and extracting/resolving each
/// file's dependencies in turn. Returns the graph and the count of raw
/// dependency targets that could not be resolved (for metrics, §4.3).
pub fn build(files: &[File]) -> (ModuleGraph, usize) {
    let mut result = ModuleGraph::new();
    let mut unresolved = 0usize;

    let go_files: Vec<String> = files
        .iter()
        .filter(|f| f.language == "go")
        .map(|f| f.path.clone())
        .collect();
    let package_dirs = sentinel_deps::go_package_dirs(&go_files);

    let analyzed: HashSet<String> = files.iter().map(|f| f.path.clone()).collect();

    // Node per file (or per Go package dir), seeded before edges so that
    // purely-imported files with no outgoing edges still appear as nodes.
    for file in files {
        let Some(language) = Language::from_name(&file.language) else {
            continue;
        };
        let node_id = if language == Language::Go {
            sentinel_deps::go_package_dirs(&[file.path.clone()])
                .into_iter()
                .next()
                .unwrap_or_else(|| file.path.clone())
        } else {
            file.path.clone()
        };
        result.ensure_node(&node_id, line_count(&file.content), classify(&node_id));
    }

    let mut seen_edges: HashSet<(String, String, EdgeKind)> = HashSet::new();

    for file in files {
        let Some(language) = Language::from_name(&file.language) else {
            continue;
        };

        let from_id = if language == Language::Go {
            sentinel_deps::go_package_dirs(&[file.path.clone()])
                .into_iter()
                .next()
                .unwrap_or_else(|| file.path.clone())
        } else {
            file.path.clone()
        };

        let tree = match sentinel_ast::parse(language, file.content.as_bytes()) {
            Ok(tree) => tree,
            Err(_) => continue,
        };

        let raw_deps = sentinel_deps::extract(&file.path, language, &tree);

        for dep in raw_deps {
            let resolved = sentinel_deps::resolve(
                &dep.from,
                &dep.to,
                dep.kind,
                language,
                &analyzed,
                &package_dirs,
            );
            let Some(target) = resolved else {
                unresolved += 1;
                continue;
            };

            let to_id = target;

            if to_id == from_id {
                continue; // self-edges are discarded by the graph builder (§4.4)
            }

            let key = (from_id.clone(), to_id.clone(), EdgeKind::Import);
            if !seen_edges.insert(key) {
                continue;
            }

            let from_idx = result.ensure_node(&from_id, 0, classify(&from_id));
            let to_idx = result.ensure_node(&to_id, 0, classify(&to_id));
            result.graph.add_edge(
                from_idx,
                to_idx,
                ModuleEdge {
                    from: from_id.clone(),
                    to: to_id,
                    kind: EdgeKind::Import,
                },
            );
        }
    }

    (result, unresolved)
}
