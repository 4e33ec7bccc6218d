//! Architecture Analyzer (C6), §4.5.
//!
//! Consumes the already-built [`sentinel_graph::ModuleGraph`] and produces
//! `god_module`, `tight_coupling`, and `circular` findings against a set of
//! configurable [`Thresholds`].

use petgraph::visit::EdgeRef;
use petgraph::Direction;
use sentinel_foundation::model::{ArchIssue, ArchIssueKind, ModuleKind, Severity, Thresholds};
use sentinel_graph::ModuleGraph;

/// Runs every architecture check against `graph` and returns the combined,
/// unsorted finding list (the caller imposes the `(file, line, ruleID)`
/// ordering, which does not apply here since architecture issues carry no
/// single line — §5 Ordering guarantees).
pub fn analyze(graph: &ModuleGraph, thresholds: &Thresholds) -> Vec<ArchIssue> {
    let mut issues = Vec::new();

    for idx in graph.graph.node_indices() {
        let node = &graph.graph[idx];
        let out = graph.fan_out(idx);

        if node.lines > thresholds.max_lines {
            let severity = if out > thresholds.max_fan_out {
                Severity::Critical
            } else {
                Severity::High
            };
            issues.push(ArchIssue {
                kind: ArchIssueKind::GodModule,
                severity,
                files: vec![node.id.clone()],
                description: format!(
                    "{} has {} lines, exceeding the {}-line limit",
                    node.id, node.lines, thresholds.max_lines
                ),
                suggestion: "split this module along its distinct responsibilities".to_string(),
            });
        }

        if out > thresholds.max_fan_out {
            issues.push(ArchIssue {
                kind: ArchIssueKind::TightCoupling,
                severity: Severity::Medium,
                files: vec![node.id.clone()],
                description: format!(
                    "{} imports {} other modules, exceeding the {} fan-out limit",
                    node.id, out, thresholds.max_fan_out
                ),
                suggestion: "introduce an intermediate abstraction to reduce direct dependencies".to_string(),
            });
        }

        if thresholds.enforce_layering && node.kind == ModuleKind::Utility {
            for edge in graph.graph.edges_directed(idx, Direction::Outgoing) {
                let target = &graph.graph[edge.target()];
                if target.kind == ModuleKind::Service {
                    issues.push(ArchIssue {
                        kind: ArchIssueKind::TightCoupling,
                        severity: Severity::Medium,
                        files: vec![node.id.clone(), target.id.clone()],
                        description: format!(
                            "utility module {} imports service module {}, violating layering",
                            node.id, target.id
                        ),
                        suggestion: "utilities should not depend on service-layer modules".to_string(),
                    });
                }
            }
        }
    }

    for cycle in sentinel_graph::find_cycles(graph) {
        issues.push(ArchIssue {
            kind: ArchIssueKind::Circular,
            severity: Severity::High,
            files: cycle.modules.clone(),
            description: format!(
                "circular dependency across {} modules: {}",
                cycle.modules.len(),
                cycle.modules.join(" -> ")
            ),
            suggestion: "break the cycle by extracting the shared dependency into its own module".to_string(),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_foundation::model::File;

    #[test]
    fn flags_god_module_over_max_lines() {
        let long_body = "const x = 1;\n".repeat(1200);
        let files = vec![File::new("big.js", "javascript", &long_body)];
        let (graph, _) = sentinel_graph::build(&files);
        let issues = analyze(&graph, &Thresholds::default());
        assert!(issues.iter().any(|i| i.kind == ArchIssueKind::GodModule && i.severity == Severity::High));
    }

    #[test]
    fn flags_tight_coupling_over_max_fan_out() {
        let imports: String = (0..20).map(|i| format!("import './m{i}';\n")).collect();
        let mut files = vec![File::new("hub.js", "javascript", &imports)];
        for i in 0..20 {
            files.push(File::new(&format!("m{i}.js"), "javascript", "export const x = 1;\n"));
        }
        let (graph, _) = sentinel_graph::build(&files);
        let issues = analyze(&graph, &Thresholds::default());
        assert!(issues.iter().any(|i| i.kind == ArchIssueKind::TightCoupling));
    }

    #[test]
    fn reports_one_issue_per_cycle() {
        let files = vec![
            File::new("a.js", "javascript", "import './b';\n"),
            File::new("b.js", "javascript", "import './a';\n"),
        ];
        let (graph, _) = sentinel_graph::build(&files);
        let issues = analyze(&graph, &Thresholds::default());
        let circular: Vec<_> = issues.iter().filter(|i| i.kind == ArchIssueKind::Circular).collect();
        assert_eq!(circular.len(), 1);
    }
}
