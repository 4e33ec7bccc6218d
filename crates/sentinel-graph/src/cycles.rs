//! Cycle detection over the module graph via Tarjan's SCC algorithm (§4.4).

use petgraph::algo::tarjan_scc;

use crate::builder::ModuleGraph;

/// One strongly connected component of size ≥ 2, canonicalized by rotating
/// its member list to start at the lexicographically smallest id so the
/// same cycle always prints the same way regardless of discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub modules: Vec<String>,
}

fn canonicalize(mut modules: Vec<String>) -> Vec<String> {
    let min_pos = modules
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    modules.rotate_left(min_pos);
    modules
}

/// Finds all cycles (SCCs of size ≥ 2) in `graph`. Self-loops cannot occur
/// here — the builder drops self-edges before they reach the graph. Runs
/// in `O(V+E)`.
pub fn find_cycles(graph: &ModuleGraph) -> Vec<Cycle> {
    let sccs = tarjan_scc(&graph.graph);

    let mut cycles: Vec<Cycle> = sccs
        .into_iter()
        .filter(|scc| scc.len() >= 2)
        .map(|scc| {
            let modules = scc
                .into_iter()
                .map(|idx| graph.node_id(idx).to_string())
                .collect();
            Cycle {
                modules: canonicalize(modules),
            }
        })
        .collect();

    cycles.sort_by(|a, b| a.modules.first().cmp(&b.modules.first()));
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_foundation::model::File;

    #[test]
    fn detects_a_two_file_cycle() {
        let files = vec![
            File::new("a.js", "javascript", "import './b';\n"),
            File::new("b.js", "javascript", "import './a';\n"),
        ];
        let (graph, _) = crate::builder::build(&files);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].modules.len(), 2);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let files = vec![
            File::new("a.js", "javascript", "import './b';\n"),
            File::new("b.js", "javascript", "export const x = 1;\n"),
        ];
        let (graph, _) = crate::builder::build(&files);
        assert!(find_cycles(&graph).is_empty());
    }

    #[test]
    fn cycle_is_canonicalized_to_start_at_smallest_id() {
        let files = vec![
            File::new("c.js", "javascript", "import './a';\n"),
            File::new("a.js", "javascript", "import './b';\n"),
            File::new("b.js", "javascript", "import './c';\n"),
        ];
        let (graph, _) = crate::builder::build(&files);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].modules[0], "a.js");
    }
}
