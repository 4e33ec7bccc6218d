//! A timing/count envelope for graph and architecture results (§11.5),
//! grounded in the circular-dependency analyzer's `Summary` shape.

use sentinel_graph::Cycle;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Summary {
    pub files_analyzed: usize,
    pub total_cycles: usize,
    pub total_modules_in_cycles: usize,
    pub largest_cycle_size: usize,
    pub unresolved_imports: usize,
    pub analysis_time_ms: u64,
}

pub fn summarize(files_analyzed: usize, cycles: &[Cycle], unresolved_imports: usize, analysis_time_ms: u64) -> Summary {
    let total_modules_in_cycles: usize = cycles.iter().map(|c| c.modules.len()).sum();
    let largest_cycle_size = cycles.iter().map(|c| c.modules.len()).max().unwrap_or(0);

    Summary {
        files_analyzed,
        total_cycles: cycles.len(),
        total_modules_in_cycles,
        largest_cycle_size,
        unresolved_imports,
        analysis_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_cycle_counts() {
        let cycles = vec![
            Cycle {
                modules: vec!["a.js".to_string(), "b.js".to_string()],
            },
            Cycle {
                modules: vec!["c.js".to_string(), "d.js".to_string(), "e.js".to_string()],
            },
        ];
        let summary = summarize(5, &cycles, 1, 42);
        assert_eq!(summary.total_cycles, 2);
        assert_eq!(summary.total_modules_in_cycles, 5);
        assert_eq!(summary.largest_cycle_size, 3);
    }
}
