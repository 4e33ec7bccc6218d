//! Wires C1-C9 together into the two request-pipeline entry points (§2
//! control flow, §5 scheduling): `analyze_request` (full architecture +
//! security pass) and `analyze_architecture` (graph/architecture only,
//! exposed as a plain internal API per §12 resolution 4).

use std::time::Instant;

use rayon::prelude::*;
use sentinel_ast::Language;
use sentinel_foundation::model::{AnalysisRequest, File, Finding, Grade, SecurityFinding, Thresholds};
use sentinel_security::{detect_framework, rules::default_rules, SecurityEngine};
use tokio_util::sync::CancellationToken;

use crate::summary::{summarize, Summary};

pub struct AnalysisResult {
    pub findings: Vec<Finding>,
    pub security_score: u32,
    pub security_grade: Grade,
    pub summary: Summary,
}

fn per_file_security_findings(file: &File, engine: &SecurityEngine) -> Vec<SecurityFinding> {
    let rules = default_rules();
    let detection = detect_framework(&file.content);
    tracing::debug!(file = %file.path, framework = ?detection.framework, confidence = ?detection.confidence, "framework detected");

    let tree = Language::from_name(&file.language).and_then(|language| sentinel_ast::parse(language, file.content.as_bytes()).ok());
    engine.evaluate(file, tree.as_ref(), detection.framework, &rules)
}

/// Runs the graph/cycle/architecture phases only, without the security
/// engine. This is the function §9 design note 4 says should exist as an
/// internal API even though no HTTP route calls it directly.
pub fn analyze_architecture(files: &[File], thresholds: &Thresholds) -> (Vec<Finding>, Summary) {
    let started = Instant::now();

    let (graph, unresolved_imports) = sentinel_graph::build(files);
    let cycles = sentinel_graph::find_cycles(&graph);
    let issues = sentinel_arch::analyze(&graph, thresholds);

    let summary = summarize(files.len(), &cycles, unresolved_imports, started.elapsed().as_millis() as u64);
    let findings = issues.into_iter().map(Finding::Architecture).collect();
    (findings, summary)
}

/// Runs the full pipeline: per-file security evaluation (parallelized over
/// a work-stealing pool) followed by the single-threaded cross-file graph
/// and architecture phases, combined into one deterministically ordered
/// finding list (§5 Ordering guarantees).
///
/// `cancellation` is checked between each per-file task and before each
/// cross-file phase; a cancelled token aborts the remaining per-file work
/// and returns whatever was computed up to that point.
pub fn analyze_request(request: &AnalysisRequest, cancellation: &CancellationToken) -> AnalysisResult {
    let started = Instant::now();
    let span = tracing::info_span!("analyze_request", files = request.files.len());
    let _enter = span.enter();

    let thresholds = request.options.thresholds.unwrap_or_default();
    let rules_filter = request.options.rules_to_check.as_ref();

    let engine = SecurityEngine::new();
    let security_findings: Vec<SecurityFinding> = request
        .files
        .par_iter()
        .take_while(|_| !cancellation.is_cancelled())
        .flat_map(|file| per_file_security_findings(file, &engine))
        .filter(|finding| rules_filter.map(|ids| ids.iter().any(|id| id == &finding.rule_id)).unwrap_or(true))
        .collect();

    if cancellation.is_cancelled() {
        tracing::warn!("analysis cancelled before cross-file phases ran");
        return AnalysisResult {
            findings: security_findings.into_iter().map(Finding::Security).collect(),
            security_score: 0,
            security_grade: Grade::F,
            summary: summarize(0, &[], 0, started.elapsed().as_millis() as u64),
        };
    }

    let (arch_findings, summary) = analyze_architecture(&request.files, &thresholds);

    let security_score = sentinel_foundation::model::security_score(&security_findings);
    let security_grade = sentinel_foundation::model::security_grade(&security_findings);

    let mut findings: Vec<Finding> = security_findings.into_iter().map(Finding::Security).chain(arch_findings).collect();
    findings.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

    AnalysisResult {
        findings,
        security_score,
        security_grade,
        summary,
    }
}

/// `(file, line, ruleID)` per §5/§8. Architecture issues have no single
/// line or rule id; they sort after every security finding in the same
/// file, keyed by their first affected file and issue kind name.
fn sort_key(finding: &Finding) -> (String, usize, String) {
    match finding {
        Finding::Security(f) => (f.file.clone(), f.line, f.rule_id.clone()),
        Finding::Architecture(issue) => (
            issue.files.first().cloned().unwrap_or_default(),
            usize::MAX,
            format!("{:?}", issue.kind),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_foundation::model::AnalysisOptions;

    fn request(files: Vec<File>) -> AnalysisRequest {
        AnalysisRequest {
            files,
            options: AnalysisOptions::default(),
        }
    }

    #[test]
    fn js_cycle_produces_one_circular_finding() {
        let files = vec![
            File::new("a.js", "javascript", "import './b';\n"),
            File::new("b.js", "javascript", "import './a';\n"),
        ];
        let req = request(files);
        let token = CancellationToken::new();
        let result = analyze_request(&req, &token);

        let circular_count = result
            .findings
            .iter()
            .filter(|f| matches!(f, Finding::Architecture(issue) if matches!(issue.kind, sentinel_foundation::model::ArchIssueKind::Circular)))
            .count();
        assert_eq!(circular_count, 1);
        assert_eq!(result.summary.total_cycles, 1);
    }

    #[test]
    fn findings_are_sorted_by_file_then_line_then_rule_id() {
        let files = vec![File::new(
            "app.js",
            "javascript",
            "const password = \"hardcoded-secret-value\";\nconst apiKey = \"sk-another-secret-012345\";\n",
        )];
        let req = request(files);
        let token = CancellationToken::new();
        let result = analyze_request(&req, &token);

        let lines: Vec<usize> = result
            .findings
            .iter()
            .filter_map(|f| match f {
                Finding::Security(s) => Some(s.line),
                _ => None,
            })
            .collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }

    #[test]
    fn cancelled_token_short_circuits_before_cross_file_phases() {
        let files = vec![File::new("a.js", "javascript", "import './b';\n")];
        let req = request(files);
        let token = CancellationToken::new();
        token.cancel();
        let result = analyze_request(&req, &token);
        assert_eq!(result.summary.files_analyzed, 0);
    }

    #[test]
    fn rules_to_check_filters_out_other_rule_ids() {
        let files = vec![File::new(
            "app.js",
            "javascript",
            "const password = \"hardcoded-secret-value\";\n",
        )];
        let mut req = request(files);
        req.options.rules_to_check = Some(vec!["SEC-999".to_string()]);
        let token = CancellationToken::new();
        let result = analyze_request(&req, &token);
        assert!(result.findings.iter().all(|f| !matches!(f, Finding::Security(s) if s.rule_id == "SEC-001")));
    }
}
