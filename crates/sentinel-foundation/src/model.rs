//! The shared data model described in §3 of the specification.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single source file submitted for analysis.
///
/// Invariant: `path` is unique within a request; `content` is UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub path: String,
    pub language: String,
    pub content: String,
}

impl File {
    pub fn new(path: impl Into<String>, language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: normalize_language(&language.into()),
            content: content.into(),
        }
    }
}

/// Normalizes a language name/alias to its lowercase canonical form.
pub fn normalize_language(raw: &str) -> String {
    match raw.to_ascii_lowercase().as_str() {
        "golang" => "go".to_string(),
        "js" | "mjs" | "cjs" => "javascript".to_string(),
        "ts" | "tsx" => "typescript".to_string(),
        "py" | "python3" => "python".to_string(),
        other => other.to_string(),
    }
}

/// The kind of raw dependency statement a language extractor observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    Import,
    Require,
    FromImport,
    RelativeImport,
}

/// A single, unresolved import/require statement extracted from a file (§4.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from: String,
    pub to: String,
    pub kind: DependencyKind,
}

/// The kind of module a graph node represents, used by the architecture analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Component,
    Service,
    Utility,
    Test,
    Module,
}

/// A node in the module dependency graph: either a file path (JS/TS/Python)
/// or a package directory (Go), per the resolved Open Question in §12.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub id: String,
    pub lines: usize,
    pub kind: ModuleKind,
}

/// The kind of relationship a module graph edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Import,
    Extends,
    Implements,
}

/// An edge in the module dependency graph. Edges are deduplicated by
/// `(from, to, kind)`; self-edges are discarded by the graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Severity shared by architecture and security findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// The kind of architecture issue (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchIssueKind {
    Circular,
    TightCoupling,
    GodModule,
}

/// A single architecture finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchIssue {
    #[serde(rename = "type")]
    pub kind: ArchIssueKind,
    pub severity: Severity,
    pub files: Vec<String>,
    pub description: String,
    pub suggestion: String,
}

/// A single security finding produced by the rule engine (§4.7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFinding {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub file: String,
    pub line: usize,
    pub code: String,
    pub issue: String,
    pub remediation: String,
    pub auto_fixable: bool,
}

/// Union of the two finding kinds the core produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "findingType")]
pub enum Finding {
    Architecture(ArchIssue),
    Security(SecurityFinding),
}

/// An AST-level requirement attached to a [`SecurityRule`] (§4.7 step 2).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstCheck {
    /// Function names whose body is inspected for `must_have_before`.
    pub function_contains: Vec<String>,
    /// Token that must appear inside the matched function's subtree.
    pub must_have_before: Option<String>,
    /// Middleware identifiers that must be applied before every route.
    pub route_middleware: Vec<String>,
}

/// Pattern-based detection configuration for a [`SecurityRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub endpoints: Vec<String>,
    pub patterns_forbidden: Vec<String>,
    pub patterns_required: Vec<String>,
    pub required_checks: Vec<String>,
}

/// A named security rule (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub severity: Severity,
    pub detection: Detection,
    pub ast_check: Option<AstCheck>,
}

/// How confidently a framework was detected (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Express,
    Fastify,
    FastApi,
    Flask,
    Django,
    Gin,
    Rails,
    Unknown,
}

/// The result of framework detection for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDetection {
    pub framework: Framework,
    pub confidence: Confidence,
    pub evidence: Vec<String>,
}

/// The taint class a data-flow variable has been classified into (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaintClass {
    Password,
    Hash,
    UserInput,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub line: usize,
    pub value: String,
    pub source: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    Read,
    Write,
    Call,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub line: usize,
    pub context: String,
    pub target: String,
    pub kind: UsageKind,
}

/// Per-variable data-flow record, scoped to a single file analysis (§3, §4.8).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub taint_class: TaintClass,
    pub assignments: Vec<Assignment>,
    pub usages: Vec<Usage>,
}

/// LLM provider identifiers (§4.9, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Azure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Primary,
    Secondary,
}

/// Cost-optimization knobs for a stored LLM configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOpt {
    pub use_cache: bool,
    /// Clamped to [0, 8760] by the orchestrator on load.
    pub cache_ttl_hours: u32,
    pub progressive_depth: bool,
    pub max_cost_per_request: f64,
}

impl Default for CostOpt {
    fn default() -> Self {
        Self {
            use_cache: true,
            cache_ttl_hours: 24,
            progressive_depth: false,
            max_cost_per_request: 0.0,
        }
    }
}

/// A stored, per-project LLM configuration. `api_key_encrypted` never holds
/// plaintext; the orchestrator decrypts it only for the duration of a call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub id: String,
    pub project_id: String,
    pub provider: Provider,
    pub model: Option<String>,
    pub api_key_encrypted: Vec<u8>,
    pub key_type: KeyType,
    /// Azure only: explicit endpoint base URL. Never derived from `provider`/`model`
    /// (§9 design note 3 / §12 resolution 3).
    pub endpoint: Option<String>,
    pub cost_opt: CostOpt,
}

/// A single accounted LLM invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmUsage {
    pub project_id: String,
    pub provider: Provider,
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub actual_cost: f64,
    pub estimated_cost: f64,
    pub at: chrono::DateTime<chrono::Utc>,
}

/// Auditable event emitted when the orchestrator substitutes a cheaper model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsRecord {
    pub project_id: String,
    pub savings: f64,
    pub was_cap_enforced: bool,
}

/// Intent classification outcomes (§1, §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    Clear,
    LocationUnclear,
    EntityUnclear,
    ActionConfirm,
    Ambiguous,
}

/// A persisted record of an intent clarification interaction (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDecision {
    pub id: Option<String>,
    pub project_id: String,
    pub original_prompt: String,
    pub intent_type: IntentType,
    pub clarifying_question: Option<String>,
    pub user_choice: Option<String>,
    pub resolved_prompt: Option<String>,
    pub context_data: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A learned pattern derived from repeated intent decisions (§3, §4.10 step 7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentPattern {
    pub project_id: String,
    pub pattern_type: String,
    pub pattern_data: String,
    pub frequency: u32,
    pub last_used: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Append-only audit entry for LLM config changes (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigAuditEntry {
    pub project_id: String,
    pub config_id: String,
    pub action: String,
    pub changed_by: String,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub at: chrono::DateTime<chrono::Utc>,
}

/// Options accompanying an analysis request (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub rules_to_check: Option<Vec<String>>,
    pub project_root: Option<String>,
    pub thresholds: Option<Thresholds>,
}

/// Architecture analyzer thresholds (§4.5), independently configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub warning_lines: usize,
    pub critical_lines: usize,
    pub max_lines: usize,
    pub max_fan_out: usize,
    pub enforce_layering: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning_lines: 300,
            critical_lines: 500,
            max_lines: 1000,
            max_fan_out: 15,
            enforce_layering: false,
        }
    }
}

/// The full analysis request shape the request pipeline hands to the core (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub files: Vec<File>,
    pub options: AnalysisOptions,
}

/// A letter grade derived from [`security_score`](crate::model::security_grade).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

/// Implements `calculateSecurityScore` (§4.7): start at 100, subtract per
/// severity, floor at 0.
pub fn security_score(findings: &[SecurityFinding]) -> u32 {
    let mut score: i32 = 100;
    for f in findings {
        score -= match f.severity {
            Severity::Critical => 20,
            Severity::High => 10,
            Severity::Medium => 5,
            Severity::Low => 2,
            Severity::Info => 0,
        };
    }
    score.max(0) as u32
}

/// Implements the grade-cutoff and critical-finding downgrade rules of §4.7.
pub fn security_grade(findings: &[SecurityFinding]) -> Grade {
    let score = security_score(findings);
    let critical_count = findings
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .count();

    let mut grade = if score >= 90 {
        Grade::A
    } else if score >= 80 {
        Grade::B
    } else if score >= 70 {
        Grade::C
    } else if score >= 60 {
        Grade::D
    } else {
        Grade::F
    };

    if critical_count >= 3 {
        grade = Grade::F;
    } else if critical_count >= 1 && matches!(grade, Grade::A) {
        grade = Grade::B;
    }

    grade
}

/// A generic key-value bag used by context-gathering (§4.10 step 2) without
/// forcing every caller to depend on a concrete struct.
pub type JsonMap = HashMap<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity) -> SecurityFinding {
        SecurityFinding {
            rule_id: "SEC-000".into(),
            rule_name: "test".into(),
            severity,
            file: "a.py".into(),
            line: 1,
            code: "x".into(),
            issue: "y".into(),
            remediation: "z".into(),
            auto_fixable: false,
        }
    }

    #[test]
    fn score_floors_at_zero() {
        let findings: Vec<_> = (0..10).map(|_| finding(Severity::Critical)).collect();
        assert_eq!(security_score(&findings), 0);
    }

    #[test]
    fn one_critical_never_grades_above_b() {
        // A single critical subtracts 20, capping the score at 80 regardless
        // of how clean the rest of the file is, so it always lands at B or worse.
        let findings = vec![finding(Severity::Critical)];
        assert_eq!(security_grade(&findings), Grade::B);
    }

    #[test]
    fn three_criticals_force_f() {
        let findings: Vec<_> = (0..3).map(|_| finding(Severity::Critical)).collect();
        assert_eq!(security_grade(&findings), Grade::F);
    }

    #[test]
    fn normalizes_language_aliases() {
        assert_eq!(normalize_language("JS"), "javascript");
        assert_eq!(normalize_language("Golang"), "go");
        assert_eq!(normalize_language("PY"), "python");
    }
}
