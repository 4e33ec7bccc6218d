//! Security Rule Engine (C8), §4.7.
//!
//! Evaluation order per rule: forbidden-pattern pass, then AST pass (if the
//! rule has an `ast_check`), then rule-specific extensions. Results are
//! deduplicated and cached.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use sentinel_ast::{Node, SyntaxTree};
use sentinel_foundation::model::{File, Framework, SecurityFinding, SecurityRule, Severity};

use crate::cache::SecurityCache;
use crate::dataflow;

const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
const MAX_AST_NODES: usize = 100_000;

const FUNCTION_KINDS: &[&str] = &["function_declaration", "method_definition", "function_definition"];

static ROUTE_PATTERNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:app|router)\.(?:get|post|put|delete|patch|GET|POST|PUT|DELETE|PATCH)\s*\(|@app\.(?:get|post|put|delete|patch)\b")
        .expect("static regex is valid")
});

/// The Security Rule Engine, wrapping a process-local result cache.
pub struct SecurityEngine {
    cache: SecurityCache,
}

impl SecurityEngine {
    pub fn new() -> Self {
        Self {
            cache: SecurityCache::new(),
        }
    }

    /// Evaluates `rules` against `file`, using `tree` for AST-based checks
    /// when available. A `None` tree degrades every AST-based rule to
    /// forbidden/required pattern matching only (§4.7 "If parsing failed").
    /// `framework` gates the `route_middleware` check (§4.6): it only fires
    /// when a framework was actually detected.
    pub fn evaluate(&self, file: &File, tree: Option<&SyntaxTree>, framework: Framework, rules: &[SecurityRule]) -> Vec<SecurityFinding> {
        if file.content.len() > MAX_FILE_BYTES {
            return vec![info_finding(file, "analysis skipped: file exceeds 10 MiB limit")];
        }

        let rule_ids: Vec<String> = rules.iter().map(|r| r.id.clone()).collect();
        let key = SecurityCache::key(&file.content, &file.language, &rule_ids);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let mut findings = Vec::new();
        for rule in rules {
            evaluate_rule(rule, file, tree, framework, &mut findings);
        }

        if let Some(tree) = tree {
            if tree.node_count() > MAX_AST_NODES {
                findings.push(info_finding(file, "large AST (>100,000 nodes); analysis proceeded without truncation"));
            }
        }

        dedup(&mut findings);
        self.cache.put(key, findings.clone());
        findings
    }
}

impl Default for SecurityEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn dedup(findings: &mut Vec<SecurityFinding>) {
    let mut seen = HashSet::new();
    findings.retain(|f| seen.insert((f.rule_id.clone(), f.file.clone(), f.line, f.issue.clone())));
}

fn info_finding(file: &File, message: &str) -> SecurityFinding {
    SecurityFinding {
        rule_id: "ENGINE".to_string(),
        rule_name: "engine notice".to_string(),
        severity: Severity::Info,
        file: file.path.clone(),
        line: 0,
        code: String::new(),
        issue: message.to_string(),
        remediation: String::new(),
        auto_fixable: false,
    }
}

fn finding_for(rule: &SecurityRule, file: &File, line: usize, code: &str, issue: String) -> SecurityFinding {
    SecurityFinding {
        rule_id: rule.id.clone(),
        rule_name: rule.name.clone(),
        severity: rule.severity,
        file: file.path.clone(),
        line,
        code: code.trim().to_string(),
        issue,
        remediation: remediation_for(&rule.id),
        auto_fixable: false,
    }
}

fn remediation_for(rule_id: &str) -> String {
    match rule_id {
        "SEC-001" => "move secrets to environment variables or a secrets manager".to_string(),
        "SEC-002" => "use parameterized queries or an ORM query builder".to_string(),
        "SEC-003" => "apply the authentication middleware before this route is registered".to_string(),
        "SEC-004" => "validate/sanitize the request body before use".to_string(),
        "SEC-005" => "hash passwords with bcrypt, argon2, scrypt, or pbkdf2".to_string(),
        _ => "review and remediate the flagged code".to_string(),
    }
}

fn evaluate_rule(rule: &SecurityRule, file: &File, tree: Option<&SyntaxTree>, framework: Framework, findings: &mut Vec<SecurityFinding>) {
    let mut forbidden_hit = false;

    for pattern in &rule.detection.patterns_forbidden {
        let Ok(re) = Regex::new(pattern) else { continue };
        for (idx, line) in file.content.lines().enumerate() {
            if re.is_match(line) {
                forbidden_hit = true;
                findings.push(finding_for(rule, file, idx + 1, line, format!("forbidden pattern matched by rule {}", rule.id)));
            }
        }
    }

    if let Some(ast_check) = &rule.ast_check {
        if let Some(tree) = tree {
            findings.extend(run_function_contains(rule, ast_check, file, tree));
        }
        // No tree: function_contains is skipped (§4.7 degraded mode).

        if framework != Framework::Unknown {
            findings.extend(run_route_middleware(rule, ast_check, file));
        }
    }

    if rule.rule_type == "password_hashing" {
        let vars = dataflow::analyze_variables(&file.content);
        for f in dataflow::find_insecure_password_handling(&vars) {
            findings.push(finding_for(rule, file, f.line, &f.code, f.issue));
        }
    }

    if rule.rule_type == "input_validation" && !forbidden_hit {
        let satisfied = rule
            .detection
            .patterns_required
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .any(|re| re.is_match(&file.content));
        if !satisfied {
            if let Some((line_no, code)) = find_handler_with_body_param(&file.content) {
                findings.push(finding_for(
                    rule,
                    file,
                    line_no,
                    &code,
                    "handler accepts a request body without validating/sanitizing it".to_string(),
                ));
            }
        }
    }
}

fn is_function_node(n: &Node) -> bool {
    FUNCTION_KINDS.contains(&n.kind())
}

fn node_name(n: &Node) -> Option<String> {
    n.child_by_field_name("name").map(|c| c.text().to_string())
}

fn walk_collect<'a>(node: &Node<'a>, out: &mut Vec<Node<'a>>) {
    out.push(*node);
    for child in node.children() {
        walk_collect(&child, out);
    }
}

fn find_enclosing_function<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    let mut cursor = node.parent();
    while let Some(n) = cursor {
        if is_function_node(&n) {
            return Some(n);
        }
        cursor = n.parent();
    }
    None
}

/// `functionContains` check (§4.7 step 2): a listed function name matched as
/// either a declaration or a call must have `must_have_before` present
/// somewhere in its enclosing function's subtree.
fn run_function_contains(rule: &SecurityRule, ast_check: &sentinel_foundation::model::AstCheck, file: &File, tree: &SyntaxTree) -> Vec<SecurityFinding> {
    let Some(required) = &ast_check.must_have_before else {
        return Vec::new();
    };
    if ast_check.function_contains.is_empty() {
        return Vec::new();
    }

    let mut all_nodes = Vec::new();
    walk_collect(&tree.root(), &mut all_nodes);

    let mut out = Vec::new();
    let mut seen_scopes = HashSet::new();

    for name in &ast_check.function_contains {
        for node in &all_nodes {
            let matches = (is_function_node(node) && node_name(node).as_deref() == Some(name.as_str()))
                || (node.kind() == "call_expression"
                    && node
                        .child_by_field_name("function")
                        .map(|f| f.text() == name.as_str())
                        .unwrap_or(false));
            if !matches {
                continue;
            }

            let scope = if is_function_node(node) {
                *node
            } else {
                find_enclosing_function(node).unwrap_or(*node)
            };

            if !seen_scopes.insert(scope.start_byte()) {
                continue;
            }

            if !scope.text().contains(required.as_str()) {
                let pos = tree.position_of(node.start_byte());
                out.push(finding_for(
                    rule,
                    file,
                    pos.line,
                    node.text(),
                    format!("'{name}' is used without '{required}' present in its scope"),
                ));
            }
        }
    }

    out
}

/// `routeMiddleware` check (§4.7 step 2): the named middleware must be
/// applied via a `use`/`Use`/`middleware`/`Depends` call before every route
/// definition's text offset. Offset-based, so it applies identically
/// whether or not a tree is available.
fn run_route_middleware(rule: &SecurityRule, ast_check: &sentinel_foundation::model::AstCheck, file: &File) -> Vec<SecurityFinding> {
    if ast_check.route_middleware.is_empty() {
        return Vec::new();
    }

    let names_alt = ast_check
        .route_middleware
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(middleware_re) = Regex::new(&format!(
        r"(?:\.use|\.Use|\.middleware|\bDepends)\s*\([^)]*\b(?:{names_alt})\b"
    )) else {
        return Vec::new();
    };

    let middleware_offset = middleware_re.find(&file.content).map(|m| m.start());

    let mut out = Vec::new();
    for route_match in ROUTE_PATTERNS.find_iter(&file.content) {
        let route_offset = route_match.start();
        let applied_before = middleware_offset.is_some_and(|mw| mw < route_offset);
        if applied_before {
            continue;
        }
        let line_no = sentinel_ast::line_of(file.content.as_bytes(), route_offset).line;
        let code_line = file.content.lines().nth(line_no.saturating_sub(1)).unwrap_or_default();
        out.push(finding_for(
            rule,
            file,
            line_no,
            code_line,
            "route defined before required auth middleware was applied".to_string(),
        ));
    }
    out
}

/// Finds the first handler-like function that declares a `req`/`body`-style
/// parameter, for the `input_validation` rule's required-pattern-in-scope
/// check (§4.7 step 3). Regex-based so it still applies when parsing failed.
fn find_handler_with_body_param(content: &str) -> Option<(usize, String)> {
    static HANDLER_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)function\s+\w*\s*\([^)]*\b(?:req|request|body)\b[^)]*\)").expect("static regex is valid"));
    let m = HANDLER_RE.find(content)?;
    let line_no = sentinel_ast::line_of(content.as_bytes(), m.start()).line;
    let code = content.lines().nth(line_no.saturating_sub(1))?.to_string();
    Some((line_no, code))
}
