//! Data-Flow Analyzer (C9), §4.8.
//!
//! Conservative, flow-insensitive, intra-file only: it tracks variables by
//! name across simple assignment statements and never follows a value
//! across function boundaries.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use sentinel_foundation::model::{Assignment, TaintClass, Usage, UsageKind, VariableInfo};

static ASSIGNMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:const|let|var)?\s*(?:self\.)?([A-Za-z_]\w*)\s*=\s*([^=].*?);?\s*$").expect("static regex is valid"));

static INSECURE_HASH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bmd5\b|\bsha1\b|createHash\(\s*["'](?:md5|sha1)["']\s*\)|hashlib\.(?:md5|sha1)"#)
        .expect("static regex is valid")
});

static SECURE_HASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:bcrypt|argon2|scrypt|pbkdf2)\b").expect("static regex is valid"));

static USER_INPUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"req\.body|req\.query|req\.params|request\.\w+|form\[|body\["#).expect("static regex is valid")
});

fn classify(name: &str) -> TaintClass {
    let lower = name.to_ascii_lowercase();
    if lower.contains("password") || lower.contains("passwd") || lower.contains("pwd") {
        TaintClass::Password
    } else {
        TaintClass::Other
    }
}

/// Builds the `name -> VariableInfo` map for `content` (§4.8).
pub fn analyze_variables(content: &str) -> HashMap<String, VariableInfo> {
    let mut vars: HashMap<String, VariableInfo> = HashMap::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let Some(caps) = ASSIGNMENT_RE.captures(line) else {
            continue;
        };
        let name = caps.get(1).unwrap().as_str().to_string();
        let value = caps.get(2).unwrap().as_str().to_string();

        let entry = vars.entry(name.clone()).or_insert_with(|| VariableInfo {
            name: name.clone(),
            taint_class: classify(&name),
            assignments: Vec::new(),
            usages: Vec::new(),
        });
        entry.assignments.push(Assignment {
            line: line_no,
            value: value.clone(),
            source: line.trim().to_string(),
            context: String::new(),
        });
    }

    // A lightweight read/call usage pass: any later occurrence of a known
    // variable name that isn't itself an assignment line.
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if ASSIGNMENT_RE.is_match(line) {
            continue;
        }
        for (name, info) in vars.iter_mut() {
            if !line.contains(name.as_str()) {
                continue;
            }
            let kind = if line.contains(&format!("{name}(")) {
                UsageKind::Call
            } else {
                UsageKind::Read
            };
            info.usages.push(Usage {
                line: line_no,
                context: line.trim().to_string(),
                target: name.clone(),
                kind,
            });
        }
    }

    vars
}

/// A single insecure-password-handling finding, pre-`SecurityFinding`
/// shape: `(line, code, issue)`. The caller (engine) wraps this into a
/// full [`sentinel_foundation::model::SecurityFinding`] with rule metadata.
pub struct PasswordFlowFinding {
    pub line: usize,
    pub code: String,
    pub issue: String,
}

/// Applies the §4.8 password rule to each `password`-classified variable.
pub fn find_insecure_password_handling(vars: &HashMap<String, VariableInfo>) -> Vec<PasswordFlowFinding> {
    let mut findings = Vec::new();

    for info in vars.values() {
        if info.taint_class != TaintClass::Password {
            continue;
        }

        let insecure_assignment = info
            .assignments
            .iter()
            .find(|a| INSECURE_HASH_RE.is_match(&a.source) && a.source.contains(&info.name));
        if let Some(a) = insecure_assignment {
            findings.push(PasswordFlowFinding {
                line: a.line,
                code: a.source.clone(),
                issue: format!("'{}' is hashed with a broken algorithm (md5/sha1)", info.name),
            });
            continue;
        }

        let has_user_input = info.assignments.iter().any(|a| USER_INPUT_RE.is_match(&a.source));
        let has_secure_hash = info.assignments.iter().any(|a| SECURE_HASH_RE.is_match(&a.source));
        if has_user_input && !has_secure_hash {
            if let Some(a) = info.assignments.iter().find(|a| USER_INPUT_RE.is_match(&a.source)) {
                findings.push(PasswordFlowFinding {
                    line: a.line,
                    code: a.source.clone(),
                    issue: format!(
                        "'{}' is assigned directly from user input without a secure hash (bcrypt/argon2/scrypt/pbkdf2)",
                        info.name
                    ),
                });
            }
        }
    }

    findings
}
