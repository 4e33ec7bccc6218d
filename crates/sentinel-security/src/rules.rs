//! Default security rule registry (§11.2).
//!
//! `default_rules()` gives concrete bodies to the rule IDs the
//! specification's end-to-end scenarios reference by name.

use sentinel_foundation::model::{AstCheck, Detection, SecurityRule, Severity};

pub fn default_rules() -> Vec<SecurityRule> {
    vec![
        SecurityRule {
            id: "SEC-001".to_string(),
            name: "Hardcoded secrets".to_string(),
            rule_type: "pattern_match".to_string(),
            severity: Severity::Critical,
            detection: Detection {
                endpoints: Vec::new(),
                patterns_forbidden: vec![
                    r#"(?i)(api[_-]?key|secret|password|token)\s*[:=]\s*["'][A-Za-z0-9/+=_-]{8,}["']"#.to_string(),
                    r#"(?i)-----BEGIN (?:RSA|EC|OPENSSH|DSA) PRIVATE KEY-----"#.to_string(),
                ],
                patterns_required: Vec::new(),
                required_checks: Vec::new(),
            },
            ast_check: None,
        },
        SecurityRule {
            id: "SEC-002".to_string(),
            name: "SQL string concatenation".to_string(),
            rule_type: "pattern_match".to_string(),
            severity: Severity::High,
            detection: Detection {
                endpoints: Vec::new(),
                patterns_forbidden: vec![
                    r#"(?i)(SELECT|INSERT|UPDATE|DELETE)\b[^;"']*["']\s*\+\s*\w"#.to_string(),
                    r#"(?i)f["'](?:SELECT|INSERT|UPDATE|DELETE)\b.*\{"#.to_string(),
                ],
                patterns_required: Vec::new(),
                required_checks: Vec::new(),
            },
            ast_check: None,
        },
        SecurityRule {
            id: "SEC-003".to_string(),
            name: "Missing auth middleware".to_string(),
            rule_type: "middleware".to_string(),
            severity: Severity::High,
            detection: Detection::default(),
            ast_check: Some(AstCheck {
                function_contains: Vec::new(),
                must_have_before: None,
                route_middleware: vec![
                    "authenticate".to_string(),
                    "requireAuth".to_string(),
                    "isAuthenticated".to_string(),
                ],
            }),
        },
        SecurityRule {
            id: "SEC-004".to_string(),
            name: "Missing input validation".to_string(),
            rule_type: "input_validation".to_string(),
            severity: Severity::Medium,
            detection: Detection {
                endpoints: Vec::new(),
                patterns_forbidden: Vec::new(),
                patterns_required: vec![
                    r#"(?i)\bvalidate\("#.to_string(),
                    r#"(?i)\bsanitize\("#.to_string(),
                    r#"\bschema\.parse\("#.to_string(),
                    r#"\bz\.\w+\(\)"#.to_string(),
                ],
                required_checks: Vec::new(),
            },
            ast_check: None,
        },
        SecurityRule {
            id: "SEC-005".to_string(),
            name: "Password hashing".to_string(),
            rule_type: "password_hashing".to_string(),
            severity: Severity::Critical,
            detection: Detection::default(),
            ast_check: Some(AstCheck {
                function_contains: vec![
                    "hashPassword".to_string(),
                    "setPassword".to_string(),
                    "createUser".to_string(),
                ],
                must_have_before: Some("bcrypt".to_string()),
                route_middleware: Vec::new(),
            }),
        },
    ]
}
