//! Framework Detector (C7), §4.6.
//!
//! Two-step detection: a cheap lexical import scan narrows the field to a
//! single candidate, then a route/middleware scan over the file text grades
//! confidence. `fastify` is detected as its own framework and never folded
//! into `express` (§12 resolution 2) even though both are Node HTTP
//! frameworks with near-identical route syntax.

use once_cell::sync::Lazy;
use regex::Regex;
use sentinel_foundation::model::{Confidence, Framework, FrameworkDetection};

struct Candidate {
    framework: Framework,
    import_pattern: &'static str,
}

static CANDIDATES: Lazy<Vec<(Framework, Regex)>> = Lazy::new(|| {
    let raw: &[Candidate] = &[
        Candidate { framework: Framework::Fastify, import_pattern: r#"['"]fastify['"]"# },
        Candidate { framework: Framework::Express, import_pattern: r#"['"]express['"]"# },
        Candidate { framework: Framework::FastApi, import_pattern: r"\bfastapi\b" },
        Candidate { framework: Framework::Flask, import_pattern: r"\b(?:from|import)\s+flask\b" },
        Candidate { framework: Framework::Django, import_pattern: r"\bdjango\b" },
        Candidate { framework: Framework::Gin, import_pattern: r"gin-gonic/gin" },
        Candidate { framework: Framework::Rails, import_pattern: r"\brails\b" },
    ];
    raw.iter()
        .map(|c| (c.framework, Regex::new(c.import_pattern).expect("static regex is valid")))
        .collect()
});

static ROUTE_PATTERNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:app|router)\.(?:get|post|put|delete|patch|GET|POST|PUT|DELETE|PATCH)\s*\(|@app\.(?:get|post|put|delete|patch)\b")
        .expect("static regex is valid")
});

static MIDDLEWARE_PATTERNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:app\.use|\.Use\(|@app\.middleware|Depends\()").expect("static regex is valid")
});

/// Picks the lexical candidate framework, if any, for `content`.
fn select_candidate(content: &str) -> Option<Framework> {
    CANDIDATES
        .iter()
        .find(|(_, re)| re.is_match(content))
        .map(|(framework, _)| *framework)
}

/// Detects the web framework a file uses, per the two-step process of §4.6.
pub fn detect(content: &str) -> FrameworkDetection {
    let Some(framework) = select_candidate(content) else {
        return FrameworkDetection {
            framework: Framework::Unknown,
            confidence: Confidence::Low,
            evidence: Vec::new(),
        };
    };

    let mut evidence = Vec::new();
    let confidence = if let Some(m) = ROUTE_PATTERNS.find(content) {
        evidence.push(m.as_str().trim().to_string());
        Confidence::High
    } else if let Some(m) = MIDDLEWARE_PATTERNS.find(content) {
        evidence.push(m.as_str().trim().to_string());
        Confidence::Medium
    } else {
        Confidence::Low
    };

    FrameworkDetection {
        framework,
        confidence,
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_express_route_constructors_as_high_confidence() {
        let src = "const express = require('express');\napp.get('/users', handler);\n";
        let result = detect(src);
        assert_eq!(result.framework, Framework::Express);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn fastify_is_never_reported_as_express() {
        let src = "import fastify from 'fastify';\napp.use(logger);\n";
        let result = detect(src);
        assert_eq!(result.framework, Framework::Fastify);
        assert_ne!(result.framework, Framework::Express);
    }

    #[test]
    fn middleware_only_yields_medium_confidence() {
        let src = "from flask import Flask\napp = Flask(__name__)\napp.use(cors)\n";
        let result = detect(src);
        assert_eq!(result.framework, Framework::Flask);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn no_known_import_yields_unknown_framework() {
        let result = detect("const x = 1;\n");
        assert_eq!(result.framework, Framework::Unknown);
        assert_eq!(result.confidence, Confidence::Low);
    }
}
