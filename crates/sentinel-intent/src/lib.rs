//! Intent Analyzer crate (C11, §4.10): decides whether a developer prompt
//! needs clarification before an agent acts on it.

mod context;
mod pipeline;
mod prompt;
mod triage;

pub use context::{gather_context, ContextData};
pub use pipeline::{analyze_intent, refine_patterns};
pub use prompt::{extract_first_json_object, is_clear_prompt, render_template, StructuredResponse};
pub use triage::{triage, TriageResult};
