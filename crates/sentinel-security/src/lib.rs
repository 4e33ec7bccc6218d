//! Framework Detector (C7), Security Rule Engine (C8), and Data-Flow
//! Analyzer (C9), §4.6-§4.8.

mod cache;
mod dataflow;
mod engine;
mod framework;
pub mod rules;

pub use dataflow::{analyze_variables, find_insecure_password_handling, PasswordFlowFinding};
pub use engine::SecurityEngine;
pub use framework::detect as detect_framework;
