//! Convenience builders for the data model's most commonly needed shapes.

use sentinel_foundation::model::{AnalysisOptions, AnalysisRequest, CostOpt, File, KeyType, LlmConfig, Provider};

pub fn file(path: &str, language: &str, content: &str) -> File {
    File::new(path, language, content)
}

pub fn analysis_request(files: Vec<File>) -> AnalysisRequest {
    AnalysisRequest {
        files,
        options: AnalysisOptions::default(),
    }
}

pub fn llm_config(project_id: &str, provider: Provider, model: Option<&str>) -> LlmConfig {
    LlmConfig {
        id: "test-config".to_string(),
        project_id: project_id.to_string(),
        provider,
        model: model.map(str::to_string),
        api_key_encrypted: Vec::new(),
        key_type: KeyType::Primary,
        endpoint: None,
        cost_opt: CostOpt::default(),
    }
}

/// A temp directory seeded with a handful of code files, for intent-analyzer
/// context-gathering tests that need a real filesystem.
pub fn seeded_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir creation");
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/main.go"), "package main\n\nfunc main() {}\n").unwrap();
    std::fs::write(dir.path().join("README.md"), "# test project\n").unwrap();
    dir
}
