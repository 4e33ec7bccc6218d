//! ContextData gathering (§4.10 step 2).
//!
//! Recent files come from `git log` when the project root is a git
//! checkout; otherwise a shallow filesystem walk stands in. Business
//! rules are read back from patterns the project has already accumulated
//! via [`sentinel_foundation::store::Store::list_intent_patterns`] — the
//! spec's "knowledge store" has no separate interface of its own, so this
//! reuses the pattern table rather than inventing a new one.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use sentinel_foundation::error::SentinelResult;
use sentinel_foundation::store::Store;

const MAX_RECENT_FILES: usize = 10;
const CODE_EXTENSIONS: [&str; 7] = ["go", "js", "jsx", "ts", "tsx", "py", "rs"];

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ContextData {
    pub recent_files: Vec<String>,
    pub vcs_status: Option<String>,
    pub top_level_dirs: Vec<String>,
    pub business_rules: Vec<String>,
    pub code_path_patterns: Vec<String>,
}

fn is_code_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).map(|ext| CODE_EXTENSIONS.contains(&ext)).unwrap_or(false)
}

fn run_git(project_root: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git").current_dir(project_root).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

fn recent_files_from_git(project_root: &Path) -> Option<Vec<String>> {
    let log = run_git(project_root, &["log", "--name-only", "--pretty=format:", "-n", "30"])?;
    let mut seen = BTreeSet::new();
    let mut files = Vec::new();
    for line in log.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let path = Path::new(line);
        if is_code_file(path) && seen.insert(line.to_string()) {
            files.push(line.to_string());
            if files.len() >= MAX_RECENT_FILES {
                break;
            }
        }
    }
    Some(files)
}

fn recent_files_from_walk(project_root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    let mut queue = std::collections::VecDeque::new();
    queue.push_back(project_root.to_path_buf());

    while let Some(dir) = queue.pop_front() {
        if files.len() >= MAX_RECENT_FILES {
            break;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') || name == "node_modules" || name == "target" || name == "vendor" {
                continue;
            }
            if path.is_dir() {
                queue.push_back(path);
            } else if is_code_file(&path) {
                files.push(path.strip_prefix(project_root).unwrap_or(&path).to_string_lossy().into_owned());
                if files.len() >= MAX_RECENT_FILES {
                    break;
                }
            }
        }
    }
    files
}

fn top_level_dirs(project_root: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(project_root) else { return Vec::new() };
    let mut dirs: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    dirs.sort();
    dirs
}

fn code_path_patterns(recent_files: &[String]) -> Vec<String> {
    let mut dirs: BTreeSet<String> = BTreeSet::new();
    for file in recent_files {
        if let Some(parent) = PathBuf::from(file).parent() {
            let parent = parent.to_string_lossy().into_owned();
            if !parent.is_empty() {
                dirs.insert(parent);
            }
        }
    }
    dirs.into_iter().collect()
}

pub async fn gather_context(project_root: &Path, store: &dyn Store, project_id: &str) -> SentinelResult<ContextData> {
    let recent_files = recent_files_from_git(project_root).unwrap_or_else(|| recent_files_from_walk(project_root));
    let vcs_status = run_git(project_root, &["status", "--porcelain"]);
    let top_level_dirs = top_level_dirs(project_root);
    let code_path_patterns = code_path_patterns(&recent_files);

    let business_rules = store
        .list_intent_patterns(project_id)
        .await?
        .into_iter()
        .filter(|pattern| pattern.pattern_type == "business_rule")
        .map(|pattern| pattern.pattern_data)
        .collect();

    Ok(ContextData {
        recent_files,
        vcs_status,
        top_level_dirs,
        business_rules,
        code_path_patterns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_git_directory_walk_finds_code_files_and_skips_vendor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.go"), "package main").unwrap();
        std::fs::create_dir(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor").join("dep.go"), "package dep").unwrap();
        std::fs::create_dir(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("pkg").join("util.go"), "package pkg").unwrap();

        let files = recent_files_from_walk(dir.path());
        assert!(files.iter().any(|f| f.contains("main.go")));
        assert!(files.iter().any(|f| f.contains("util.go")));
        assert!(!files.iter().any(|f| f.contains("vendor")));
    }

    #[test]
    fn code_path_patterns_dedupes_parent_directories() {
        let recent = vec!["src/users/handler.go".to_string(), "src/users/service.go".to_string(), "src/orders/handler.go".to_string()];
        let patterns = code_path_patterns(&recent);
        assert_eq!(patterns, vec!["src/orders".to_string(), "src/users".to_string()]);
    }

    #[test]
    fn top_level_dirs_excludes_hidden_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        let dirs = top_level_dirs(dir.path());
        assert_eq!(dirs, vec!["src".to_string()]);
    }
}
