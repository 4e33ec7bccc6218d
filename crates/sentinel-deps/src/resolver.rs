//! Import resolution against the in-memory set of analyzed files (§4.3).
//!
//! The resolver is pure: it only consults the paths handed to it, performs
//! no filesystem I/O, and silently drops targets it cannot match (the
//! caller is expected to count drops for metrics).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sentinel_ast::Language;
use sentinel_foundation::model::DependencyKind;

/// Resolves a single raw target to one of the paths in `analyzed`.
///
/// `package_dirs` is only consulted for [`Language::Go`] (see
/// [`resolve_go`]); other languages resolve against `analyzed` file paths
/// directly.
pub fn resolve(
    from: &str,
    to: &str,
    kind: DependencyKind,
    language: Language,
    analyzed: &HashSet<String>,
    package_dirs: &[String],
) -> Option<String> {
    match language {
        Language::Go => resolve_go(to, package_dirs),
        Language::JavaScript | Language::TypeScript => resolve_js(from, to, language, analyzed),
        Language::Python => resolve_python(from, to, kind, analyzed),
    }
}

/// Every directory containing at least one Go file, in first-seen order —
/// the package-node set the graph builder uses for Go (§12 resolution 1).
pub fn go_package_dirs(go_files: &[String]) -> Vec<String> {
    let mut dirs = Vec::new();
    for f in go_files {
        let dir = Path::new(f)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

/// Matches `to`'s trailing path segments against a known package directory,
/// preferring the longest matching suffix (§4.3 Go rule).
fn resolve_go(to: &str, package_dirs: &[String]) -> Option<String> {
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();
    let mut best: Option<(usize, &str)> = None;

    for dir in package_dirs {
        let dir_segs: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
        let max_k = to_segs.len().min(dir_segs.len());
        for k in (1..=max_k).rev() {
            if dir_segs[dir_segs.len() - k..] == to_segs[to_segs.len() - k..] {
                if best.map_or(true, |(best_k, _)| k > best_k) {
                    best = Some((k, dir.as_str()));
                }
                break;
            }
        }
    }

    best.map(|(_, d)| d.to_string())
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        use std::path::Component::*;
        match component {
            ParentDir => {
                out.pop();
            }
            CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn resolve_js(from: &str, to: &str, language: Language, analyzed: &HashSet<String>) -> Option<String> {
    if !(to.starts_with("./") || to.starts_with("../")) {
        return None;
    }
    let base_dir = Path::new(from).parent().unwrap_or_else(|| Path::new(""));
    let joined = normalize(&base_dir.join(to));
    let joined_str = joined.to_string_lossy().to_string();

    if analyzed.contains(&joined_str) {
        return Some(joined_str);
    }

    let native_ext = match language {
        Language::TypeScript => "ts",
        _ => "js",
    };
    let exts = [native_ext, "js", "ts", "jsx", "tsx"];

    for ext in exts {
        let candidate = format!("{joined_str}.{ext}");
        if analyzed.contains(&candidate) {
            return Some(candidate);
        }
    }
    for ext in exts {
        let candidate = format!("{joined_str}/index.{ext}");
        if analyzed.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn has_init(dir: &Path, analyzed: &HashSet<String>) -> bool {
    let candidate = dir.join("__init__.py").to_string_lossy().to_string();
    analyzed.contains(&candidate)
}

/// Walks upward from `start_dir` through the unbroken chain of ancestors
/// that contain `__init__.py`, returning the topmost such ancestor —
/// the package root dotted imports resolve against (§4.3 Python rule).
fn deepest_init_ancestor(start_dir: &Path, analyzed: &HashSet<String>) -> PathBuf {
    let mut root = start_dir.to_path_buf();
    let mut cursor = start_dir.to_path_buf();
    while has_init(&cursor, analyzed) {
        root = cursor.clone();
        match cursor.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => cursor = parent.to_path_buf(),
            _ => break,
        }
    }
    root
}

fn dotted_to_path(base: &Path, dotted: &str) -> Vec<String> {
    let rel = dotted.replace('.', "/");
    let joined = base.join(&rel);
    let as_module = format!("{}.py", joined.to_string_lossy());
    let as_package = joined.join("__init__.py").to_string_lossy().to_string();
    vec![as_module, as_package]
}

fn resolve_python(from: &str, to: &str, kind: DependencyKind, analyzed: &HashSet<String>) -> Option<String> {
    let from_dir = Path::new(from).parent().unwrap_or_else(|| Path::new(""));

    if kind == DependencyKind::RelativeImport {
        let leading_dots = to.chars().take_while(|c| *c == '.').count();
        let rest = &to[leading_dots..];
        let mut base = from_dir.to_path_buf();
        for _ in 0..leading_dots {
            base = base.parent().map(Path::to_path_buf).unwrap_or_default();
        }
        if rest.is_empty() {
            let candidate = base.join("__init__.py").to_string_lossy().to_string();
            return analyzed.contains(&candidate).then_some(candidate);
        }
        for candidate in dotted_to_path(&base, rest) {
            if analyzed.contains(&candidate) {
                return Some(candidate);
            }
        }
        return None;
    }

    let root = deepest_init_ancestor(from_dir, analyzed);
    for candidate in dotted_to_path(&root, to) {
        if analyzed.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn go_resolves_longest_suffix_match() {
        let dirs = vec!["pkg/util".to_string(), "vendor/github.com/x/pkg/util".to_string()];
        // Both match "util" but "pkg/util" must win on longer suffix "pkg/util".
        assert_eq!(resolve_go("company/pkg/util", &dirs), Some("pkg/util".to_string()));
    }

    #[test]
    fn js_resolves_relative_import_by_trying_extensions() {
        let analyzed = set(&["src/a.js", "src/util.ts"]);
        assert_eq!(
            resolve_js("src/a.js", "./util", Language::JavaScript, &analyzed),
            Some("src/util.ts".to_string())
        );
    }

    #[test]
    fn js_resolves_index_fallback() {
        let analyzed = set(&["src/lib/index.ts"]);
        assert_eq!(
            resolve_js("src/a.js", "./lib", Language::TypeScript, &analyzed),
            Some("src/lib/index.ts".to_string())
        );
    }

    #[test]
    fn js_ignores_bare_package_specifiers() {
        let analyzed = set(&["node_modules/react/index.js"]);
        assert_eq!(resolve_js("src/a.js", "react", Language::JavaScript, &analyzed), None);
    }

    #[test]
    fn python_resolves_dotted_import_against_package_root() {
        let analyzed = set(&["proj/__init__.py", "proj/a/__init__.py", "proj/a/b.py"]);
        assert_eq!(
            resolve_python("proj/a/__init__.py", "a.b", DependencyKind::FromImport, &analyzed),
            Some("proj/a/b.py".to_string())
        );
    }

    #[test]
    fn python_resolves_relative_import_one_level_up_per_dot() {
        // Per the resolver's rule, each leading dot removes one directory
        // level from dir(from) before the dotted tail is joined.
        let analyzed = set(&["proj/sibling.py"]);
        let result = resolve_python("proj/pkg/mod.py", ".sibling", DependencyKind::RelativeImport, &analyzed);
        assert_eq!(result, Some("proj/sibling.py".to_string()));
    }
}
