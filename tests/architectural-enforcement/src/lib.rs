//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The gesture state machine stays pure (no I/O, no async runtime)
//! - No blocking sleeps or blocking HTTP in production code
//!
//! The helpers here scan source files line by line. Production code is
//! everything above a file's `#[cfg(test)]` module, with `//` comments removed.

use std::fs;
use std::path::{Path, PathBuf};

/// A rule violation found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the offending line
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Pattern that matched
    pub pattern: String,
    /// The offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - `{}`: {}",
            self.path.display(),
            self.line,
            self.pattern,
            self.text
        )
    }
}

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Source directory of the deck core crate
pub fn core_src() -> PathBuf {
    workspace_root().join("deck").join("core").join("src")
}

/// All `.rs` files under `path` (or `path` itself if it is a file)
pub fn rust_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Production lines of a source text as `(line_number, code)` pairs
pub fn production_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim_start().starts_with("#[cfg(test)]") {
            break;
        }
        let code = line.split("//").next().unwrap_or(line);
        if !code.trim().is_empty() {
            lines.push((idx + 1, code.to_string()));
        }
    }
    lines
}

/// Scan every file under `path` for any of `patterns` in production code
pub fn scan(path: &Path, patterns: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for file in rust_files(path) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };

        for (line, code) in production_lines(&content) {
            for pattern in patterns {
                if code.contains(pattern) {
                    violations.push(Violation {
                        path: file.clone(),
                        line,
                        pattern: (*pattern).to_string(),
                        text: code.trim().to_string(),
                    });
                }
            }
        }
    }

    violations
}

/// Panic with a readable report if `violations` is non-empty
pub fn assert_clean(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }

    panic!(
        "\nFound {} violation(s) of: {rule}\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let src = "use a;\n// note std::fs\nfn f() {} // std::net\n#[cfg(test)]\nmod tests { std::fs::read(\"x\"); }\n";
        let lines = production_lines(src);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (1, "use a;".to_string()));
        assert!(!lines[1].1.contains("std::net"));
    }

    #[test]
    fn test_core_src_exists() {
        assert!(core_src().join("lib.rs").exists());
    }
}
