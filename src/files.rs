//! Source file discovery.
//!
//! Arguments are `.go` files, package directories (non-recursive) or
//! `dir/...` patterns (recursive). The result is ordered and de-duplicated,
//! excludes test files, and honors the without-test, build-tag,
//! exclude-dirs and git-branch-diff filters.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::EngineError;

#[derive(Debug, Default, Clone)]
pub struct Options {
    pub skip_without_test: bool,
    pub skip_with_build_tags: bool,
    pub exclude_dirs: Vec<String>,
    pub git_branch: Option<String>,
}

pub fn files_of_args(args: &[String], opts: &Options) -> Result<Vec<PathBuf>, EngineError> {
    let args: Vec<String> = if args.is_empty() {
        vec![".".to_string()]
    } else {
        args.to_vec()
    };

    let mut files = Vec::new();
    for arg in &args {
        if let Some(dir) = arg.strip_suffix("/...") {
            collect_recursive(Path::new(dir), &mut files)?;
        } else {
            let path = Path::new(arg);
            if path.is_dir() {
                collect_dir(path, &mut files)?;
            } else if path.is_file() {
                files.push(path.to_path_buf());
            } else {
                return Err(EngineError::Discovery(format!("no such file or directory: {}", arg)));
            }
        }
    }

    let mut seen = HashSet::new();
    files.retain(|f| seen.insert(f.clone()));

    if !opts.exclude_dirs.is_empty() {
        files.retain(|f| {
            let path = f.to_string_lossy();
            !opts.exclude_dirs.iter().any(|dir| path.contains(dir.as_str()))
        });
    }

    if let Some(branch) = &opts.git_branch {
        let changed = git_changed_files(branch)?;
        files.retain(|f| {
            let path = f.to_string_lossy();
            changed.iter().any(|c| path.ends_with(c.as_str()))
        });
    }

    if opts.skip_without_test || opts.skip_with_build_tags {
        files.retain(|f| test_file_of(f).is_some());
        if opts.skip_with_build_tags {
            let re = Regex::new(r"\+build (.*)(\s+)package").expect("build tag regex");
            files.retain(|f| match test_file_of(f) {
                Some(test) => match std::fs::read_to_string(&test) {
                    Ok(contents) => !re.is_match(&contents),
                    Err(_) => true,
                },
                None => false,
            });
        }
    }

    Ok(files)
}

fn is_go_source(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.ends_with(".go") && !name.ends_with("_test.go") && !name.starts_with('.'),
        None => false,
    }
}

fn collect_dir(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), EngineError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| EngineError::Discovery(format!("read {}: {}", dir.display(), e)))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_go_source(p))
        .collect();
    entries.sort();
    out.extend(entries);
    Ok(())
}

fn collect_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), EngineError> {
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            name != "vendor" && name != "testdata" && !(name.starts_with('.') && name.len() > 1)
        });
    for entry in walker {
        let entry = entry.map_err(|e| EngineError::Discovery(format!("walk {}: {}", dir.display(), e)))?;
        if entry.file_type().is_file() && is_go_source(entry.path()) {
            out.push(entry.path().to_path_buf());
        }
    }
    Ok(())
}

fn test_file_of(file: &Path) -> Option<PathBuf> {
    let name = file.file_name()?.to_str()?;
    let stem = name.strip_suffix(".go")?;
    let test = file.with_file_name(format!("{}_test.go", stem));
    if test.exists() {
        Some(test)
    } else {
        None
    }
}

fn git_changed_files(branch: &str) -> Result<Vec<String>, EngineError> {
    let output = Command::new("git")
        .args(["diff", "--name-only", branch])
        .output()
        .map_err(|e| EngineError::Discovery(format!("run git diff: {}", e)))?;
    if !output.status.success() {
        return Err(EngineError::Discovery(format!(
            "git diff --name-only {}: {}",
            branch,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect())
}

/// Import path of the package containing `file`: the nearest `go.mod`
/// module path joined with the file's directory, or a filesystem pattern
/// `go test` accepts when no module is found.
pub fn package_path(file: &Path) -> String {
    let abs = file
        .canonicalize()
        .unwrap_or_else(|_| file.to_path_buf());
    let dir = abs.parent().unwrap_or(Path::new("."));

    let mut current = dir;
    loop {
        let gomod = current.join("go.mod");
        if gomod.is_file() {
            if let Ok(contents) = std::fs::read_to_string(&gomod) {
                if let Some(module) = contents
                    .lines()
                    .find_map(|l| l.trim().strip_prefix("module "))
                {
                    let module = module.trim();
                    return match dir.strip_prefix(current) {
                        Ok(rel) if rel.as_os_str().is_empty() => module.to_string(),
                        Ok(rel) => format!("{}/{}", module, rel.to_string_lossy().replace('\\', "/")),
                        Err(_) => module.to_string(),
                    };
                }
            }
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    // No module; a rooted path is a valid package pattern for go test.
    dir.to_string_lossy().to_string()
}
