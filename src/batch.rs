//! Directory scans and parallel batch analysis.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::analysis::{Analyzer, Language, ParsedModule};
use crate::config::Config;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules", "build"];

/// One analyzed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    /// Path relative to the scan root, with `/` separators.
    pub path: String,
    pub module: ParsedModule,
}

/// Collect files to analyze under `root`.
///
/// A file path is returned as-is. Directories are walked, skipping hidden
/// and build directories and anything matched by `excluded_paths`. Only
/// files in a known language are kept unless `include_unknown` is set.
pub fn collect_files(
    root: &Path,
    config: &Config,
    analyzer: &Analyzer,
) -> anyhow::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(relative) {
            debug!(path = %relative.display(), "excluded by config");
            continue;
        }

        let name = path.to_string_lossy();
        if config.include_unknown || analyzer.detect_language(&name).is_some() {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Analyze files in parallel. Results are sorted by path.
///
/// Unreadable files and files rejected as invalid input are logged and
/// skipped so one bad file does not abort the scan.
pub fn analyze_files(
    analyzer: &Analyzer,
    paths: &[PathBuf],
    base: &Path,
    hint: Option<Language>,
) -> Vec<FileAnalysis> {
    let mut results: Vec<FileAnalysis> = paths
        .par_iter()
        .filter_map(|path| match analyze_file(analyzer, path, base, hint) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping file");
                None
            }
        })
        .collect();

    results.sort_by(|a, b| a.path.cmp(&b.path));
    results
}

/// Read and analyze a single file.
pub fn analyze_file(
    analyzer: &Analyzer,
    path: &Path,
    base: &Path,
    hint: Option<Language>,
) -> anyhow::Result<FileAnalysis> {
    let bytes = fs::read(path)?;
    let file_name = path.to_string_lossy();
    let module = analyzer.analyze_bytes(&bytes, &file_name, hint.map(|l| l.as_str()))?;

    Ok(FileAnalysis {
        path: relative_path(path, base),
        module,
    })
}

fn relative_path(path: &Path, base: &Path) -> String {
    let relative = match path.strip_prefix(base) {
        Ok(p) if !p.as_os_str().is_empty() => p,
        _ => path.file_name().map(Path::new).unwrap_or(path),
    };
    relative.to_string_lossy().replace('\\', "/")
}
