use std::{collections::BTreeSet, path::PathBuf};

use colored::Colorize;
use walkdir::{DirEntry, WalkDir};

use crate::core::YamlFileType;

/// Result of scanning for resource files.
pub struct ScanResult {
    /// Paths relative to the resource root, sorted.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Collect the resource files under the project root that `file_type` handles.
///
/// `paths` narrows the scan to files or directories relative to the root.
pub fn scan_resources(file_type: &YamlFileType, paths: &[PathBuf], verbose: bool) -> ScanResult {
    let root = &file_type.project().root;
    let mut files: BTreeSet<String> = BTreeSet::new();
    let mut skipped_count = 0;

    let starts: Vec<PathBuf> = if paths.is_empty() {
        vec![root.clone()]
    } else {
        paths.iter().map(|path| root.join(path)).collect()
    };

    for start in starts {
        if !start.exists() {
            skipped_count += 1;
            if verbose {
                eprintln!(
                    "{} Path does not exist: {}",
                    "warning:".bold().yellow(),
                    start.display()
                );
            }
            continue;
        }

        let walker = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            if file_type.handles(&relative) {
                files.insert(relative);
            }
        }
    }

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
