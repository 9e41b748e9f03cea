use std::path::PathBuf;

use crate::core::TranslationUnit;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Localize(LocalizeSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    /// Units per file, in file order.
    pub files: Vec<(String, Vec<TranslationUnit>)>,
    pub json: bool,
}

impl ExtractSummary {
    pub fn unit_count(&self) -> usize {
        self.files.iter().map(|(_, units)| units.len()).sum()
    }
}

#[derive(Debug)]
pub struct LocalizedOutput {
    pub source: String,
    pub locale: String,
    /// Path relative to the output directory.
    pub output: String,
    pub translated: usize,
    pub total: usize,
}

#[derive(Debug)]
pub struct LocalizeSummary {
    pub outputs: Vec<LocalizedOutput>,
    pub output_dir: PathBuf,
    pub is_apply: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// A file a command could not process.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: anyhow::Error,
}

/// Result of running yamlloc commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub failures: Vec<FileFailure>,
    /// Number of resource files that were read.
    pub files_checked: usize,
    /// Paths given on the command line that could not be scanned.
    pub skipped_count: usize,
}
