use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::args::CommonArgs;
use super::commands::FileFailure;
use super::scan::{ScanResult, scan_resources};
use crate::config::{Config, load_config};
use crate::core::{FileOptions, YamlFile, YamlFileType};

/// Everything a command needs to know about the project it runs in.
pub struct CommandContext {
    pub config: Config,
    /// Directory holding the config file, or the working directory.
    pub base_dir: PathBuf,
    pub working_dir: PathBuf,
    pub file_type: YamlFileType,
    pub verbose: bool,
}

impl CommandContext {
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let working_dir = env::current_dir().context("Failed to read current directory")?;
        let loaded = load_config(&working_dir)?;
        let mut config = loaded.config;

        if let Some(locale) = &common.source_locale {
            config.source_locale = locale.clone();
            config.validate()?;
        }

        let mut project = config.project(&loaded.base_dir)?;
        if let Some(root) = &common.resource_root {
            project.root = working_dir.join(root);
        }
        let file_type = YamlFileType::new(project).context("Invalid 'yaml.mappings' configuration")?;

        Ok(Self {
            config,
            base_dir: loaded.base_dir,
            working_dir,
            file_type,
            verbose: common.verbose,
        })
    }

    pub fn scan(&self, paths: &[PathBuf]) -> ScanResult {
        scan_resources(&self.file_type, paths, self.verbose)
    }

    /// Read and extract `files` in parallel. Results keep the order of `files`.
    pub fn load_files(&self, files: &[String]) -> (Vec<YamlFile<'_>>, Vec<FileFailure>) {
        let results: Vec<_> = files
            .par_iter()
            .map(|path| {
                let result = YamlFile::new(
                    &self.file_type,
                    FileOptions {
                        path_name: Some(path.clone()),
                        ..Default::default()
                    },
                )
                .and_then(|mut file| {
                    file.extract()?;
                    Ok(file)
                });
                (path.clone(), result)
            })
            .collect();

        let mut loaded = Vec::new();
        let mut failures = Vec::new();
        for (path, result) in results {
            match result {
                Ok(file) => loaded.push(file),
                Err(error) => failures.push(FileFailure { path, error }),
            }
        }
        (loaded, failures)
    }
}
