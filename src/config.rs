use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::mapping::{Mapping, MappingRule};
use crate::core::project::Project;
use crate::utils::is_locale_spec;

pub const CONFIG_FILE_NAME: &str = ".yamllocrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_locale")]
    pub source_locale: String,
    /// Target locales.
    #[serde(default)]
    pub locales: Vec<String>,
    #[serde(default)]
    pub flavors: Vec<String>,
    #[serde(default = "default_resource_root")]
    pub resource_root: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub yaml: YamlConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct YamlConfig {
    /// Glob pattern to rule, in declaration order.
    #[serde(default)]
    pub mappings: Map<String, Value>,
}

fn default_source_locale() -> String {
    "en-US".to_string()
}

fn default_resource_root() -> String {
    "./".to_string()
}

fn default_output_dir() -> String {
    "./".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_locale: default_source_locale(),
            locales: Vec::new(),
            flavors: Vec::new(),
            resource_root: default_resource_root(),
            output_dir: default_output_dir(),
            ignores: Vec::new(),
            yaml: YamlConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Checks locale tags, the `ignores` globs and every mapping rule.
    pub fn validate(&self) -> Result<()> {
        if !is_locale_spec(&self.source_locale) {
            bail!(
                "Invalid locale in 'sourceLocale': \"{}\"",
                self.source_locale
            );
        }
        for locale in &self.locales {
            if !is_locale_spec(locale) {
                bail!("Invalid locale in 'locales': \"{}\"", locale);
            }
        }

        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for (pattern, rule) in self.mapping_rules()? {
            Mapping::new(&pattern, rule).with_context(|| {
                format!("Invalid mapping in 'yaml.mappings': \"{}\"", pattern)
            })?;
        }

        Ok(())
    }

    /// The mapping rules in the order they are declared.
    pub fn mapping_rules(&self) -> Result<Vec<(String, MappingRule)>> {
        self.yaml
            .mappings
            .iter()
            .map(|(pattern, rule)| {
                let rule: MappingRule = serde_json::from_value(rule.clone()).with_context(|| {
                    format!("Invalid mapping in 'yaml.mappings': \"{}\"", pattern)
                })?;
                Ok((pattern.clone(), rule))
            })
            .collect()
    }

    /// The project described by this configuration, rooted at
    /// `base_dir/resourceRoot`.
    pub fn project(&self, base_dir: &Path) -> Result<Project> {
        Ok(Project {
            locales: self.locales.clone(),
            flavors: self.flavors.clone(),
            mappings: self.mapping_rules()?,
            ignores: self.ignores.clone(),
            ..Project::new(base_dir.join(&self.resource_root), &self.source_locale)
        })
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory relative settings are resolved against.
    pub base_dir: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                base_dir,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            base_dir: start_dir.to_path_buf(),
        }),
    }
}
