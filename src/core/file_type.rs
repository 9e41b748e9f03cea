//! Decides which files are YAML resources to extract.

use glob::{MatchOptions, Pattern};

use crate::core::error::{Error, Result};
use crate::core::mapping::MappingResolver;
use crate::core::project::Project;
use crate::utils::{normalize_path, split_dir, split_extension};

/// File extensions handled, without the dot.
pub const EXTENSIONS: &[&str] = &["yml", "yaml"];

const IGNORE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// The YAML file type of a project, with its mapping rules compiled.
#[derive(Debug, Clone)]
pub struct YamlFileType {
    project: Project,
    mappings: MappingResolver,
    ignores: Vec<Pattern>,
}

impl YamlFileType {
    pub fn new(project: Project) -> Result<Self> {
        let mappings = MappingResolver::new(project.mappings.iter().cloned())?;
        let ignores = project
            .ignores
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| Error::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            project,
            mappings,
            ignores,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn mappings(&self) -> &MappingResolver {
        &self.mappings
    }

    /// Should `path` (relative to the project root) be extracted?
    ///
    /// Only `.yml` / `.yaml` sources qualify: ignored paths and files that
    /// are themselves localized copies are skipped.
    pub fn handles(&self, path: &str) -> bool {
        let path = normalize_path(path);
        let (_, file_name) = split_dir(&path);
        let (_, extension) = split_extension(file_name);
        if !extension.is_some_and(|extension| EXTENSIONS.contains(&extension)) {
            return false;
        }
        if self
            .ignores
            .iter()
            .any(|pattern| pattern.matches_with(&path, IGNORE_OPTIONS))
        {
            return false;
        }
        self.output_locale(&path).is_none()
    }

    /// The target locale `path` was written for, when it is a localized copy.
    ///
    /// A path is a copy if some rule's template produces it for a locale other
    /// than the source locale. Without mapping rules, a path whose first
    /// directory is such a locale is a copy.
    pub fn output_locale(&self, path: &str) -> Option<String> {
        let path = normalize_path(path);
        let source = self.project.source_locale.as_str();

        let from_template = self
            .mappings
            .iter()
            .filter_map(|mapping| mapping.parse_locale(&path))
            .find(|locale| locale != source);
        if from_template.is_some() || !self.mappings.is_empty() {
            return from_template;
        }

        let (first, rest) = path.split_once('/')?;
        (!rest.is_empty() && first != source && self.project.is_locale(first))
            .then(|| first.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::file_type::*;
    use crate::core::mapping::MappingRule;

    fn rule(template: &str) -> MappingRule {
        MappingRule {
            template: template.to_string(),
            ..Default::default()
        }
    }

    fn file_type() -> YamlFileType {
        let project = Project {
            locales: vec!["en-GB".to_string()],
            mappings: vec![
                ("foo.yml".to_string(), rule("resources/[locale]/foo.yml")),
                ("**/strings.yaml".to_string(), rule("[dir]/strings.[locale].yaml")),
                (
                    "**/test/strings.y?(a)ml".to_string(),
                    rule("[dir]/[basename]/[locale].[extension]"),
                ),
                ("**/*.y?(a)ml".to_string(), rule("resources/[locale]/[filename]")),
            ],
            ..Project::new("/tmp", "en-US")
        };
        YamlFileType::new(project).unwrap()
    }

    #[test]
    fn test_handles_yaml_extensions_only() {
        let file_type = file_type();
        assert!(file_type.handles("foo.yml"));
        assert!(file_type.handles("foo.yaml"));
        assert!(!file_type.handles("foo.tmpl.html"));
        assert!(!file_type.handles("foo.html.haml"));
        assert!(!file_type.handles("foo.js"));
        assert!(!file_type.handles("yml"));
    }

    #[test]
    fn test_skips_localized_outputs() {
        let file_type = file_type();
        assert!(!file_type.handles("resources/ru-RU/foo.yml"));
        assert!(!file_type.handles("subfolder/strings.ru-RU.yaml"));
        assert!(!file_type.handles("test/strings/ru-RU.yaml"));
        assert_eq!(
            file_type.output_locale("test/strings/ru-RU.yaml").as_deref(),
            Some("ru-RU")
        );
    }

    #[test]
    fn test_handles_sources() {
        let file_type = file_type();
        assert!(file_type.handles("subfolder/strings.en-US.yaml"));
        assert!(file_type.handles("en-US.yml"));
        assert!(file_type.handles("de-DE.yml"));
        assert!(file_type.handles("en.yml"));
        assert!(file_type.handles("resources/ru-RU/subdir/foo.yml"));
        assert!(file_type.handles("test/strings.yaml"));
        assert!(file_type.handles("resources/en-US/foo.yml"));
    }

    #[test]
    fn test_locale_directory_without_mappings() {
        let file_type = YamlFileType::new(Project::new("/tmp", "en-US")).unwrap();
        assert!(!file_type.handles("de-DE/test2.yml"));
        assert!(file_type.handles("en-US/test2.yml"));
        assert!(file_type.handles("config/locales/test2.yml"));
        assert!(file_type.handles("foo/test2.yml"));
    }

    #[test]
    fn test_locale_directory_with_mappings() {
        let file_type = file_type();
        assert!(file_type.handles("de-DE/test2.yml"));
        assert_eq!(file_type.output_locale("de-DE/test2.yml"), None);
        assert_eq!(
            file_type.output_locale("resources/de-DE/test2.yml").as_deref(),
            Some("de-DE")
        );
    }

    #[test]
    fn test_ignores() {
        let project = Project {
            ignores: vec!["**/fixtures/**".to_string()],
            ..Project::new("/tmp", "en-US")
        };
        let file_type = YamlFileType::new(project).unwrap();
        assert!(!file_type.handles("spec/fixtures/data.yml"));
        assert!(file_type.handles("spec/data.yml"));
    }

    #[test]
    fn test_invalid_configuration() {
        let project = Project {
            mappings: vec![("**/*.yml".to_string(), rule("[nope]/[filename]"))],
            ..Project::new("/tmp", "en-US")
        };
        assert!(matches!(
            YamlFileType::new(project),
            Err(Error::UnknownTemplateToken { .. })
        ));

        let project = Project {
            ignores: vec!["[unclosed".to_string()],
            ..Project::new("/tmp", "en-US")
        };
        assert!(matches!(
            YamlFileType::new(project),
            Err(Error::InvalidPattern { .. })
        ));
    }
}
