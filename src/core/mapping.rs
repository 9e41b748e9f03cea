//! Glob-scoped mapping rules.
//!
//! A project maps path globs to rules that decide where localized copies of a
//! matching file are written, which keys are skipped and which comments count
//! as translator notes. Exactly one rule applies to a file: the most specific
//! of the matching patterns.
//!
//! Patterns use `glob` syntax plus two shell extensions that the `glob` crate
//! does not understand, expanded into alternatives before compiling:
//! brace sets `{yml,yaml}` and the extglob groups `?(a|b)` and `@(a|b)`.

use std::sync::LazyLock;

use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::utils::{normalize_path, split_dir, split_extension};

/// Tokens a rule template may reference.
pub const TEMPLATE_TOKENS: &[&str] = &["locale", "dir", "basename", "filename", "extension"];

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\[\]/]*)\]").unwrap());

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One entry of the `yaml.mappings` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
    /// Output path template, e.g. `resources/[locale]/[filename]`.
    pub template: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_prefix: Option<String>,
}

/// A compiled rule together with its pattern.
#[derive(Debug, Clone)]
pub struct Mapping {
    pattern: String,
    rule: MappingRule,
    alternatives: Vec<Pattern>,
    specificity: Specificity,
    reverse: Regex,
}

/// Ranking key; larger is more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Specificity {
    literal_segments: usize,
    fewer_wildcards: std::cmp::Reverse<usize>,
    literal_chars: usize,
}

impl Mapping {
    pub fn new(pattern: &str, rule: MappingRule) -> Result<Self> {
        check_template(pattern, &rule.template)?;
        let normalized = strip_dot_prefix(pattern);
        let compile = |glob: &str| {
            Pattern::new(glob).map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.msg.to_string(),
            })
        };

        let mut alternatives = Vec::new();
        for alternative in expand_pattern(normalized)? {
            alternatives.push(compile(&alternative)?);
            // `**/x` also matches `x` at the root
            if let Some(rest) = alternative.strip_prefix("**/") {
                alternatives.push(compile(rest)?);
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            specificity: specificity(normalized),
            reverse: template_regex(pattern, &rule.template)?,
            rule,
            alternatives,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn rule(&self) -> &MappingRule {
        &self.rule
    }

    pub fn template(&self) -> &str {
        &self.rule.template
    }

    pub fn excluded_keys(&self) -> &[String] {
        &self.rule.excluded_keys
    }

    pub fn comment_prefix(&self) -> Option<&str> {
        self.rule.comment_prefix.as_deref()
    }

    /// Does the pattern match this relative path?
    pub fn matches(&self, path: &str) -> bool {
        let path = relative(path);
        self.alternatives
            .iter()
            .any(|pattern| pattern.matches_with(&path, MATCH_OPTIONS))
    }

    /// Render the output path of `path` for `locale`.
    pub fn render(&self, path: &str, locale: &str) -> String {
        render_template(&self.rule.template, path, locale)
    }

    /// If `path` looks like an output of this rule, return the locale it was
    /// written for.
    pub fn parse_locale(&self, path: &str) -> Option<String> {
        let path = relative(path);
        self.reverse
            .captures(&path)
            .and_then(|caps| caps.name("locale"))
            .map(|m| m.as_str().to_string())
    }
}

/// The ordered rule table of a project.
#[derive(Debug, Clone, Default)]
pub struct MappingResolver {
    mappings: Vec<Mapping>,
}

impl MappingResolver {
    /// Compile rules in declaration order.
    ///
    /// Fails on the first invalid glob or unknown template token.
    pub fn new<I, S>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, MappingRule)>,
        S: AsRef<str>,
    {
        let mappings = rules
            .into_iter()
            .map(|(pattern, rule)| Mapping::new(pattern.as_ref(), rule))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { mappings })
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    /// The most specific rule matching `path`; the earliest one on a tie.
    pub fn resolve(&self, path: &str) -> Option<&Mapping> {
        let mut best: Option<&Mapping> = None;
        for mapping in self.mappings.iter().filter(|m| m.matches(path)) {
            match best {
                Some(current) if current.specificity >= mapping.specificity => {}
                _ => best = Some(mapping),
            }
        }
        best
    }
}

fn strip_dot_prefix(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

fn relative(path: &str) -> String {
    normalize_path(strip_dot_prefix(path))
}

fn check_template(pattern: &str, template: &str) -> Result<()> {
    for caps in TOKEN_REGEX.captures_iter(template) {
        let token = &caps[1];
        if !TEMPLATE_TOKENS.contains(&token) {
            return Err(Error::UnknownTemplateToken {
                pattern: pattern.to_string(),
                token: token.to_string(),
            });
        }
    }
    Ok(())
}

/// Substitute the template tokens for `path` and normalize the result.
///
/// - `[dir]`: directory of the path, `.` at the root
/// - `[filename]`: file name with extension
/// - `[basename]`: file name without extension
/// - `[extension]`: extension without the dot
pub fn render_template(template: &str, path: &str, locale: &str) -> String {
    let path = relative(path);
    let (dir, file_name) = split_dir(&path);
    let (basename, extension) = split_extension(file_name);
    let dir = if dir.is_empty() { "." } else { dir };

    let rendered = TOKEN_REGEX.replace_all(template, |caps: &regex::Captures| {
        match &caps[1] {
            "locale" => locale.to_string(),
            "dir" => dir.to_string(),
            "filename" => file_name.to_string(),
            "basename" => basename.to_string(),
            "extension" => extension.unwrap_or("").to_string(),
            other => format!("[{}]", other),
        }
    });
    normalize_path(&rendered)
}

const LOCALE_PATTERN: &str = r"[a-z]{2,3}(?:[-_][A-Z][a-z]{3})?(?:[-_](?:[A-Z]{2}|[0-9]{3}))?";

/// Regex that recognizes paths produced by a template.
fn template_regex(pattern: &str, template: &str) -> Result<Regex> {
    let template = strip_dot_prefix(template);
    let mut source = String::from("^");
    let mut last = 0;
    let mut locale_seen = false;

    for caps in TOKEN_REGEX.captures_iter(template) {
        let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        source.push_str(&regex::escape(&template[last..whole.start()]));
        last = whole.end();

        match token.as_str() {
            "locale" if !locale_seen => {
                locale_seen = true;
                source.push_str(&format!("(?P<locale>{})", LOCALE_PATTERN));
            }
            "locale" => source.push_str(&format!("(?:{})", LOCALE_PATTERN)),
            "dir" if template[last..].starts_with('/') => {
                last += 1;
                source.push_str("(?:.*/)?");
            }
            "dir" => source.push_str(".*"),
            "extension" => source.push_str("[^/.]+"),
            _ => source.push_str("[^/]+"),
        }
    }
    source.push_str(&regex::escape(&template[last..]));
    source.push('$');

    Regex::new(&source).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Expand brace sets and `?(..)` / `@(..)` groups into plain glob alternatives.
pub fn expand_pattern(pattern: &str) -> Result<Vec<String>> {
    let invalid = |message: &str| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: message.to_string(),
    };

    let chars: Vec<(usize, char)> = pattern.char_indices().collect();
    for (n, &(i, c)) in chars.iter().enumerate() {
        let next = chars.get(n + 1).map(|&(_, c)| c);
        let (open, optional) = match (c, next) {
            ('{', _) => (i, false),
            ('?' | '@', Some('(')) => (i + 1, c == '?'),
            ('*' | '+' | '!', Some('(')) => {
                return Err(invalid("only ?(..) and @(..) pattern groups are supported"));
            }
            _ => continue,
        };
        let close_char = if c == '{' { '}' } else { ')' };
        let separator = if c == '{' { ',' } else { '|' };
        let close = pattern[open..]
            .find(close_char)
            .map(|offset| open + offset)
            .ok_or_else(|| invalid("unclosed pattern group"))?;

        let head = &pattern[..i];
        let tail = &pattern[close + 1..];
        let mut options: Vec<&str> = pattern[open + 1..close].split(separator).collect();
        if optional {
            options.insert(0, "");
        }

        let mut expanded = Vec::new();
        for option in options {
            expanded.extend(expand_pattern(&format!("{}{}{}", head, option, tail))?);
        }
        expanded.dedup();
        return Ok(expanded);
    }
    Ok(vec![pattern.to_string()])
}

fn specificity(pattern: &str) -> Specificity {
    let literal_segments = pattern
        .split('/')
        .filter(|segment| {
            !segment.is_empty()
                && !segment.contains(['*', '?', '[', '{'])
                && !segment.contains("@(")
        })
        .count();

    let mut wildcards = 0;
    let mut literal_chars = 0;
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                wildcards += 1;
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
            }
            '?' | '@' if chars.peek() == Some(&'(') => {
                wildcards += 1;
                for c in chars.by_ref() {
                    if c == ')' {
                        break;
                    }
                }
            }
            '[' | '{' => {
                wildcards += 1;
                let close = if c == '[' { ']' } else { '}' };
                for c in chars.by_ref() {
                    if c == close {
                        break;
                    }
                }
            }
            '?' => wildcards += 1,
            _ => literal_chars += 1,
        }
    }

    Specificity {
        literal_segments,
        fewer_wildcards: std::cmp::Reverse(wildcards),
        literal_chars,
    }
}
