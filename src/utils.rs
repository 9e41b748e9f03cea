//! Common utility functions shared across the codebase.

use std::sync::LazyLock;

use regex::Regex;

/// Modulus of the key hash: the largest prime below 2^30.
const HASH_MODULUS: u64 = 1_073_741_789;
/// Multiplier of the key hash: the largest prime below 2^16.
const HASH_MULTIPLIER: u64 = 65_521;

// BCP-47-ish locale specifier: language, optional script, optional region.
// Underscores are accepted as separators because Rails-style files use them.
static LOCALE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(?:[-_][A-Z][a-z]{3})?(?:[-_](?:[A-Z]{2}|[0-9]{3}))?$").unwrap()
});

/// Hash a string into a resource key segment.
///
/// The hash is a rolling polynomial over the UTF-16 code units of the input,
/// rendered as `r` followed by the decimal value. Every implementation that
/// shares translation keys with this one must produce the same digits, so the
/// constants and the code-unit iteration are fixed.
///
/// # Examples
///
/// ```
/// use yamlloc::utils::hash_key;
///
/// assert_eq!(hash_key("a"), "r6355537");
/// assert_eq!(hash_key("test.yml"), "r343014569");
/// ```
pub fn hash_key(source: &str) -> String {
    let hash = source.encode_utf16().fold(0u64, |hash, unit| {
        ((hash + u64::from(unit)) * HASH_MULTIPLIER) % HASH_MODULUS
    });
    format!("r{}", hash)
}

/// Checks if the text looks like a locale specifier such as `en`, `en-US`,
/// `zh-Hans-CN` or `pt_BR`.
pub fn is_locale_spec(text: &str) -> bool {
    LOCALE_REGEX.is_match(text)
}

/// Returns true if the locale specifier carries more than a language subtag.
pub fn has_region_or_script(locale: &str) -> bool {
    is_locale_spec(locale) && locale.contains(['-', '_'])
}

/// Normalize a relative path into `/`-separated segments.
///
/// Removes `.` segments, resolves `..` against preceding segments and turns
/// backslashes into forward slashes. An empty result is returned as `.`.
///
/// # Examples
///
/// ```
/// use yamlloc::utils::normalize_path;
///
/// assert_eq!(normalize_path("./test.yml"), "test.yml");
/// assert_eq!(normalize_path("de-DE/./x/../test.yml"), "de-DE/test.yml");
/// assert_eq!(normalize_path("./"), ".");
/// ```
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Split a normalized path into its directory (possibly empty) and file name.
pub fn split_dir(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    }
}

/// Split a file name into its stem and extension (without the dot).
///
/// A leading dot does not start an extension, so `.hidden` has no extension.
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => (&file_name[..pos], Some(&file_name[pos + 1..])),
        _ => (file_name, None),
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_hash_key_is_stable() {
        assert_eq!(hash_key(""), "r0");
        assert_eq!(hash_key("a"), "r6355537");
        assert_eq!(hash_key("test.yml"), "r343014569");
        assert_eq!(hash_key("test2.yml"), "r485332932");
        assert_eq!(hash_key("x/y/z/foo.yaml"), "r70221679");
        assert_eq!(hash_key("asdf.yml"), "r699351263");
        assert_eq!(hash_key("zh.yml"), "r761853813");
        assert_eq!(hash_key("customization/en-ZA.yml"), "r848382201");
        assert_eq!(hash_key("customization/en-CHOCOLATE.yml"), "r975324452");
    }

    #[test]
    fn test_hash_key_uses_utf16_units() {
        // a non-BMP character is two code units, so it differs from its
        // scalar value folded in once
        let emoji = hash_key("😀");
        let high = 0xD83Du64;
        let low = 0xDE00u64;
        let step = |hash: u64, unit: u64| ((hash + unit) * HASH_MULTIPLIER) % HASH_MODULUS;
        assert_eq!(emoji, format!("r{}", step(step(0, high), low)));
        assert_eq!(emoji, "r134299539");
    }

    #[test]
    fn test_is_locale_spec() {
        assert!(is_locale_spec("en"));
        assert!(is_locale_spec("en-US"));
        assert!(is_locale_spec("zh-Hans-CN"));
        assert!(is_locale_spec("pt_BR"));
        assert!(is_locale_spec("es-419"));

        assert!(!is_locale_spec("EN"));
        assert!(!is_locale_spec("strings"));
        assert!(!is_locale_spec("en-CHOCOLATE"));
        assert!(!is_locale_spec(""));
    }

    #[test]
    fn test_has_region_or_script() {
        assert!(has_region_or_script("en-ZA"));
        assert!(has_region_or_script("zh_Hans"));
        assert!(!has_region_or_script("foo"));
        assert!(!has_region_or_script("en"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./test.yml"), "test.yml");
        assert_eq!(normalize_path("x/y/z/foo.yaml"), "x/y/z/foo.yaml");
        assert_eq!(normalize_path("a\\b\\c.yml"), "a/b/c.yml");
        assert_eq!(normalize_path("de-DE/./de.yml"), "de-DE/de.yml");
        assert_eq!(normalize_path("../up.yml"), "../up.yml");
        assert_eq!(normalize_path("a/../../up.yml"), "../up.yml");
        assert_eq!(normalize_path("/abs/./x.yml"), "/abs/x.yml");
        assert_eq!(normalize_path(""), ".");
    }

    #[test]
    fn test_split_dir_and_extension() {
        assert_eq!(split_dir("foo/bar/x.yml"), ("foo/bar", "x.yml"));
        assert_eq!(split_dir("x.yml"), ("", "x.yml"));
        assert_eq!(split_extension("x.yml"), ("x", Some("yml")));
        assert_eq!(split_extension("strings.en-US.yaml"), ("strings.en-US", Some("yaml")));
        assert_eq!(split_extension(".hidden"), (".hidden", None));
        assert_eq!(split_extension("README"), ("README", None));
    }
}
