//! Renders translation units, or a localized document tree, back to text.
//!
//! Output is deterministic: mapping keys are sorted at every level, sequences
//! keep their index order, and every string is written in the first style that
//! reads back to the same value:
//!
//! 1. text with a line break becomes a `|` block literal (`|-` when it does
//!    not end in a newline);
//! 2. text that plain style would misread is double-quoted with escapes;
//! 3. anything else is written plain.
//!
//! An empty document is written as `{}`.

use std::collections::BTreeMap;
use crate::core::document::{DocumentNode, MappingEntry, Scalar, SequenceEntry};
use crate::core::error::{Error, Result};
use crate::core::key_path::{KeyPath, Segment, split_key};
use crate::core::parser::resolve_plain;
use crate::core::unit::{TranslationSet, TranslationUnit, UnitText};

pub const EMPTY_DOCUMENT: &str = "{}\n";

/// Characters that cannot start a plain scalar.
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// Render units as a document.
///
/// `prefix` is the `r<hash>` segment of the file the units came from; it is
/// dropped from every key that starts with it. With `translations` and `locale`, each leaf takes the translation of its
/// key into `locale`; leaves without one keep their source text.
pub fn serialize<'a>(
    units: impl IntoIterator<Item = &'a TranslationUnit>,
    prefix: Option<&str>,
    translations: Option<&TranslationSet>,
    locale: Option<&str>,
) -> Result<String> {
    let document = units_to_document(units, prefix, translations, locale)?;
    Ok(to_yaml(&document))
}

/// Build the sorted document tree for a set of units.
///
/// A leading segment equal to `prefix` names the source file and is dropped;
/// any other first segment, `r<digits>` or not, is a document key. Branches whose keys are all indices become sequences; they must run
/// densely from 0.
pub fn units_to_document<'a>(
    units: impl IntoIterator<Item = &'a TranslationUnit>,
    prefix: Option<&str>,
    translations: Option<&TranslationSet>,
    locale: Option<&str>,
) -> Result<DocumentNode> {
    let mut root: BTreeMap<String, Draft> = BTreeMap::new();

    for unit in units {
        let mut segments = split_key(&unit.key);
        if segments.len() > 1 && prefix.is_some_and(|prefix| segments[0] == prefix) {
            segments.remove(0);
        }

        let translated = match (translations, locale) {
            (Some(set), Some(locale)) => set
                .get_translation(&unit.key, locale)
                .and_then(|translation| translation.target.as_ref()),
            _ => None,
        };
        let value = text_node(translated.unwrap_or(&unit.source));
        insert(&mut root, &segments, value, &unit.key)?;
    }

    finish(Draft::Branch(root), "")
}

fn text_node(text: &UnitText) -> DocumentNode {
    match text {
        UnitText::Single(text) => DocumentNode::Scalar(Scalar::Str(text.clone())),
        UnitText::Plural(variants) => DocumentNode::Mapping(
            variants
                .iter()
                .map(|(variant, text)| MappingEntry {
                    key: variant.clone(),
                    value: DocumentNode::Scalar(Scalar::Str(text.clone())),
                    comment: None,
                })
                .collect(),
        ),
    }
}

/// Partially built tree; branches sort their children.
enum Draft {
    Leaf(DocumentNode),
    Branch(BTreeMap<String, Draft>),
}

fn insert(
    branch: &mut BTreeMap<String, Draft>,
    segments: &[String],
    value: DocumentNode,
    key: &str,
) -> Result<()> {
    let Some((first, rest)) = segments.split_first() else {
        return Ok(());
    };
    let conflict = || Error::ConflictingKey {
        key: key.to_string(),
    };

    if rest.is_empty() {
        if let Some(Draft::Branch(_)) = branch.get(first) {
            return Err(conflict());
        }
        branch.insert(first.clone(), Draft::Leaf(value));
        return Ok(());
    }

    match branch
        .entry(first.clone())
        .or_insert_with(|| Draft::Branch(BTreeMap::new()))
    {
        Draft::Branch(children) => insert(children, rest, value, key),
        Draft::Leaf(_) => Err(conflict()),
    }
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().all(|c| c.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'))
}

fn finish(draft: Draft, path: &str) -> Result<DocumentNode> {
    let children = match draft {
        Draft::Leaf(node) => return Ok(node),
        Draft::Branch(children) => children,
    };
    let child_path = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", path, key)
        }
    };

    if !children.is_empty() && children.keys().all(|key| is_index(key)) {
        let mut indexed = children
            .into_iter()
            .map(|(key, child)| {
                let index = key.parse::<usize>().map_err(|_| Error::SparseSequence {
                    key: child_path(&key),
                })?;
                Ok((index, key, child))
            })
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(index, _, _)| *index);

        if indexed.iter().enumerate().any(|(i, (index, _, _))| i != *index) {
            return Err(Error::SparseSequence {
                key: path.to_string(),
            });
        }
        let items = indexed
            .into_iter()
            .map(|(_, key, child)| {
                Ok(SequenceEntry {
                    value: finish(child, &child_path(&key))?,
                    comment: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(DocumentNode::Sequence(items));
    }

    let entries = children
        .into_iter()
        .map(|(key, child)| {
            let value = finish(child, &child_path(&key))?;
            Ok(MappingEntry {
                key,
                value,
                comment: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DocumentNode::Mapping(entries))
}

/// Replace leaves of a parsed document.
///
/// `substitute` sees each scalar with its path and returns the replacement,
/// or `None` to keep it. Comments are dropped and mapping keys sorted.
pub fn localize_tree<F>(node: &DocumentNode, substitute: &mut F) -> DocumentNode
where
    F: FnMut(&KeyPath, &Scalar) -> Option<Scalar>,
{
    let mut path = KeyPath::new();
    localize_node(node, &mut path, substitute)
}

fn localize_node<F>(node: &DocumentNode, path: &mut KeyPath, substitute: &mut F) -> DocumentNode
where
    F: FnMut(&KeyPath, &Scalar) -> Option<Scalar>,
{
    match node {
        DocumentNode::Scalar(scalar) => {
            DocumentNode::Scalar(substitute(path, scalar).unwrap_or_else(|| scalar.clone()))
        }
        DocumentNode::Mapping(entries) => {
            let mut localized: Vec<MappingEntry> = entries
                .iter()
                .map(|entry| {
                    path.push(Segment::Key(entry.key.clone()));
                    let value = localize_node(&entry.value, path, substitute);
                    path.pop();
                    MappingEntry {
                        key: entry.key.clone(),
                        value,
                        comment: None,
                    }
                })
                .collect();
            localized.sort_by(|a, b| a.key.cmp(&b.key));
            DocumentNode::Mapping(localized)
        }
        DocumentNode::Sequence(items) => DocumentNode::Sequence(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    path.push(Segment::Index(index));
                    let value = localize_node(&item.value, path, substitute);
                    path.pop();
                    SequenceEntry {
                        value,
                        comment: None,
                    }
                })
                .collect(),
        ),
    }
}

/// Render a document tree. Entries are written in the order given.
pub fn to_yaml(node: &DocumentNode) -> String {
    let mut out = String::new();
    match node {
        DocumentNode::Mapping(entries) if !entries.is_empty() => write_mapping(&mut out, entries, 0),
        DocumentNode::Sequence(items) if !items.is_empty() => write_sequence(&mut out, items, 0),
        DocumentNode::Mapping(_) | DocumentNode::Scalar(Scalar::Null) => {
            out.push_str(EMPTY_DOCUMENT)
        }
        DocumentNode::Sequence(_) => out.push_str("[]\n"),
        DocumentNode::Scalar(scalar) => {
            write_scalar(&mut out, scalar, 2);
            // drop the separator space written for `key: value`
            out.remove(0);
        }
    }
    out
}

fn indent_to(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

fn write_mapping(out: &mut String, entries: &[MappingEntry], indent: usize) {
    for entry in entries {
        indent_to(out, indent);
        out.push_str(&format_key(&entry.key));
        out.push(':');
        write_value(out, &entry.value, indent);
    }
}

fn write_sequence(out: &mut String, items: &[SequenceEntry], indent: usize) {
    for item in items {
        let mut nested = String::new();
        match &item.value {
            DocumentNode::Mapping(entries) if !entries.is_empty() => {
                write_mapping(&mut nested, entries, indent + 2);
            }
            DocumentNode::Sequence(items) if !items.is_empty() => {
                write_sequence(&mut nested, items, indent + 2);
            }
            other => {
                indent_to(out, indent);
                out.push('-');
                write_value(out, other, indent);
                continue;
            }
        }
        // the first nested line moves up behind the dash
        indent_to(out, indent);
        out.push_str("- ");
        out.push_str(&nested[indent + 2..]);
    }
}

/// Everything after `key:` or `-`, including the final newline.
fn write_value(out: &mut String, node: &DocumentNode, indent: usize) {
    match node {
        DocumentNode::Scalar(scalar) => write_scalar(out, scalar, indent + 2),
        DocumentNode::Mapping(entries) if entries.is_empty() => out.push_str(" {}\n"),
        DocumentNode::Sequence(items) if items.is_empty() => out.push_str(" []\n"),
        DocumentNode::Mapping(entries) => {
            out.push('\n');
            write_mapping(out, entries, indent + 2);
        }
        DocumentNode::Sequence(items) => {
            out.push('\n');
            write_sequence(out, items, indent + 2);
        }
    }
}

fn write_scalar(out: &mut String, scalar: &Scalar, block_indent: usize) {
    match scalar {
        Scalar::Null => out.push_str(" null\n"),
        Scalar::Bool(value) => {
            out.push(' ');
            out.push_str(if *value { "true" } else { "false" });
            out.push('\n');
        }
        Scalar::Int(raw) | Scalar::Float(raw) => {
            out.push(' ');
            out.push_str(raw);
            out.push('\n');
        }
        Scalar::Str(text) if fits_block_literal(text) => write_block_literal(out, text, block_indent),
        Scalar::Str(text) => {
            out.push(' ');
            out.push_str(&format_text(text));
            out.push('\n');
        }
    }
}

fn fits_block_literal(text: &str) -> bool {
    text.contains('\n')
        && !text.trim().is_empty()
        && !text.chars().any(|c| c.is_control() && c != '\n' && c != '\t')
}

fn write_block_literal(out: &mut String, text: &str, indent: usize) {
    let trailing = text.len() - text.trim_end_matches('\n').len();
    let body = text.strip_suffix('\n').unwrap_or(text);
    let needs_indicator = body
        .split('\n')
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with([' ', '\t']));

    out.push_str(" |");
    if needs_indicator {
        out.push('2');
    }
    match trailing {
        0 => out.push('-'),
        1 => {}
        _ => out.push('+'),
    }
    out.push('\n');

    for line in body.split('\n') {
        if !line.is_empty() {
            indent_to(out, indent);
            out.push_str(line);
        }
        out.push('\n');
    }
}

/// A mapping key, quoted when needed.
pub fn format_key(key: &str) -> String {
    if needs_quotes(key) || key.contains('\n') {
        double_quote(key)
    } else {
        key.to_string()
    }
}

/// A single-line string value, quoted when needed.
pub fn format_text(text: &str) -> String {
    if needs_quotes(text) || text.contains('\n') {
        double_quote(text)
    } else {
        text.to_string()
    }
}

/// Would plain style change or break this text?
pub fn needs_quotes(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return true;
    };
    INDICATORS.contains(&first)
        || text.starts_with("...")
        || text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.ends_with(':')
        || text.contains(": ")
        || text.contains(" #")
        || text.chars().any(char::is_control)
        || !matches!(resolve_plain(text), Scalar::Str(_))
}

pub fn double_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() && (c as u32) < 0x100 => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
