//! Reader for the subset of YAML used by resource files.
//!
//! The reader is line oriented and indentation driven. It understands block
//! mappings (plain, quoted and `? ` explicit keys), block sequences including
//! indentless ones, plain scalars spanning several lines, single and double
//! quoted scalars, literal and folded block scalars, and single-line flow
//! collections. Anchors, aliases, tags and multi-document streams are
//! rejected.
//!
//! Comment lines are remembered while scanning and handed to the next entry
//! that starts; a blank line, or any other content, drops them. This is how
//! leading comments end up on [`MappingEntry::comment`] and
//! [`SequenceEntry::comment`].

use std::sync::LazyLock;

use regex::Regex;

use crate::core::document::{DocumentNode, LeadingComment, MappingEntry, Scalar, SequenceEntry};
use crate::core::error::{Error, Result};

static INT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+)$").unwrap());

static FLOAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
    )
    .unwrap()
});

/// Parse document text into a node tree.
///
/// An empty document (or one holding only comments) parses to a null scalar.
pub fn parse(content: &str) -> Result<DocumentNode> {
    Parser::new(content).parse_document()
}

/// Resolve a plain scalar per the YAML 1.2 core schema.
pub fn resolve_plain(text: &str) -> Scalar {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => Scalar::Null,
        "true" | "True" | "TRUE" => Scalar::Bool(true),
        "false" | "False" | "FALSE" => Scalar::Bool(false),
        _ if INT_REGEX.is_match(text) => Scalar::Int(text.to_string()),
        _ if FLOAT_REGEX.is_match(text) => Scalar::Float(text.to_string()),
        _ => Scalar::Str(text.to_string()),
    }
}

struct Parser {
    lines: Vec<String>,
    pos: usize,
    /// Comment lines seen since the last blank line or content line.
    pending: Vec<String>,
}

/// Where the key of a `key: value` line ends.
struct EntryStart {
    key: String,
    /// Byte offset just past the `:` separator, relative to the entry start.
    value_offset: usize,
}

impl Parser {
    fn new(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        Self {
            lines: content.lines().map(str::to_string).collect(),
            pos: 0,
            pending: Vec::new(),
        }
    }

    fn current(&self) -> Option<&str> {
        self.lines.get(self.pos).map(String::as_str)
    }

    fn line_number(&self) -> usize {
        self.pos + 1
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::parse(self.line_number(), message)
    }

    fn parse_document(mut self) -> Result<DocumentNode> {
        self.skip_preamble();
        let root = self.parse_node(0)?;

        self.skip_insignificant();
        if self.current().is_some_and(|line| line.trim_end() == "...") {
            self.pos += 1;
            self.skip_insignificant();
        }
        if let Some(line) = self.current() {
            let message = if is_document_marker(line) {
                "multiple documents are not supported"
            } else {
                "unexpected content after the document"
            };
            return Err(self.error(message));
        }
        Ok(root)
    }

    /// Skip directives and the `---` start marker.
    fn skip_preamble(&mut self) {
        loop {
            self.skip_insignificant();
            let Some(line) = self.current() else { return };
            if line.starts_with('%') {
                self.pos += 1;
                continue;
            }
            if line.trim_end() == "---" {
                self.pending.clear();
                self.pos += 1;
            } else if line.starts_with("--- ") {
                self.pending.clear();
                self.blank_out(3);
            }
            return;
        }
    }

    /// Skip blank and comment lines, collecting comments for the next entry.
    fn skip_insignificant(&mut self) {
        while let Some(line) = self.lines.get(self.pos) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                self.pending.clear();
            } else if let Some(text) = trimmed.strip_prefix('#') {
                self.pending.push(text.to_string());
            } else {
                break;
            }
            self.pos += 1;
        }
    }

    fn take_comment(&mut self) -> Option<LeadingComment> {
        if self.pending.is_empty() {
            None
        } else {
            Some(LeadingComment {
                lines: std::mem::take(&mut self.pending),
            })
        }
    }

    /// Replace the first `col` bytes of the current line with spaces so that
    /// an inline value can be parsed as if it started its own line.
    fn blank_out(&mut self, col: usize) {
        if let Some(line) = self.lines.get_mut(self.pos) {
            line.replace_range(..col, &" ".repeat(col));
        }
    }

    /// Inspect the current line: its indentation and content.
    fn peek_content(&self) -> Result<Option<(usize, String)>> {
        let Some(line) = self.current() else {
            return Ok(None);
        };
        if is_document_marker(line) {
            return Ok(None);
        }
        let indent = indent_of(line);
        let content = &line[indent..];
        if content.starts_with('\t') {
            return Err(self.error("tab characters are not allowed in indentation"));
        }
        Ok(Some((indent, content.to_string())))
    }

    /// Parse whatever node starts at or after the current line, provided it is
    /// indented at least `min_indent` columns.
    fn parse_node(&mut self, min_indent: usize) -> Result<DocumentNode> {
        self.skip_insignificant();
        let Some((indent, content)) = self.peek_content()? else {
            return Ok(DocumentNode::Scalar(Scalar::Null));
        };
        if indent < min_indent {
            return Ok(DocumentNode::Scalar(Scalar::Null));
        }

        if is_sequence_item(&content) {
            self.parse_sequence(indent)
        } else if is_explicit_key(&content) || self.entry_start(&content)?.is_some() {
            self.parse_mapping(indent)
        } else {
            self.parse_inline(indent, min_indent)
        }
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<DocumentNode> {
        let mut entries: Vec<MappingEntry> = Vec::new();

        loop {
            self.skip_insignificant();
            let Some((line_indent, content)) = self.peek_content()? else {
                break;
            };
            if line_indent < indent {
                break;
            }
            if line_indent > indent {
                return Err(self.error("unexpected indentation"));
            }

            let comment = self.take_comment();
            let (key, value) = if is_explicit_key(&content) {
                self.parse_explicit_entry(indent, &content)?
            } else {
                match self.entry_start(&content)? {
                    Some(start) => {
                        let value = self.parse_entry_value(indent, indent + start.value_offset)?;
                        (start.key, value)
                    }
                    None => return Err(self.error("expected a `key: value` entry")),
                }
            };

            if entries.iter().any(|entry| entry.key == key) {
                return Err(Error::parse(
                    self.line_number().saturating_sub(1).max(1),
                    format!("duplicate key '{}'", key),
                ));
            }
            entries.push(MappingEntry {
                key,
                value,
                comment,
            });
        }

        Ok(DocumentNode::Mapping(entries))
    }

    /// `? key` followed by an optional `: value` line at the same indentation.
    fn parse_explicit_entry(
        &mut self,
        indent: usize,
        content: &str,
    ) -> Result<(String, DocumentNode)> {
        let key_text = strip_comment(&content[1..]).trim();
        if key_text.is_empty() {
            return Err(self.error("multi-line explicit keys are not supported"));
        }
        let key = self.decode_key(key_text)?;
        self.pos += 1;

        self.skip_insignificant();
        self.pending.clear();
        let value = match self.peek_content()? {
            Some((line_indent, content))
                if line_indent == indent
                    && content.starts_with(':')
                    && content[1..].chars().next().is_none_or(char::is_whitespace) =>
            {
                self.parse_entry_value(indent, indent + 1)?
            }
            _ => DocumentNode::Scalar(Scalar::Null),
        };
        Ok((key, value))
    }

    /// Parse the value of the entry on the current line, starting at byte `col`.
    fn parse_entry_value(&mut self, indent: usize, col: usize) -> Result<DocumentNode> {
        let rest = self.current().map(|line| &line[col..]).unwrap_or("");
        let value = rest.trim_start();
        if value.is_empty() || value.starts_with('#') {
            self.pos += 1;
            return self.parse_block_value(indent);
        }
        let value_col = col + (rest.len() - value.len());
        self.blank_out(value_col);
        self.parse_inline(value_col, indent + 1)
    }

    /// The value of `key:` when nothing follows the colon.
    fn parse_block_value(&mut self, parent_indent: usize) -> Result<DocumentNode> {
        self.skip_insignificant();
        match self.peek_content()? {
            Some((indent, _)) if indent > parent_indent => self.parse_node(parent_indent + 1),
            Some((indent, content)) if indent == parent_indent && is_sequence_item(&content) => {
                self.parse_sequence(indent)
            }
            _ => Ok(DocumentNode::Scalar(Scalar::Null)),
        }
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<DocumentNode> {
        let mut items = Vec::new();

        loop {
            self.skip_insignificant();
            let Some((line_indent, content)) = self.peek_content()? else {
                break;
            };
            if line_indent < indent {
                break;
            }
            if line_indent > indent {
                return Err(self.error("unexpected indentation"));
            }
            if !is_sequence_item(&content) {
                break;
            }

            let comment = self.take_comment();
            let rest = &content[1..];
            let item = rest.trim_start();
            let value = if item.is_empty() || item.starts_with('#') {
                self.pos += 1;
                self.parse_node(indent + 1)?
            } else {
                self.blank_out(indent + 1 + (rest.len() - item.len()));
                self.parse_node(indent + 1)?
            };
            items.push(SequenceEntry { value, comment });
        }

        Ok(DocumentNode::Sequence(items))
    }

    /// Parse a value that starts at byte `col` of the current line.
    fn parse_inline(&mut self, col: usize, min_indent: usize) -> Result<DocumentNode> {
        self.pending.clear();
        let first = self
            .current()
            .and_then(|line| line[col..].chars().next())
            .unwrap_or(' ');

        match first {
            '"' | '\'' => Ok(DocumentNode::Scalar(Scalar::Str(self.parse_quoted(col)?))),
            '[' | '{' => self.parse_flow(col),
            '|' | '>' => Ok(DocumentNode::Scalar(Scalar::Str(
                self.parse_block_scalar(col, min_indent)?,
            ))),
            '&' | '*' => Err(self.error("anchors and aliases are not supported")),
            '!' => Err(self.error("tags are not supported")),
            _ => Ok(DocumentNode::Scalar(self.parse_plain(col, min_indent)?)),
        }
    }

    /// A plain scalar, folding in more-indented continuation lines.
    fn parse_plain(&mut self, col: usize, min_indent: usize) -> Result<Scalar> {
        let first = self
            .current()
            .map(|line| strip_comment(&line[col..]).trim().to_string())
            .unwrap_or_default();
        self.pos += 1;

        let mut text = first;
        let mut multiline = false;
        loop {
            let mut look = self.pos;
            while self.lines.get(look).is_some_and(|line| line.trim().is_empty()) {
                look += 1;
            }
            let Some(next) = self.lines.get(look) else {
                break;
            };
            let trimmed = next.trim();
            if indent_of(next) < min_indent || trimmed.starts_with('#') || is_document_marker(next)
            {
                break;
            }

            if self.entry_start(trimmed)?.is_some() {
                self.pos = look;
                return Err(self.error("mapping values are not allowed here"));
            }

            let blanks = look - self.pos;
            if blanks == 0 {
                text.push(' ');
            } else {
                text.push_str(&"\n".repeat(blanks));
            }
            text.push_str(strip_comment(trimmed).trim_end());
            self.pos = look + 1;
            multiline = true;
        }

        Ok(if multiline {
            Scalar::Str(text)
        } else {
            resolve_plain(&text)
        })
    }

    /// A single or double quoted scalar, possibly spanning lines.
    fn parse_quoted(&mut self, col: usize) -> Result<String> {
        let start_line = self.line_number();
        let Some(line) = self.current() else {
            return Err(self.error("expected a quoted scalar"));
        };
        let quote = if line[col..].starts_with('"') { '"' } else { '\'' };
        let mut current = line[col + 1..].to_string();
        let mut fragments: Vec<String> = Vec::new();

        loop {
            if let Some(end) = find_closing(&current, quote) {
                let after = current[end + 1..].trim();
                if !after.is_empty() && !after.starts_with('#') {
                    return Err(self.error("unexpected text after a quoted scalar"));
                }
                fragments.push(current[..end].to_string());
                self.pos += 1;
                break;
            }
            fragments.push(current);
            self.pos += 1;
            match self.current() {
                Some(next) => current = next.trim_start().to_string(),
                None => return Err(Error::parse(start_line, "unterminated quoted scalar")),
            }
        }

        fold_quoted(&fragments, quote).map_err(|message| Error::parse(start_line, message))
    }

    /// A `|` or `>` block scalar whose header is at byte `col`.
    fn parse_block_scalar(&mut self, col: usize, min_indent: usize) -> Result<String> {
        let header = self
            .current()
            .map(|line| line[col..].to_string())
            .unwrap_or_default();
        let folded = header.starts_with('>');
        let mut chomp = Chomp::Clip;
        let mut explicit_indent = None;

        let settings = strip_comment(&header[1..]).trim().to_string();
        for c in settings.chars() {
            match c {
                '-' => chomp = Chomp::Strip,
                '+' => chomp = Chomp::Keep,
                '1'..='9' => explicit_indent = c.to_digit(10).map(|d| d as usize),
                _ => return Err(self.error("invalid block scalar header")),
            }
        }
        self.pos += 1;

        let content_indent = match explicit_indent {
            Some(n) if min_indent == 0 => n,
            Some(n) => min_indent - 1 + n,
            None => {
                let mut look = self.pos;
                while self.lines.get(look).is_some_and(|line| line.trim().is_empty()) {
                    look += 1;
                }
                match self.lines.get(look) {
                    Some(line) if indent_of(line) >= min_indent => indent_of(line),
                    _ => return Ok(String::new()),
                }
            }
        };

        let mut body: Vec<String> = Vec::new();
        while let Some(line) = self.current() {
            if line.trim().is_empty() {
                body.push(line.get(content_indent..).unwrap_or("").to_string());
            } else if indent_of(line) >= content_indent {
                body.push(line[content_indent..].to_string());
            } else {
                break;
            }
            self.pos += 1;
        }

        let trailing = body.iter().rev().take_while(|line| line.is_empty()).count();
        let content = &body[..body.len() - trailing];
        let text = if folded {
            fold_lines(content)
        } else {
            content.join("\n")
        };

        Ok(match chomp {
            Chomp::Strip => text,
            Chomp::Clip if content.is_empty() => text,
            Chomp::Clip => text + "\n",
            Chomp::Keep if content.is_empty() => "\n".repeat(trailing),
            Chomp::Keep => text + &"\n".repeat(trailing + 1),
        })
    }

    /// A flow collection that opens and closes on the current line.
    fn parse_flow(&mut self, col: usize) -> Result<DocumentNode> {
        let text = self
            .current()
            .map(|line| line[col..].to_string())
            .unwrap_or_default();
        let mut reader = FlowReader::new(&text);
        let node = reader
            .value()
            .map_err(|message| self.error(message))?;
        let rest = reader.rest().trim();
        if !rest.is_empty() && !rest.starts_with('#') {
            return Err(self.error("unexpected text after a flow collection"));
        }
        self.pos += 1;
        Ok(node)
    }

    /// Detect a `key:` entry at the start of `content`.
    fn entry_start(&self, content: &str) -> Result<Option<EntryStart>> {
        if content.starts_with('"') || content.starts_with('\'') {
            let quote = if content.starts_with('"') { '"' } else { '\'' };
            let Some(end) = find_closing(&content[1..], quote) else {
                return Ok(None);
            };
            let after = &content[end + 2..];
            let trimmed = after.trim_start();
            let Some(rest) = trimmed.strip_prefix(':') else {
                return Ok(None);
            };
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                return Ok(None);
            }
            let key = fold_quoted(&[content[1..end + 1].to_string()], quote)
                .map_err(|message| self.error(message))?;
            let value_offset = content.len() - rest.len();
            return Ok(Some(EntryStart { key, value_offset }));
        }
        if content.starts_with(['[', '{', '#']) {
            return Ok(None);
        }

        let mut prev_space = false;
        for (i, c) in content.char_indices() {
            if c == '#' && prev_space {
                break;
            }
            if c == ':' {
                let next = content[i + 1..].chars().next();
                if next.is_none_or(char::is_whitespace) {
                    return Ok(Some(EntryStart {
                        key: content[..i].trim_end().to_string(),
                        value_offset: i + 1,
                    }));
                }
            }
            prev_space = c.is_whitespace();
        }
        Ok(None)
    }

    fn decode_key(&self, text: &str) -> Result<String> {
        match text.chars().next() {
            Some(quote @ ('"' | '\'')) => match find_closing(&text[1..], quote) {
                Some(end) if text[end + 2..].trim().is_empty() => {
                    fold_quoted(&[text[1..end + 1].to_string()], quote)
                        .map_err(|message| self.error(message))
                }
                _ => Err(self.error("malformed quoted key")),
            },
            _ => Ok(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Chomp {
    Strip,
    Clip,
    Keep,
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_document_marker(line: &str) -> bool {
    let line = line.trim_end();
    line == "---" || line == "..." || line.starts_with("--- ") || line.starts_with("... ")
}

fn is_sequence_item(content: &str) -> bool {
    content == "-" || content.starts_with("- ") || content.starts_with("-\t")
}

fn is_explicit_key(content: &str) -> bool {
    content == "?" || content.starts_with("? ")
}

/// Cut a trailing ` # comment` from unquoted text.
fn strip_comment(text: &str) -> &str {
    let mut prev_space = true;
    for (i, c) in text.char_indices() {
        if c == '#' && prev_space {
            return &text[..i];
        }
        prev_space = c.is_whitespace();
    }
    text
}

/// Byte index of the closing quote in `text` (which starts after the opening one).
fn find_closing(text: &str, quote: char) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if quote == '"' && c == '\\' {
            chars.next();
            continue;
        }
        if c == quote {
            if quote == '\'' && matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                continue;
            }
            return Some(i);
        }
    }
    None
}

/// Join the lines of a quoted scalar: single breaks become spaces, blank
/// lines become newlines, and escapes are decoded.
fn fold_quoted(fragments: &[String], quote: char) -> std::result::Result<String, String> {
    let mut value = String::new();
    let last = fragments.len().saturating_sub(1);
    let mut after_blank = false;
    let mut escaped_break = false;

    for (i, fragment) in fragments.iter().enumerate() {
        let mut piece = fragment.as_str();
        if i > 0 {
            piece = piece.trim_start();
        }
        if i < last {
            piece = piece.trim_end();
        }
        if i > 0 {
            if piece.is_empty() && i < last {
                value.push('\n');
                after_blank = true;
                continue;
            }
            if !after_blank && !escaped_break {
                value.push(' ');
            }
            after_blank = false;
        }

        if quote == '"' {
            let (decoded, continued) = unescape_double(piece)?;
            value.push_str(&decoded);
            escaped_break = continued;
        } else {
            value.push_str(&piece.replace("''", "'"));
        }
    }
    Ok(value)
}

/// Decode double-quoted escapes. The flag reports a trailing `\` line join.
fn unescape_double(text: &str) -> std::result::Result<(String, bool), String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            return Ok((out, true));
        };
        let decoded = match escape {
            '0' => '\0',
            'a' => '\u{07}',
            'b' => '\u{08}',
            't' | '\t' => '\t',
            'n' => '\n',
            'v' => '\u{0b}',
            'f' => '\u{0c}',
            'r' => '\r',
            'e' => '\u{1b}',
            ' ' => ' ',
            '"' => '"',
            '/' => '/',
            '\\' => '\\',
            'N' => '\u{85}',
            '_' => '\u{a0}',
            'L' => '\u{2028}',
            'P' => '\u{2029}',
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.by_ref().take(width).collect();
                u32::from_str_radix(&digits, 16)
                    .ok()
                    .filter(|_| digits.len() == width)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid escape '\\{}{}'", escape, digits))?
            }
            other => return Err(format!("invalid escape '\\{}'", other)),
        };
        out.push(decoded);
    }
    Ok((out, false))
}

fn is_more_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Folding for `>` block scalars.
fn fold_lines(lines: &[String]) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;
    let mut blanks = 0;

    for line in lines {
        if line.is_empty() {
            blanks += 1;
            continue;
        }
        match prev {
            None => out.push_str(&"\n".repeat(blanks)),
            Some(prev) if is_more_indented(prev) || is_more_indented(line) => {
                out.push_str(&"\n".repeat(blanks + 1));
            }
            Some(_) if blanks == 0 => out.push(' '),
            Some(_) => out.push_str(&"\n".repeat(blanks)),
        }
        out.push_str(line);
        prev = Some(line);
        blanks = 0;
    }
    out
}

/// Text of a scalar used as a mapping key.
fn key_text(scalar: Scalar) -> String {
    match scalar {
        Scalar::Null => "null".to_string(),
        Scalar::Bool(value) => value.to_string(),
        Scalar::Int(text) | Scalar::Float(text) | Scalar::Str(text) => text,
    }
}

/// Recursive reader for single-line flow collections.
struct FlowReader<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> FlowReader<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn expect(&mut self, c: char) -> std::result::Result<(), String> {
        self.skip_whitespace();
        match self.peek() {
            Some(found) if found == c => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(format!("expected '{}' but found '{}'", c, found)),
            None => Err("multi-line flow collections are not supported".to_string()),
        }
    }

    fn value(&mut self) -> std::result::Result<DocumentNode, String> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => self.sequence(),
            Some('{') => self.mapping(),
            Some(_) => self.scalar(false).map(DocumentNode::Scalar),
            None => Err("multi-line flow collections are not supported".to_string()),
        }
    }

    fn sequence(&mut self) -> std::result::Result<DocumentNode, String> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.pos += 1;
                break;
            }
            items.push(SequenceEntry {
                value: self.value()?,
                comment: None,
            });
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                _ => {
                    self.expect(']')?;
                    break;
                }
            }
        }
        Ok(DocumentNode::Sequence(items))
    }

    fn mapping(&mut self) -> std::result::Result<DocumentNode, String> {
        self.expect('{')?;
        let mut entries: Vec<MappingEntry> = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                break;
            }
            let key = key_text(self.scalar(true)?);
            self.skip_whitespace();
            let value = if self.peek() == Some(':') {
                self.pos += 1;
                self.skip_whitespace();
                if matches!(self.peek(), Some(',' | '}')) {
                    DocumentNode::Scalar(Scalar::Null)
                } else {
                    self.value()?
                }
            } else {
                DocumentNode::Scalar(Scalar::Null)
            };
            if entries.iter().any(|entry| entry.key == key) {
                return Err(format!("duplicate key '{}'", key));
            }
            entries.push(MappingEntry {
                key,
                value,
                comment: None,
            });
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                _ => {
                    self.expect('}')?;
                    break;
                }
            }
        }
        Ok(DocumentNode::Mapping(entries))
    }

    fn scalar(&mut self, is_key: bool) -> std::result::Result<Scalar, String> {
        self.skip_whitespace();
        let rest = self.rest();
        if let Some(quote @ ('"' | '\'')) = self.peek() {
            let end = find_closing(&rest[1..], quote)
                .ok_or_else(|| "unterminated quoted scalar".to_string())?;
            let value = fold_quoted(&[rest[1..end + 1].to_string()], quote)?;
            self.pos += end + 2;
            return Ok(Scalar::Str(value));
        }

        let mut end = rest.len();
        let mut prev_space = false;
        for (i, c) in rest.char_indices() {
            let stop = match c {
                ',' | ']' | '}' => true,
                ':' => is_key && rest[i + 1..].chars().next().is_none_or(char::is_whitespace),
                '#' => prev_space,
                _ => false,
            };
            if stop {
                end = i;
                break;
            }
            prev_space = c.is_whitespace();
        }
        self.pos += end;
        Ok(resolve_plain(rest[..end].trim()))
    }
}
