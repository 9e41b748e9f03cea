//! Report formatting and printing utilities.
//!
//! Separate from core logic so the engine can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, FileFailure, InitSummary, LocalizeSummary,
};
use crate::config::CONFIG_FILE_NAME;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

pub fn print(result: &CommandResult, verbose: bool) {
    let stdout = &mut io::stdout().lock();
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract(summary, result.files_checked, stdout),
        CommandSummary::Localize(summary) => print_localize(summary, stdout),
        CommandSummary::Init(summary) => print_init(summary, stdout),
    }

    let stderr = &mut io::stderr().lock();
    print_failures_to(&result.failures, verbose, stderr);
    if result.skipped_count > 0 && !verbose {
        let _ = writeln!(
            stderr,
            "{} {} path(s) could not be scanned (use {} for details)",
            "warning:".bold().yellow(),
            result.skipped_count,
            "-v".cyan()
        );
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

pub fn print_extract<W: Write>(summary: &ExtractSummary, files_checked: usize, writer: &mut W) {
    if summary.json {
        for (_, units) in &summary.files {
            for unit in units {
                if let Ok(line) = serde_json::to_string(unit) {
                    let _ = writeln!(writer, "{}", line);
                }
            }
        }
        return;
    }

    for (path, units) in &summary.files {
        if units.is_empty() {
            continue;
        }
        let _ = writeln!(writer, "{}", path.bold());
        for unit in units {
            if let Some(comment) = unit.comment.as_deref().filter(|c| !c.is_empty()) {
                let _ = writeln!(writer, "  {}", format!("# {}", comment).dimmed());
            }
            let text = match unit.source_text() {
                Some(text) => format!("{:?}", text),
                None => "(plural)".to_string(),
            };
            let _ = writeln!(writer, "  {} = {}", unit.key.cyan(), text);
        }
    }

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} from {}",
            plural(summary.unit_count(), "string"),
            plural(files_checked, "file")
        )
        .green()
    );
}

pub fn print_localize<W: Write>(summary: &LocalizeSummary, writer: &mut W) {
    for output in &summary.outputs {
        let _ = writeln!(
            writer,
            "  {} -> {} [{}] {}/{} translated",
            output.source,
            output.output.cyan(),
            output.locale,
            output.translated,
            output.total
        );
    }

    let count = plural(summary.outputs.len(), "file");
    if summary.is_apply {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Wrote {} to {}", count, summary.output_dir.display()).green()
        );
    } else {
        let _ = writeln!(
            writer,
            "Would write {}. Run with {} to write them.",
            count,
            "--apply".cyan()
        );
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

/// Print files that failed: each error when verbose, otherwise a count.
pub fn print_failures_to<W: Write>(failures: &[FileFailure], verbose: bool, writer: &mut W) {
    if failures.is_empty() {
        return;
    }
    if verbose {
        for failure in failures {
            let _ = writeln!(
                writer,
                "{} {}: {:#}",
                "error:".bold().red(),
                failure.path,
                failure.error
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be processed (use {} for details)",
            "warning:".bold().yellow(),
            failures.len(),
            "-v".cyan()
        );
    }
}
