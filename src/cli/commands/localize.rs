use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::super::args::LocalizeCommand;
use super::super::context::CommandContext;
use super::{CommandResult, CommandSummary, FileFailure, LocalizeSummary, LocalizedOutput};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{TranslationSet, TranslationUnit, UnitText};

/// One entry of a translation list file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationEntry {
    key: String,
    target: UnitText,
    target_locale: String,
}

/// Read a JSON list of `{key, target, targetLocale}` entries.
pub fn load_translations(path: &Path) -> Result<TranslationSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read translation file: {}", path.display()))?;
    let entries: Vec<TranslationEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse translation file: {}", path.display()))?;
    Ok(entries
        .into_iter()
        .map(|entry| TranslationUnit::translation(entry.key, entry.target, &entry.target_locale))
        .collect())
}

pub fn localize(cmd: LocalizeCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let translations = load_translations(&ctx.working_dir.join(&cmd.translations))?;

    let source_locale = ctx.file_type.project().source_locale.clone();
    let locales: Vec<String> = if cmd.locales.is_empty() {
        ctx.config.locales.clone()
    } else {
        cmd.locales.clone()
    };
    let locales: Vec<String> = locales
        .into_iter()
        .filter(|locale| *locale != source_locale)
        .collect();
    if locales.is_empty() {
        bail!(
            "No target locales: pass --locale or set 'locales' in {}",
            CONFIG_FILE_NAME
        );
    }

    let output_dir = match &cmd.output_dir {
        Some(dir) => ctx.working_dir.join(dir),
        None => ctx.base_dir.join(&ctx.config.output_dir),
    };

    let scan = ctx.scan(&[]);
    let (files, mut failures) = ctx.load_files(&scan.files);

    let mut outputs = Vec::new();
    for file in &files {
        let Some(source) = file.path() else {
            continue;
        };
        let units = file.translation_set();
        for locale in &locales {
            let translated = units
                .iter()
                .filter(|unit| translations.get_translation(&unit.key, locale).is_some())
                .count();

            if cmd.apply
                && let Err(error) = file.localize(&translations, locale, &output_dir)
            {
                failures.push(FileFailure {
                    path: source.to_string(),
                    error,
                });
                continue;
            }

            outputs.push(LocalizedOutput {
                source: source.to_string(),
                locale: locale.clone(),
                output: file.localized_path(locale),
                translated,
                total: units.len(),
            });
        }
    }

    Ok(CommandResult {
        summary: CommandSummary::Localize(LocalizeSummary {
            outputs,
            output_dir,
            is_apply: cmd.apply,
        }),
        failures,
        files_checked: scan.files.len(),
        skipped_count: scan.skipped_count,
    })
}
