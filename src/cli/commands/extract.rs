use anyhow::Result;

use super::super::args::ExtractCommand;
use super::super::context::CommandContext;
use super::{CommandResult, CommandSummary, ExtractSummary};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let scan = ctx.scan(&cmd.paths);
    let (files, failures) = ctx.load_files(&scan.files);

    let files = files
        .into_iter()
        .filter_map(|file| {
            let path = file.path()?.to_string();
            Some((path, file.translation_set().units().to_vec()))
        })
        .collect();

    Ok(CommandResult {
        summary: CommandSummary::Extract(ExtractSummary {
            files,
            json: cmd.json,
        }),
        failures,
        files_checked: scan.files.len(),
        skipped_count: scan.skipped_count,
    })
}
