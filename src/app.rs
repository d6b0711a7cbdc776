use std::path::Path;

use crate::cli::commands::LogArgs;
use crate::cli::{Cli, Commands};
use crate::core::DateFilter;
use crate::error::AppError;
use crate::output::{
    output_backup_json, output_session_json, print_backup_table, print_session_table,
};
use crate::run::run_interactive;
use crate::store::SessionLog;
use crate::utils::{Timezone, debug_enabled, parse_date};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) log: SessionLog,
    pub(crate) timezone: Timezone,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(cli: &'a Cli) -> Result<Self, AppError> {
        let timezone = Timezone::parse(cli.timezone.as_deref())?;
        let data_dir = cli.resolve_data_dir();
        if debug_enabled() {
            eprintln!("Data directory: {}", data_dir.display());
        }
        Ok(Self {
            cli,
            log: SessionLog::in_dir(&data_dir),
            timezone,
        })
    }
}

fn handle_log(ctx: &CommandContext<'_>, args: &LogArgs) -> Result<(), AppError> {
    let since = args.since.as_deref().map(parse_date).transpose()?;
    let until = args.until.as_deref().map(parse_date).transpose()?;
    let result = ctx.log.read(&DateFilter::new(since, until))?;

    if args.json {
        println!("{}", output_session_json(&result.records, ctx.cli.order));
        return Ok(());
    }
    if result.records.is_empty() {
        println!("No study sessions found.");
        return Ok(());
    }
    print_session_table(&result, ctx.cli.order, ctx.cli.use_color());
    Ok(())
}

fn handle_export(ctx: &CommandContext<'_>, dest: &Path) -> Result<(), AppError> {
    let bytes = ctx.log.export(dest)?;
    println!(
        "Exported {} ({} bytes) to {}",
        ctx.log.path().display(),
        bytes,
        dest.display()
    );
    Ok(())
}

fn handle_restore(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let backup = ctx.log.restore_latest()?;
    println!(
        "Restored {} from {}",
        ctx.log.path().display(),
        backup.display()
    );
    Ok(())
}

fn handle_backups(ctx: &CommandContext<'_>, json: bool) -> Result<(), AppError> {
    let backups = ctx.log.backups().list();
    if json {
        println!("{}", output_backup_json(&backups));
        return Ok(());
    }
    if backups.is_empty() {
        println!("No backups found in {}.", ctx.log.backups().path().display());
        return Ok(());
    }
    print_backup_table(&backups, ctx.cli.use_color());
    Ok(())
}

/// Dispatch the parsed command. `run` is the default.
pub(crate) fn handle_command(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match &ctx.cli.command {
        None => run_interactive(&ctx.log, ctx.timezone, None, ctx.cli.tick()),
        Some(Commands::Run { topic }) => {
            run_interactive(&ctx.log, ctx.timezone, topic.clone(), ctx.cli.tick())
        }
        Some(Commands::Log(args)) => handle_log(ctx, args),
        Some(Commands::Export { path }) => handle_export(ctx, path),
        Some(Commands::Restore) => handle_restore(ctx),
        Some(Commands::Backups { json }) => handle_backups(ctx, *json),
    }
}
