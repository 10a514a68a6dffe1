//! Top-level CLI definition and dispatch.

use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::json;

use dirsweep::core::config::{Config, DEFAULT_CUTOFF_HOURS};
use dirsweep::core::errors::Result;
use dirsweep::logger::activity::{ActivityEvent, ActivityLoggerHandle, spawn_logger};
use dirsweep::sweep::Sweeper;
use dirsweep::sweep::report::{DirectoryResult, RunReport};

/// dirsweep — sweep stale files out of configured directories.
#[derive(Debug, Parser)]
#[command(
    name = "dirsweep",
    author,
    version,
    about = "dirsweep - stale file housekeeping",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Perform one sweep of the configured roots.
    Run(RunArgs),
    /// Show the effective configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct RunArgs {
    /// Report what would be deleted without touching the filesystem.
    #[arg(long)]
    dry_run: bool,
    /// Target root; repeatable. Replaces the configured root list.
    #[arg(long, value_name = "PATH")]
    root: Vec<PathBuf>,
    /// Extension filter override: "*" or a comma-separated list.
    #[arg(long, value_name = "LIST")]
    extensions: Option<String>,
    /// Cutoff age in hours; non-numeric input falls back to the default.
    #[arg(long, value_name = "HOURS")]
    cutoff_hours: Option<String>,
    /// Disable the JSONL activity log for this run.
    #[arg(long)]
    no_log: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Print as TOML instead of JSON (ignored with --json).
    #[arg(long)]
    toml: bool,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: CompletionShell,
}

/// Dispatch the parsed CLI.
pub fn run(cli: &Cli) -> Result<()> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Run(args) => run_sweep(cli, args),
        Command::Config(args) => show_config(cli, args),
        Command::Completions(args) => {
            generate(
                args.shell,
                &mut Cli::command(),
                "dirsweep",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

fn run_sweep(cli: &Cli, args: &RunArgs) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    let mut cutoff_fallback: Option<String> = None;

    if !args.root.is_empty() {
        config.sweep.roots = args.root.clone();
    }
    if let Some(extensions) = &args.extensions {
        config.sweep.extensions = extensions.clone();
    }
    if let Some(raw) = &args.cutoff_hours {
        match raw.trim().parse::<i64>() {
            Ok(hours) if hours > 0 => config.sweep.cutoff_hours = hours,
            _ => {
                eprintln!(
                    "[DSW-CONFIG] WARNING: --cutoff-hours {raw:?} is not a positive integer, using default {DEFAULT_CUTOFF_HOURS}"
                );
                config.sweep.cutoff_hours = DEFAULT_CUTOFF_HOURS;
                cutoff_fallback = Some(raw.clone());
            }
        }
    }
    if args.dry_run {
        config.sweep.dry_run = true;
    }

    let logger = if config.logging.enabled && !args.no_log {
        Some(spawn_logger(config.logging.jsonl_path.clone())?)
    } else {
        None
    };
    let handle: Option<ActivityLoggerHandle> = logger.as_ref().map(|(h, _)| h.clone());

    if let (Some(h), Some(given)) = (&handle, cutoff_fallback) {
        h.send(ActivityEvent::ConfigFallback {
            field: "cutoff_hours".to_string(),
            given,
            substituted: DEFAULT_CUTOFF_HOURS.to_string(),
        });
    }

    if cli.verbose && !cli.json {
        println!(
            "config hash {}, cutoff {}h, filter {:?}",
            config.stable_hash()?,
            config.sweep.cutoff_hours,
            config.sweep.extensions
        );
    }

    let dry_run = config.sweep.dry_run;
    let sweeper = Sweeper::new(config, handle.clone());
    let outcome = sweeper.run();

    if let Some((h, join)) = logger {
        h.shutdown();
        let _ = join.join();
    }

    let report = outcome?;
    if cli.json {
        print_json_report(&report, dry_run)?;
    } else if !cli.quiet || report.totals().failures() > 0 {
        print_text_report(&report, dry_run);
    }
    Ok(())
}

fn show_config(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    if args.toml && !cli.json {
        let rendered = toml::to_string_pretty(&config).map_err(|e| {
            dirsweep::core::errors::DswError::Serialization {
                context: "toml",
                details: e.to_string(),
            }
        })?;
        print!("{rendered}");
    } else {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }
    Ok(())
}

// ──────────────────── reporting ────────────────────

fn print_text_report(report: &RunReport, dry_run: bool) {
    let header = if dry_run {
        "Sweep summary (dry run)".bold().yellow()
    } else {
        "Sweep summary".bold()
    };
    println!("{header}");

    for (root, result) in report.entries() {
        println!("  {}: {}", root.cyan(), format_result_line(result));
    }

    let totals = report.totals();
    println!("{}", "Totals:".bold());
    println!("  deleted files: {}", totals.deleted_files.to_string().green());
    println!("  deleted dirs:  {}", totals.deleted_dirs.to_string().green());
    println!("  skipped files: {}", totals.skipped_files);
    let failed_files = totals.failed_files.to_string();
    let failed_dirs = totals.failed_dirs.to_string();
    println!(
        "  failed files:  {}",
        if totals.failed_files > 0 {
            failed_files.red().to_string()
        } else {
            failed_files
        }
    );
    println!(
        "  failed dirs:   {}",
        if totals.failed_dirs > 0 {
            failed_dirs.red().to_string()
        } else {
            failed_dirs
        }
    );
}

fn format_result_line(result: &DirectoryResult) -> String {
    format!(
        "{} files deleted, {} skipped, {} failed, {} dirs deleted, {} dirs failed",
        result.deleted_files,
        result.skipped_files,
        result.failed_files,
        result.deleted_dirs,
        result.failed_dirs
    )
}

fn print_json_report(report: &RunReport, dry_run: bool) -> Result<()> {
    let roots: Vec<serde_json::Value> = report
        .entries()
        .iter()
        .map(|(root, result)| {
            json!({
                "path": root,
                "deleted_files": result.deleted_files,
                "failed_files": result.failed_files,
                "skipped_files": result.skipped_files,
                "deleted_dirs": result.deleted_dirs,
                "failed_dirs": result.failed_dirs,
            })
        })
        .collect();
    let payload = json!({
        "dry_run": dry_run,
        "roots": roots,
        "totals": report.totals(),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
