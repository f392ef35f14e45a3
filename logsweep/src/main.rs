//! # logsweep
//!
//! A CLI tool that frees disk space on a server by truncating live logs and
//! deleting rotated archives, panel log databases and old backups.
//!
//! ## Usage
//!
//! ```bash
//! # Clean everything in the built-in target list (requires root)
//! sudo logsweep
//!
//! # See what would be freed without touching anything
//! sudo logsweep --dry-run
//!
//! # Only backups and archived logs, forcing logrotate first
//! sudo logsweep --group backups --group archived-logs --rotate
//!
//! # Use a custom target list against a mounted image
//! logsweep --targets targets.toml --root /mnt/image --skip-root-check
//!
//! # Machine-readable report
//! sudo logsweep --output json
//! ```

mod render;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use logsweeplib::{
    builtin_targets, disk_usage, ensure_root, load_targets, rotate_logs, sweep, Group,
    SweepOptions, SweepSummary, TableRenderer, TableWriter, Target, LOGROTATE_CONF,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use render::{disk_heading, summary_text, JsonReport, OutputMode};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("logsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Free disk space by truncating logs and deleting stale archives and backups")
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .default_value("/")
                .help("Resolve target paths under DIR instead of /"),
        )
        .arg(
            Arg::new("targets")
                .long("targets")
                .value_name("FILE")
                .help("TOML target list replacing the built-in targets"),
        )
        .arg(
            Arg::new("group")
                .short('g')
                .long("group")
                .action(ArgAction::Append)
                .value_parser(Group::ALL.map(|g| g.as_str()))
                .help("Only clean targets in this group (can be specified multiple times)"),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report what would be freed without modifying anything"),
        )
        .arg(
            Arg::new("skip-root-check")
                .long("skip-root-check")
                .action(ArgAction::SetTrue)
                .help("Run even when not root"),
        )
        .arg(
            Arg::new("rotate")
                .long("rotate")
                .action(ArgAction::SetTrue)
                .help("Force a logrotate pass before cleaning"),
        )
        .arg(
            Arg::new("logrotate-conf")
                .long("logrotate-conf")
                .value_name("FILE")
                .default_value(LOGROTATE_CONF)
                .help("logrotate configuration used with --rotate"),
        )
        .arg(
            Arg::new("disk-usage")
                .long("disk-usage")
                .action(ArgAction::SetTrue)
                .help("Show df -h before and after cleaning"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value("table")
                .value_parser(["table", "json"])
                .help("Output format"),
        )
        .arg(
            Arg::new("color")
                .long("color")
                .default_value("auto")
                .value_parser(["auto", "always", "never"])
                .help("Color the status column"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more details to stderr (-v info, -vv debug)"),
        )
}

/// Install the stderr log subscriber.
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "logsweep=warn,logsweeplib=warn",
        1 => "logsweep=info,logsweeplib=info",
        _ => "logsweep=debug,logsweeplib=debug",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Build sweep options from matches
fn build_options(matches: &ArgMatches) -> SweepOptions {
    let root = matches
        .get_one::<String>("root")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"));
    let groups: Vec<Group> = matches
        .get_many::<String>("group")
        .map(|v| v.filter_map(|s| s.parse().ok()).collect())
        .unwrap_or_default();

    SweepOptions::new()
        .root(root)
        .groups(groups)
        .dry_run(matches.get_flag("dry-run"))
}

/// Target list from --targets or the built-in list
fn resolve_targets(matches: &ArgMatches) -> anyhow::Result<Vec<Target>> {
    match matches.get_one::<String>("targets") {
        Some(path) => Ok(load_targets(path)?),
        None => Ok(builtin_targets()),
    }
}

fn colors_wanted(matches: &ArgMatches) -> bool {
    match matches.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => true,
        Some("never") => false,
        _ => console::colors_enabled(),
    }
}

/// Optional df report; failures are logged and skipped.
fn report_disk(matches: &ArgMatches, options: &SweepOptions) -> Option<String> {
    if !matches.get_flag("disk-usage") {
        return None;
    }
    match disk_usage(&options.root) {
        Ok(out) => Some(out),
        Err(e) => {
            warn!(error = %e, "disk usage report unavailable");
            None
        }
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<SweepSummary> {
    let options = build_options(matches);
    let targets = resolve_targets(matches)?;
    let output_mode: OutputMode = matches
        .get_one::<String>("output")
        .map(|s| s.parse::<OutputMode>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();
    let colored = colors_wanted(matches) && !output_mode.is_structured();

    if !matches.get_flag("skip-root-check") {
        ensure_root()?;
    }

    let disk_before = report_disk(matches, &options);
    if let (Some(df), OutputMode::Table) = (&disk_before, output_mode) {
        println!("{}\n{}", disk_heading("清理前磁盘使用", colored), df.trim_end());
    }

    if matches.get_flag("rotate") && !options.dry_run {
        let conf = matches
            .get_one::<String>("logrotate-conf")
            .map(|s| s.as_str())
            .unwrap_or(LOGROTATE_CONF);
        if let Err(e) = rotate_logs(conf) {
            warn!(error = %e, "log rotation failed, continuing");
        }
    }

    let summary = match output_mode {
        OutputMode::Table => {
            let renderer = TableRenderer::new().colored(colored);
            let mut writer = TableWriter::begin(renderer, io::stdout().lock())?;
            let summary = sweep(&targets, &options, |record| writer.push(record))?;
            debug!(rows = writer.rows(), "table written");
            writer.finish()?;
            println!("{}", summary_text(&summary, options.dry_run, colored));
            summary
        }
        OutputMode::Json => {
            let mut records = Vec::new();
            let summary = sweep(&targets, &options, |record| {
                records.push(record.clone());
                Ok(())
            })?;
            let report = JsonReport {
                dry_run: options.dry_run,
                records,
                summary,
                disk_before,
                disk_after: report_disk(matches, &options),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serializing report")?
            );
            return Ok(summary);
        }
    };

    if let Some(df) = report_disk(matches, &options) {
        println!("{}\n{}", disk_heading("清理后磁盘使用", colored), df.trim_end());
    }

    Ok(summary)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(summary) => {
            tracing::info!(
                succeeded = summary.succeeded,
                missing = summary.missing,
                failed = summary.failed,
                freed = summary.freed_bytes,
                "sweep finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
