use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use superclean_core::{
    CleanConfig, CleanEvent, CleanSummary, DirectoryErrorPolicy, FileCleaner, OsFileSystem,
};

/// 横幅宽度
const BANNER_WIDTH: usize = 60;

#[derive(Parser, Debug)]
#[command(name = "superclean")]
#[command(about = "Delete build output files from bin/obj directories across a source tree")]
#[command(version)]
pub struct Cli {
    /// Directory to clean (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Directory names to clean, default: bin, obj (can be specified multiple times)
    #[arg(short = 's', long = "search", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub search: Vec<String>,

    /// Directory names to skip entirely, default: .git, .vs, .build, .nuget, node_modules, packages
    #[arg(short = 'i', long = "ignore", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// File masks to delete, default: *.dll, *.pdb, *.exe, .cache
    #[arg(short = 'm', long = "mask", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub masks: Vec<String>,

    /// Stop the whole run when a directory cannot be read
    #[arg(long)]
    pub abort_on_inaccessible: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // 设置日志级别
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "superclean_core={log_level},superclean_cli={log_level}"
        ))
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

/// 执行一次清理并把报告写入 `out`
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let root = match &cli.path {
        Some(path) => std::path::absolute(path)
            .with_context(|| format!("Failed to resolve path {}", path.display()))?,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    let config = create_clean_config(cli);
    let cleaner = FileCleaner::new(config, OsFileSystem)?;

    if !cli.json {
        write_banner(out)?;
    }

    let mut write_error = None;
    let summary = cleaner.clean(&root, |event| {
        if cli.json || write_error.is_some() {
            return;
        }
        if let Err(err) = render_event(out, &event) {
            write_error = Some(err);
        }
    })?;

    if let Some(err) = write_error {
        return Err(err).context("Failed to write report");
    }

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
    } else {
        display_summary(out, &summary)?;
    }

    Ok(())
}

fn create_clean_config(cli: &Cli) -> CleanConfig {
    let mut config = CleanConfig::default();

    if !cli.search.is_empty() {
        config.search_directories = cli.search.clone();
    }
    if !cli.ignore.is_empty() {
        config.ignore_directories = cli.ignore.clone();
    }
    if !cli.masks.is_empty() {
        config.file_masks = cli.masks.clone();
    }
    if cli.abort_on_inaccessible {
        config.on_directory_error = DirectoryErrorPolicy::Abort;
    }

    config
}

fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    let border = "*".repeat(BANNER_WIDTH);

    writeln!(out, "{border}")?;
    writeln!(out, "* SuperClean (v{})", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "* {}", env!("CARGO_PKG_REPOSITORY"))?;
    writeln!(out, "{border}")?;
    writeln!(out)
}

fn render_event<W: Write>(out: &mut W, event: &CleanEvent<'_>) -> io::Result<()> {
    match event {
        CleanEvent::DirectoryCleaned(report) => {
            let deleted = report.deleted_count();
            if deleted > 0 {
                writeln!(
                    out,
                    "Deleted {} File(s) in Directory {}",
                    deleted,
                    report.directory.display()
                )?;
            }
            for message in report.failure_messages() {
                writeln!(out, "{message}")?;
            }
        }
        CleanEvent::DirectorySkipped { error, .. } => writeln!(out, "{error}")?,
    }
    Ok(())
}

fn display_summary<W: Write>(out: &mut W, summary: &CleanSummary) -> io::Result<()> {
    if !summary.has_deletions() {
        writeln!(out, "No Files Found")?;
        writeln!(out)?;
    }
    Ok(())
}
