//! extsort - index files by extension and sort them into per-extension folders.
//!
//! Usage:
//!   extsort [PATH]                 Scan PATH (prompted for if omitted), list files
//!                                  by extension, then offer to sort them
//!   extsort PATH --yes             Sort without asking
//!   extsort PATH --no-reorganize   Only list
//!   extsort PATH --format json     Print the listing as JSON
//!   extsort --help                 Show help

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use dialoguer::{Confirm, Input};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use extsort_core::{
    DEFAULT_SLOT_COUNT, DotfilePolicy, ExtensionIndex, FileRecord, ScanConfig, ScanError,
};
use extsort_ops::{ConflictResolution, ReorganizeEvent, ReorganizeOptions, reorganize_with};
use extsort_scan::{ScanReport, Scanner, WalkEvent};

/// Folder created under the home directory when no destination is given.
const SORTED_FOLDER: &str = "Sorted_Files";

#[derive(Parser)]
#[command(
    name = "extsort",
    version,
    about = "Index files by extension and sort them into per-extension folders",
    long_about = "extsort walks a directory tree breadth-first, indexes every file by its \
                  extension and lists them grouped by extension. It can then copy each \
                  group into `<extension>_files` under a destination folder \
                  (~/Sorted_Files by default). Sources are never moved or deleted."
)]
struct Cli {
    /// Directory to scan (prompted for if omitted)
    path: Option<PathBuf>,

    /// Destination root for sorted copies [default: ~/Sorted_Files]
    #[arg(short, long)]
    dest: Option<PathBuf>,

    /// Sort without asking for confirmation
    #[arg(short, long, conflicts_with = "no_reorganize")]
    yes: bool,

    /// Only list files; never sort
    #[arg(short = 'n', long)]
    no_reorganize: bool,

    /// Show what sorting would copy without touching the disk
    #[arg(long)]
    dry_run: bool,

    /// Number of slots in the extension index
    #[arg(long, default_value_t = DEFAULT_SLOT_COUNT)]
    slots: NonZeroUsize,

    /// How names like `.gitignore` are keyed
    #[arg(long, value_enum, default_value_t = DotfileArg::AsExtension)]
    dotfiles: DotfileArg,

    /// What to do when a sorted copy already exists
    #[arg(long, value_enum, default_value_t = ConflictArg::Overwrite)]
    conflict: ConflictArg,

    /// Descend into symlinked directories (no cycle detection)
    #[arg(long)]
    follow_symlinks: bool,

    /// Skip hidden files and directories
    #[arg(long)]
    no_hidden: bool,

    /// Skip entries with this name (`*` allowed at either end); repeatable
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Listing format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DotfileArg {
    /// `.gitignore` has extension `gitignore`
    AsExtension,
    /// `.gitignore` has no extension
    NoExtension,
}

impl From<DotfileArg> for DotfilePolicy {
    fn from(arg: DotfileArg) -> Self {
        match arg {
            DotfileArg::AsExtension => DotfilePolicy::AsExtension,
            DotfileArg::NoExtension => DotfilePolicy::NoExtension,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConflictArg {
    Overwrite,
    Skip,
    Rename,
}

impl From<ConflictArg> for ConflictResolution {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Overwrite => ConflictResolution::Overwrite,
            ConflictArg::Skip => ConflictResolution::Skip,
            ConflictArg::Rename => ConflictResolution::AutoRename,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = match &cli.path {
        Some(path) => path.clone(),
        None => prompt_for_root()?,
    };
    if !root.is_dir() {
        bail!("Invalid directory path: {}", root.display());
    }

    let config = ScanConfig::builder()
        .root(root)
        .slot_count(cli.slots)
        .dotfile_policy(DotfilePolicy::from(cli.dotfiles))
        .follow_symlinks(cli.follow_symlinks)
        .include_hidden(!cli.no_hidden)
        .ignore_patterns(cli.ignore.clone())
        .build()
        .map_err(|e| ScanError::InvalidConfig {
            message: e.to_string(),
        })?;

    let (index, report) = run_scan(config, cli.format)?;

    match cli.format {
        OutputFormat::Text => print_listing(&index, &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing(&index))?),
    }

    if index.is_empty() || cli.no_reorganize {
        return Ok(());
    }

    let destination = match cli.dest {
        Some(dest) => dest,
        None => default_destination()?,
    };

    if !cli.yes && !confirm_reorganize(&destination)? {
        return Ok(());
    }

    let options = ReorganizeOptions::builder()
        .conflict(ConflictResolution::from(cli.conflict))
        .dry_run(cli.dry_run)
        .build()?;
    run_reorganize(&index, &destination, options)
}

/// Install a stderr subscriber; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "extsort={default_level},extsort_scan={default_level},extsort_ops={default_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt_for_root() -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt("Enter the path of the root directory to scan")
        .interact_text()
        .context("Failed to read directory path")?;
    Ok(PathBuf::from(input.trim()))
}

fn default_destination() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| eyre!("Could not determine home directory"))?;
    Ok(home.join(SORTED_FOLDER))
}

fn confirm_reorganize(destination: &Path) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "Do you want to sort and copy the files to {}?",
            destination.display()
        ))
        .default(false)
        .interact()
        .context("Failed to read answer")
}

/// Scan the tree, echoing visited directories and warnings as they happen.
fn run_scan(config: ScanConfig, format: OutputFormat) -> Result<(ExtensionIndex, ScanReport)> {
    tracing::info!(root = %config.root.display(), slots = config.slot_count.get(), "scanning");
    let scanner = Scanner::new(config);
    let mut index = ExtensionIndex::with_slots(scanner.config().slot_count);

    let report = scanner
        .scan_with(&mut index, |event| match event {
            WalkEvent::DirectoryEntered(dir) => {
                if matches!(format, OutputFormat::Text) {
                    println!("Directory: {}", display_name(dir));
                }
            }
            WalkEvent::Warning(warning) => eprintln!("Warning: {warning}"),
            WalkEvent::FileIndexed(_) => {}
        })
        .context("Scan failed")?;

    Ok((index, report))
}

fn print_listing(index: &ExtensionIndex, report: &ScanReport) {
    println!();
    println!("{}", "─".repeat(70));
    println!(" All files organized by extension");
    println!("{}", "─".repeat(70));

    for bucket in index {
        println!();
        println!(
            " [{}] {} files, {}",
            display_extension(bucket.extension()),
            bucket.tree().len(),
            format_size(bucket.tree().total_size())
        );
        for record in bucket.tree() {
            println!(
                "   File: {} | Extension: {} | Size: {} bytes",
                record.name(),
                record.extension(),
                record.size()
            );
        }
    }

    println!();
    println!(
        " {} files ({}) in {} extensions, {} directories scanned in {:.2}s ({:.0} files/s)",
        index.file_count(),
        format_size(index.total_size()),
        index.extension_count(),
        report.stats.dirs_visited,
        report.duration.as_secs_f64(),
        report.files_per_second()
    );
    if report.has_warnings() {
        println!(" {} warning(s) during scan", report.warnings.len());
    }
}

#[derive(Serialize)]
struct BucketListing<'a> {
    extension: &'a str,
    folder: String,
    files: Vec<&'a FileRecord>,
}

fn listing(index: &ExtensionIndex) -> Vec<BucketListing<'_>> {
    index
        .buckets()
        .map(|bucket| BucketListing {
            extension: bucket.extension(),
            folder: bucket.folder_name(),
            files: bucket.tree().iter().collect(),
        })
        .collect()
}

fn run_reorganize(
    index: &ExtensionIndex,
    destination: &Path,
    options: ReorganizeOptions,
) -> Result<()> {
    tracing::info!(destination = %destination.display(), dry_run = options.dry_run, "reorganizing");
    if !options.dry_run {
        std::fs::create_dir_all(destination)
            .with_context(|| format!("Failed to create {}", destination.display()))?;
    }

    println!();
    println!(
        "{} files into {}...",
        if options.dry_run { "Planning copy of" } else { "Copying" },
        destination.display()
    );

    let summary = reorganize_with(index, destination, options, |event| match event {
        ReorganizeEvent::FolderReady { path, created, .. } => {
            if *created {
                println!("Created folder: {}", display_name(path));
            }
        }
        ReorganizeEvent::FolderFailed { error, .. } => {
            eprintln!("Error creating directory: {error}");
        }
        ReorganizeEvent::Copied { destination, .. } => {
            let folder = destination.parent().map(display_name).unwrap_or_default();
            println!("Copied: {} to {}", display_name(destination), folder);
        }
        ReorganizeEvent::Skipped { source, reason, .. } => {
            println!("Skipped: {} ({reason})", source.display());
        }
        ReorganizeEvent::SourceMissing { source } => {
            eprintln!("File not found: {}", source.display());
        }
        ReorganizeEvent::CopyFailed { error } => eprintln!("Error copying file: {error}"),
    });

    println!();
    println!(" {} ({})", summary.summary(), format_size(summary.bytes_copied));
    println!(" Files have been sorted into: {}", destination.display());

    Ok(())
}

/// Final path component, or the whole path for roots like `/`.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() { "(none)" } else { extension }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
