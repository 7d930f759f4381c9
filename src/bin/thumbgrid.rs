use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde_json::json;
use thumbgrid::{
    DirectoryWalker, FfmpegLogLevel, OperationType, ProgressCallback, ProgressInfo, ScanSummary,
    SheetOptions, SheetOutcome, ThumbnailPipeline,
};

const CLI_AFTER_HELP: &str = "Examples:\n  thumbgrid scan\n  thumbgrid scan /media/videos --out-dir sheets --progress\n  thumbgrid scan . --json\n  thumbgrid sheet input.mp4 --overwrite\n  thumbgrid completions zsh > _thumbgrid";

#[derive(Debug, Parser)]
#[command(
    name = "thumbgrid",
    version,
    about = "Generate contact-sheet thumbnail grids from video files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a per-video progress bar.
    #[arg(long, global = true)]
    progress: bool,

    /// Regenerate sheets whose output file already exists.
    #[arg(long, global = true)]
    overwrite: bool,

    /// Write sheets into this directory instead of next to each video.
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// TTF/TTC font file for the timestamp overlay (system fonts are probed
    /// by default).
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a contact sheet for every video in a directory.
    #[command(
        about = "Scan a directory of videos",
        after_help = "Examples:\n  thumbgrid scan\n  thumbgrid scan /media/videos --progress --json"
    )]
    Scan {
        /// Directory to scan. Defaults to the current working directory.
        directory: Option<PathBuf>,

        /// Print the batch summary as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate a contact sheet for a single video file.
    #[command(
        about = "Generate one contact sheet",
        after_help = "Examples:\n  thumbgrid sheet input.mp4\n  thumbgrid sheet input.mkv --out-dir sheets --overwrite"
    )]
    Sheet {
        /// Input video path.
        input: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "panic" => Some(FfmpegLogLevel::Panic),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" | "warn" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "verbose" => Some(FfmpegLogLevel::Verbose),
        "debug" => Some(FfmpegLogLevel::Debug),
        "trace" => Some(FfmpegLogLevel::Trace),
        _ => None,
    }
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        thumbgrid::set_ffmpeg_log_level(parsed);
    }

    Ok(())
}

fn sheet_options(global: &GlobalOptions) -> SheetOptions {
    let mut options = SheetOptions::new().with_overwrite(global.overwrite);

    if let Some(out_dir) = &global.out_dir {
        options = options.with_output_dir(out_dir);
    }
    if let Some(font) = &global.font {
        options = options.with_font_path(font);
    }
    if global.progress {
        options = options.with_progress(Arc::new(TerminalProgress::new()));
    }

    options
}

/// Per-video progress bar, driven by the pipeline's sampling callbacks.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(ProgressStyle::default_bar());
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        // One bar per video; the directory-level tally goes to the log.
        if info.operation != OperationType::ThumbnailGeneration {
            return;
        }
        let Some(total) = info.total else { return };
        if info.current <= 1 || self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn print_summary(directory: &std::path::Path, summary: &ScanSummary, as_json: bool) {
    if as_json {
        let payload = json!({
            "directory": directory.display().to_string(),
            "total": summary.total(),
            "persisted": summary.persisted,
            "placeholders": summary.placeholders,
            "skipped_existing": summary.skipped,
            "open_failed": summary.open_failed,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => eprintln!("{} {error}", "error:".red().bold()),
        }
        return;
    }

    println!(
        "{} {} video(s): {} written, {} placeholder(s), {} skipped, {} unreadable",
        "done".green().bold(),
        summary.total(),
        summary.persisted,
        summary.placeholders,
        summary.skipped,
        summary.open_failed,
    );
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Scan { directory, json } => {
            let directory = match directory {
                Some(directory) => directory,
                None => std::env::current_dir()?,
            };

            let walker = DirectoryWalker::new(sheet_options(&cli.global));
            let summary = walker.scan(&directory)?;
            print_summary(&directory, &summary, json);
        }
        Commands::Sheet { input } => {
            let pipeline = ThumbnailPipeline::new(sheet_options(&cli.global));
            match pipeline.process(&input) {
                SheetOutcome::Persisted(path) => {
                    println!("{} {}", "wrote".green().bold(), path.display());
                }
                SheetOutcome::Placeholder(path) => {
                    eprintln!(
                        "{} {}",
                        "warning:".yellow().bold(),
                        format!("assembly failed; placeholder written to {}", path.display())
                            .yellow(),
                    );
                }
                SheetOutcome::SkippedExisting(path) => {
                    println!(
                        "{} {} (use --overwrite to regenerate)",
                        "exists".cyan().bold(),
                        path.display(),
                    );
                }
                SheetOutcome::OpenFailed => {
                    return Err(format!("could not open {}", input.display()).into());
                }
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "thumbgrid", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
