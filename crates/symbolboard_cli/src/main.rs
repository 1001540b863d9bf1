//! Command-line inspector for the symbol board core.
//!
//! # Responsibility
//! - Load a directory of volume documents and print a catalog summary.
//! - Run the duplicate audit over the same directory.
//! - Keep all catalog logic inside `symbolboard_core`.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use symbolboard_core::{
    audit_source, core_version, init_logging, FsVolumeSource, LoadOutcome, LoggingConfig,
    Session, SessionCollaborators, SessionConfig, SortKey, SpeechRequest, SpeechSink,
};

#[derive(Parser)]
#[command(name = "symbolboard_cli")]
#[command(about = "Inspect symbol board volume data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory for rotating log files (logging stays off when unset)
    #[arg(long, global = true, env = "SYMBOLBOARD_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// JSON session config (built-in defaults when unset)
    #[arg(long, global = true, env = "SYMBOLBOARD_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every configured volume and print a catalog summary
    Summary(SummaryArgs),

    /// Report repeated symbol keys and slugs shared across volumes
    Audit(AuditArgs),
}

#[derive(Args)]
struct SummaryArgs {
    /// Directory holding `volume-N/meta.json` documents
    data_dir: PathBuf,

    /// Ordering of the listed symbols: alphabetical|category|recent|frequent
    #[arg(long, default_value = "alphabetical", value_parser = parse_sort_key)]
    sort: SortKey,

    /// Only list symbols of this category
    #[arg(long, default_value = "All")]
    category: String,

    /// Number of symbols to list
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(Args)]
struct AuditArgs {
    /// Directory holding `volume-N/meta.json` documents
    data_dir: PathBuf,

    /// Cross-volume slugs to print
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

// Speech has no meaning in a terminal.
struct MutedSpeech;

impl SpeechSink for MutedSpeech {
    fn speak(&self, _request: SpeechRequest) {}
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(dir) = &cli.log_dir {
        if let Err(err) = init_logging(&LoggingConfig::with_default_level(dir)) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(command) = cli.command else {
        println!("symbolboard_core version={}", core_version());
        return ExitCode::SUCCESS;
    };
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Commands::Summary(args) => summary(config, &args),
        Commands::Audit(args) => audit(&config, &args),
    }
}

fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    SortKey::parse(value).ok_or_else(|| {
        format!("unknown sort key `{value}` (expected alphabetical, category, recent or frequent)")
    })
}

fn summary(config: SessionConfig, args: &SummaryArgs) -> ExitCode {
    let session = Session::new(
        config,
        SessionCollaborators {
            source: Arc::new(FsVolumeSource::new(&args.data_dir)),
            cache: None,
            speech: Arc::new(MutedSpeech),
        },
    );
    let mut session = match session {
        Ok(session) => session,
        Err(err) => {
            eprintln!("invalid config: {err}");
            return ExitCode::FAILURE;
        }
    };

    for (volume, outcome) in session.load_all_volumes() {
        match outcome {
            LoadOutcome::Loaded(merge) => println!(
                "volume {volume}: loaded added={} skipped={}",
                merge.added, merge.skipped_duplicates
            ),
            LoadOutcome::AlreadyLoaded | LoadOutcome::InFlight | LoadOutcome::Stale => {
                println!("volume {volume}: skipped")
            }
            LoadOutcome::Failed(err) => println!("volume {volume}: failed ({err})"),
        }
    }

    let catalog = session.catalog();
    println!("symbols={}", catalog.len());
    println!("tags={}", catalog.tag_count());
    println!("categories={}", catalog.categories().join(", "));

    session.set_active_category(&args.category);
    session.set_sort_key(args.sort);
    let listed = session.filtered_symbols();
    println!(
        "listing category={} sort={} matches={}",
        args.category,
        args.sort.as_str(),
        listed.len()
    );
    for symbol in listed.iter().take(args.limit) {
        println!("  {} [{}] {}", symbol.key(), symbol.category, symbol.title);
    }
    ExitCode::SUCCESS
}

fn audit(config: &SessionConfig, args: &AuditArgs) -> ExitCode {
    let source = FsVolumeSource::new(&args.data_dir);
    let (report, failures) = audit_source(&source, 1..=config.volume_count);

    for (volume, err) in &failures {
        println!("volume {volume}: unreadable ({err})");
    }
    println!("total_items={}", report.total_items);
    for key in &report.within_volume {
        println!("duplicate key: {key}");
    }
    println!("cross_volume_slugs={}", report.cross_volume.len());
    for (slug, volumes) in report.cross_volume.iter().take(args.limit) {
        let volumes = volumes
            .iter()
            .map(|volume| volume.to_string())
            .collect::<Vec<_>>();
        println!("  {slug}: volumes {}", volumes.join(", "));
    }

    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig, String> {
    match path {
        Some(path) => SessionConfig::from_path(path).map_err(|err| err.to_string()),
        None => Ok(SessionConfig::default()),
    }
}
