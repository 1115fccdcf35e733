//! CLI entrypoint for quizbench
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use quizbench_application::{
    CompositePublisher, ImportQuestionsUseCase, ImportReport, ImportStatus, ProgressPublisher,
    QuestionStore, RunEvaluationInput, RunEvaluationUseCase, SummarizeResultsUseCase,
};
use quizbench_domain::{Domain, OutputFormat};
use quizbench_infrastructure::{
    BroadcastPublisher, ConfigLoader, CsvQuestionSource, FileConfig, JsonlEventLog,
    OpenAiCompletionProvider, SqliteQuestionStore, relay,
};
use quizbench_presentation::{
    Cli, Command, ConsoleFormatter, FilterArg, OutputArg, OutputFormatter, ProgressReporter,
    SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_config_issues(&issues));
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("Invalid configuration");
    }

    info!("Starting quizbench");

    // === Dependency Injection ===
    let store = Arc::new(
        SqliteQuestionStore::open(&config.store.path).with_context(|| {
            format!("Failed to open question store {}", config.store.path.display())
        })?,
    );

    let command = cli.command.clone().unwrap_or(Command::Results { output: None });
    match command {
        Command::Run { domains, no_import } => {
            run_pass(&config, store, domains, no_import, cli.quiet).await
        }
        Command::Results { output } => show_results(&config, store, output).await,
        Command::Questions { domain, filter } => list_questions(store, domain, filter).await,
        Command::Import { dataset_dir } => {
            let dir = dataset_dir.unwrap_or_else(|| config.dataset.dir.clone());
            import_datasets(store, &dir, &Domain::ALL, ImportMode::Explicit)
                .await
                .map(|_| ())
        }
    }
}

/// Install the tracing subscriber: stderr always, plus a file when configured
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// `quizbench run`: one evaluation pass
async fn run_pass(
    config: &FileConfig,
    store: Arc<SqliteQuestionStore>,
    domains: Vec<Domain>,
    no_import: bool,
    quiet: bool,
) -> Result<()> {
    let domains = if domains.is_empty() {
        config.evaluation.parse_domains().0
    } else {
        domains
    };

    if config.dataset.auto_import && !no_import {
        import_datasets(
            Arc::clone(&store),
            &config.dataset.dir,
            &domains,
            ImportMode::BeforePass,
        )
        .await?;
    }

    let provider = Arc::new(
        OpenAiCompletionProvider::from_config(&config.provider)
            .context("Failed to set up the completion provider")?,
    );
    let params = config
        .evaluation
        .to_invoker_params(config.attempt_timeout());

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current question");
            ctrl_c_token.cancel();
        }
    });

    let use_case = RunEvaluationUseCase::new(store, provider, params).with_cancellation(token);

    // Live progress: console output plus an optional JSONL relay
    let broadcast = BroadcastPublisher::default();
    let relay_handle = config
        .logging
        .events_file
        .as_ref()
        .and_then(JsonlEventLog::open)
        .map(|log| tokio::spawn(relay(broadcast.subscribe(), Arc::new(log))));

    let reporter = ProgressReporter::new();
    let simple = SimpleProgress;
    let mut publisher = CompositePublisher::new(vec![&broadcast as &dyn ProgressPublisher]);
    if !quiet && config.output.show_progress {
        let console: &dyn ProgressPublisher = if std::io::stderr().is_terminal() {
            &reporter
        } else {
            &simple
        };
        publisher = publisher.with(console);
    }

    let report = use_case
        .execute_with_progress(RunEvaluationInput::new(domains), &publisher)
        .await;

    // Closing the channel ends the relay
    drop(publisher);
    drop(broadcast);
    if let Some(handle) = relay_handle {
        let forwarded = handle.await.unwrap_or(0);
        info!("Wrote {} event(s) to the event log", forwarded);
    }

    println!("{}", ConsoleFormatter::format_report(&report));
    Ok(())
}

/// `quizbench results`
async fn show_results(
    config: &FileConfig,
    store: Arc<SqliteQuestionStore>,
    output: Option<OutputArg>,
) -> Result<()> {
    let format = output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    let summary = SummarizeResultsUseCase::new(store)
        .execute_all()
        .await
        .context("Failed to summarize results")?;

    println!("{}", ConsoleFormatter.render(&summary, format));
    Ok(())
}

/// `quizbench questions <DOMAIN>`
async fn list_questions(
    store: Arc<SqliteQuestionStore>,
    domain: Domain,
    filter: FilterArg,
) -> Result<()> {
    let questions = store
        .list(domain, filter.into())
        .await
        .with_context(|| format!("Failed to list {} questions", domain))?;
    println!("{}", ConsoleFormatter::format_questions(domain, &questions));
    Ok(())
}

/// How dataset import failures are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportMode {
    /// `quizbench import`: print every domain and fail on any error
    Explicit,
    /// Before a pass: report failed domains and keep going
    BeforePass,
}

/// `quizbench import`, also run before a pass when auto-import is on
async fn import_datasets(
    store: Arc<SqliteQuestionStore>,
    dir: &Path,
    domains: &[Domain],
    mode: ImportMode,
) -> Result<ImportReport> {
    let source = Arc::new(CsvQuestionSource::new(dir));
    let report = ImportQuestionsUseCase::new(store, source)
        .execute(domains)
        .await;

    match mode {
        ImportMode::Explicit => {
            print!("{}", ConsoleFormatter::format_import(&report));
            if report.has_failures() {
                bail!("Dataset import failed for some domains");
            }
        }
        ImportMode::BeforePass => {
            for (domain, status) in &report.entries {
                if let ImportStatus::Failed(reason) = status {
                    warn!("{}: import failed, evaluating existing questions only", domain);
                    eprintln!("Warning: {} import failed: {}", domain, reason);
                }
            }
        }
    }
    Ok(report)
}
