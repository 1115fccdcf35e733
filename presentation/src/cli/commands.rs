//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use quizbench_application::AnswerFilter;
use quizbench_domain::{Domain, OutputFormat};
use std::path::PathBuf;

/// Output format for the results summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Human-readable table
    Table,
    /// JSON document
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Table => OutputFormat::Table,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// Which questions `questions` lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterArg {
    #[default]
    All,
    Answered,
    Unanswered,
}

impl From<FilterArg> for AnswerFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => AnswerFilter::All,
            FilterArg::Answered => AnswerFilter::Answered,
            FilterArg::Unanswered => AnswerFilter::Unanswered,
        }
    }
}

/// CLI arguments for quizbench
#[derive(Parser, Debug)]
#[command(name = "quizbench")]
#[command(author, version, about = "Multiple-choice LLM evaluation harness")]
#[command(long_about = r#"
quizbench asks a chat model every unanswered multiple-choice question in the
History, Social_Science and Computer_Security sets, records the letter it picks
and how long it took, and summarizes accuracy and latency per domain.

Configuration files are loaded from (in priority order):
1. QUIZBENCH_* environment variables
2. --config <path>      Explicit config file
3. ./quizbench.toml     Project-level config
4. ~/.config/quizbench/config.toml   Global config

Example:
  quizbench import --dataset-dir ./data
  quizbench run --domain history
  quizbench results --output json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run one evaluation pass over unanswered questions
    Run {
        /// Domain to evaluate (repeatable; default: configured or all)
        #[arg(short, long = "domain", value_name = "DOMAIN")]
        domains: Vec<Domain>,

        /// Skip importing datasets into empty domains first
        #[arg(long)]
        no_import: bool,
    },

    /// Show accuracy and latency per domain
    Results {
        /// Output format (default: configured or table)
        #[arg(short, long, value_enum)]
        output: Option<OutputArg>,
    },

    /// List a domain's questions with the recorded answers
    Questions {
        /// Domain to list
        domain: Domain,

        /// Which questions to show
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
    },

    /// Populate empty domains from the CSV datasets
    Import {
        /// Directory holding the dataset files (default: configured)
        #[arg(long, value_name = "DIR")]
        dataset_dir: Option<PathBuf>,
    },
}
