use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use ragchat_core::{ChatPolicy, TranscriptOrdering};
use ragchat_engine::{BackendSettings, DEFAULT_BACKEND_URL};
use ragchat_logging::{LevelFilter, LogDestination};

#[derive(Parser, Debug)]
#[command(name = "ragchat")]
#[command(version, about = "Guest chat client for a RAG backend", long_about = None)]
pub struct Cli {
    /// Base address of the RAG backend
    #[arg(long, default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Directory holding the durable session identifier
    #[arg(long, default_value = ".ragchat")]
    pub data_dir: PathBuf,

    /// Abort backend requests after this many seconds (default: wait forever)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Refuse to send a chat message while another one is outstanding
    #[arg(long)]
    pub single_flight: bool,

    /// Transcript ordering for overlapping chat requests
    #[arg(long, value_enum, default_value_t = OrderingArg::Arrival)]
    pub ordering: OrderingArg,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogArg::File)]
    pub log: LogArg,

    /// Log file used by `--log file` and `--log both`
    #[arg(long, default_value = "ragchat.log")]
    pub log_file: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderingArg {
    /// Replies appear as they arrive
    Arrival,
    /// Replies are shown directly under their question
    Submission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    File,
    Terminal,
    Both,
}

impl Cli {
    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            request_timeout: self.timeout_secs.map(Duration::from_secs),
            ..BackendSettings::default()
        }
    }

    pub fn chat_policy(&self) -> ChatPolicy {
        ChatPolicy {
            ordering: match self.ordering {
                OrderingArg::Arrival => TranscriptOrdering::Arrival,
                OrderingArg::Submission => TranscriptOrdering::Submission,
            },
            single_flight: self.single_flight,
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
