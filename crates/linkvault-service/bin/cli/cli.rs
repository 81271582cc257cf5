use clap::{Parser, Subcommand, ValueEnum};
use linkvault_core::config::{DEFAULT_KEY_LENGTH, DEFAULT_MAX_KEY_ATTEMPTS, DEFAULT_TABLE};
use linkvault_core::SupplementaryData;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STATE_ENV: &str = "LINKVAULT_STATE";
pub const TABLE_ENV: &str = "LINKVAULT_TABLE";
pub const DEFAULT_KEY_LENGTH_ENV: &str = "LINKVAULT_DEFAULT_KEY_LENGTH";
pub const MAX_KEY_ATTEMPTS_ENV: &str = "LINKVAULT_MAX_KEY_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "LINKVAULT_LOG_FORMAT";

pub const DEFAULT_STATE: &str = "linkvault.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linkvault", about = "Manage short URL records")]
pub struct CLI {
    /// JSON file the records are loaded from and saved to.
    #[arg(long, env = STATE_ENV, default_value = DEFAULT_STATE)]
    pub state: PathBuf,

    #[arg(long, env = TABLE_ENV, default_value = DEFAULT_TABLE)]
    pub table: String,

    #[arg(long, env = DEFAULT_KEY_LENGTH_ENV, default_value_t = DEFAULT_KEY_LENGTH)]
    pub default_key_length: usize,

    #[arg(long, env = MAX_KEY_ATTEMPTS_ENV, default_value_t = DEFAULT_MAX_KEY_ATTEMPTS)]
    pub max_key_attempts: u32,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a short URL, generating a key unless one is given.
    Create {
        #[arg(long = "namespace")]
        namespace_id: String,
        #[arg(long)]
        domain: String,
        /// Target of the redirect.
        link: String,
        #[arg(long)]
        key_length: Option<usize>,
        #[arg(long)]
        key: Option<String>,
        /// Minutes until the link expires.
        #[arg(long)]
        expiry: Option<i64>,
        /// JSON object stored alongside the link.
        #[arg(long, value_parser = parse_data)]
        data: Option<SupplementaryData>,
    },
    /// Print the full record of a key.
    Get {
        #[arg(long)]
        domain: String,
        key: String,
    },
    /// Print the redirect target of a key.
    Redirect {
        #[arg(long)]
        domain: String,
        key: String,
    },
    /// Change the expiry or supplementary data of a record.
    Update {
        #[arg(long = "namespace")]
        namespace_id: String,
        #[arg(long)]
        domain: String,
        key: String,
        #[arg(long)]
        expiry: Option<i64>,
        /// Drop the expiry. Wins over `--expiry`.
        #[arg(long)]
        remove_expiry: bool,
        #[arg(long, value_parser = parse_data)]
        data: Option<SupplementaryData>,
    },
    Delete {
        #[arg(long = "namespace")]
        namespace_id: String,
        #[arg(long)]
        domain: String,
        key: String,
    },
    /// Report whether a key is still free in a domain.
    Check {
        #[arg(long)]
        domain: String,
        key: String,
    },
    ValidateKey {
        key: String,
    },
    SanitizeKey {
        key: String,
    },
}

fn parse_data(raw: &str) -> Result<SupplementaryData, String> {
    serde_json::from_str(raw).map_err(|e| format!("expected a JSON object: {e}"))
}
