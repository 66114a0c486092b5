use anyhow::{Context, Result};
use clap::Parser;

/// Benchbot - chat benchmark bot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Chat adapter bind address
    #[arg(short = 'H', long, env = "BENCHBOT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Chat adapter port
    #[arg(short, long, env = "BENCHBOT_PORT", default_value = "9090")]
    pub port: u16,

    /// Access token clients must present when connecting
    #[arg(short = 't', long, env = "BENCHBOT_TOKEN")]
    pub token: Option<String>,

    /// Command prefix
    #[arg(long, env = "BENCHBOT_PREFIX", default_value = "?")]
    pub prefix: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format (pretty, compact, json)
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    // Chat adapter settings
    pub host: String,
    pub port: u16,

    // Authentication
    pub token: String,

    // Commands
    pub prefix: String,

    // Queue depths
    pub inbound_queue_depth: usize,
    pub outbound_queue_depth: usize,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        // Parse CLI arguments
        let args = CliArgs::parse();

        Self::from_args(args)
    }

    /// Build the config from parsed arguments, resolving required values
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Config {
            // Chat adapter settings (from CLI with defaults)
            host: args.host,
            port: args.port,

            // Access token (CLI > ENV, required)
            token: args
                .token
                .or_else(|| std::env::var("BENCHBOT_TOKEN").ok())
                .context("BENCHBOT_TOKEN is required (use -t or set BENCHBOT_TOKEN env var)")?,

            prefix: args.prefix,

            // Queue depths (env only)
            inbound_queue_depth: std::env::var("INBOUND_QUEUE_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(128),

            outbound_queue_depth: std::env::var("OUTBOUND_QUEUE_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64),

            // Logging
            log_level: args.log_level,
            log_format: parse_log_format(&args.log_format),
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            anyhow::bail!("BENCHBOT_TOKEN must not be empty");
        }

        if self.prefix.is_empty() {
            anyhow::bail!("Command prefix must not be empty");
        }

        // Queue construction requires a positive capacity
        if self.inbound_queue_depth == 0 {
            anyhow::bail!("INBOUND_QUEUE_DEPTH must be greater than zero");
        }

        if self.outbound_queue_depth == 0 {
            anyhow::bail!("OUTBOUND_QUEUE_DEPTH must be greater than zero");
        }

        Ok(())
    }

    /// Bind address for the TCP chat listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
impl Config {
    /// Fixed config for unit tests, independent of the environment
    pub(crate) fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            token: "test-token".to_string(),
            prefix: "?".to_string(),
            inbound_queue_depth: 16,
            outbound_queue_depth: 16,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Parse log format from string
pub fn parse_log_format(s: &str) -> LogFormat {
    match s.to_lowercase().as_str() {
        "json" => LogFormat::Json,
        "compact" => LogFormat::Compact,
        _ => LogFormat::Pretty,
    }
}
