//! Server configuration: CLI flags + environment variable fallback.
//!
//! The config surface is closed and typed (Design Note, spec.md §9) — no
//! free-form key/value bag. `clap`'s `env` feature lets a single field
//! declaration express both the flag and its environment fallback.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mode-mcp-server",
    about = "MCP server exposing a mode-governed task system over JSON-RPC stdio"
)]
pub struct Cli {
    /// Root directory of the project whose `.roomodes` file (if any) is loaded.
    #[arg(long, env = "ROO_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Directory holding the global `modes.yaml` file.
    #[arg(long, env = "ROO_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Tracing filter directive (e.g. "info", "debug", "mode_mcp_server=trace").
    #[arg(long, env = "ROO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Optional file to additionally write log lines to.
    #[arg(long, env = "ROO_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Idle-session timeout in seconds.
    #[arg(long, env = "ROO_SESSION_TIMEOUT")]
    pub session_timeout: Option<u64>,

    /// Interval in seconds at which the session sweeper runs.
    #[arg(long, env = "ROO_CLEANUP_INTERVAL")]
    pub cleanup_interval: Option<u64>,
}

/// Resolved, immutable server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub project_root: PathBuf,
    pub config_dir: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub session_timeout: Duration,
    pub cleanup_interval: Duration,
}

impl ServerConfig {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let project_root = cli
            .project_root
            .map(Ok)
            .unwrap_or_else(std::env::current_dir)?;

        let config_dir = cli.config.unwrap_or_else(default_config_dir);

        Ok(Self {
            project_root,
            config_dir,
            log_level: cli.log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_file: cli.log_file,
            session_timeout: Duration::from_secs(
                cli.session_timeout.unwrap_or(DEFAULT_SESSION_TIMEOUT_SECS),
            ),
            cleanup_interval: Duration::from_secs(
                cli.cleanup_interval.unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECS),
            ),
        })
    }

    /// Path to the global mode definitions file.
    pub fn global_modes_file(&self) -> PathBuf {
        self.config_dir.join("modes.yaml")
    }

    /// Path to the project mode definitions file.
    pub fn project_modes_file(&self) -> PathBuf {
        self.project_root.join(".roomodes")
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roo")
}
