use clap::Parser;
use mode_mcp_server::config::{Cli, ServerConfig};
use mode_mcp_server::dispatcher::Dispatcher;
use mode_mcp_server::modes::ModeRegistry;
use mode_mcp_server::sessions::{sweeper, SessionManager};
use mode_mcp_server::tasks::TaskOrchestrator;
use mode_mcp_server::utils::logger;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ServerConfig::from_cli(cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("fatal: failed to resolve configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logger::init(&config.log_level, config.log_file.as_deref()) {
        eprintln!("fatal: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        project_root = %config.project_root.display(),
        config_dir = %config.config_dir.display(),
        "starting mode-mcp-server"
    );

    let modes = Arc::new(ModeRegistry::load(&config.global_modes_file(), &config.project_modes_file()));
    let orchestrator = Arc::new(TaskOrchestrator::new(modes.clone()));
    let sessions = Arc::new(SessionManager::new(config.session_timeout));

    let _sweeper_handle = sweeper::spawn(sessions.clone(), config.cleanup_interval);

    let dispatcher = Arc::new(Dispatcher::new(modes, orchestrator, sessions));

    match mode_mcp_server::server::run(tokio::io::stdin(), tokio::io::stdout(), dispatcher).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server loop exited with an I/O error");
            ExitCode::FAILURE
        }
    }
}
