//! scriptcast CLI binary entry point.

use scriptcast::cli::errors::format_error_help;
use scriptcast::cli::{commands, Cli, Commands};
use scriptcast::config::ScriptcastConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    let config = match ScriptcastConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", format_error_help(&e));
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    let result = match cli.command {
        Commands::Script(args) => commands::handle_script(&config, args, &cancel).await,
        Commands::Voice(args) => commands::handle_voice(&config, args, &cancel).await,
        Commands::Run(args) => commands::handle_run(&config, args, &cancel).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error_help(&e));
        std::process::exit(1);
    }
}
