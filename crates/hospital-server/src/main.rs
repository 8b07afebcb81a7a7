use std::env;
use std::process::ExitCode;

use hospital_server::config::loader::{DEFAULT_CONFIG_FILE, load_config};
use hospital_server::{ServerBuilder, init_tracing, shutdown_tracing};

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "HOSPITAL_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal outside local development
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    let (config_path, source) = config_path(env::args().skip(1), env::var(CONFIG_ENV).ok());
    let cfg = match load_config(Some(&config_path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::from(2);
        }
    };

    init_tracing(&cfg.logging, &cfg.otel);
    tracing::info!(path = %config_path, source, "Configuration loaded");

    let result = ServerBuilder::new().with_config(cfg).build().run().await;
    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Server error");
            ExitCode::FAILURE
        }
    };

    shutdown_tracing();
    code
}

/// Picks the configuration file: `--config <path>`, then `HOSPITAL_CONFIG`,
/// then `hospital.toml`. Also returns where the path came from.
fn config_path(
    mut args: impl Iterator<Item = String>,
    from_env: Option<String>,
) -> (String, &'static str) {
    while let Some(arg) = args.next() {
        if arg == "--config"
            && let Some(path) = args.next()
        {
            return (path, "cli");
        }
    }
    match from_env {
        Some(path) if !path.is_empty() => (path, "env"),
        _ => (DEFAULT_CONFIG_FILE.to_string(), "default"),
    }
}
