use std::path::Path;

use clap::Parser;
use taskflow::cli::commands::Cli;
use taskflow::cli::handlers::{self, Context};
use taskflow::io::{config_io, resolve_data_dir};
use taskflow::service::Client;

fn main() {
    let cli = Cli::parse();

    let config = match config_io::read_config(&config_io::config_path()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let data_dir = resolve_data_dir(cli.data_dir.as_deref(), config.store.dir.as_deref());
    setup_tracing(&data_dir, cli.verbose, &config.log.level, cli.command.is_none());

    let ctx = Context {
        client: Client::local(&data_dir, &config),
        data_dir,
        json: cli.json,
    };

    let result = match cli.command {
        // No subcommand → launch TUI
        None => taskflow::tui::run(ctx, &config),
        Some(command) => handlers::dispatch(command, &ctx),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Log to `taskflow.log` in the data directory. `TASKFLOW_LOG` takes
/// precedence over `-v`, which takes precedence over `[log] level`.
fn setup_tracing(data_dir: &Path, verbose: u8, level: &str, tui: bool) {
    use std::fs::OpenOptions;

    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_env("TASKFLOW_LOG").unwrap_or_else(|_| match verbose {
        0 => EnvFilter::try_new(format!("taskflow={}", level))
            .unwrap_or_else(|_| EnvFilter::new("taskflow=info")),
        1 => EnvFilter::new("taskflow=debug,info"),
        _ => EnvFilter::new("taskflow=trace,debug"),
    });

    let log_path = data_dir.join("taskflow.log");
    if std::fs::create_dir_all(data_dir).is_ok()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path)
    {
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        tracing::debug!(path = ?log_path, "tracing initialized");
        return;
    }

    // The TUI owns the terminal, so only CLI runs may fall back to stderr
    if !tui {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }
}
