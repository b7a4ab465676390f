use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

mod cli;

use cli::{Cli, Commands};
use reporting_console::{
    backend::{self, ReportingBackend},
    config::Config,
    console::App,
    models::DatasetKind,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "reporting_console=info");
    }
    init_logging(&config, cli.command.is_some());

    info!(
        "Starting reporting console with {} backend",
        config.backend.as_str()
    );
    let backend = backend::from_config(&config).context("Failed to create backend")?;

    match cli.command {
        Some(Commands::List { dataset }) => {
            cli::run_list(backend, dataset, cli.columns.as_deref()).await
        }
        None => run_tui(&config, backend, cli.open, cli.columns).await,
    }
}

/// File logging always; stderr only when no alternate screen is in use
fn init_logging(config: &Config, to_stderr: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let directory = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let file_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "reporting_console.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

async fn run_tui(
    config: &Config,
    backend: Arc<dyn ReportingBackend>,
    open: Option<DatasetKind>,
    columns: Option<Vec<String>>,
) -> Result<()> {
    let mut app = App::new(config, backend)?;
    if let Some(columns) = columns {
        app = app.with_display(columns);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    if let Some(kind) = open {
        app.open_dialog(kind);
    }
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            info!("Reporting console exited successfully");
            Ok(())
        }
        Err(e) => {
            error!("Reporting console encountered an error: {}", e);
            Err(e)
        }
    }
}
