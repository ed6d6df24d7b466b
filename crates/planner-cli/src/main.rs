use clap::Parser;
use owo_colors::{OwoColorize, Style};
use planner_core::error::CoreError;
use planner_core::notify::LocalNotificationQueue;
use planner_core::planner::Planner;
use planner_core::storage::FileStorage;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("planner=warn")),
        )
        .init();

    let cli = cli::Cli::parse();

    let config = config::Config::new().unwrap_or_else(|e| {
        warn!("invalid configuration, using defaults: {e}");
        config::Config::default()
    });
    debug!("using data directory {}", config.data_dir.display());

    let storage = FileStorage::new(&config.data_dir);
    let queue = LocalNotificationQueue::new(storage.clone(), config.notifications.permission());
    let mut planner = Planner::open(
        storage,
        queue,
        config.notifications.to_reminder_config(),
    )
    .await;

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&mut planner, command).await,
        cli::Commands::List(command) => {
            commands::list::list_tasks(&mut planner, command, &config)
        }
        cli::Commands::Toggle(command) => {
            commands::toggle::toggle_task(&mut planner, command).await
        }
        cli::Commands::Delete(command) => {
            commands::delete::delete_task(&mut planner, command).await
        }
        cli::Commands::Reminders => commands::reminders::list_reminders(&planner).await,
        cli::Commands::Sync => commands::sync::sync_tasks(&mut planner).await,
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(tasks) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, title) in tasks {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::PermissionDenied => {
                eprintln!(
                    "{} Notifications are not permitted. Set notifications.enabled = true in config.toml.",
                    "Error:".style(error_style)
                );
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
