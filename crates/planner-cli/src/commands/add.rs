use anyhow::{anyhow, Result};
use owo_colors::{OwoColorize, Style};
use planner_core::dates::due_status;
use planner_core::error::CoreError;
use planner_core::models::NewTaskData;
use planner_core::notify::NotificationProvider;
use planner_core::planner::Planner;
use planner_core::storage::StorageProvider;

use crate::cli::AddCommand;
use crate::commands::warn_on_sync_problems;
use crate::parser::parse_due_date;

pub async fn add_task<S, N>(planner: &mut Planner<S, N>, command: AddCommand) -> Result<()>
where
    S: StorageProvider,
    N: NotificationProvider,
{
    let due_date = command.due.as_deref().map(parse_due_date).transpose()?;

    let new_task_data = NewTaskData {
        title: command.title,
        category: command.category,
        due_date,
        priority: command.priority,
    };

    let added_task = planner.add(new_task_data).await.ok_or_else(|| {
        anyhow!(CoreError::InvalidInput(
            "Task title cannot be empty.".to_string()
        ))
    })?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    println!(
        "{} Created task: {}",
        "✓".style(success_style),
        added_task.title.bright_white().bold()
    );
    println!(
        "  {} Task ID: {}",
        "→".style(info_style),
        added_task.id.yellow()
    );
    println!(
        "  {} {} / {}",
        "→".style(info_style),
        added_task.category.label(),
        added_task.priority.label()
    );
    if let Some(status) = due_status(&added_task) {
        println!("  {} Due: {}", "→".style(info_style), status.cyan());
    }

    warn_on_sync_problems(planner.last_sync());
    Ok(())
}
