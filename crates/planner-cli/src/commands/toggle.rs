use anyhow::{anyhow, Result};
use planner_core::error::CoreError;
use planner_core::notify::NotificationProvider;
use planner_core::planner::Planner;
use planner_core::storage::StorageProvider;

use crate::cli::ToggleCommand;
use crate::commands::warn_on_sync_problems;
use crate::util::resolve_task_id;

pub async fn toggle_task<S, N>(planner: &mut Planner<S, N>, command: ToggleCommand) -> Result<()>
where
    S: StorageProvider,
    N: NotificationProvider,
{
    let task_id = resolve_task_id(planner.store(), &command.id)?;
    if !planner.toggle_completion(&task_id).await {
        return Err(anyhow!(CoreError::NotFound(format!(
            "Task with ID '{}' not found.",
            task_id
        ))));
    }

    if let Some(task) = planner.store().get(&task_id) {
        if task.completed {
            println!("Completed task: '{}'", task.title);
        } else {
            println!("Reopened task: '{}'", task.title);
        }
    }

    warn_on_sync_problems(planner.last_sync());
    Ok(())
}
