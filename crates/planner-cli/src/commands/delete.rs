use anyhow::{anyhow, Result};
use dialoguer::Confirm;
use planner_core::error::CoreError;
use planner_core::notify::NotificationProvider;
use planner_core::planner::Planner;
use planner_core::storage::StorageProvider;

use crate::cli::DeleteCommand;
use crate::commands::warn_on_sync_problems;
use crate::util::resolve_task_id;

pub async fn delete_task<S, N>(planner: &mut Planner<S, N>, command: DeleteCommand) -> Result<()>
where
    S: StorageProvider,
    N: NotificationProvider,
{
    let task_id = resolve_task_id(planner.store(), &command.id)?;
    let title = match planner.store().get(&task_id) {
        Some(task) => task.title.clone(),
        None => {
            return Err(anyhow!(CoreError::NotFound(format!(
                "Task with ID '{}' not found.",
                task_id
            ))))
        }
    };

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete task '{}'?", title))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    if let Some(task) = planner.delete(&task_id).await {
        println!("Deleted task: '{}'", task.title);
    }

    warn_on_sync_problems(planner.last_sync());
    Ok(())
}
