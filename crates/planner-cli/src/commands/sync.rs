use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use planner_core::notify::NotificationProvider;
use planner_core::planner::Planner;
use planner_core::storage::StorageProvider;

use crate::commands::warn_on_sync_problems;

pub async fn sync_tasks<S, N>(planner: &mut Planner<S, N>) -> Result<()>
where
    S: StorageProvider,
    N: NotificationProvider,
{
    let report = planner.sync().await;
    let success_style = Style::new().green().bold();

    if report.persisted {
        println!(
            "{} Saved {} task(s)",
            "✓".style(success_style),
            planner.tasks().len()
        );
    }

    let reminders = &report.reminders;
    if reminders.permitted {
        println!(
            "Reminders: {} scheduled, {} unchanged, {} cancelled",
            reminders.scheduled.len(),
            reminders.kept.len(),
            reminders.cancelled.len()
        );
    } else {
        println!("Notifications are disabled; no reminders scheduled.");
    }

    warn_on_sync_problems(Some(&report));
    Ok(())
}
