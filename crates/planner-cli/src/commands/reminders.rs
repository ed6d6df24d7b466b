use anyhow::Result;
use planner_core::notify::{NotificationProvider, PermissionStatus};
use planner_core::planner::Planner;
use planner_core::storage::StorageProvider;

use crate::views::table::display_reminders;

pub async fn list_reminders<S, N>(planner: &Planner<S, N>) -> Result<()>
where
    S: StorageProvider,
    N: NotificationProvider,
{
    let provider = planner.scheduler().provider();
    if provider.permission_status().await? == PermissionStatus::Denied {
        println!("Notifications are disabled.");
    }

    let entries = provider.list_scheduled().await?;
    display_reminders(&entries);
    Ok(())
}
