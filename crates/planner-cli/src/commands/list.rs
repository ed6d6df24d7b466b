use anyhow::Result;
use planner_core::models::{CategoryFilter, SortMode};
use planner_core::notify::NotificationProvider;
use planner_core::planner::Planner;
use planner_core::storage::StorageProvider;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::views::table::display_tasks;

pub fn list_tasks<S, N>(planner: &mut Planner<S, N>, command: ListCommand, config: &Config) -> Result<()>
where
    S: StorageProvider,
    N: NotificationProvider,
{
    let category = match command.category {
        Some(category) => category,
        None => config.default_category.parse::<CategoryFilter>()?,
    };
    let sort = match command.sort {
        Some(sort) => sort,
        None => config.default_sort.parse::<SortMode>()?,
    };

    planner.set_search(command.search.unwrap_or_default());
    planner.set_category_filter(category);
    planner.set_sort(sort);

    let visible = planner.visible();
    display_tasks(&visible);

    if !visible.is_empty() {
        println!(
            "{} shown ({}), {} pending in total",
            visible.len(),
            category.label(),
            planner.store().pending_count()
        );
    }

    Ok(())
}
