use anyhow::{anyhow, Result};
use planner_core::error::CoreError;
use planner_core::store::TaskStore;

/// Resolves a full task id or a unique prefix of one.
pub fn resolve_task_id(store: &TaskStore, short_id: &str) -> Result<String> {
    if store.get(short_id).is_some() {
        return Ok(short_id.to_string());
    }
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let tasks = store.find_by_prefix(short_id);
    if tasks.len() == 1 {
        Ok(tasks[0].id.clone())
    } else if tasks.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No task found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let task_info: Vec<(String, String)> = tasks
            .into_iter()
            .map(|t| (t.id.clone(), t.title.clone()))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(task_info)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::models::Task;

    fn store_with(ids: &[&str]) -> TaskStore {
        TaskStore::from_tasks(
            ids.iter()
                .map(|id| Task {
                    id: id.to_string(),
                    title: format!("task {id}"),
                    completed: false,
                    created_at: chrono::Utc::now(),
                    category: Default::default(),
                    due_date: None,
                    priority: Default::default(),
                })
                .collect(),
        )
    }

    fn core_error(err: anyhow::Error) -> CoreError {
        err.downcast::<CoreError>().expect("core error")
    }

    #[test]
    fn test_exact_and_unique_prefix() {
        let store = store_with(&["1718000000001", "1718000000002", "1729000000000"]);
        assert_eq!(resolve_task_id(&store, "1718000000002").unwrap(), "1718000000002");
        assert_eq!(resolve_task_id(&store, "172").unwrap(), "1729000000000");
    }

    #[test]
    fn test_ambiguous_prefix_lists_candidates() {
        let store = store_with(&["1718000000001", "1718000000002"]);
        match core_error(resolve_task_id(&store, "1718").unwrap_err()) {
            CoreError::AmbiguousId(candidates) => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_and_unknown_prefixes() {
        let store = store_with(&["1718000000001"]);
        assert!(matches!(
            core_error(resolve_task_id(&store, "1").unwrap_err()),
            CoreError::InvalidInput(_)
        ));
        assert!(matches!(
            core_error(resolve_task_id(&store, "99").unwrap_err()),
            CoreError::NotFound(_)
        ));
    }
}
