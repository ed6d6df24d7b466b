use crate::models::{CategoryFilter, NewTaskData, ReminderConfig, SortMode, Task, TaskQuery};
use crate::notify::{NotificationPayload, NotificationProvider};
use crate::reminders::{ReconcileReport, ReminderScheduler};
use crate::storage::{load_tasks, save_tasks, StorageProvider};
use crate::store::TaskStore;
use tracing::info;

/// Outcome of the side effects run after a collection change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether the full collection reached storage.
    pub persisted: bool,
    pub reminders: ReconcileReport,
}

/// Host-side composition of the task store, persistence and reminders.
///
/// Every effective mutation writes the whole collection back and then runs
/// a reminder pass. Neither step can fail the mutation itself; the outcome
/// is available from [`last_sync`](Self::last_sync).
pub struct Planner<S, N> {
    store: TaskStore,
    storage: S,
    scheduler: ReminderScheduler<N>,
    view: TaskQuery,
    last_sync: Option<SyncReport>,
}

impl<S: StorageProvider, N: NotificationProvider> Planner<S, N> {
    /// Loads the persisted collection. Nothing is written or scheduled yet.
    pub async fn open(storage: S, notifier: N, config: ReminderConfig) -> Self {
        let tasks = load_tasks(&storage).await;
        info!("opened planner with {} tasks", tasks.len());
        Self {
            store: TaskStore::from_tasks(tasks),
            storage,
            scheduler: ReminderScheduler::new(notifier, config),
            view: TaskQuery::default(),
            last_sync: None,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn scheduler(&self) -> &ReminderScheduler<N> {
        &self.scheduler
    }

    pub fn last_sync(&self) -> Option<&SyncReport> {
        self.last_sync.as_ref()
    }

    pub async fn add(&mut self, data: NewTaskData) -> Option<Task> {
        let task = self.store.add(data)?;
        self.sync().await;
        Some(task)
    }

    pub async fn toggle_completion(&mut self, id: &str) -> bool {
        if !self.store.toggle_completion(id) {
            return false;
        }
        self.sync().await;
        true
    }

    pub async fn delete(&mut self, id: &str) -> Option<Task> {
        let removed = self.store.delete(id)?;
        self.sync().await;
        Some(removed)
    }

    /// Persists the full collection, then reconciles reminders against it.
    pub async fn sync(&mut self) -> SyncReport {
        let persisted = save_tasks(&self.storage, self.store.tasks()).await;
        let reminders = self.scheduler.reconcile(self.store.tasks()).await;
        let report = SyncReport {
            persisted,
            reminders,
        };
        self.last_sync = Some(report.clone());
        report
    }

    pub fn view(&self) -> &TaskQuery {
        &self.view
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.view.search = search.into();
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.view.category = category;
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.view.sort = sort;
    }

    /// Current collection through the current view parameters.
    pub fn visible(&self) -> Vec<&Task> {
        self.store.query(&self.view)
    }

    /// Task a notification click refers to, if it still exists.
    pub fn focus(&self, payload: &NotificationPayload) -> Option<&Task> {
        payload.task_id.as_deref().and_then(|id| self.store.get(id))
    }
}
