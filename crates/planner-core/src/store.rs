use crate::models::{NewTaskData, SortMode, Task, TaskQuery};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;

type Observer = Box<dyn Fn(&[Task]) + Send + Sync>;

/// Hands out millisecond-timestamp ids, bumping past the last one issued
/// when the clock has not advanced.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Never issue anything at or below an id already in the collection.
    fn observe(&mut self, id: &str) {
        if let Ok(value) = id.parse::<i64>() {
            self.last = self.last.max(value);
        }
    }

    fn next_at(&mut self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis();
        let next = if millis > self.last { millis } else { self.last + 1 };
        self.last = next;
        next.to_string()
    }
}

/// The canonical, insertion-ordered task collection.
///
/// Mutations go through [`add`](Self::add), [`toggle_completion`](Self::toggle_completion)
/// and [`delete`](Self::delete). Every mutation that changes the collection
/// notifies subscribers with the full snapshot.
#[derive(Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    ids: IdGenerator,
    observers: Vec<Observer>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store over a previously persisted collection.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut ids = IdGenerator::default();
        for task in &tasks {
            ids.observe(&task.id);
        }
        Self {
            tasks,
            ids,
            observers: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.id.starts_with(prefix)).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&[Task]) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer(&self.tasks);
        }
    }

    /// Appends a new task. A title that is empty after trimming is rejected
    /// and the collection is left untouched.
    pub fn add(&mut self, data: NewTaskData) -> Option<Task> {
        self.add_at(data, Utc::now())
    }

    pub fn add_at(&mut self, data: NewTaskData, now: DateTime<Utc>) -> Option<Task> {
        let title = data.title.trim();
        if title.is_empty() {
            debug!("rejecting task with empty title");
            return None;
        }

        let task = Task {
            id: self.ids.next_at(now),
            title: title.to_string(),
            completed: false,
            created_at: now,
            category: data.category.unwrap_or_default(),
            due_date: data.due_date,
            priority: data.priority.unwrap_or_default(),
        };
        self.tasks.push(task.clone());
        self.notify();
        Some(task)
    }

    /// Flips `completed` on the matching task. Returns `false` when no task
    /// has this id.
    pub fn toggle_completion(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.notify();
        true
    }

    /// Removes the matching task, preserving the order of the rest.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(index);
        self.notify();
        Some(removed)
    }

    /// Filtered, sorted view of the collection. Does not mutate the store.
    pub fn query(&self, query: &TaskQuery) -> Vec<&Task> {
        let needle = query.search.to_lowercase();
        let mut matched: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .filter(|t| query.category.matches(t.category))
            .collect();

        // `sort_by` is stable: ties keep collection order.
        match query.sort {
            SortMode::DateAsc => matched.sort_by(|a, b| compare_due(a.due_date, b.due_date, false)),
            SortMode::DateDesc => matched.sort_by(|a, b| compare_due(a.due_date, b.due_date, true)),
            SortMode::Priority => matched.sort_by_key(|t| t.priority.rank()),
        }
        matched
    }
}

/// Undated tasks rank after every dated task in both directions.
fn compare_due(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_id_generator_bumps_within_same_millisecond() {
        let mut ids = IdGenerator::default();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(ids.next_at(now), "1700000000000");
        assert_eq!(ids.next_at(now), "1700000000001");
        assert_eq!(ids.next_at(now), "1700000000002");
    }

    #[test]
    fn test_id_generator_never_goes_backwards() {
        let mut ids = IdGenerator::default();
        ids.observe("1700000000500");
        let earlier = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(ids.next_at(earlier), "1700000000501");
    }

    #[test]
    fn test_id_generator_ignores_non_numeric_ids() {
        let mut ids = IdGenerator::default();
        ids.observe("legacy-id");
        let now = Utc.timestamp_millis_opt(42).unwrap();
        assert_eq!(ids.next_at(now), "42");
    }

    #[test]
    fn test_compare_due_places_undated_last() {
        let d = Some(Utc.timestamp_millis_opt(0).unwrap());
        assert_eq!(compare_due(d, None, false), Ordering::Less);
        assert_eq!(compare_due(d, None, true), Ordering::Less);
        assert_eq!(compare_due(None, d, true), Ordering::Greater);
        assert_eq!(compare_due(None, None, false), Ordering::Equal);
    }

    #[test]
    fn test_observers_see_snapshot_after_mutation() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut store = TaskStore::new();
        store.subscribe(move |tasks| sink.lock().unwrap().push(tasks.len()));

        let task = store.add(NewTaskData::titled("one")).unwrap();
        store.add(NewTaskData::titled("   "));
        store.toggle_completion(&task.id);
        store.toggle_completion("missing");
        store.delete(&task.id);
        store.delete("missing");

        assert_eq!(*seen.lock().unwrap(), vec![1, 1, 0]);
    }
}
