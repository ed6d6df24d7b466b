use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single to-do item.
///
/// Field names serialize in camelCase so the stored JSON reads
/// `id, title, completed, createdAt, category, dueDate, priority`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Wall-clock derived identifier, unique for the collection's lifetime.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub category: Category,
    /// Only the calendar day is meaningful; absent means no deadline.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    #[serde(rename = "genel")]
    General,
    #[serde(rename = "is")]
    Work,
    #[serde(rename = "kisisel")]
    Personal,
    #[serde(rename = "alisveris")]
    Shopping,
    #[serde(rename = "saglik")]
    Health,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Health,
    ];

    /// Stored identifier, e.g. `alisveris`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "genel",
            Category::Work => "is",
            Category::Personal => "kisisel",
            Category::Shopping => "alisveris",
            Category::Health => "saglik",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "Genel",
            Category::Work => "İş",
            Category::Personal => "Kişisel",
            Category::Shopping => "Alışveriş",
            Category::Health => "Sağlık",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid category: {0}")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "genel" | "general" => Ok(Category::General),
            "is" | "work" => Ok(Category::Work),
            "kisisel" | "personal" => Ok(Category::Personal),
            "alisveris" | "shopping" => Ok(Category::Shopping),
            "saglik" | "health" => Ok(Category::Health),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    /// Sort rank: high first, low last.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Düşük",
            Priority::Normal => "Normal",
            Priority::High => "Yüksek",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task priority: {0}")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// Ordering applied by [`crate::store::TaskStore::query`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    DateAsc,
    DateDesc,
    Priority,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::DateAsc => write!(f, "date-asc"),
            SortMode::DateDesc => write!(f, "date-desc"),
            SortMode::Priority => write!(f, "priority"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid sort mode: {0}")]
pub struct ParseSortModeError(String);

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date-asc" | "date" => Ok(SortMode::DateAsc),
            "date-desc" => Ok(SortMode::DateDesc),
            "priority" => Ok(SortMode::Priority),
            _ => Err(ParseSortModeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "Tümü",
            CategoryFilter::Only(c) => c.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Only(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// The three view parameters the host shell owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortMode,
}

#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub title: String,
    pub category: Option<Category>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
}

impl NewTaskData {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Reminder timing - core version.
/// The CLI keeps its own config shape and converts into this one.
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Local hour on the due date at which a task reminder fires
    pub reminder_hour: u32,
    /// Local time of day for the recurring summary
    pub daily_summary_time: NaiveTime,
    /// Whether the recurring summary is registered at all
    pub daily_summary_enabled: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            reminder_hour: 9,
            daily_summary_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            daily_summary_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_json_field_names() {
        let task = Task {
            id: "1700000000000".to_string(),
            title: "Buy milk".to_string(),
            completed: false,
            created_at: Utc::now(),
            category: Category::Shopping,
            due_date: None,
            priority: Priority::High,
        };
        let value = serde_json::to_value(&task).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["category", "completed", "createdAt", "dueDate", "id", "priority", "title"]
        );
        assert_eq!(obj["category"], "alisveris");
        assert_eq!(obj["priority"], "high");
        assert!(obj["dueDate"].is_null());
    }

    #[test]
    fn test_task_reads_stored_record() {
        let raw = r#"{"id":"1683000000000","title":"Doktor","completed":true,
            "createdAt":"2023-05-02T04:00:00.000Z","category":"saglik",
            "dueDate":"2023-05-10T09:00:00.000Z","priority":"low"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.category, Category::Health);
        assert_eq!(task.priority, Priority::Low);
        assert!(task.completed);
        assert!(task.due_date.is_some());
    }

    #[test]
    fn test_missing_category_and_priority_use_defaults() {
        let raw = r#"{"id":"1","title":"Old","completed":false,"createdAt":"2023-05-02T04:00:00Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.category, Category::General);
        assert_eq!(task.priority, Priority::Normal);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("is".parse::<Category>(), Ok(Category::Work));
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("date-desc".parse::<SortMode>(), Ok(SortMode::DateDesc));
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "saglik".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Health))
        );
        assert!("urgent".parse::<Priority>().is_err());
        assert!("misc".parse::<Category>().is_err());
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() < Priority::Normal.rank());
        assert!(Priority::Normal.rank() < Priority::Low.rank());
    }
}
