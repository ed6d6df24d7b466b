//! # Planner Core Library
//!
//! Task list management paired with local due-date reminders.
//!
//! ## Core Modules
//!
//! - [`models`]: Task entity, enumerations and view parameters
//! - [`dates`]: Calendar-day bucketing in local time
//! - [`store`]: The canonical task collection with filtering and sorting
//! - [`storage`]: Key-value persistence of the whole collection
//! - [`notify`]: Notification provider seam and a local queue
//! - [`reminders`]: Reconciliation of reminders against the live queue
//! - [`planner`]: Composition used by a host shell
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use planner_core::{
//!     models::{NewTaskData, ReminderConfig},
//!     notify::{LocalNotificationQueue, PermissionStatus},
//!     planner::Planner,
//!     storage::FileStorage,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = FileStorage::new("planner-data");
//!     let queue = LocalNotificationQueue::new(storage.clone(), PermissionStatus::Granted);
//!     let mut planner = Planner::open(storage, queue, ReminderConfig::default()).await;
//!
//!     if let Some(task) = planner.add(NewTaskData::titled("Buy milk")).await {
//!         println!("Created task: {}", task.title);
//!     }
//! }
//! ```

pub mod dates;
pub mod error;
pub mod models;
pub mod notify;
pub mod planner;
pub mod reminders;
pub mod storage;
pub mod store;
