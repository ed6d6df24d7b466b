//! Notification provider seam and a storage-backed local queue.
//!
//! The reminder scheduler only talks to [`NotificationProvider`]. Matching
//! between tasks and outstanding notifications happens through the
//! [`NotificationPayload`] attached to every entry.

use crate::error::CoreError;
use crate::storage::StorageProvider;
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

pub const NOTIFICATIONS_KEY: &str = "NOTIFICATIONS";

/// Opaque identifier the platform hands back for a scheduled notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationHandle(pub String);

impl fmt::Display for NotificationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    TaskReminder,
    DailyReminder,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::TaskReminder => write!(f, "task-reminder"),
            NotificationKind::DailyReminder => write!(f, "daily-reminder"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid notification type: {0}")]
pub struct ParseNotificationKindError(String);

impl FromStr for NotificationKind {
    type Err = ParseNotificationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "task-reminder" => Ok(NotificationKind::TaskReminder),
            "daily-reminder" => Ok(NotificationKind::DailyReminder),
            _ => Err(ParseNotificationKindError(s.to_string())),
        }
    }
}

/// Data carried on each notification and echoed back on click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "taskId", default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl NotificationPayload {
    pub fn task_reminder(task_id: impl Into<String>) -> Self {
        Self {
            task_id: Some(task_id.into()),
            kind: NotificationKind::TaskReminder,
        }
    }

    pub fn daily_reminder() -> Self {
        Self {
            task_id: None,
            kind: NotificationKind::DailyReminder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub data: NotificationPayload,
}

/// When a notification fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Once, at an absolute instant.
    At { at: DateTime<Utc> },
    /// Every day at a local wall-clock time.
    Daily { hour: u32, minute: u32 },
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::At { at } => write!(f, "{}", at.to_rfc3339()),
            Trigger::Daily { hour, minute } => write!(f, "daily at {hour:02}:{minute:02}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub handle: NotificationHandle,
    pub trigger: Trigger,
    pub content: NotificationContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Undetermined,
    Denied,
}

/// Platform notification subsystem.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    async fn permission_status(&self) -> Result<PermissionStatus, CoreError>;
    /// Prompts the user when the status is undetermined.
    async fn request_permission(&self) -> Result<PermissionStatus, CoreError>;
    async fn schedule_at(
        &self,
        at: DateTime<Utc>,
        content: NotificationContent,
    ) -> Result<NotificationHandle, CoreError>;
    async fn schedule_daily(
        &self,
        time: NaiveTime,
        content: NotificationContent,
    ) -> Result<NotificationHandle, CoreError>;
    async fn cancel(&self, handle: &NotificationHandle) -> Result<(), CoreError>;
    async fn list_scheduled(&self) -> Result<Vec<ScheduledNotification>, CoreError>;
}

/// A pending-notification queue kept as JSON in a [`StorageProvider`].
///
/// Permission is modelled as a fixed status plus the answer an
/// undetermined prompt would give. One-shot entries whose instant has
/// passed count as delivered and drop out of the queue.
pub struct LocalNotificationQueue<S> {
    storage: S,
    permission: Mutex<PermissionStatus>,
    grant_on_request: bool,
    queue_lock: Mutex<()>,
}

impl<S: StorageProvider> LocalNotificationQueue<S> {
    pub fn new(storage: S, permission: PermissionStatus) -> Self {
        Self {
            storage,
            permission: Mutex::new(permission),
            grant_on_request: true,
            queue_lock: Mutex::new(()),
        }
    }

    /// What the prompt answers when permission is still undetermined.
    pub fn with_prompt_answer(mut self, grant: bool) -> Self {
        self.grant_on_request = grant;
        self
    }

    async fn load(&self) -> Result<Vec<ScheduledNotification>, CoreError> {
        match self.storage.get(NOTIFICATIONS_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                CoreError::Notification(format!("pending queue is unreadable: {e}"))
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, queue: &[ScheduledNotification]) -> Result<(), CoreError> {
        let raw = serde_json::to_string(queue)?;
        self.storage.set(NOTIFICATIONS_KEY, &raw).await
    }

    async fn ensure_granted(&self) -> Result<(), CoreError> {
        if *self.permission.lock().await == PermissionStatus::Granted {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied)
        }
    }

    async fn push(
        &self,
        trigger: Trigger,
        content: NotificationContent,
    ) -> Result<NotificationHandle, CoreError> {
        self.ensure_granted().await?;
        let _guard = self.queue_lock.lock().await;
        let mut queue = self.load().await?;
        let handle = NotificationHandle(Uuid::now_v7().to_string());
        queue.push(ScheduledNotification {
            handle: handle.clone(),
            trigger,
            content,
        });
        self.store(&queue).await?;
        debug!("queued notification {handle} ({trigger})");
        Ok(handle)
    }
}

#[async_trait]
impl<S: StorageProvider> NotificationProvider for LocalNotificationQueue<S> {
    async fn permission_status(&self) -> Result<PermissionStatus, CoreError> {
        Ok(*self.permission.lock().await)
    }

    async fn request_permission(&self) -> Result<PermissionStatus, CoreError> {
        let mut status = self.permission.lock().await;
        if *status == PermissionStatus::Undetermined {
            *status = if self.grant_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        }
        Ok(*status)
    }

    async fn schedule_at(
        &self,
        at: DateTime<Utc>,
        content: NotificationContent,
    ) -> Result<NotificationHandle, CoreError> {
        if at <= Utc::now() {
            return Err(CoreError::InvalidInput(format!(
                "trigger {} is in the past",
                at.to_rfc3339()
            )));
        }
        self.push(Trigger::At { at }, content).await
    }

    async fn schedule_daily(
        &self,
        time: NaiveTime,
        content: NotificationContent,
    ) -> Result<NotificationHandle, CoreError> {
        let trigger = Trigger::Daily {
            hour: time.hour(),
            minute: time.minute(),
        };
        self.push(trigger, content).await
    }

    async fn cancel(&self, handle: &NotificationHandle) -> Result<(), CoreError> {
        let _guard = self.queue_lock.lock().await;
        let mut queue = self.load().await?;
        let before = queue.len();
        queue.retain(|n| &n.handle != handle);
        if queue.len() != before {
            self.store(&queue).await?;
            debug!("cancelled notification {handle}");
        }
        Ok(())
    }

    async fn list_scheduled(&self) -> Result<Vec<ScheduledNotification>, CoreError> {
        let _guard = self.queue_lock.lock().await;
        let mut queue = self.load().await?;
        let now = Utc::now();
        let before = queue.len();
        queue.retain(|n| match n.trigger {
            Trigger::At { at } => at > now,
            Trigger::Daily { .. } => true,
        });
        if queue.len() != before {
            self.store(&queue).await?;
        }
        Ok(queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Duration;

    fn content(task_id: &str) -> NotificationContent {
        NotificationContent {
            title: "title".to_string(),
            body: "body".to_string(),
            data: NotificationPayload::task_reminder(task_id),
        }
    }

    #[test]
    fn test_payload_wire_shape() {
        let value = serde_json::to_value(NotificationPayload::task_reminder("17")).unwrap();
        assert_eq!(value, serde_json::json!({"taskId": "17", "type": "task-reminder"}));
        let value = serde_json::to_value(NotificationPayload::daily_reminder()).unwrap();
        assert_eq!(value, serde_json::json!({"type": "daily-reminder"}));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            "daily-reminder".parse::<NotificationKind>(),
            Ok(NotificationKind::DailyReminder)
        );
        assert!("weekly".parse::<NotificationKind>().is_err());
    }

    #[tokio::test]
    async fn test_queue_schedule_list_cancel() {
        let queue = LocalNotificationQueue::new(MemoryStorage::new(), PermissionStatus::Granted);
        let at = Utc::now() + Duration::days(2);
        let handle = queue.schedule_at(at, content("1")).await.unwrap();
        let daily = queue
            .schedule_daily(NaiveTime::from_hms_opt(8, 0, 0).unwrap(), content("x"))
            .await
            .unwrap();

        let listed = queue.list_scheduled().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].trigger, Trigger::At { at });
        assert_eq!(listed[1].trigger, Trigger::Daily { hour: 8, minute: 0 });

        queue.cancel(&handle).await.unwrap();
        let listed = queue.list_scheduled().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].handle, daily);
    }

    #[tokio::test]
    async fn test_queue_rejects_past_trigger() {
        let queue = LocalNotificationQueue::new(MemoryStorage::new(), PermissionStatus::Granted);
        let result = queue
            .schedule_at(Utc::now() - Duration::minutes(1), content("1"))
            .await;
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_queue_requires_permission() {
        let queue = LocalNotificationQueue::new(MemoryStorage::new(), PermissionStatus::Denied);
        let result = queue
            .schedule_at(Utc::now() + Duration::days(1), content("1"))
            .await;
        assert!(matches!(result, Err(CoreError::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_corrupt_queue_is_a_notification_error() {
        let storage = MemoryStorage::new();
        storage.set(NOTIFICATIONS_KEY, "[{\"handle\":").await.unwrap();
        let queue = LocalNotificationQueue::new(storage, PermissionStatus::Granted);

        assert!(matches!(
            queue.list_scheduled().await,
            Err(CoreError::Notification(_))
        ));
        assert!(matches!(
            queue.schedule_at(Utc::now() + Duration::days(1), content("1")).await,
            Err(CoreError::Notification(_))
        ));
    }

    #[tokio::test]
    async fn test_prompt_resolves_undetermined_once() {
        let queue = LocalNotificationQueue::new(MemoryStorage::new(), PermissionStatus::Undetermined)
            .with_prompt_answer(false);
        assert_eq!(queue.request_permission().await.unwrap(), PermissionStatus::Denied);
        assert_eq!(queue.permission_status().await.unwrap(), PermissionStatus::Denied);

        let granted = LocalNotificationQueue::new(MemoryStorage::new(), PermissionStatus::Undetermined);
        assert_eq!(granted.request_permission().await.unwrap(), PermissionStatus::Granted);
    }
}
