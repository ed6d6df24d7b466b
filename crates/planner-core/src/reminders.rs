//! Keeps the notification queue consistent with the task collection.
//!
//! Each pass derives the desired reminder set from scratch and reconciles it
//! against the provider's live queue, matching entries on the `taskId` in
//! their payload. Stale entries are cancelled before anything new is
//! scheduled, so a task never has two outstanding reminders. Provider
//! failures are logged and counted, never returned.

use crate::dates::on_local_day_at;
use crate::models::{ReminderConfig, Task};
use crate::notify::{
    NotificationContent, NotificationHandle, NotificationKind, NotificationPayload,
    NotificationProvider, PermissionStatus, ScheduledNotification, Trigger,
};
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const TASK_REMINDER_TITLE: &str = "Görev Hatırlatıcısı";
pub const DAILY_SUMMARY_TITLE: &str = "Günlük Planlayıcı";

pub fn task_reminder_content(task: &Task) -> NotificationContent {
    NotificationContent {
        title: TASK_REMINDER_TITLE.to_string(),
        body: format!("\"{}\" görevi bugün son gün!", task.title),
        data: NotificationPayload::task_reminder(task.id.clone()),
    }
}

pub fn daily_summary_content(pending: usize) -> NotificationContent {
    NotificationContent {
        title: DAILY_SUMMARY_TITLE.to_string(),
        body: format!("Bugün {pending} tamamlanmamış göreviniz var."),
        data: NotificationPayload::daily_reminder(),
    }
}

/// A reminder the current collection calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub task_id: String,
    pub at: DateTime<Utc>,
    pub content: NotificationContent,
}

impl ReminderRequest {
    fn is_satisfied_by(&self, entry: &ScheduledNotification) -> bool {
        entry.trigger == (Trigger::At { at: self.at }) && entry.content == self.content
    }
}

/// The trigger for `task`, or `None` when it should not have a reminder:
/// completed, undated, or its reminder time is not after `now`.
pub fn reminder_time(task: &Task, config: &ReminderConfig, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if task.completed {
        return None;
    }
    let due = task.due_date?;
    let time = NaiveTime::from_hms_opt(config.reminder_hour, 0, 0)?;
    let at = on_local_day_at(due, time)?;
    (at > now).then_some(at)
}

/// Desired reminder set for `tasks` as of `now`, in collection order.
pub fn plan_reminders(tasks: &[Task], config: &ReminderConfig, now: DateTime<Utc>) -> Vec<ReminderRequest> {
    tasks
        .iter()
        .filter_map(|task| {
            reminder_time(task, config, now).map(|at| ReminderRequest {
                task_id: task.id.clone(),
                at,
                content: task_reminder_content(task),
            })
        })
        .collect()
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// False when notification delivery was not permitted; nothing else ran.
    pub permitted: bool,
    /// Task ids that received a new reminder.
    pub scheduled: Vec<String>,
    /// Task ids whose live reminder already matched and was left alone.
    pub kept: Vec<String>,
    /// Handles of entries removed from the queue.
    pub cancelled: Vec<NotificationHandle>,
    /// Provider calls that failed this pass.
    pub failures: usize,
    /// Handle of the daily summary after this pass, if one is registered.
    pub daily_summary: Option<NotificationHandle>,
}

pub struct ReminderScheduler<N> {
    provider: N,
    config: ReminderConfig,
    bindings: HashMap<String, NotificationHandle>,
    daily_summary: Option<NotificationHandle>,
}

impl<N: NotificationProvider> ReminderScheduler<N> {
    pub fn new(provider: N, config: ReminderConfig) -> Self {
        Self {
            provider,
            config,
            bindings: HashMap::new(),
            daily_summary: None,
        }
    }

    pub fn provider(&self) -> &N {
        &self.provider
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Outstanding reminder for a task as of the last pass.
    pub fn binding(&self, task_id: &str) -> Option<&NotificationHandle> {
        self.bindings.get(task_id)
    }

    pub fn daily_summary_handle(&self) -> Option<&NotificationHandle> {
        self.daily_summary.as_ref()
    }

    /// Resolves the delivery capability, prompting once when undetermined.
    /// Provider errors count as "not permitted".
    pub async fn is_permitted(&self) -> bool {
        let status = match self.provider.permission_status().await {
            Ok(PermissionStatus::Undetermined) => self.provider.request_permission().await,
            other => other,
        };
        match status {
            Ok(status) => status == PermissionStatus::Granted,
            Err(e) => {
                warn!("cannot resolve notification permission: {e}");
                false
            }
        }
    }

    pub async fn reconcile(&mut self, tasks: &[Task]) -> ReconcileReport {
        self.reconcile_at(tasks, Utc::now()).await
    }

    /// Full pass: per-task reminders, then the daily summary.
    pub async fn reconcile_at(&mut self, tasks: &[Task], now: DateTime<Utc>) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        if !self.is_permitted().await {
            debug!("notifications not permitted, skipping reminder pass");
            return report;
        }
        report.permitted = true;

        let live = match self.provider.list_scheduled().await {
            Ok(live) => Some(live),
            Err(e) => {
                warn!("cannot list scheduled notifications, skipping task reminders: {e}");
                report.failures += 1;
                None
            }
        };

        if let Some(live) = &live {
            let plan = plan_reminders(tasks, &self.config, now);
            self.reconcile_task_reminders(&plan, live, &mut report).await;
        }

        if self.config.daily_summary_enabled {
            let pending = tasks.iter().filter(|t| !t.completed).count();
            self.register_daily_summary(pending, live.as_deref(), &mut report)
                .await;
        } else {
            self.retire_daily_summary(live.as_deref(), &mut report).await;
        }
        report.daily_summary = self.daily_summary.clone();

        info!(
            "reminder pass: {} scheduled, {} kept, {} cancelled, {} failures",
            report.scheduled.len(),
            report.kept.len(),
            report.cancelled.len(),
            report.failures
        );
        report
    }

    async fn reconcile_task_reminders(
        &mut self,
        plan: &[ReminderRequest],
        live: &[ScheduledNotification],
        report: &mut ReconcileReport,
    ) {
        let desired: HashMap<&str, &ReminderRequest> =
            plan.iter().map(|r| (r.task_id.as_str(), r)).collect();
        let mut bindings: HashMap<String, NotificationHandle> = HashMap::new();

        let task_entries = live
            .iter()
            .filter(|n| n.content.data.kind == NotificationKind::TaskReminder);

        for entry in task_entries {
            let task_id = entry.content.data.task_id.as_deref();
            let keep = task_id.is_some_and(|id| {
                !bindings.contains_key(id)
                    && desired.get(id).is_some_and(|r| r.is_satisfied_by(entry))
            });
            if let Some(id) = task_id.filter(|_| keep) {
                bindings.insert(id.to_string(), entry.handle.clone());
                report.kept.push(id.to_string());
                continue;
            }

            match self.provider.cancel(&entry.handle).await {
                Ok(()) => {
                    debug!("cancelled stale reminder {} (task {:?})", entry.handle, task_id);
                    report.cancelled.push(entry.handle.clone());
                }
                Err(e) => {
                    warn!("cannot cancel reminder {}: {e}", entry.handle);
                    report.failures += 1;
                    // Still outstanding: blocks a replacement until a later pass.
                    if let Some(id) = task_id {
                        bindings
                            .entry(id.to_string())
                            .or_insert_with(|| entry.handle.clone());
                    }
                }
            }
        }

        for request in plan {
            if bindings.contains_key(&request.task_id) {
                continue;
            }
            match self
                .provider
                .schedule_at(request.at, request.content.clone())
                .await
            {
                Ok(handle) => {
                    debug!("scheduled reminder {handle} for task {}", request.task_id);
                    bindings.insert(request.task_id.clone(), handle);
                    report.scheduled.push(request.task_id.clone());
                }
                Err(e) => {
                    warn!("cannot schedule reminder for task {}: {e}", request.task_id);
                    report.failures += 1;
                }
            }
        }

        self.bindings = bindings;
    }

    /// Replaces whatever daily summary is registered with one reporting
    /// `pending`. An identical live registration is kept instead.
    async fn register_daily_summary(
        &mut self,
        pending: usize,
        live: Option<&[ScheduledNotification]>,
        report: &mut ReconcileReport,
    ) {
        let time = self.config.daily_summary_time;
        let content = daily_summary_content(pending);
        let trigger = Trigger::Daily {
            hour: time.hour(),
            minute: time.minute(),
        };

        let mut stale: Vec<NotificationHandle> = Vec::new();
        let mut current: Option<NotificationHandle> = None;
        if let Some(live) = live {
            for entry in live
                .iter()
                .filter(|n| n.content.data.kind == NotificationKind::DailyReminder)
            {
                if current.is_none() && entry.trigger == trigger && entry.content == content {
                    current = Some(entry.handle.clone());
                } else {
                    stale.push(entry.handle.clone());
                }
            }
        }
        // Without the live queue, the handle from the last pass is the only
        // registration we know about.
        if live.is_none() {
            if let Some(known) = self.daily_summary.clone() {
                stale.push(known);
            }
        }

        let mut blocked = false;
        for handle in stale {
            match self.provider.cancel(&handle).await {
                Ok(()) => {
                    debug!("cancelled previous daily summary {handle}");
                    report.cancelled.push(handle);
                }
                Err(e) => {
                    warn!("cannot cancel daily summary {handle}: {e}");
                    report.failures += 1;
                    blocked = true;
                    current.get_or_insert(handle);
                }
            }
        }

        if current.is_some() || blocked {
            self.daily_summary = current;
            return;
        }

        match self.provider.schedule_daily(time, content).await {
            Ok(handle) => {
                debug!("registered daily summary {handle} for {pending} pending tasks");
                self.daily_summary = Some(handle);
            }
            Err(e) => {
                warn!("cannot register daily summary: {e}");
                report.failures += 1;
                self.daily_summary = None;
            }
        }
    }

    /// Cancels every daily summary registration while the summary is
    /// switched off. A handle whose cancel fails stays tracked.
    async fn retire_daily_summary(
        &mut self,
        live: Option<&[ScheduledNotification]>,
        report: &mut ReconcileReport,
    ) {
        let registered: Vec<NotificationHandle> = match live {
            Some(live) => live
                .iter()
                .filter(|n| n.content.data.kind == NotificationKind::DailyReminder)
                .map(|n| n.handle.clone())
                .collect(),
            None => self.daily_summary.iter().cloned().collect(),
        };

        let mut remaining = None;
        for handle in registered {
            match self.provider.cancel(&handle).await {
                Ok(()) => {
                    debug!("cancelled disabled daily summary {handle}");
                    report.cancelled.push(handle);
                }
                Err(e) => {
                    warn!("cannot cancel daily summary {handle}: {e}");
                    report.failures += 1;
                    remaining.get_or_insert(handle);
                }
            }
        }
        self.daily_summary = remaining;
    }

    /// Cancel-then-schedule for a single task. `None` when not permitted,
    /// when the task needs no reminder, or on any provider failure.
    pub async fn schedule_task_reminder(&mut self, task: &Task) -> Option<NotificationHandle> {
        if !self.is_permitted().await {
            return None;
        }
        if !self.cancel_task_reminder(&task.id).await {
            return None;
        }
        let at = reminder_time(task, &self.config, Utc::now())?;
        match self
            .provider
            .schedule_at(at, task_reminder_content(task))
            .await
        {
            Ok(handle) => {
                self.bindings.insert(task.id.clone(), handle.clone());
                Some(handle)
            }
            Err(e) => {
                warn!("cannot schedule reminder for task {}: {e}", task.id);
                None
            }
        }
    }

    /// Removes every queued reminder bound to `task_id`. Returns `false` if
    /// the queue could not be read or any cancellation failed.
    pub async fn cancel_task_reminder(&mut self, task_id: &str) -> bool {
        let live = match self.provider.list_scheduled().await {
            Ok(live) => live,
            Err(e) => {
                warn!("cannot list scheduled notifications: {e}");
                return false;
            }
        };

        let mut all_cancelled = true;
        for entry in live
            .iter()
            .filter(|n| n.content.data.task_id.as_deref() == Some(task_id))
        {
            if let Err(e) = self.provider.cancel(&entry.handle).await {
                warn!("cannot cancel reminder {}: {e}", entry.handle);
                all_cancelled = false;
            }
        }
        if all_cancelled {
            self.bindings.remove(task_id);
        }
        all_cancelled
    }
}
