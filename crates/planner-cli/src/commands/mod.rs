pub mod add;
pub mod delete;
pub mod list;
pub mod reminders;
pub mod sync;
pub mod toggle;

use owo_colors::{OwoColorize, Style};
use planner_core::planner::SyncReport;

/// Surfaces side-effect problems from the last sync without failing the command.
pub(crate) fn warn_on_sync_problems(report: Option<&SyncReport>) {
    let Some(report) = report else {
        return;
    };
    let warning = Style::new().yellow().bold();
    if !report.persisted {
        eprintln!(
            "{} Changes could not be saved to disk.",
            "Warning:".style(warning)
        );
    }
    if report.reminders.failures > 0 {
        eprintln!(
            "{} {} reminder operation(s) failed; they will be retried on the next change.",
            "Warning:".style(warning),
            report.reminders.failures
        );
    }
}
