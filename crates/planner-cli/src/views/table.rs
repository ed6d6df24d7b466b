use chrono::Local;
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use planner_core::dates::{due_status, DueStatus};
use planner_core::models::{Priority, Task};
use planner_core::notify::{NotificationHandle, NotificationKind, ScheduledNotification, Trigger};

pub fn display_tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Category", "Priority", "Due", "Status"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(&task.id));

        let mut title_cell = Cell::new(&task.title);
        title_cell = if task.completed {
            title_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey)
        } else {
            match task.priority {
                Priority::High => title_cell.fg(Color::Red).add_attribute(Attribute::Bold),
                Priority::Normal => title_cell,
                Priority::Low => title_cell.fg(Color::Green),
            }
        };
        row.add_cell(title_cell);

        row.add_cell(Cell::new(task.category.label()));
        row.add_cell(Cell::new(task.priority.label()));

        let due_cell = match due_status(task) {
            Some(status) => {
                let cell = Cell::new(status.label());
                match status {
                    DueStatus::Overdue => cell.fg(Color::Red),
                    DueStatus::Today => cell.fg(Color::Yellow),
                    DueStatus::Tomorrow => cell.fg(Color::Cyan),
                    DueStatus::On(_) => cell,
                }
            }
            None => Cell::new("-"),
        };
        row.add_cell(due_cell);

        row.add_cell(if task.completed {
            Cell::new("Completed").fg(Color::Green)
        } else {
            Cell::new("Pending")
        });
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_reminders(entries: &[ScheduledNotification]) {
    if entries.is_empty() {
        println!("No reminders scheduled.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Handle", "Type", "When", "Title", "Message"]);

    for entry in entries {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_handle(&entry.handle)));

        let kind = entry.content.data.kind;
        row.add_cell(match kind {
            NotificationKind::TaskReminder => Cell::new(kind).fg(Color::Cyan),
            NotificationKind::DailyReminder => Cell::new(kind).fg(Color::Magenta),
        });

        let when = match entry.trigger {
            Trigger::At { at } => format!(
                "{} ({})",
                at.with_timezone(&Local).format("%d.%m.%Y %H:%M"),
                at.humanize()
            ),
            daily => daily.to_string(),
        };
        row.add_cell(Cell::new(when));
        row.add_cell(Cell::new(&entry.content.title));
        row.add_cell(Cell::new(&entry.content.body));
        table.add_row(row);
    }

    println!("{table}");
}

/// First eight characters of a handle, for display.
fn short_handle(handle: &NotificationHandle) -> String {
    handle.0.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_handle_truncates_by_character() {
        let uuid = NotificationHandle("0190a5b2-7c3e-7f00-8000-000000000000".to_string());
        assert_eq!(short_handle(&uuid), "0190a5b2");

        let imported = NotificationHandle("ğüşiöçĞÜŞ".to_string());
        assert_eq!(short_handle(&imported), "ğüşiöçĞÜ");

        let short = NotificationHandle("ab".to_string());
        assert_eq!(short_handle(&short), "ab");
    }
}
