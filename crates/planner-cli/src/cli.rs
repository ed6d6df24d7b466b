use clap::{Parser, Subcommand};
use planner_core::models::{Category, CategoryFilter, Priority, SortMode};

/// A daily planner for the terminal with due-date reminders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List tasks
    #[command(alias = "ls")]
    List(ListCommand),
    /// Mark a task as completed, or reopen a completed one
    #[command(alias = "do")]
    Toggle(ToggleCommand),
    /// Delete a task
    #[command(alias = "rm")]
    Delete(DeleteCommand),
    /// Show the pending notification queue
    Reminders,
    /// Save all tasks and bring reminders up to date
    Sync,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// Category (genel, is, kisisel, alisveris, saglik)
    #[clap(short, long)]
    pub category: Option<Category>,
    /// The due date (e.g. "tomorrow", "friday", "24.12.2025")
    #[clap(short, long)]
    pub due: Option<String>,
    /// Priority (low, normal, high)
    #[clap(short, long)]
    pub priority: Option<Priority>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only tasks whose title contains this text
    #[clap(short, long)]
    pub search: Option<String>,
    /// Category to show, or "all"
    #[clap(short, long)]
    pub category: Option<CategoryFilter>,
    /// Sort order (date-asc, date-desc, priority)
    #[clap(long)]
    pub sort: Option<SortMode>,
}

#[derive(Parser, Debug, Clone)]
pub struct ToggleCommand {
    /// The ID (or a unique ID prefix) of the task
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or a unique ID prefix) of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}
