//! Text rendering of the board and table views.
//!
//! Pure functions from query results to strings; nothing here touches the
//! store or the terminal. Stage labels keep the French wording of the UI.

use crate::store::BoardColumn;
use crate::types::{Category, Priority, Task};

/// Display label for a workflow stage.
pub fn category_label(category: Category) -> &'static str {
    match category {
        Category::ALancer => "À lancer",
        Category::EnCours => "En cours",
        Category::AFinir => "À finir",
        Category::Complet => "Complet",
    }
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "!!! ",
        Priority::High => "!! ",
        Priority::Medium => "! ",
        Priority::Low | Priority::None => "",
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Render the board view: one section per column, in board order.
pub fn format_board(columns: &[BoardColumn]) -> String {
    let mut out = String::new();
    for column in columns {
        out.push_str(&format!(
            "## {} ({})\n\n",
            category_label(column.category),
            column.tasks.len()
        ));
        for task in &column.tasks {
            out.push_str(&format_task_line(task));
        }
        out.push('\n');
    }
    out
}

/// Render the table view: one global list in the caller-chosen order, each
/// line carrying the stage so the flat list stays readable.
pub fn format_table(tasks: &[Task]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Tâches ({})\n\n", tasks.len()));
    for task in tasks {
        out.push_str(&format!(
            "- [{}] {}",
            category_label(task.category),
            format_task_line(task).trim_start_matches("- "),
        ));
    }
    out
}

fn format_task_line(task: &Task) -> String {
    let description = if task.description.is_empty() {
        String::new()
    } else {
        format!(" - {}", task.description)
    };
    format!(
        "- {}{} `{}`{}\n",
        priority_marker(task.priority),
        task.title,
        short_id(&task.id),
        description,
    )
}
