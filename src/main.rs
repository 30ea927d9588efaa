//! tableau
//!
//! Single-user kanban task tracker: four workflow stages, optional
//! priorities, board and table views over a locally persisted task list.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tableau::cli::{Cli, Command};
use tableau::config::{self, Config};
use tableau::db::Database;
use tableau::format;
use tableau::store::{MutationOutcome, TaskChanges, TaskStore};
use tableau::types::ViewMode;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(cli.config.as_deref())?;
    let db_path = config::resolve_db_path(cli.database, &config);
    let db = Database::open(&db_path)
        .with_context(|| format!("failed to open task database at {}", db_path.display()))?;

    // Migration runs inside open(), before the first render.
    let mut store = TaskStore::open(db)?;

    match cli.command.unwrap_or(Command::Show) {
        Command::Add {
            title,
            description,
            category,
            priority,
        } => {
            let outcome = store.create(&title, &description, category, priority)?;
            report_persist_warning(&outcome);
            println!("created task {}", outcome.task_id);
        }

        Command::Edit {
            id,
            title,
            description,
            category,
            priority,
        } => {
            let changes = TaskChanges {
                title,
                description,
                category,
                priority,
            };
            let outcome = store.update(&id, changes)?;
            report_persist_warning(&outcome);
            println!("updated task {}", outcome.task_id);
        }

        Command::Move { id, category } => {
            let outcome = store.move_task(&id, category)?;
            report_persist_warning(&outcome);
            println!(
                "moved task {} to {}",
                outcome.task_id,
                format::category_label(category)
            );
        }

        Command::Delete { id, yes } => {
            // Confirmation is presentation-side; the store's delete is
            // unconditional once called.
            let title = store
                .get(&id)
                .map(|task| task.title.clone())
                .ok_or_else(|| tableau::error::StoreError::task_not_found(&id))?;
            if !yes && !confirm(&format!("Supprimer \"{}\" ?", title))? {
                println!("aborted");
                return Ok(());
            }
            let outcome = store.delete(&id)?;
            report_persist_warning(&outcome);
            println!("deleted task {}", outcome.task_id);
        }

        Command::Board => print!("{}", format::format_board(&store.board())),

        Command::Table { sort } => {
            for key in sort {
                store.select_sort_key(key);
            }
            print!("{}", format::format_table(&store.table()));
        }

        Command::Show => render_current_view(&store),

        Command::View => {
            let mode = store.toggle_view();
            println!("view mode: {}", mode.as_str());
            render_current_view(&store);
        }
    }

    Ok(())
}

fn render_current_view(store: &TaskStore) {
    match store.view_mode() {
        ViewMode::Columns => print!("{}", format::format_board(&store.board())),
        ViewMode::Table => print!("{}", format::format_table(&store.table())),
    }
}

fn report_persist_warning(outcome: &MutationOutcome) {
    if let Some(warning) = &outcome.persist_warning {
        warn!(code = ?warning.code, "{}", warning.message);
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [o/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "o" | "oui" | "y" | "yes"))
}
