//! Task command implementation.

use crate::cli::args::{OutputFormat, TaskCommands};
use crate::error::StudoroError;
use crate::features::subjects::SubjectStorage;
use crate::features::tasks::{Priority, Task, TaskStorage};
use crate::output::{format_tasks, to_json};
use crate::storage::Database;

use super::resolve_subject;

/// Execute task subcommands.
pub fn task(db: &Database, cmd: TaskCommands, format: OutputFormat) -> Result<String, StudoroError> {
    let storage = TaskStorage::new(db);
    let subjects = SubjectStorage::new(db);

    match cmd {
        TaskCommands::Add {
            title,
            subject,
            priority,
        } => {
            let mut task = Task::new(&title);
            if let Some(reference) = subject {
                task.subject_id = resolve_subject(&subjects, &reference)?.id;
            }
            if let Some(ref p) = priority {
                task.priority = Priority::parse(p).ok_or_else(|| {
                    StudoroError::Validation(format!(
                        "Unknown priority '{p}'. Use low, medium, or high"
                    ))
                })?;
            }

            let saved = storage.add(&task)?;
            match format {
                OutputFormat::Pretty => Ok(format!(
                    "Added task [{}] {}",
                    saved.id.unwrap_or_default(),
                    saved.title
                )),
                OutputFormat::Json => to_json(&saved),
            }
        }

        TaskCommands::List { all } => {
            let tasks = storage.list(all)?;
            format_tasks(&tasks, |id| subjects.get(id).ok().map(|s| s.display_name()), format)
        }

        TaskCommands::Done { id } => {
            let task = storage.toggle(id)?;
            match format {
                OutputFormat::Pretty => Ok(format!(
                    "{} {}",
                    if task.completed { "Completed" } else { "Reopened" },
                    task.title
                )),
                OutputFormat::Json => to_json(&task),
            }
        }

        TaskCommands::Delete { id } => {
            storage.delete(id)?;
            match format {
                OutputFormat::Pretty => Ok(format!("Deleted task {id}")),
                OutputFormat::Json => to_json(&serde_json::json!({
                    "deleted": id
                })),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_done_delete() {
        let db = Database::open_in_memory().unwrap();

        task(
            &db,
            TaskCommands::Add {
                title: "Review notes".to_string(),
                subject: None,
                priority: Some("high".to_string()),
            },
            OutputFormat::Pretty,
        )
        .unwrap();

        let output = task(&db, TaskCommands::Done { id: 1 }, OutputFormat::Pretty).unwrap();
        assert!(output.contains("Completed"));

        task(&db, TaskCommands::Delete { id: 1 }, OutputFormat::Pretty).unwrap();
        let err = task(&db, TaskCommands::Done { id: 1 }, OutputFormat::Pretty).unwrap_err();
        assert!(matches!(err, StudoroError::NotFound(_)));
    }

    #[test]
    fn test_add_rejects_unknown_priority() {
        let db = Database::open_in_memory().unwrap();
        let err = task(
            &db,
            TaskCommands::Add {
                title: "Oops".to_string(),
                subject: None,
                priority: Some("urgent".to_string()),
            },
            OutputFormat::Pretty,
        )
        .unwrap_err();
        assert!(matches!(err, StudoroError::Validation(_)));
    }

    #[test]
    fn test_add_rejects_unknown_subject() {
        let db = Database::open_in_memory().unwrap();
        let err = task(
            &db,
            TaskCommands::Add {
                title: "Study".to_string(),
                subject: Some("Ghost".to_string()),
                priority: None,
            },
            OutputFormat::Pretty,
        )
        .unwrap_err();
        assert!(matches!(err, StudoroError::NotFound(_)));
    }
}
