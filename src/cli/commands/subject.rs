//! Subject command implementation.

use crate::cli::args::{OutputFormat, SubjectCommands};
use crate::error::StudoroError;
use crate::features::subjects::{Subject, SubjectStorage};
use crate::output::{format_subjects, to_json};
use crate::storage::Database;

/// Execute subject subcommands.
pub fn subject(
    db: &Database,
    cmd: SubjectCommands,
    format: OutputFormat,
) -> Result<String, StudoroError> {
    let storage = SubjectStorage::new(db);

    match cmd {
        SubjectCommands::Add {
            name,
            icon,
            color,
            target,
        } => {
            let mut subject = Subject::new(&name);
            subject.icon = icon;
            subject.color = color;
            subject.target_hours_per_week = target;

            let saved = storage.add(&subject)?;
            match format {
                OutputFormat::Pretty => Ok(format!(
                    "Added subject [{}] {}",
                    saved.id.unwrap_or_default(),
                    saved.display_name()
                )),
                OutputFormat::Json => to_json(&saved),
            }
        }

        SubjectCommands::List => {
            let subjects = storage.list()?;
            format_subjects(&subjects, format)
        }

        SubjectCommands::Update {
            id,
            name,
            icon,
            color,
            target,
        } => {
            let mut subject = storage.get(id)?;
            if let Some(name) = name {
                subject.name = name;
            }
            if let Some(icon) = icon {
                subject.icon = Some(icon);
            }
            if let Some(color) = color {
                subject.color = Some(color);
            }
            if let Some(target) = target {
                subject.target_hours_per_week = Some(target);
            }

            storage.update(&subject)?;
            match format {
                OutputFormat::Pretty => Ok(format!("Updated subject [{id}] {}", subject.display_name())),
                OutputFormat::Json => to_json(&subject),
            }
        }

        SubjectCommands::Delete { id } => {
            let subject = storage.get(id)?;
            storage.delete(id)?;
            match format {
                OutputFormat::Pretty => Ok(format!("Deleted subject {}", subject.display_name())),
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
    fn test_add_list_delete() {
        let db = Database::open_in_memory().unwrap();

        let output = subject(
            &db,
            SubjectCommands::Add {
                name: "Math".to_string(),
                icon: None,
                color: None,
                target: Some(4.0),
            },
            OutputFormat::Pretty,
        )
        .unwrap();
        assert!(output.contains("Math"));

        let output = subject(&db, SubjectCommands::List, OutputFormat::Json).unwrap();
        assert!(output.contains("\"count\": 1"));

        subject(&db, SubjectCommands::Delete { id: 1 }, OutputFormat::Pretty).unwrap();
        let output = subject(&db, SubjectCommands::List, OutputFormat::Json).unwrap();
        assert!(output.contains("\"count\": 0"));
    }

    #[test]
    fn test_update_missing_subject() {
        let db = Database::open_in_memory().unwrap();
        let err = subject(
            &db,
            SubjectCommands::Update {
                id: 7,
                name: Some("Nope".to_string()),
                icon: None,
                color: None,
                target: None,
            },
            OutputFormat::Pretty,
        )
        .unwrap_err();
        assert!(matches!(err, StudoroError::NotFound(_)));
    }
}
