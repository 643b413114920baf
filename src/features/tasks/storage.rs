//! SQLite persistence for tasks.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::task::{Priority, Task};
use crate::error::StudoroError;
use crate::storage::Database;

/// Task persistence operations.
pub struct TaskStorage<'a> {
    db: &'a Database,
}

impl<'a> TaskStorage<'a> {
    /// Create storage backed by the given database.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a task and return it with its new id.
    pub fn add(&self, task: &Task) -> Result<Task, StudoroError> {
        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO tasks (title, completed, subject_id, priority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.title,
                task.completed,
                task.subject_id,
                task.priority.as_str(),
                task.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| StudoroError::Database(e.to_string()))?;

        let mut saved = task.clone();
        saved.id = Some(conn.last_insert_rowid());
        Ok(saved)
    }

    /// List tasks, open ones first, then by priority and age.
    pub fn list(&self, include_completed: bool) -> Result<Vec<Task>, StudoroError> {
        let conn = self.db.connection();
        let sql = if include_completed {
            "SELECT id, title, completed, subject_id, priority, created_at FROM tasks
             ORDER BY completed,
                      CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END,
                      created_at"
        } else {
            "SELECT id, title, completed, subject_id, priority, created_at FROM tasks
             WHERE completed = 0
             ORDER BY CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END,
                      created_at"
        };

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StudoroError::Database(e.to_string()))?;

        let tasks = stmt
            .query_map([], row_to_task)
            .map_err(|e| StudoroError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StudoroError::Database(e.to_string()))?;

        Ok(tasks)
    }

    /// Fetch a task by id.
    pub fn get(&self, id: i64) -> Result<Task, StudoroError> {
        self.db
            .connection()
            .query_row(
                "SELECT id, title, completed, subject_id, priority, created_at FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()
            .map_err(|e| StudoroError::Database(e.to_string()))?
            .ok_or_else(|| StudoroError::NotFound(format!("Task {id} not found")))
    }

    /// Flip a task's completed flag and return the new state.
    pub fn toggle(&self, id: i64) -> Result<Task, StudoroError> {
        let task = self.get(id)?;
        self.db
            .connection()
            .execute(
                "UPDATE tasks SET completed = ?1 WHERE id = ?2",
                params![!task.completed, id],
            )
            .map_err(|e| StudoroError::Database(e.to_string()))?;
        self.get(id)
    }

    /// Delete a task.
    pub fn delete(&self, id: i64) -> Result<(), StudoroError> {
        let changed = self
            .db
            .connection()
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(|e| StudoroError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(StudoroError::NotFound(format!("Task {id} not found")));
        }
        Ok(())
    }
}

fn row_to_task(row: &Row) -> Result<Task, rusqlite::Error> {
    let priority: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    Ok(Task {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        completed: row.get(2)?,
        subject_id: row.get(3)?,
        priority: Priority::parse(&priority).unwrap_or_default(),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
            })?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::subjects::{Subject, SubjectStorage};

    #[test]
    fn test_add_toggle_delete() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);

        let saved = storage.add(&Task::new("Read chapter 3")).unwrap();
        let id = saved.id.unwrap();
        assert!(!saved.completed);

        let toggled = storage.toggle(id).unwrap();
        assert!(toggled.completed);
        let toggled = storage.toggle(id).unwrap();
        assert!(!toggled.completed);

        storage.delete(id).unwrap();
        assert!(matches!(
            storage.get(id).unwrap_err(),
            StudoroError::NotFound(_)
        ));
    }

    #[test]
    fn test_list_orders_by_priority() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);

        let mut low = Task::new("Tidy notes");
        low.priority = Priority::Low;
        let mut high = Task::new("Prepare exam");
        high.priority = Priority::High;

        storage.add(&low).unwrap();
        storage.add(&high).unwrap();
        storage.add(&Task::new("Flashcards")).unwrap();

        let tasks = storage.list(false).unwrap();
        assert_eq!(tasks[0].title, "Prepare exam");
        assert_eq!(tasks[1].title, "Flashcards");
        assert_eq!(tasks[2].title, "Tidy notes");
    }

    #[test]
    fn test_list_hides_completed_by_default() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);

        let saved = storage.add(&Task::new("Done already")).unwrap();
        storage.toggle(saved.id.unwrap()).unwrap();
        storage.add(&Task::new("Still open")).unwrap();

        assert_eq!(storage.list(false).unwrap().len(), 1);
        assert_eq!(storage.list(true).unwrap().len(), 2);
    }

    #[test]
    fn test_subject_delete_unlinks_tasks() {
        let db = Database::open_in_memory().unwrap();
        let subjects = SubjectStorage::new(&db);
        let storage = TaskStorage::new(&db);

        let subject = subjects.add(&Subject::new("Biology")).unwrap();
        let mut task = Task::new("Label diagrams");
        task.subject_id = subject.id;
        let saved = storage.add(&task).unwrap();

        subjects.delete(subject.id.unwrap()).unwrap();
        let fetched = storage.get(saved.id.unwrap()).unwrap();
        assert!(fetched.subject_id.is_none());
    }
}
