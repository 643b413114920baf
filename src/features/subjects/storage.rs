//! SQLite persistence for subjects.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::subject::Subject;
use crate::error::StudoroError;
use crate::storage::Database;

/// Subject persistence operations.
pub struct SubjectStorage<'a> {
    db: &'a Database,
}

impl<'a> SubjectStorage<'a> {
    /// Create storage backed by the given database.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a subject and return it with its new id.
    pub fn add(&self, subject: &Subject) -> Result<Subject, StudoroError> {
        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO subjects (name, icon, color, target_hours_per_week, total_sessions, total_minutes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                subject.name,
                subject.icon,
                subject.color,
                subject.target_hours_per_week,
                subject.total_sessions,
                subject.total_minutes,
                subject.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| match e {
            // Only the UNIQUE index on name maps to a duplicate; any other
            // constraint failure is a genuine database error.
            rusqlite::Error::SqliteFailure(err, _)
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StudoroError::Validation(format!("Subject '{}' already exists", subject.name))
            }
            other => StudoroError::Database(other.to_string()),
        })?;

        let mut saved = subject.clone();
        saved.id = Some(conn.last_insert_rowid());
        Ok(saved)
    }

    /// List all subjects ordered by name.
    pub fn list(&self) -> Result<Vec<Subject>, StudoroError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, icon, color, target_hours_per_week, total_sessions, total_minutes, created_at
                 FROM subjects ORDER BY name COLLATE NOCASE",
            )
            .map_err(|e| StudoroError::Database(e.to_string()))?;

        let subjects = stmt
            .query_map([], row_to_subject)
            .map_err(|e| StudoroError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StudoroError::Database(e.to_string()))?;

        Ok(subjects)
    }

    /// Fetch a subject by id.
    pub fn get(&self, id: i64) -> Result<Subject, StudoroError> {
        let conn = self.db.connection();
        conn.query_row(
            "SELECT id, name, icon, color, target_hours_per_week, total_sessions, total_minutes, created_at
             FROM subjects WHERE id = ?1",
            params![id],
            row_to_subject,
        )
        .optional()
        .map_err(|e| StudoroError::Database(e.to_string()))?
        .ok_or_else(|| StudoroError::NotFound(format!("Subject {id} not found")))
    }

    /// Find a subject by exact name, case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Subject>, StudoroError> {
        let conn = self.db.connection();
        conn.query_row(
            "SELECT id, name, icon, color, target_hours_per_week, total_sessions, total_minutes, created_at
             FROM subjects WHERE name = ?1 COLLATE NOCASE",
            params![name],
            row_to_subject,
        )
        .optional()
        .map_err(|e| StudoroError::Database(e.to_string()))
    }

    /// Update a subject's editable fields.
    pub fn update(&self, subject: &Subject) -> Result<(), StudoroError> {
        let id = subject
            .id
            .ok_or_else(|| StudoroError::Validation("Subject has no id".to_string()))?;

        let changed = self
            .db
            .connection()
            .execute(
                "UPDATE subjects SET name = ?1, icon = ?2, color = ?3, target_hours_per_week = ?4
                 WHERE id = ?5",
                params![
                    subject.name,
                    subject.icon,
                    subject.color,
                    subject.target_hours_per_week,
                    id,
                ],
            )
            .map_err(|e| StudoroError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(StudoroError::NotFound(format!("Subject {id} not found")));
        }
        Ok(())
    }

    /// Delete a subject.
    ///
    /// Linked sessions and tasks keep their rows with the subject unset.
    pub fn delete(&self, id: i64) -> Result<(), StudoroError> {
        let changed = self
            .db
            .connection()
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])
            .map_err(|e| StudoroError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(StudoroError::NotFound(format!("Subject {id} not found")));
        }
        Ok(())
    }

    /// Whether any subjects exist.
    pub fn any(&self) -> Result<bool, StudoroError> {
        let count: i64 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM subjects", [], |row| row.get(0))
            .map_err(|e| StudoroError::Database(e.to_string()))?;
        Ok(count > 0)
    }
}

fn row_to_subject(row: &Row) -> Result<Subject, rusqlite::Error> {
    let created_at: String = row.get(7)?;
    Ok(Subject {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        icon: row.get(2)?,
        color: row.get(3)?,
        target_hours_per_week: row.get(4)?,
        total_sessions: row.get(5)?,
        total_minutes: row.get(6)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
            })?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let db = storage_db();
        let storage = SubjectStorage::new(&db);

        let mut subject = Subject::new("Mathematics");
        subject.icon = Some("📐".to_string());
        subject.target_hours_per_week = Some(5.0);

        let saved = storage.add(&subject).unwrap();
        let id = saved.id.unwrap();

        let fetched = storage.get(id).unwrap();
        assert_eq!(fetched.name, "Mathematics");
        assert_eq!(fetched.icon.as_deref(), Some("📐"));
        assert_eq!(fetched.target_hours_per_week, Some(5.0));
    }

    #[test]
    fn test_add_with_no_optionals() {
        let db = storage_db();
        let storage = SubjectStorage::new(&db);

        // Name alone is enough; icon, color, and target stay unset.
        let saved = storage.add(&Subject::new("Math")).unwrap();

        let fetched = storage.get(saved.id.unwrap()).unwrap();
        assert_eq!(fetched.name, "Math");
        assert_eq!(fetched.icon, None);
        assert_eq!(fetched.color, None);
        assert_eq!(fetched.target_hours_per_week, None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let db = storage_db();
        let storage = SubjectStorage::new(&db);

        storage.add(&Subject::new("Physics")).unwrap();
        let err = storage.add(&Subject::new("Physics")).unwrap_err();
        assert!(matches!(err, StudoroError::Validation(ref msg) if msg.contains("already exists")));
    }

    #[test]
    fn test_list_sorted_by_name() {
        let db = storage_db();
        let storage = SubjectStorage::new(&db);

        storage.add(&Subject::new("zoology")).unwrap();
        storage.add(&Subject::new("Algebra")).unwrap();

        let subjects = storage.list().unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].name, "Algebra");
        assert_eq!(subjects[1].name, "zoology");
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let db = storage_db();
        let storage = SubjectStorage::new(&db);

        storage.add(&Subject::new("History")).unwrap();
        assert!(storage.find_by_name("history").unwrap().is_some());
        assert!(storage.find_by_name("Geography").unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete() {
        let db = storage_db();
        let storage = SubjectStorage::new(&db);

        let mut saved = storage.add(&Subject::new("Chem")).unwrap();
        saved.name = "Chemistry".to_string();
        storage.update(&saved).unwrap();

        let fetched = storage.get(saved.id.unwrap()).unwrap();
        assert_eq!(fetched.name, "Chemistry");

        storage.delete(saved.id.unwrap()).unwrap();
        assert!(matches!(
            storage.get(saved.id.unwrap()).unwrap_err(),
            StudoroError::NotFound(_)
        ));
    }

    #[test]
    fn test_delete_missing_subject() {
        let db = storage_db();
        let storage = SubjectStorage::new(&db);
        assert!(matches!(
            storage.delete(99).unwrap_err(),
            StudoroError::NotFound(_)
        ));
    }

    #[test]
    fn test_any() {
        let db = storage_db();
        let storage = SubjectStorage::new(&db);
        assert!(!storage.any().unwrap());
        storage.add(&Subject::new("Latin")).unwrap();
        assert!(storage.any().unwrap());
    }
}
