//! Prodiff Storage Layer
//!
//! Implements the `RecordStore` trait on SQLite.
//!
//! # Architecture
//!
//! Every collection lives in a single `records` table holding JSON bodies.
//! The parent/child structure of the collection hierarchy is enforced on
//! delete: removing a project removes its competitors, reviews, ideas, and
//! positioning records with it.
//!
//! # Examples
//!
//! ```no_run
//! use prodiff_store::SqliteStore;
//!
//! let store = SqliteStore::new("prodiff.db").unwrap();
//! // Store is now ready for record operations
//! ```
//!
//! # Thread Safety
//!
//! SQLite connections are not thread-safe. Each thread should have its own
//! `SqliteStore` instance.

#![warn(missing_docs)]

use prodiff_domain::traits::RecordStore;
use prodiff_domain::{Collection, Record, RecordId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored data that no longer decodes
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Update patch was not a JSON object
    #[error("update patch must be a JSON object")]
    PatchNotObject,
}

/// SQLite-based implementation of `RecordStore`
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Record> {
        let id: String = row.get(0)?;
        let collection: String = row.get(1)?;
        let parent_id: Option<String> = row.get(2)?;
        let body: String = row.get(3)?;

        let convert = |e: StoreError| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        };

        let id = RecordId::parse(&id)
            .map_err(|e| convert(StoreError::InvalidData(format!("bad record id: {}", e))))?;
        let collection = Collection::from_name(&collection).ok_or_else(|| {
            convert(StoreError::InvalidData(format!(
                "unknown collection '{}'",
                collection
            )))
        })?;
        let parent_id = parent_id
            .map(|p| {
                RecordId::parse(&p).map_err(|e| {
                    convert(StoreError::InvalidData(format!("bad parent id: {}", e)))
                })
            })
            .transpose()?;
        let body: Value = serde_json::from_str(&body)
            .map_err(|e| convert(StoreError::InvalidData(format!("bad body JSON: {}", e))))?;

        Ok(Record {
            id,
            collection,
            parent_id,
            body,
            created_at: row.get::<_, i64>(4)? as u64,
            updated_at: row.get::<_, i64>(5)? as u64,
        })
    }

    fn delete_children(&mut self, parent: Collection, parent_id: RecordId) -> Result<(), StoreError> {
        for child in parent.children() {
            self.conn.execute(
                "DELETE FROM records WHERE collection = ?1 AND parent_id = ?2",
                params![child.as_str(), parent_id.to_string()],
            )?;
        }
        Ok(())
    }
}

impl RecordStore for SqliteStore {
    type Error = StoreError;

    fn create(
        &mut self,
        collection: Collection,
        parent_id: Option<RecordId>,
        body: Value,
    ) -> Result<Record, Self::Error> {
        let now = Self::now_secs();
        let record = Record {
            id: RecordId::new(),
            collection,
            parent_id,
            body,
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO records (id, collection, parent_id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.to_string(),
                collection.as_str(),
                record.parent_id.map(|p| p.to_string()),
                record.body.to_string(),
                record.created_at as i64,
                record.updated_at as i64,
            ],
        )?;

        Ok(record)
    }

    fn get(&self, collection: Collection, id: RecordId) -> Result<Option<Record>, Self::Error> {
        let record = self
            .conn
            .query_row(
                "SELECT id, collection, parent_id, body, created_at, updated_at
                 FROM records WHERE id = ?1 AND collection = ?2",
                params![id.to_string(), collection.as_str()],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn update(
        &mut self,
        collection: Collection,
        id: RecordId,
        patch: Value,
    ) -> Result<Option<Record>, Self::Error> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::PatchNotObject);
        };

        let Some(mut record) = self.get(collection, id)? else {
            return Ok(None);
        };

        // Shallow top-level merge, matching how flows revise stored results
        if let Value::Object(body) = &mut record.body {
            for (key, value) in patch {
                body.insert(key, value);
            }
        } else {
            record.body = Value::Object(patch);
        }
        record.updated_at = Self::now_secs();

        self.conn.execute(
            "UPDATE records SET body = ?1, updated_at = ?2 WHERE id = ?3 AND collection = ?4",
            params![
                record.body.to_string(),
                record.updated_at as i64,
                id.to_string(),
                collection.as_str(),
            ],
        )?;

        Ok(Some(record))
    }

    fn delete(&mut self, collection: Collection, id: RecordId) -> Result<bool, Self::Error> {
        let removed = self.conn.execute(
            "DELETE FROM records WHERE id = ?1 AND collection = ?2",
            params![id.to_string(), collection.as_str()],
        )?;

        if removed > 0 {
            self.delete_children(collection, id)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn list(&self, collection: Collection) -> Result<Vec<Record>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, collection, parent_id, body, created_at, updated_at
             FROM records WHERE collection = ?1 ORDER BY rowid",
        )?;
        let records = stmt
            .query_map(params![collection.as_str()], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn list_by_parent(
        &self,
        collection: Collection,
        parent_id: RecordId,
    ) -> Result<Vec<Record>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, collection, parent_id, body, created_at, updated_at
             FROM records WHERE collection = ?1 AND parent_id = ?2 ORDER BY rowid",
        )?;
        let records = stmt
            .query_map(
                params![collection.as_str(), parent_id.to_string()],
                Self::row_to_record,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn count(&self, collection: Collection) -> Result<usize, Self::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1",
            params![collection.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn clear(&mut self, collection: Collection) -> Result<(), Self::Error> {
        self.conn.execute(
            "DELETE FROM records WHERE collection = ?1",
            params![collection.as_str()],
        )?;
        Ok(())
    }

    fn clear_children(
        &mut self,
        collection: Collection,
        parent_id: RecordId,
    ) -> Result<(), Self::Error> {
        self.delete_children(collection, parent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn memory_store() -> SqliteStore {
        SqliteStore::new(":memory:").unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let mut store = memory_store();
        let record = store
            .create(Collection::Projects, None, json!({"name": "Foot warmer"}))
            .unwrap();

        let fetched = store.get(Collection::Projects, record.id).unwrap().unwrap();
        assert_eq!(fetched, record);
        assert_eq!(fetched.body["name"], "Foot warmer");
    }

    #[test]
    fn test_get_wrong_collection() {
        let mut store = memory_store();
        let record = store
            .create(Collection::Projects, None, json!({"name": "X"}))
            .unwrap();
        assert!(store.get(Collection::Ideas, record.id).unwrap().is_none());
    }

    #[test]
    fn test_update_merges_top_level() {
        let mut store = memory_store();
        let record = store
            .create(
                Collection::Projects,
                None,
                json!({"name": "X", "product": "warmer"}),
            )
            .unwrap();

        let updated = store
            .update(Collection::Projects, record.id, json!({"name": "Y"}))
            .unwrap()
            .unwrap();
        assert_eq!(updated.body["name"], "Y");
        assert_eq!(updated.body["product"], "warmer");
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = memory_store();
        let result = store
            .update(Collection::Projects, RecordId::new(), json!({"a": 1}))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_rejects_non_object_patch() {
        let mut store = memory_store();
        let record = store
            .create(Collection::Projects, None, json!({"name": "X"}))
            .unwrap();
        let result = store.update(Collection::Projects, record.id, json!([1, 2]));
        assert!(matches!(result, Err(StoreError::PatchNotObject)));
    }

    #[test]
    fn test_delete_cascades_to_children() {
        let mut store = memory_store();
        let project = store
            .create(Collection::Projects, None, json!({"name": "X"}))
            .unwrap();
        let competitor = store
            .create(
                Collection::Competitors,
                Some(project.id),
                json!({"price": "¥2000"}),
            )
            .unwrap();
        let idea = store
            .create(Collection::Ideas, Some(project.id), json!({"title": "A"}))
            .unwrap();

        assert!(store.delete(Collection::Projects, project.id).unwrap());
        assert!(store
            .get(Collection::Competitors, competitor.id)
            .unwrap()
            .is_none());
        assert!(store.get(Collection::Ideas, idea.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_returns_false() {
        let mut store = memory_store();
        assert!(!store.delete(Collection::Projects, RecordId::new()).unwrap());
    }

    #[test]
    fn test_list_by_parent_filters() {
        let mut store = memory_store();
        let a = store
            .create(Collection::Projects, None, json!({"name": "A"}))
            .unwrap();
        let b = store
            .create(Collection::Projects, None, json!({"name": "B"}))
            .unwrap();
        store
            .create(Collection::Ideas, Some(a.id), json!({"title": "1"}))
            .unwrap();
        store
            .create(Collection::Ideas, Some(a.id), json!({"title": "2"}))
            .unwrap();
        store
            .create(Collection::Ideas, Some(b.id), json!({"title": "3"}))
            .unwrap();

        let ideas_a = store.list_by_parent(Collection::Ideas, a.id).unwrap();
        assert_eq!(ideas_a.len(), 2);
        assert_eq!(ideas_a[0].body["title"], "1");
        assert_eq!(ideas_a[1].body["title"], "2");

        assert_eq!(store.count(Collection::Ideas).unwrap(), 3);
    }

    #[test]
    fn test_clear_children_keeps_parent() {
        let mut store = memory_store();
        let project = store
            .create(Collection::Projects, None, json!({"name": "X"}))
            .unwrap();
        store
            .create(Collection::Ideas, Some(project.id), json!({"title": "1"}))
            .unwrap();

        store
            .clear_children(Collection::Projects, project.id)
            .unwrap();
        assert!(store.exists(Collection::Projects, project.id).unwrap());
        assert_eq!(store.count(Collection::Ideas).unwrap(), 0);
    }

    #[test]
    fn test_clear_collection() {
        let mut store = memory_store();
        store
            .create(Collection::Projects, None, json!({"name": "A"}))
            .unwrap();
        store
            .create(Collection::Projects, None, json!({"name": "B"}))
            .unwrap();
        store.clear(Collection::Projects).unwrap();
        assert_eq!(store.count(Collection::Projects).unwrap(), 0);
    }

    #[test]
    fn test_bulk_create_and_delete() {
        let mut store = memory_store();
        let project = store
            .create(Collection::Projects, None, json!({"name": "X"}))
            .unwrap();
        let created = store
            .bulk_create(
                Collection::Ideas,
                Some(project.id),
                vec![json!({"title": "1"}), json!({"title": "2"})],
            )
            .unwrap();
        assert_eq!(created.len(), 2);

        let ids: Vec<RecordId> = created.iter().map(|r| r.id).collect();
        let removed = store.bulk_delete(Collection::Ideas, &ids).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count(Collection::Ideas).unwrap(), 0);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");

        let id = {
            let mut store = SqliteStore::new(&path).unwrap();
            store
                .create(Collection::Projects, None, json!({"name": "kept"}))
                .unwrap()
                .id
        };

        let store = SqliteStore::new(&path).unwrap();
        let record = store.get(Collection::Projects, id).unwrap().unwrap();
        assert_eq!(record.body["name"], "kept");
    }
}
