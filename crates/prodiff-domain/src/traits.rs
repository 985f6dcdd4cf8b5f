//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates (prodiff-store,
//! prodiff-llm).

use crate::record::{Collection, Record, RecordId};
use serde_json::Value;

/// Trait for storing and retrieving JSON records
///
/// Implemented by the infrastructure layer (prodiff-store)
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// Create a record, assigning id and timestamps
    fn create(
        &mut self,
        collection: Collection,
        parent_id: Option<RecordId>,
        body: Value,
    ) -> Result<Record, Self::Error>;

    /// Get a record by id
    fn get(&self, collection: Collection, id: RecordId) -> Result<Option<Record>, Self::Error>;

    /// Merge the top-level keys of `patch` into the record body
    ///
    /// Returns the updated record, or `None` when the id is unknown.
    fn update(
        &mut self,
        collection: Collection,
        id: RecordId,
        patch: Value,
    ) -> Result<Option<Record>, Self::Error>;

    /// Delete a record and everything in child collections that points at it
    ///
    /// Returns whether a record was actually removed.
    fn delete(&mut self, collection: Collection, id: RecordId) -> Result<bool, Self::Error>;

    /// All records in a collection, oldest first
    fn list(&self, collection: Collection) -> Result<Vec<Record>, Self::Error>;

    /// Records in a collection owned by the given parent
    fn list_by_parent(
        &self,
        collection: Collection,
        parent_id: RecordId,
    ) -> Result<Vec<Record>, Self::Error>;

    /// Number of records in a collection
    fn count(&self, collection: Collection) -> Result<usize, Self::Error>;

    /// Whether a record exists
    fn exists(&self, collection: Collection, id: RecordId) -> Result<bool, Self::Error> {
        Ok(self.get(collection, id)?.is_some())
    }

    /// Remove every record in a collection
    fn clear(&mut self, collection: Collection) -> Result<(), Self::Error>;

    /// Remove the children of a record without removing the record itself
    fn clear_children(
        &mut self,
        collection: Collection,
        parent_id: RecordId,
    ) -> Result<(), Self::Error>;

    /// Create several records under one parent
    fn bulk_create(
        &mut self,
        collection: Collection,
        parent_id: Option<RecordId>,
        bodies: Vec<Value>,
    ) -> Result<Vec<Record>, Self::Error> {
        let mut created = Vec::with_capacity(bodies.len());
        for body in bodies {
            created.push(self.create(collection, parent_id, body)?);
        }
        Ok(created)
    }

    /// Delete several records, returning how many were removed
    fn bulk_delete(
        &mut self,
        collection: Collection,
        ids: &[RecordId],
    ) -> Result<usize, Self::Error> {
        let mut removed = 0;
        for id in ids {
            if self.delete(collection, *id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Generation parameters shared by all providers
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// System prompt, when the task wants one
    pub system: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// Output token budget
    pub max_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            system: None,
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (prodiff-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for the prompt
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, Self::Error>;
}
