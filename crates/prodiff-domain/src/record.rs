//! Stored records and the collection hierarchy

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse from a hyphenated UUID string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The record collections and their parent/child structure
///
/// `Projects` is the root; everything else belongs to a project and is
/// deleted together with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Root collection, one record per analyzed product
    Projects,
    /// Competitor profiles extracted from source material
    Competitors,
    /// Review analyses (atomized keywords plus categories)
    Reviews,
    /// Generated differentiation ideas, one record per idea
    Ideas,
    /// Positioning notes derived from the other analyses
    Positioning,
}

impl Collection {
    /// All collections, in hierarchy order
    pub const ALL: [Collection; 5] = [
        Collection::Projects,
        Collection::Competitors,
        Collection::Reviews,
        Collection::Ideas,
        Collection::Positioning,
    ];

    /// Storage name of the collection
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Competitors => "competitors",
            Collection::Reviews => "reviews",
            Collection::Ideas => "ideas",
            Collection::Positioning => "positioning",
        }
    }

    /// Parent collection, or `None` for the root
    pub fn parent(&self) -> Option<Collection> {
        match self {
            Collection::Projects => None,
            Collection::Competitors
            | Collection::Reviews
            | Collection::Ideas
            | Collection::Positioning => Some(Collection::Projects),
        }
    }

    /// Collections whose parent is `self`
    pub fn children(&self) -> Vec<Collection> {
        Collection::ALL
            .iter()
            .copied()
            .filter(|c| c.parent() == Some(*self))
            .collect()
    }

    /// Look up a collection by its storage name
    pub fn from_name(name: &str) -> Option<Collection> {
        Collection::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored JSON document with identity and lineage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier
    pub id: RecordId,

    /// Collection this record belongs to
    pub collection: Collection,

    /// Owning record in the parent collection, if any
    pub parent_id: Option<RecordId>,

    /// The document body
    pub body: Value,

    /// Creation time, seconds since the Unix epoch
    pub created_at: u64,

    /// Last update time, seconds since the Unix epoch
    pub updated_at: u64,
}
