//! Prodiff Domain Layer
//!
//! This crate contains the core domain model for Prodiff, a guided workflow
//! backend for product-development teams: competitor data collection, review
//! analysis, and AI-generated differentiation ideas, persisted per project.
//!
//! ## Key Concepts
//!
//! - **Record**: a stored JSON document with identity, timestamps, and an
//!   optional parent, organized into collections
//! - **Collection hierarchy**: `projects` is the root; competitors, reviews,
//!   ideas, and positioning hang off a project and are removed with it
//! - **Payloads**: the typed shapes the AI flows decode from model output
//!   (`CompetitorProfile`, `ReviewAnalysis`, `Idea`)
//!
//! ## Architecture
//!
//! Trait definitions for all external interactions live here; infrastructure
//! implementations (SQLite store, HTTP provider) live in other crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod competitor;
pub mod idea;
pub mod project;
pub mod record;
pub mod review;
pub mod traits;

// Re-exports for convenience
pub use competitor::CompetitorProfile;
pub use idea::{Difficulty, EffectKind, Idea, IpKind, Pattern};
pub use project::Project;
pub use record::{Collection, Record, RecordId};
pub use review::{Category, Keyword, ReviewAnalysis, Sentiment};
