//! Prodiff Workflow Layer
//!
//! Orchestrates the guided product-development flows on top of the domain
//! traits: competitor extraction, two-pass review analysis, differentiation
//! idea generation, and latent-need effectiveness estimation.
//!
//! Each flow renders a prompt template, calls the configured `LlmProvider`
//! on a blocking thread under a timeout, recovers structured JSON from the
//! response with `prodiff-extract`, decodes it into the domain payloads, and
//! persists the result through the `RecordStore`.
//!
//! # Examples
//!
//! ```no_run
//! use prodiff_flows::{FlowConfig, Workflow};
//! use prodiff_llm::MockProvider;
//! use prodiff_prompt::TemplateStore;
//! use prodiff_store::SqliteStore;
//! use prodiff_domain::Project;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = Workflow::new(
//!     MockProvider::new("{}"),
//!     SqliteStore::new("prodiff.db")?,
//!     TemplateStore::new("prompts")?,
//!     FlowConfig::default(),
//! );
//! let project = workflow.create_project(&Project::new("Foot warmer 2026"))?;
//! workflow.extract_competitor(project.id, "competitor page text").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod workflow;

pub use config::FlowConfig;
pub use error::FlowError;
pub use workflow::Workflow;
