//! Prodiff Prompt Templates
//!
//! File-backed store for the prompt templates behind each AI task:
//! competitor extraction, review atomization, keyword categorization,
//! differentiation-idea generation, and effectiveness estimation.
//!
//! Templates are markdown files with `{{variable}}` placeholders. Saving a
//! template snapshots the previous content into a version directory so edits
//! can be rolled back; every task also has a built-in default that is used
//! until the team customizes it.
//!
//! # Examples
//!
//! ```no_run
//! use prodiff_prompt::{Task, TemplateStore};
//!
//! let store = TemplateStore::new("data/prompts").unwrap();
//! let prompt = store
//!     .render(Task::Atomize, &[("reviews", "Too heavy to carry around.")])
//!     .unwrap();
//! assert!(prompt.contains("Too heavy"));
//! ```

#![warn(missing_docs)]

mod defaults;
mod task;

pub use task::Task;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur in the template store
#[derive(Error, Debug)]
pub enum PromptError {
    /// Filesystem error
    #[error("prompt storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested version snapshot does not exist
    #[error("unknown version: {0}")]
    UnknownVersion(String),
}

/// A task template as listed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    /// The task this template drives
    pub task: Task,

    /// Whether the team has saved a customized version
    pub customized: bool,
}

/// A version snapshot of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Snapshot file name, `{task}_{epoch_secs}.md`
    pub filename: String,

    /// When the snapshot was taken, seconds since the Unix epoch
    pub saved_at: u64,
}

/// File-backed prompt template store
pub struct TemplateStore {
    prompts_dir: PathBuf,
    versions_dir: PathBuf,
}

impl TemplateStore {
    /// Open a store rooted at `dir`, creating it when missing
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, PromptError> {
        let prompts_dir = dir.as_ref().to_path_buf();
        let versions_dir = prompts_dir.join("_versions");
        fs::create_dir_all(&versions_dir)?;
        Ok(Self {
            prompts_dir,
            versions_dir,
        })
    }

    fn template_path(&self, task: Task) -> PathBuf {
        self.prompts_dir.join(format!("{}.md", task.id()))
    }

    /// The customized template for a task, or `None` when never saved
    pub fn load(&self, task: Task) -> Result<Option<String>, PromptError> {
        let path = self.template_path(task);
        if path.exists() {
            return Ok(Some(fs::read_to_string(path)?));
        }
        Ok(None)
    }

    /// The customized template, falling back to the built-in default
    pub fn load_or_default(&self, task: Task) -> Result<String, PromptError> {
        Ok(self
            .load(task)?
            .unwrap_or_else(|| defaults::default_template(task).to_string()))
    }

    /// The built-in default template for a task
    pub fn default_template(&self, task: Task) -> &'static str {
        defaults::default_template(task)
    }

    /// Save a template, snapshotting the previous content first
    pub fn save(&self, task: Task, content: &str) -> Result<(), PromptError> {
        self.snapshot(task)?;
        fs::write(self.template_path(task), content)?;
        Ok(())
    }

    fn snapshot(&self, task: Task) -> Result<(), PromptError> {
        let path = self.template_path(task);
        if !path.exists() {
            return Ok(());
        }
        let mut stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        // Several saves in the same second must not overwrite each other;
        // bump the stamp until the name is free
        let mut snapshot = self
            .versions_dir
            .join(format!("{}_{}.md", task.id(), stamp));
        while snapshot.exists() {
            stamp += 1;
            snapshot = self
                .versions_dir
                .join(format!("{}_{}.md", task.id(), stamp));
        }
        fs::copy(path, snapshot)?;
        Ok(())
    }

    /// Render the template for a task, substituting `{{key}}` placeholders
    ///
    /// Unknown placeholders are left in place so a missing variable is
    /// visible in the generated prompt rather than silently dropped.
    pub fn render(&self, task: Task, variables: &[(&str, &str)]) -> Result<String, PromptError> {
        let mut text = self.load_or_default(task)?;
        for (key, value) in variables {
            text = text.replace(&format!("{{{{{}}}}}", key), value);
        }
        Ok(text)
    }

    /// Version snapshots for a task, newest first
    pub fn versions(&self, task: Task) -> Result<Vec<VersionInfo>, PromptError> {
        let prefix = format!("{}_", task.id());
        let mut versions = Vec::new();
        for entry in fs::read_dir(&self.versions_dir)? {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = filename.strip_suffix(".md") else {
                continue;
            };
            let Some(stamp) = stem.strip_prefix(&prefix) else {
                continue;
            };
            let Ok(saved_at) = stamp.parse::<u64>() else {
                continue;
            };
            versions.push(VersionInfo { filename, saved_at });
        }
        versions.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(versions)
    }

    /// Restore a version snapshot as the current template
    ///
    /// The current content is snapshotted before being replaced. The
    /// snapshot must belong to `task`; another task's version is rejected.
    pub fn restore_version(&self, task: Task, filename: &str) -> Result<(), PromptError> {
        if !filename.starts_with(&format!("{}_", task.id())) {
            return Err(PromptError::UnknownVersion(filename.to_string()));
        }
        let source = self.versions_dir.join(filename);
        if !source.exists() {
            return Err(PromptError::UnknownVersion(filename.to_string()));
        }
        let content = fs::read_to_string(source)?;
        self.save(task, &content)
    }

    /// Replace the current template with the built-in default
    pub fn reset_to_default(&self, task: Task) -> Result<(), PromptError> {
        self.save(task, defaults::default_template(task))
    }

    /// All tasks with whether each has been customized
    pub fn list(&self) -> Result<Vec<TemplateInfo>, PromptError> {
        Task::ALL
            .iter()
            .map(|&task| {
                Ok(TemplateInfo {
                    task,
                    customized: self.template_path(task).exists(),
                })
            })
            .collect()
    }
}
