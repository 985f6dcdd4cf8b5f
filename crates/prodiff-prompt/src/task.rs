//! The AI tasks a template exists for

use std::fmt;

/// One of the workflow's AI tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Extract competitor information from source material
    Extract,
    /// Break review text into minimal keywords
    Atomize,
    /// Group keywords into categories
    Categorize,
    /// Generate differentiation ideas
    Differentiate,
    /// Estimate effectiveness of latent-need ideas
    Estimate,
}

impl Task {
    /// All tasks in workflow order
    pub const ALL: [Task; 5] = [
        Task::Extract,
        Task::Atomize,
        Task::Categorize,
        Task::Differentiate,
        Task::Estimate,
    ];

    /// Stable identifier used in file names
    pub fn id(&self) -> &'static str {
        match self {
            Task::Extract => "extract",
            Task::Atomize => "atomize",
            Task::Categorize => "categorize",
            Task::Differentiate => "differentiate",
            Task::Estimate => "estimate",
        }
    }

    /// Short title shown in template listings
    pub fn title(&self) -> &'static str {
        match self {
            Task::Extract => "Competitor extraction",
            Task::Atomize => "Review atomization",
            Task::Categorize => "Keyword categorization",
            Task::Differentiate => "Differentiation ideas",
            Task::Estimate => "Effectiveness estimation",
        }
    }

    /// One-line description of what the task does
    pub fn description(&self) -> &'static str {
        match self {
            Task::Extract => "Extract product information from competitor source material",
            Task::Atomize => "Break reviews into minimal meaning-preserving keywords",
            Task::Categorize => "Group keywords into named categories",
            Task::Differentiate => "Generate differentiation ideas from the analyses",
            Task::Estimate => "Estimate how effective latent-need ideas would be",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
