//! Review analysis payloads: atomized keywords and categories

use serde::{Deserialize, Serialize};

/// Sentiment attached to an atomized review keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Praised by reviewers
    Positive,
    /// Complained about by reviewers
    Negative,
    /// Anything the model labels outside the two expected values
    #[serde(other)]
    Neutral,
}

/// A minimal meaning-preserving keyword extracted from review text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// The keyword itself, normalized by the model ("heavy", "quiet", ...)
    pub word: String,

    /// Review sentiment for this keyword
    pub sentiment: Sentiment,

    /// Number of reviews mentioning it
    #[serde(default)]
    pub count: u32,
}

/// A named grouping of keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name, e.g. "weight and portability"
    pub name: String,

    /// Keywords assigned to this category
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The full result of analyzing a project's review corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAnalysis {
    /// Atomized keywords with sentiment and frequency
    #[serde(default)]
    pub keywords: Vec<Keyword>,

    /// Keywords grouped into categories
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl ReviewAnalysis {
    /// Total mention count across all keywords
    pub fn total_mentions(&self) -> u64 {
        self.keywords.iter().map(|k| u64::from(k.count)).sum()
    }

    /// Keywords with the given sentiment, most frequent first
    pub fn keywords_by_sentiment(&self, sentiment: Sentiment) -> Vec<&Keyword> {
        let mut hits: Vec<&Keyword> = self
            .keywords
            .iter()
            .filter(|k| k.sentiment == sentiment)
            .collect();
        hits.sort_by(|a, b| b.count.cmp(&a.count));
        hits
    }
}
