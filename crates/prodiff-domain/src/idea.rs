//! Differentiation idea payload

use serde::{Deserialize, Serialize};

/// Differentiation pattern an idea follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Strengthen an existing capability
    PerformanceUp,
    /// Add a capability competitors lack
    FeatureAdd,
    /// Combine with another product
    Combine,
    /// Remove capability to cut cost
    CostDown,
    /// Model emitted something outside the four expected patterns
    #[serde(other)]
    Other,
}

/// Implementation difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Achievable with existing factory capability
    Low,
    /// Requires design changes
    Medium,
    /// Requires research and development
    High,
    /// Unrecognized difficulty label
    #[serde(other)]
    Unknown,
}

/// Intellectual-property opportunity attached to an idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpKind {
    /// Patentable mechanism
    Patent,
    /// Protectable industrial design
    Design,
}

/// Whether the effectiveness estimate addresses a manifest or latent need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Need visible in reviews today
    Manifest,
    /// Need users have not articulated yet
    Latent,
}

impl Default for EffectKind {
    fn default() -> Self {
        EffectKind::Manifest
    }
}

/// A single AI-generated differentiation idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    /// Short title of the differentiation
    pub title: String,

    /// Which differentiation pattern it follows
    pub pattern: Pattern,

    /// Implementation difficulty
    pub difficulty: Difficulty,

    /// IP opportunity, `null` when none
    #[serde(default)]
    pub ip: Option<IpKind>,

    /// Estimated effectiveness, 0-100
    #[serde(default)]
    pub effectiveness: u32,

    /// Manifest or latent need
    #[serde(default)]
    pub eff_type: EffectKind,

    /// Reasoning behind the effectiveness estimate
    #[serde(default)]
    pub eff_reasons: String,

    /// Rough cost estimate as written by the model
    #[serde(default)]
    pub cost: Option<String>,

    /// Rough lead-time estimate
    #[serde(default)]
    pub time: Option<String>,
}

impl Idea {
    /// Validate that the idea is storable
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("idea title is empty".to_string());
        }
        if self.effectiveness > 100 {
            return Err(format!(
                "effectiveness {} out of range [0, 100]",
                self.effectiveness
            ));
        }
        Ok(())
    }
}
