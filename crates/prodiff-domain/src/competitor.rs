//! Competitor profile payload

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured competitor information recovered from source material
///
/// Every field is optional in the model output; missing fields decode to
/// empty values rather than failing the whole profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorProfile {
    /// Product name, when stated in the source
    #[serde(default)]
    pub name: String,

    /// Price as written in the source (currency formatting preserved)
    #[serde(default)]
    pub price: String,

    /// Key specifications, e.g. weight, size, power
    #[serde(default)]
    pub specs: BTreeMap<String, String>,

    /// Product features called out in the source
    #[serde(default)]
    pub features: Vec<String>,

    /// Positive review tendencies
    #[serde(default)]
    pub positives: Vec<String>,

    /// Negative review tendencies
    #[serde(default)]
    pub negatives: Vec<String>,
}

impl CompetitorProfile {
    /// Whether the extraction produced any usable content at all
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.price.is_empty()
            && self.specs.is_empty()
            && self.features.is_empty()
            && self.positives.is_empty()
            && self.negatives.is_empty()
    }
}
