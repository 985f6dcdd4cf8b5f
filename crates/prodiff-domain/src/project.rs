//! Project payload

use serde::{Deserialize, Serialize};

/// A product-development project, the root of every analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name shown to the team
    pub name: String,

    /// The product under development
    #[serde(default)]
    pub product: String,

    /// Free-form description of goals and constraints
    #[serde(default)]
    pub description: String,
}

impl Project {
    /// Create a project with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product: String::new(),
            description: String::new(),
        }
    }

    /// Validate that the project is storable
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("project name is empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project() {
        let project = Project::new("Foot warmer 2026");
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let project = Project::new("   ");
        assert!(project.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let project: Project = serde_json::from_str(r#"{"name": "X"}"#).unwrap();
        assert_eq!(project.name, "X");
        assert!(project.product.is_empty());
    }
}
