//! Configuration for the workflow layer

use prodiff_domain::traits::GenerateOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for flow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Maximum time for a single provider call (seconds)
    pub llm_timeout_secs: u64,

    /// Maximum competitors serialized into the differentiation prompt
    pub max_context_competitors: usize,

    /// Sampling temperature passed to the provider
    pub temperature: f32,

    /// Output token budget passed to the provider
    pub max_tokens: u32,
}

impl FlowConfig {
    /// The provider timeout as a Duration
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// The generation options derived from this configuration
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            system: None,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.llm_timeout_secs == 0 {
            return Err("llm_timeout_secs must be greater than 0".to_string());
        }
        if self.max_context_competitors == 0 {
            return Err("max_context_competitors must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Quick preset: shorter timeout, smaller output budget
    pub fn quick() -> Self {
        Self {
            llm_timeout_secs: 60,
            max_context_competitors: 5,
            temperature: 0.7,
            max_tokens: 4096,
        }
    }

    /// Thorough preset: generous timeout and budget for long idea lists
    pub fn thorough() -> Self {
        Self {
            llm_timeout_secs: 300,
            max_context_competitors: 20,
            temperature: 0.7,
            max_tokens: 16000,
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("failed to serialize to TOML: {}", e))
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            llm_timeout_secs: 120,
            max_context_competitors: 10,
            temperature: 0.7,
            // The differentiation task asks for 30-50 ideas; the default
            // 4096 budget is what causes mid-array truncation
            max_tokens: 16000,
        }
    }
}
