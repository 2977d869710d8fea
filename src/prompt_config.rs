use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::prompt::PromptTemplate;

/// Optional persona override loaded from a JSON file.
///
/// Every field is optional; unset fields keep the built-in text.
///
/// Example:
/// {
///   "persona": "You are the runtime of ...",
///   "manifest_intro": "Source listing:",
///   "closing": "Answer as that runtime.",
///   "query_label": "Question"
/// }
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub manifest_intro: Option<String>,
    #[serde(default)]
    pub closing: Option<String>,
    #[serde(default)]
    pub query_label: Option<String>,
}

impl PromptConfig {
    /// Load prompt configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read prompt config file: {}",
                path.as_ref().display()
            )
        })?;

        let config: PromptConfig =
            serde_json::from_str(&content).with_context(|| "Failed to parse prompt config JSON")?;

        Ok(config)
    }

    /// Overlay this config on the built-in template.
    pub fn into_template(self) -> PromptTemplate {
        let base = PromptTemplate::default();
        PromptTemplate {
            persona: self.persona.unwrap_or(base.persona),
            manifest_intro: self.manifest_intro.unwrap_or(base.manifest_intro),
            closing: self.closing.unwrap_or(base.closing),
            query_label: self.query_label.unwrap_or(base.query_label),
        }
    }
}
