//! core::config::event
//!
//! The triggering-event payload written by the workflow runner to
//! `GITHUB_EVENT_PATH`. Only the fields that identify an issue or pull
//! request are read; everything else is ignored.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<NumberedItem>,
    #[serde(default)]
    pub issue: Option<NumberedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NumberedItem {
    #[serde(default)]
    pub number: Option<u64>,
}

impl EventPayload {
    /// Read and parse a payload file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::EventPayload {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&raw).map_err(|e| ConfigError::EventPayload {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The pull request number, else the issue number. Zero counts as absent.
    ///
    /// # Example
    ///
    /// ```
    /// use pr_commenter::core::config::EventPayload;
    ///
    /// let event = EventPayload::parse(r#"{"issue": {"number": 12}}"#).unwrap();
    /// assert_eq!(event.issue_number(), Some(12));
    /// ```
    pub fn issue_number(&self) -> Option<u64> {
        let number = |item: &Option<NumberedItem>| {
            item.as_ref()
                .and_then(|i| i.number)
                .filter(|n| *n > 0)
        };
        number(&self.pull_request).or_else(|| number(&self.issue))
    }
}
