// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire shapes exchanged with the check runner.
//!
//! Field names follow the observed protocol: a result payload carries
//! `key` (check id), `result` (status), `filename`, `logs`; a run
//! request carries `files`, `profile`, `loglevels`, `fulllists`,
//! `exclude_checks`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::status::ResultStatus;

/// One log line emitted by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Sub-status of this line (a check may mix WARN and INFO lines).
    pub status: ResultStatus,

    /// Human-readable message, markdown allowed.
    #[serde(deserialize_with = "message_text")]
    pub message: String,
}

impl LogEntry {
    pub fn new(status: ResultStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Accept `"text"` or the engine's nested `{"message": "text", ...}`.
fn message_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MessageField {
        Text(String),
        Nested { message: String },
    }

    Ok(match MessageField::deserialize(deserializer)? {
        MessageField::Text(text) => text,
        MessageField::Nested { message } => message,
    })
}

/// One result message emitted by the runner for a (check, file) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEvent {
    /// Check identifier, dotted-namespace.
    #[serde(rename = "key")]
    pub check_id: String,

    /// Summary status for this event.
    #[serde(rename = "result")]
    pub status: ResultStatus,

    /// Denormalized copy of the check's description, for display
    /// without a registry join.
    #[serde(default)]
    pub description: String,

    /// Denormalized rationale, when the runner supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,

    /// File the result applies to; absent for family-level checks.
    #[serde(
        default,
        rename = "filename",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_name: Option<String>,

    /// Log lines in emission order.
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl ResultEvent {
    /// Minimal event for a family-level check.
    pub fn family(check_id: impl Into<String>, status: ResultStatus) -> Self {
        Self {
            check_id: check_id.into(),
            status,
            description: String::new(),
            rationale: None,
            file_name: None,
            logs: Vec::new(),
        }
    }

    /// Minimal event scoped to one file.
    pub fn for_file(
        check_id: impl Into<String>,
        status: ResultStatus,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            file_name: Some(file_name.into()),
            ..Self::family(check_id, status)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_log(mut self, status: ResultStatus, message: impl Into<String>) -> Self {
        self.logs.push(LogEntry::new(status, message));
        self
    }
}

/// Options controlling a run, separate from the file set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Statuses the runner should report; less interesting ones are
    /// filtered engine-side.
    #[serde(rename = "loglevels")]
    pub log_levels: Vec<ResultStatus>,

    /// Report full value lists instead of truncated ones.
    #[serde(rename = "fulllists")]
    pub full_lists: bool,

    /// Check ids the runner must not execute.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_checks: BTreeSet<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            log_levels: vec![ResultStatus::Info],
            full_lists: false,
            exclude_checks: BTreeSet::new(),
        }
    }
}

/// A complete run request: file bytes plus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// File name to raw bytes.
    pub files: BTreeMap<String, Vec<u8>>,

    /// Profile whose checks should run.
    pub profile: String,

    #[serde(flatten)]
    pub options: RunOptions,
}

impl RunRequest {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            files: BTreeMap::new(),
            profile: profile.into(),
            options: RunOptions::default(),
        }
    }

    pub fn with_file(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.files.insert(name.into(), bytes);
        self
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
