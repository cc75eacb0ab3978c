// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Messages flowing from the engine to the session.
//!
//! The runner's wire protocol distinguishes message kinds by key
//! presence (`{"ready": true}`, `{"done": true}`, ...). That dispatch
//! happens exactly once, here, producing a closed sum type; everything
//! downstream matches on [`EngineMessage`] and never inspects raw JSON.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::event::ResultEvent;
use crate::registry::CheckDefinition;
use crate::status::ResultStatus;

/// A progress notification from the runner.
///
/// The runner sends its own per-status counters alongside the
/// percentage; they are preserved for display, but the aggregator's
/// counters remain authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Percentage complete, 0-100.
    pub percent: f64,

    /// The runner's view of counts per status.
    pub counts: BTreeMap<ResultStatus, u64>,
}

/// Everything the engine can say to the session.
#[derive(Debug, Clone)]
pub enum EngineMessage {
    /// Warm-up finished; the engine accepts requests.
    Ready,

    /// Metadata dump of every known check.
    Checks(BTreeMap<String, CheckDefinition>),

    /// Engine version string, sent at the start of a run.
    Version(String),

    /// Progress counters for the active run.
    Progress(ProgressUpdate),

    /// One check result.
    Result(Box<ResultEvent>),

    /// The active run completed.
    Done,

    /// Load failure or run abort; terminal for the session.
    Error(String),
}

impl EngineMessage {
    /// Decode one wire message.
    ///
    /// Key-presence dispatch in the observed order: `checks`, `ready`,
    /// `version`, `done`, `error`, then `progress`; anything else must
    /// be a result payload. A shape that is none of these is a
    /// protocol violation, never silently dropped.
    pub fn decode(value: Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::ProtocolViolation(format!(
                "engine message is not an object: {value}"
            )));
        };

        if let Some(checks) = object.get("checks") {
            let checks: BTreeMap<String, CheckDefinition> =
                serde_json::from_value(checks.clone())?;
            return Ok(EngineMessage::Checks(checks));
        }
        if object.contains_key("ready") {
            return Ok(EngineMessage::Ready);
        }
        if let Some(version) = object.get("version") {
            let version = version
                .as_str()
                .ok_or_else(|| {
                    Error::ProtocolViolation(format!("non-string version: {version}"))
                })?
                .to_string();
            return Ok(EngineMessage::Version(version));
        }
        if object.contains_key("done") {
            return Ok(EngineMessage::Done);
        }
        if let Some(error) = object.get("error") {
            let message = error.as_str().unwrap_or_default().to_string();
            return Ok(EngineMessage::Error(message));
        }
        if let Some(percent) = object.get("progress") {
            let percent = percent.as_f64().ok_or_else(|| {
                Error::ProtocolViolation(format!("non-numeric progress: {percent}"))
            })?;
            // The counter object also carries keys like "(not
            // finished)"; only the six statuses are meaningful here.
            let mut counts = BTreeMap::new();
            for status in ResultStatus::ALL {
                if let Some(count) = object.get(status.as_str()).and_then(Value::as_u64) {
                    counts.insert(status, count);
                }
            }
            return Ok(EngineMessage::Progress(ProgressUpdate { percent, counts }));
        }

        let event: ResultEvent = serde_json::from_value(value).map_err(|e| {
            Error::ProtocolViolation(format!("unrecognized engine message: {e}"))
        })?;
        Ok(EngineMessage::Result(Box::new(event)))
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
