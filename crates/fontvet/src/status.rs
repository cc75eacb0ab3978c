// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Status vocabularies and the severity ranking.
//!
//! Two vocabularies coexist and must not be conflated:
//! - [`ResultStatus`]: the six-way vocabulary of a live check run.
//! - [`ReportOutcome`]: the four-way vocabulary of persisted historical
//!   reports.
//!
//! The live ranking is deliberate and non-alphabetic: ERROR sorts below
//! INFO and above PASS. Downstream sorting and worst-of aggregation
//! depend on this exact order; do not "fix" it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a single check event in a live run.
///
/// Variants are declared in severity order, most severe first, so the
/// derived `Ord` is the severity ranking: the minimum of two statuses is
/// the worse one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    Fail,
    Warn,
    Info,
    Error,
    Pass,
    Skip,
}

impl ResultStatus {
    /// All statuses, most severe first.
    pub const ALL: [ResultStatus; 6] = [
        ResultStatus::Fail,
        ResultStatus::Warn,
        ResultStatus::Info,
        ResultStatus::Error,
        ResultStatus::Pass,
        ResultStatus::Skip,
    ];

    /// Position in the severity ranking (0 = most severe).
    pub fn severity_rank(self) -> u8 {
        self as u8
    }

    /// The worse of two statuses under the severity ranking.
    pub fn worst(self, other: ResultStatus) -> ResultStatus {
        self.min(other)
    }

    /// Wire name (upper-case).
    pub fn as_str(self) -> &'static str {
        match self {
            ResultStatus::Fail => "FAIL",
            ResultStatus::Warn => "WARN",
            ResultStatus::Info => "INFO",
            ResultStatus::Error => "ERROR",
            ResultStatus::Pass => "PASS",
            ResultStatus::Skip => "SKIP",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FAIL" => Ok(ResultStatus::Fail),
            "WARN" => Ok(ResultStatus::Warn),
            "INFO" => Ok(ResultStatus::Info),
            "ERROR" => Ok(ResultStatus::Error),
            "PASS" => Ok(ResultStatus::Pass),
            "SKIP" => Ok(ResultStatus::Skip),
            other => Err(format!("unknown result status '{other}'")),
        }
    }
}

/// Coarse outcome used by persisted historical reports.
///
/// `Fixed` is only ever written by an external fixing pipeline; the
/// live-to-historical mapping never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportOutcome {
    Success,
    Warning,
    Error,
    Fixed,
}

impl ReportOutcome {
    /// All outcomes in display order.
    pub const ALL: [ReportOutcome; 4] = [
        ReportOutcome::Success,
        ReportOutcome::Fixed,
        ReportOutcome::Warning,
        ReportOutcome::Error,
    ];

    /// Wire name (lower-case).
    pub fn as_str(self) -> &'static str {
        match self {
            ReportOutcome::Success => "success",
            ReportOutcome::Warning => "warning",
            ReportOutcome::Error => "error",
            ReportOutcome::Fixed => "fixed",
        }
    }

    /// Pie-slice color used by the summary charts.
    pub fn chart_color(self) -> &'static str {
        match self {
            ReportOutcome::Success => "#468847",
            ReportOutcome::Fixed => "#3a87ad",
            ReportOutcome::Warning => "#c09853",
            ReportOutcome::Error => "#b94a48",
        }
    }
}

impl fmt::Display for ReportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping table from the live vocabulary into the historical one.
impl From<ResultStatus> for ReportOutcome {
    fn from(status: ResultStatus) -> Self {
        match status {
            ResultStatus::Fail | ResultStatus::Error => ReportOutcome::Error,
            ResultStatus::Warn => ReportOutcome::Warning,
            ResultStatus::Info | ResultStatus::Pass | ResultStatus::Skip => ReportOutcome::Success,
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
