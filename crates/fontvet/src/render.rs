// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stateless projection of aggregated state into display order.
//!
//! Rows sort by `(severity rank, check id)` under the live ranking, so
//! FAIL rows lead and SKIP rows trail; the sort is stable and is re-run
//! on every snapshot as results stream in, not only at the end.

use serde::Serialize;

use crate::aggregator::{AggregatedCheck, ReportSnapshot, RunProgress, RunState};
use crate::registry::CheckRegistry;
use crate::status::ResultStatus;

/// Log lines for one bucket of a display row; `file_name` is `None`
/// for family-level findings.
#[derive(Debug, Clone, Serialize)]
pub struct FileLogGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub lines: Vec<crate::event::LogEntry>,
}

/// One row of the rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayRow {
    pub check_id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub worst_status: ResultStatus,
    pub groups: Vec<FileLogGroup>,
}

impl DisplayRow {
    /// Stable sort key: severity rank first, then id for ties.
    pub fn sort_key(&self) -> (u8, &str) {
        (self.worst_status.severity_rank(), &self.check_id)
    }
}

/// The full projected report for display.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub state: RunState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub progress: RunProgress,
    pub rows: Vec<DisplayRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Project a snapshot into sorted display rows.
pub fn project(snapshot: &ReportSnapshot) -> Report {
    let mut rows: Vec<DisplayRow> = snapshot.checks.iter().map(row_for).collect();
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    Report {
        state: snapshot.state,
        profile: snapshot.profile.clone(),
        error: snapshot.error.clone(),
        progress: snapshot.progress.clone(),
        rows,
        warnings: snapshot.warnings.clone(),
    }
}

/// Project a snapshot, backfilling descriptions and rationales from a
/// catalog. A check id the catalog does not know renders with whatever
/// the event stream supplied, or a placeholder.
pub fn project_with_registry(snapshot: &ReportSnapshot, registry: &CheckRegistry) -> Report {
    let mut report = project(snapshot);
    for row in &mut report.rows {
        match registry.lookup(&row.check_id) {
            Some(definition) => {
                if row.description.is_empty() {
                    row.description = definition.description.clone();
                }
                if row.rationale.is_none() {
                    row.rationale = definition.rationale.clone();
                }
            }
            None if row.description.is_empty() => {
                row.description = "(no metadata available)".to_string();
            }
            None => {}
        }
    }
    report
}

fn row_for(check: &AggregatedCheck) -> DisplayRow {
    DisplayRow {
        check_id: check.check_id.clone(),
        description: check.description.clone(),
        rationale: check.rationale.clone(),
        worst_status: check.worst_status,
        groups: check
            .logs
            .iter()
            .map(|(bucket, lines)| FileLogGroup {
                file_name: bucket.file_name().map(str::to_string),
                lines: lines.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
