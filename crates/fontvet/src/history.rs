// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted historical reports and their grouped summaries.
//!
//! Historical artifacts are produced by an external build pipeline and
//! use the coarse four-way [`ReportOutcome`] vocabulary, not the live
//! six-way one. A finished live run can be exported into this form via
//! the explicit mapping table in [`crate::status`]; the reverse
//! direction does not exist.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregator::ReportSnapshot;
use crate::error::{Error, Result};
use crate::status::ReportOutcome;

/// One persisted result record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub status: ReportOutcome,

    /// Free-form categorization tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Human-readable result message.
    #[serde(default)]
    pub message: String,
}

/// A persisted report: font name to its result records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalReport {
    fonts: BTreeMap<String, Vec<HistoricalRecord>>,
}

impl HistoricalReport {
    /// Parse a persisted JSON artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a persisted JSON artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Export a finished live run, mapping each check's worst status
    /// through the six-to-four table. File-level findings are recorded
    /// under their file; family-level findings under the given label.
    pub fn from_snapshot(snapshot: &ReportSnapshot, family_label: &str) -> Self {
        let mut fonts: BTreeMap<String, Vec<HistoricalRecord>> = BTreeMap::new();
        for check in &snapshot.checks {
            for (bucket, lines) in &check.logs {
                let font = bucket.file_name().unwrap_or(family_label).to_string();
                let message = lines
                    .first()
                    .map(|line| line.message.clone())
                    .unwrap_or_default();
                fonts.entry(font).or_default().push(HistoricalRecord {
                    status: ReportOutcome::from(check.worst_status),
                    tags: vec![check.check_id.clone()],
                    message,
                });
            }
        }
        Self { fonts }
    }

    pub fn fonts(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn records(&self, font: &str) -> Option<&[HistoricalRecord]> {
        self.fonts.get(font).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Outcome counters for one font or for a whole report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub success: u64,
    pub warning: u64,
    pub error: u64,
    pub fixed: u64,
}

impl OutcomeCounts {
    fn add(&mut self, outcome: ReportOutcome) {
        match outcome {
            ReportOutcome::Success => self.success += 1,
            ReportOutcome::Warning => self.warning += 1,
            ReportOutcome::Error => self.error += 1,
            ReportOutcome::Fixed => self.fixed += 1,
        }
    }

    fn merge(&mut self, other: OutcomeCounts) {
        self.success += other.success;
        self.warning += other.warning;
        self.error += other.error;
        self.fixed += other.fixed;
    }

    pub fn get(&self, outcome: ReportOutcome) -> u64 {
        match outcome {
            ReportOutcome::Success => self.success,
            ReportOutcome::Warning => self.warning,
            ReportOutcome::Error => self.error,
            ReportOutcome::Fixed => self.fixed,
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.warning + self.error + self.fixed
    }

    /// Labeled, colored slices for a pie chart, in display order.
    pub fn slices(&self) -> Vec<ChartSlice> {
        ReportOutcome::ALL
            .iter()
            .map(|&outcome| ChartSlice {
                label: format!("{} {}", title_case(outcome), self.get(outcome)),
                count: self.get(outcome),
                color: outcome.chart_color(),
            })
            .collect()
    }
}

/// One pie slice of a summary chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub count: u64,
    pub color: &'static str,
}

fn title_case(outcome: ReportOutcome) -> String {
    let name = outcome.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Per-font counters.
#[derive(Debug, Clone, Serialize)]
pub struct FontSummary {
    pub font: String,
    pub counts: OutcomeCounts,
}

/// Grouped summary across a whole historical report.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalSummary {
    pub per_font: Vec<FontSummary>,
    pub totals: OutcomeCounts,
}

/// Group a historical report into per-font and overall counters.
pub fn project(report: &HistoricalReport) -> HistoricalSummary {
    let mut per_font = Vec::with_capacity(report.fonts.len());
    let mut totals = OutcomeCounts::default();

    for (font, records) in &report.fonts {
        let mut counts = OutcomeCounts::default();
        for record in records {
            counts.add(record.status);
        }
        totals.merge(counts);
        per_font.push(FontSummary {
            font: font.clone(),
            counts,
        });
    }

    HistoricalSummary { per_font, totals }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
