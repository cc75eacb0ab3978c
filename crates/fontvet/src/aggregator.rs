// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stateful aggregation of a single check run.
//!
//! One [`Aggregator`] per run. Result events stream in via
//! [`Aggregator::ingest`]; per-check worst status, per-file log
//! buckets, and per-status counters accumulate; the rendering layer
//! reads immutable [`ReportSnapshot`]s rather than sharing the live
//! table. The run moves through not-started → in-progress →
//! done | failed, and nothing is accepted after termination: a late
//! event means the external runner misbehaved and is reported as a
//! protocol violation, not ignored.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::event::{LogEntry, ResultEvent};
use crate::excuses;
use crate::registry::CheckRegistry;
use crate::status::ResultStatus;

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    NotStarted,
    InProgress,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::NotStarted => "not-started",
            RunState::InProgress => "in-progress",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Which log bucket an event lands in.
///
/// `Family` is the sentinel for results that apply to the whole file
/// set; it orders before any file so family-level findings lead the
/// display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogBucket {
    Family,
    File(String),
}

impl LogBucket {
    fn from_event(file_name: Option<&str>) -> Self {
        match file_name {
            Some(name) => LogBucket::File(name.to_string()),
            None => LogBucket::Family,
        }
    }

    /// File name, or `None` for the family bucket.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            LogBucket::Family => None,
            LogBucket::File(name) => Some(name),
        }
    }
}

/// Accumulated state for one check id within a run.
#[derive(Debug, Clone)]
pub struct AggregatedCheck {
    pub check_id: String,
    pub description: String,
    pub rationale: Option<String>,

    /// Worst status seen so far; moves monotonically toward more
    /// severe as events arrive.
    pub worst_status: ResultStatus,

    /// Log lines per bucket, in arrival order.
    pub logs: BTreeMap<LogBucket, Vec<LogEntry>>,
}

impl AggregatedCheck {
    fn new(check_id: &str) -> Self {
        Self {
            check_id: check_id.to_string(),
            description: String::new(),
            rationale: None,
            // Least severe under the ranking; any real status replaces it.
            worst_status: ResultStatus::Skip,
            logs: BTreeMap::new(),
        }
    }
}

/// Running counters for the active run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunProgress {
    /// Events seen per status.
    pub counts: BTreeMap<ResultStatus, u64>,

    /// Percentage complete as reported by the runner, clamped
    /// non-decreasing.
    pub percent: f64,
}

impl RunProgress {
    /// Count for one status (zero when unseen).
    pub fn count(&self, status: ResultStatus) -> u64 {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Total events counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Callback invoked with a check id whenever that check's aggregate
/// changes, for incremental rendering. May be invoked again for an id
/// it has already seen; log entries are never duplicated.
pub type UpdateSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Read-only projection input handed to the rendering layer.
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    pub state: RunState,
    pub profile: Option<String>,
    pub error: Option<String>,
    pub progress: RunProgress,
    pub checks: Vec<AggregatedCheck>,
    pub warnings: Vec<String>,
}

/// Aggregates one run's result stream.
#[derive(Default)]
pub struct Aggregator {
    state: Option<RunStateInner>,
    registry: Option<Arc<CheckRegistry>>,
    sink: Option<UpdateSink>,
}

/// State that exists only between `start` and the next `reset`.
struct RunStateInner {
    state: RunState,
    profile: String,
    error: Option<String>,
    checks: BTreeMap<String, AggregatedCheck>,
    progress: RunProgress,
    warnings: Vec<String>,
    seen: HashSet<u64>,
}

impl RunStateInner {
    fn new(profile: String) -> Self {
        Self {
            state: RunState::InProgress,
            profile,
            error: None,
            checks: BTreeMap::new(),
            progress: RunProgress::default(),
            warnings: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate event ids against a catalog; unknown ids are surfaced
    /// as warnings (and still aggregated with placeholder metadata).
    pub fn with_registry(mut self, registry: Arc<CheckRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Install the incremental-update callback.
    pub fn with_update_sink(mut self, sink: UpdateSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
            .as_ref()
            .map_or(RunState::NotStarted, |run| run.state)
    }

    /// Begin a new run. Fails while a run is in progress; use
    /// [`Aggregator::reset`] first if the previous run was abandoned.
    pub fn start(&mut self, profile: impl Into<String>) -> Result<()> {
        if self.state() == RunState::InProgress {
            return Err(Error::InvalidState {
                operation: "start",
                state: RunState::InProgress,
            });
        }
        let profile = profile.into();
        tracing::debug!("run started with profile '{}'", profile);
        self.state = Some(RunStateInner::new(profile));
        Ok(())
    }

    /// Unconditionally discard all run state, including a
    /// not-yet-terminated run's partial data. This is the cancellation
    /// path: the display side abandoned the session.
    pub fn reset(&mut self) {
        if self.state() == RunState::InProgress {
            tracing::debug!("in-progress run abandoned");
        }
        self.state = None;
    }

    /// Apply one result event.
    pub fn ingest(&mut self, event: ResultEvent) -> Result<()> {
        let run = match self.state.as_mut() {
            None => {
                return Err(Error::InvalidState {
                    operation: "ingest",
                    state: RunState::NotStarted,
                });
            }
            Some(run) if run.state != RunState::InProgress => {
                return Err(Error::ProtocolViolation(format!(
                    "result for '{}' arrived after the run was {}",
                    event.check_id, run.state
                )));
            }
            Some(run) => run,
        };

        if !run.seen.insert(fingerprint(&event)) {
            // Duplicate delivery: re-notify so an incremental renderer
            // converges, but never touch logs or counters.
            tracing::debug!("duplicate event for '{}' re-delivered", event.check_id);
            if let Some(sink) = &self.sink {
                sink(&event.check_id);
            }
            return Ok(());
        }

        let known = self
            .registry
            .as_ref()
            .is_none_or(|registry| registry.contains(&event.check_id));
        let first_for_id = !run.checks.contains_key(&event.check_id);
        if !known && first_for_id {
            tracing::warn!("result for unknown check id '{}'", event.check_id);
            run.warnings
                .push(format!("unknown check id '{}'", event.check_id));
        }

        let check = run
            .checks
            .entry(event.check_id.clone())
            .or_insert_with(|| AggregatedCheck::new(&event.check_id));
        if check.description.is_empty() && !event.description.is_empty() {
            check.description = event.description.clone();
        }
        if check.rationale.is_none() {
            check.rationale = event.rationale.clone();
        }

        let bucket = check
            .logs
            .entry(LogBucket::from_event(event.file_name.as_deref()))
            .or_default();
        match (event.status, excuses::excuse_for(&event.check_id)) {
            (ResultStatus::Error, Some(excuse)) => {
                // Environment-limited check: a fixed explanation
                // replaces the raw error logs.
                bucket.clear();
                bucket.push(LogEntry::new(ResultStatus::Error, excuse));
            }
            _ => bucket.extend(event.logs.iter().cloned()),
        }

        check.worst_status = check.worst_status.worst(event.status);
        *run.progress.counts.entry(event.status).or_insert(0) += 1;

        if let Some(sink) = &self.sink {
            sink(&event.check_id);
        }
        Ok(())
    }

    /// Apply a runner-supplied progress percentage.
    pub fn update_percent(&mut self, percent: f64) -> Result<()> {
        let run = match self.state.as_mut() {
            None => {
                return Err(Error::InvalidState {
                    operation: "update progress",
                    state: RunState::NotStarted,
                });
            }
            Some(run) if run.state != RunState::InProgress => {
                return Err(Error::ProtocolViolation(format!(
                    "progress update arrived after the run was {}",
                    run.state
                )));
            }
            Some(run) => run,
        };
        run.progress.percent = run.progress.percent.max(percent.clamp(0.0, 100.0));
        Ok(())
    }

    /// Mark the run complete; the aggregate becomes read-only.
    pub fn finish(&mut self) -> Result<()> {
        self.terminate(RunState::Done, None, "finish")
    }

    /// Mark the run failed with the engine's error message.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.terminate(RunState::Failed, Some(message.into()), "fail")
    }

    fn terminate(
        &mut self,
        next: RunState,
        error: Option<String>,
        operation: &'static str,
    ) -> Result<()> {
        match self.state.as_mut() {
            Some(run) if run.state == RunState::InProgress => {
                tracing::debug!("run terminated as {}", next);
                run.state = next;
                run.error = error;
                Ok(())
            }
            other => Err(Error::InvalidState {
                operation,
                state: other.as_ref().map_or(RunState::NotStarted, |run| run.state),
            }),
        }
    }

    /// The engine's error message when the run failed.
    pub fn error(&self) -> Option<&str> {
        self.state.as_ref().and_then(|run| run.error.as_deref())
    }

    pub fn progress(&self) -> RunProgress {
        self.state
            .as_ref()
            .map(|run| run.progress.clone())
            .unwrap_or_default()
    }

    /// Protocol warnings collected so far (unknown check ids).
    pub fn warnings(&self) -> &[String] {
        match self.state.as_ref() {
            Some(run) => &run.warnings,
            None => &[],
        }
    }

    /// One check's aggregate, if any events arrived for it.
    pub fn check(&self, check_id: &str) -> Option<&AggregatedCheck> {
        self.state.as_ref().and_then(|run| run.checks.get(check_id))
    }

    /// Immutable copy of everything the rendering layer needs.
    pub fn snapshot(&self) -> ReportSnapshot {
        match self.state.as_ref() {
            None => ReportSnapshot {
                state: RunState::NotStarted,
                profile: None,
                error: None,
                progress: RunProgress::default(),
                checks: Vec::new(),
                warnings: Vec::new(),
            },
            Some(run) => ReportSnapshot {
                state: run.state,
                profile: Some(run.profile.clone()),
                error: run.error.clone(),
                progress: run.progress.clone(),
                checks: run.checks.values().cloned().collect(),
                warnings: run.warnings.clone(),
            },
        }
    }
}

/// Delivery fingerprint: identical events hash identically, so an
/// at-least-once transport cannot duplicate log lines.
fn fingerprint(event: &ResultEvent) -> u64 {
    let mut hasher = DefaultHasher::new();
    event.check_id.hash(&mut hasher);
    event.file_name.hash(&mut hasher);
    event.status.hash(&mut hasher);
    for log in &event.logs {
        log.status.hash(&mut hasher);
        log.message.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
