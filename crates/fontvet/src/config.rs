// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session configuration and reference data.
//!
//! A [`SessionConfig`] is what the host application persists between
//! sessions: which profile to run, which statuses to report, and which
//! checks to leave out. It loads from TOML and turns into a
//! [`RunRequest`] once file bytes are attached.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::event::{RunOptions, RunRequest};
use crate::status::ResultStatus;

/// Profile selected when the user has not chosen one.
pub const DEFAULT_PROFILE: &str = "universal";

/// The profiles the front end offers, with display labels.
pub const KNOWN_PROFILES: &[(&str, &str)] = &[
    ("opentype", "OpenType (standards compliance)"),
    ("universal", "Universal (community best practices)"),
    ("googlefonts", "Google Fonts"),
    ("adobefonts", "Adobe Fonts"),
    ("fontbureau", "Font Bureau"),
    ("typenetwork", "Type Network"),
    ("fontwerk", "Fontwerk"),
    ("microsoft", "Microsoft"),
];

/// Checks the embedded runtime never runs: self-version checks (the
/// engine is reinstalled fresh each load), source-format checks that
/// need UFO/designspace inputs, shaping checks, and checks that spawn
/// subprocesses.
pub const EMBEDDED_EXCLUDED_CHECKS: &[&str] = &[
    "com.google.fonts/check/fontbakery_version",
    "com.daltonmaag/check/ufo_required_fields",
    "com.daltonmaag/check/ufo_recommended_fields",
    "com.google.fonts/check/designspace_has_sources",
    "com.google.fonts/check/designspace_has_default_master",
    "com.google.fonts/check/designspace_has_consistent_glyphset",
    "com.google.fonts/check/designspace_has_consistent_codepoints",
    "com.google.fonts/check/shaping/regression",
    "com.google.fonts/check/shaping/forbidden",
    "com.google.fonts/check/shaping/collides",
    "com.google.fonts/check/fontv",
];

/// Display label for a profile name, when it is a known one.
pub fn profile_label(name: &str) -> Option<&'static str> {
    KNOWN_PROFILES
        .iter()
        .find(|(profile, _)| *profile == name)
        .map(|&(_, label)| label)
}

/// Persistent run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Profile whose checks should run.
    pub profile: String,

    /// Statuses the runner should report.
    pub log_levels: Vec<ResultStatus>,

    /// Report full value lists instead of truncated ones.
    pub full_lists: bool,

    /// Check ids to leave out, in addition to nothing by default.
    pub exclude_checks: BTreeSet<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            log_levels: vec![ResultStatus::Info],
            full_lists: false,
            exclude_checks: BTreeSet::new(),
        }
    }
}

impl SessionConfig {
    /// Defaults for an embedded runtime: the environment-limited
    /// checks are excluded up front.
    pub fn embedded() -> Self {
        Self {
            exclude_checks: EMBEDDED_EXCLUDED_CHECKS
                .iter()
                .map(|id| id.to_string())
                .collect(),
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Config {
            message: e.to_string(),
            path: None,
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|err| match err {
            Error::Config { message, .. } => Error::Config {
                message,
                path: Some(path.to_path_buf()),
            },
            other => other,
        })
    }

    /// Attach file bytes, producing a run request.
    pub fn to_request(&self, files: BTreeMap<String, Vec<u8>>) -> RunRequest {
        RunRequest {
            files,
            profile: self.profile.clone(),
            options: RunOptions {
                log_levels: self.log_levels.clone(),
                full_lists: self.full_lists,
                exclude_checks: self.exclude_checks.clone(),
            },
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
