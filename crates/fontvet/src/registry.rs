// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Static catalog of check metadata.
//!
//! The registry is loaded once, either from a bundled JSON document or
//! from the engine's own metadata dump, and is immutable afterwards. A
//! missing id is a recoverable condition: callers render placeholder
//! metadata instead of failing the report.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Descriptive metadata for one check id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckDefinition {
    /// One-line summary shown in report rows.
    #[serde(default)]
    pub description: String,

    /// Longer markdown explanation of why the check matters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,

    /// Profiles that include this check.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub profiles: BTreeSet<String>,

    /// Documentation sections the check is listed under, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<String>,

    /// Optional severity override declared by the check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u32>,

    /// Reference links; the wire form may be a single string or a list.
    #[serde(
        default,
        deserialize_with = "proposal_links",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub proposal: Vec<String>,
}

/// Accept `"url"` or `["url", ...]` for the `proposal` field.
fn proposal_links<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(link) => vec![link],
        OneOrMany::Many(links) => links,
    })
}

/// Immutable catalog of check definitions, keyed by dotted-namespace id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckRegistry {
    checks: BTreeMap<String, CheckDefinition>,
}

impl CheckRegistry {
    /// Build a registry from a JSON document mapping id to definition.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a registry from already-decoded definitions, e.g. the
    /// engine's metadata dump.
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (String, CheckDefinition)>,
    {
        Self {
            checks: definitions.into_iter().collect(),
        }
    }

    /// Look up one check's metadata.
    pub fn lookup(&self, check_id: &str) -> Option<&CheckDefinition> {
        self.checks.get(check_id)
    }

    /// Whether the id is known to the catalog.
    pub fn contains(&self, check_id: &str) -> bool {
        self.checks.contains_key(check_id)
    }

    /// All definitions, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CheckDefinition)> {
        self.checks.iter().map(|(id, def)| (id.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
