// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed excuse messages for environment-limited checks.
//!
//! Some checks always ERROR inside the embedded runtime: they need a
//! native library that cannot be loaded there, network access, or a
//! real filesystem. For those ids the aggregator swaps the raw error
//! logs for a fixed human-readable explanation. The mapping is a data
//! table keyed by check id so it can be audited and extended without
//! touching aggregation logic; ERROR results for ids not listed here
//! keep their raw logs.

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Why a check cannot run in the embedded runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Limitation {
    /// A native library the check depends on cannot be loaded.
    MissingLibrary(&'static str),
    /// The check needs network access, which is disallowed.
    NeedsNetwork,
    /// The check inspects directories, which do not exist here.
    NoFilesystem,
}

const LIMITED_CHECKS: &[(&str, Limitation)] = &[
    // Native dependencies that cannot be loaded
    (
        "com.adobe.fonts/check/freetype_rasterizer",
        Limitation::MissingLibrary("FreeType"),
    ),
    (
        "com.google.fonts/check/ots",
        Limitation::MissingLibrary("OpenType Sanitizer"),
    ),
    (
        "com.google.fonts/check/alt_caron",
        Limitation::MissingLibrary("babelfont"),
    ),
    (
        "com.google.fonts/check/alt_caron:googlefonts",
        Limitation::MissingLibrary("babelfont"),
    ),
    (
        "com.google.fonts/check/arabic_high_hamza",
        Limitation::MissingLibrary("babelfont"),
    ),
    (
        "com.google.fonts/check/arabic_spacing_symbols",
        Limitation::MissingLibrary("babelfont"),
    ),
    (
        "com.google.fonts/check/legacy_accents:googlefonts",
        Limitation::MissingLibrary("babelfont"),
    ),
    (
        "com.google.fonts/check/render_own_name",
        Limitation::MissingLibrary("FreeType"),
    ),
    (
        "com.google.fonts/check/dotted_circle",
        Limitation::MissingLibrary("cffsubr"),
    ),
    (
        "com.google.fonts/check/metadata/can_render_samples",
        Limitation::MissingLibrary("HarfBuzz"),
    ),
    (
        "com.google.fonts/check/slant_direction",
        Limitation::MissingLibrary("HarfBuzz"),
    ),
    (
        "com.google.fonts/check/glyphsets/shape_languages",
        Limitation::MissingLibrary("HarfBuzz"),
    ),
    // Network access
    ("com.google.fonts/check/vendor_id", Limitation::NeedsNetwork),
    (
        "com.google.fonts/check/fontdata_namecheck",
        Limitation::NeedsNetwork,
    ),
    (
        "com.google.fonts/check/vertical_metrics_regressions",
        Limitation::NeedsNetwork,
    ),
    (
        "com.google.fonts/check/metadata/includes_production_subsets",
        Limitation::NeedsNetwork,
    ),
    (
        "com.google.fonts/check/metadata/designer_profiles",
        Limitation::NeedsNetwork,
    ),
    (
        "com.google.fonts/check/description/broken_links",
        Limitation::NeedsNetwork,
    ),
    (
        "com.google.fonts/check/metadata/broken_links",
        Limitation::NeedsNetwork,
    ),
    (
        "com.google.fonts/check/version_bump",
        Limitation::NeedsNetwork,
    ),
    (
        "com.google.fonts/check/production_glyphs_similarity",
        Limitation::NeedsNetwork,
    ),
    // Filesystem layout
    (
        "com.google.fonts/check/metadata/family_directory_name",
        Limitation::NoFilesystem,
    ),
];

fn excuse_text(limitation: Limitation) -> String {
    let reason = match limitation {
        Limitation::MissingLibrary(library) => {
            format!("the {library} library cannot be loaded in the sandbox")
        }
        Limitation::NeedsNetwork => "it needs access to the network".to_string(),
        Limitation::NoFilesystem => {
            "there are no real directories in the embedded environment".to_string()
        }
    };
    format!(
        "This check cannot be run in the embedded runtime. This is because {reason}. \
         The embedded runner is not a full replacement for a native installation; \
         install the checking tool locally to make sure every check is run."
    )
}

fn table() -> &'static BTreeMap<&'static str, String> {
    static TABLE: OnceLock<BTreeMap<&'static str, String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        LIMITED_CHECKS
            .iter()
            .map(|&(id, limitation)| (id, excuse_text(limitation)))
            .collect()
    })
}

/// The fixed excuse for a check id, if it is known to be
/// environment-limited.
pub fn excuse_for(check_id: &str) -> Option<&'static str> {
    table().get(check_id).map(String::as_str)
}

#[cfg(test)]
#[path = "excuses_tests.rs"]
mod tests;
