// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON output formatter.
//!
//! Buffers and writes the whole projected report at the end (not
//! streamed), stamped with the formatting time.

use std::io::Write;

use chrono::Utc;
use serde::Serialize;

use crate::render::Report;

/// The persisted form of a projected report.
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    timestamp: String,
    #[serde(flatten)]
    report: &'a Report,
}

/// JSON report formatter.
pub struct JsonFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the complete JSON document, pretty-printed.
    pub fn write(&mut self, report: &Report) -> std::io::Result<()> {
        let document = ReportDocument {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            report,
        };
        let json = serde_json::to_string_pretty(&document).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{}", json)
    }

    /// Write the document on a single line.
    pub fn write_compact(&mut self, report: &Report) -> std::io::Result<()> {
        let document = ReportDocument {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            report,
        };
        let json = serde_json::to_string(&document).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{}", json)
    }

    /// Consume the formatter, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
