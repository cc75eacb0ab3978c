// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text output formatter.
//!
//! Format:
//! ```text
//! FAIL com.google.fonts/check/name/trailing_spaces: Name table records...
//!   Foo-Regular.ttf
//!     FAIL: Name record 4 has a trailing space
//! ```
//! Rows arrive already sorted by the live severity ranking.

use termcolor::WriteColor;

use super::FormatOptions;
use crate::render::{DisplayRow, Report};
use crate::status::ResultStatus;

/// Text report writer with color support.
pub struct TextFormatter<W: WriteColor> {
    out: W,
    options: FormatOptions,
}

impl<W: WriteColor> TextFormatter<W> {
    pub fn new(out: W, options: FormatOptions) -> Self {
        Self { out, options }
    }

    /// Write the full report: rows, warnings, then the summary line.
    pub fn write_report(&mut self, report: &Report) -> std::io::Result<()> {
        for row in &report.rows {
            self.write_row(row)?;
        }
        for warning in &report.warnings {
            writeln!(self.out, "warning: {}", warning)?;
        }
        self.write_summary(report)
    }

    fn write_row(&mut self, row: &DisplayRow) -> std::io::Result<()> {
        self.write_status(row.worst_status)?;
        write!(self.out, " ")?;

        self.out.set_color(&scheme::check_id())?;
        write!(self.out, "{}", row.check_id)?;
        self.out.reset()?;

        if row.description.is_empty() {
            writeln!(self.out)?;
        } else {
            writeln!(self.out, ": {}", row.description)?;
        }

        let mut lines_shown = 0usize;
        for group in &row.groups {
            if let Some(file_name) = &group.file_name {
                write!(self.out, "  ")?;
                self.out.set_color(&scheme::file_name())?;
                writeln!(self.out, "{}", file_name)?;
                self.out.reset()?;
            }
            let indent = if group.file_name.is_some() { "    " } else { "  " };
            for line in &group.lines {
                if let Some(limit) = self.options.max_log_lines
                    && lines_shown >= limit
                {
                    writeln!(self.out, "{indent}...")?;
                    return Ok(());
                }
                write!(self.out, "{indent}")?;
                self.write_status(line.status)?;
                writeln!(self.out, ": {}", line.message)?;
                lines_shown += 1;
            }
        }
        Ok(())
    }

    /// Write the summary line: non-zero counters in severity order,
    /// plus completion percentage while the run is still going.
    fn write_summary(&mut self, report: &Report) -> std::io::Result<()> {
        let mut first = true;
        for status in ResultStatus::ALL {
            let count = report.progress.count(status);
            if count == 0 {
                continue;
            }
            if !first {
                write!(self.out, "  ")?;
            }
            first = false;
            self.write_status(status)?;
            write!(self.out, " {}", count)?;
        }
        if first {
            write!(self.out, "no results")?;
        }
        if report.progress.percent < 100.0 {
            write!(self.out, "  ({:.0}% complete)", report.progress.percent)?;
        }
        writeln!(self.out)
    }

    fn write_status(&mut self, status: ResultStatus) -> std::io::Result<()> {
        self.out.set_color(&scheme::status(status))?;
        write!(self.out, "{}", status)?;
        self.out.reset()
    }

    /// Consume the formatter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Color scheme for report output.
pub mod scheme {
    use termcolor::{Color, ColorSpec};

    use crate::status::ResultStatus;

    /// Badge color for a status.
    pub fn status(status: ResultStatus) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match status {
            ResultStatus::Fail => spec.set_fg(Some(Color::Red)).set_bold(true),
            ResultStatus::Warn => spec.set_fg(Some(Color::Yellow)).set_bold(true),
            ResultStatus::Info => spec.set_fg(Some(Color::Cyan)).set_bold(true),
            ResultStatus::Error => spec.set_fg(Some(Color::Magenta)).set_bold(true),
            ResultStatus::Pass => spec.set_fg(Some(Color::Green)).set_bold(true),
            ResultStatus::Skip => spec.set_dimmed(true),
        };
        spec
    }

    /// Bold check id.
    pub fn check_id() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        spec
    }

    /// Cyan file name.
    pub fn file_name() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Cyan));
        spec
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
