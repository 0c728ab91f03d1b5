// src/report.rs
// =============================================================================
// Turns the results of a run into output.
//
// The validator only produces data (a RunSummary with Failure records); how
// that data is shown is decided here. Two reporters:
// - TextReporter: one `FAILED LINK IN <path> : <link>` line per failure,
//   then a short summary
// - JsonReporter: the whole summary as pretty JSON, for CI tooling
//
// Both write to any `std::io::Write`, so tests can render into a Vec<u8>.
// =============================================================================

use anyhow::Result;
use std::io::Write;

use crate::checker::{Failure, RunSummary};

/// Something that can present the results of a run.
pub trait Reporter {
    fn report(&mut self, summary: &RunSummary) -> Result<()>;
}

/// Renders the diagnostic line for one failure.
///
/// The locale is the first path segment so failures from different locales
/// can be told apart: `FAILED LINK IN en.home.footer : https://...`
pub fn failure_line(failure: &Failure) -> String {
    let location = if failure.path.is_empty() {
        failure.locale.clone()
    } else {
        format!("{}.{}", failure.locale, failure.path)
    };
    format!("FAILED LINK IN {} : {}", location, failure.link)
}

pub struct TextReporter<W> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, summary: &RunSummary) -> Result<()> {
        for failure in &summary.failures {
            writeln!(self.out, "{}", failure_line(failure))?;
        }

        if !summary.failures.is_empty() {
            writeln!(self.out)?;
        }
        writeln!(
            self.out,
            "📊 {} locale(s), {} link(s) found, {} distinct link(s) ok, {} failure(s)",
            summary.locales,
            summary.occurrences,
            summary.validated,
            summary.failures.len()
        )?;
        Ok(())
    }
}

pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, summary: &RunSummary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, summary)?;
        writeln!(self.out)?;
        Ok(())
    }
}
