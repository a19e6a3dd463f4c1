//! Report rendering
//!
//! The owner table goes to stdout, one tab-delimited line per entity, followed
//! by a blank line and the entity count. The truncation warning goes to the
//! diagnostic writer.

use std::io::{self, Write};

use ownermap_core::attribution::{AttributionEntry, ResolutionStats};
use ownermap_core::{Attribution, Ingested};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `source<TAB>sourceGUID<TAB>=><TAB>owner<TAB>ownerGUID` lines
    #[default]
    Lines,
    Json,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct Report {
    pub attribution: Attribution,
    pub rows_fetched: usize,
    pub limit: usize,
    pub truncated: bool,
}

impl Report {
    pub fn new(ingested: &Ingested, attribution: Attribution) -> Self {
        Self {
            attribution,
            rows_fetched: ingested.rows_fetched(),
            limit: ingested.limit,
            truncated: ingested.possibly_truncated(),
        }
    }

    pub fn truncation_warning(&self) -> Option<String> {
        self.truncated.then(|| {
            format!(
                "WARNING: fetched {} rows (limit={}). Results may be truncated.",
                self.rows_fetched, self.limit
            )
        })
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    entries: &'a [AttributionEntry],
    count: usize,
    truncated: bool,
    rows_fetched: usize,
    limit: usize,
    overwrites: usize,
    owner_changes: usize,
}

impl<'a> From<&'a Report> for JsonReport<'a> {
    fn from(report: &'a Report) -> Self {
        let stats: &ResolutionStats = report.attribution.stats();
        Self {
            entries: report.attribution.entries(),
            count: report.attribution.len(),
            truncated: report.truncated,
            rows_fetched: report.rows_fetched,
            limit: report.limit,
            overwrites: stats.overwrites,
            owner_changes: stats.owner_changes,
        }
    }
}

pub fn write_report<W, D>(
    out: &mut W,
    diag: &mut D,
    report: &Report,
    format: OutputFormat,
) -> io::Result<()>
where
    W: Write,
    D: Write,
{
    if let Some(warning) = report.truncation_warning() {
        writeln!(diag, "{warning}")?;
    }

    match format {
        OutputFormat::Lines => {
            for entry in report.attribution.entries() {
                writeln!(
                    out,
                    "{}\t{}\t=>\t{}\t{}",
                    entry.source, entry.source_guid, entry.owner, entry.owner_guid
                )?;
            }
            writeln!(out)?;
            writeln!(out, "Total mapped entities: {}", report.attribution.len())?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &JsonReport::from(report))?;
            writeln!(out)?;
        }
    }

    out.flush()
}
