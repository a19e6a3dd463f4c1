use std::io::{self, Write};
use std::path::PathBuf;

use ownermap_core::context::EngineConfig;
use ownermap_core::query::GENERIC_FAILURE_CODE;
use ownermap_core::{
    CapturedEngine, ProcessEngine, QueryEngine, QueryError, ingest_damage_events,
    resolve_ownership,
};

use crate::output::Report;

/// Inputs for one resolution run, after config and arguments are merged.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub log_source: String,
    pub limit: usize,
    pub rows_file: Option<PathBuf>,
    pub engine: EngineConfig,
}

/// Picks the engine for this run: a captured response when one is given,
/// otherwise the configured engine process.
pub fn build_engine(options: &ResolveOptions) -> Result<Box<dyn QueryEngine>, QueryError> {
    match &options.rows_file {
        Some(path) => Ok(Box::new(CapturedEngine::new(path))),
        None => Ok(Box::new(ProcessEngine::from_config(&options.engine)?)),
    }
}

pub fn resolve(options: &ResolveOptions) -> Result<Report, QueryError> {
    let engine = build_engine(options)?;
    resolve_with(engine.as_ref(), &options.log_source, options.limit)
}

/// Runs ingestion to completion, then folds the rows.
pub fn resolve_with<E>(engine: &E, log_source: &str, limit: usize) -> Result<Report, QueryError>
where
    E: QueryEngine + ?Sized,
{
    let ingested = ingest_damage_events(engine, log_source, limit)?;
    let attribution = resolve_ownership(&ingested.events);
    Ok(Report::new(&ingested, attribution))
}

/// Writes a failed run to `out` and returns the process exit status.
///
/// Engine diagnostics are written byte for byte; other errors get an
/// `error:` line followed by their causes.
pub fn report_failure<W: Write>(out: &mut W, err: &QueryError) -> u8 {
    tracing::warn!(error = %err, code = err.exit_code(), "Ownership resolution failed");

    if let Err(write_err) = write_failure(out, err) {
        tracing::error!(error = %write_err, "Failed to report failure");
    }
    exit_status(err.exit_code())
}

fn write_failure<W: Write>(out: &mut W, err: &QueryError) -> io::Result<()> {
    match err {
        QueryError::EngineFailed { diagnostic, .. } => out.write_all(diagnostic.as_bytes())?,
        other => {
            writeln!(out, "error: {other}")?;
            let mut source = std::error::Error::source(other);
            while let Some(cause) = source {
                writeln!(out, "  caused by: {cause}")?;
                source = cause.source();
            }
        }
    }
    out.flush()
}

/// Narrows an exit code to a process status. Codes outside `0..=255` map to
/// the generic failure code.
pub fn exit_status(code: i32) -> u8 {
    u8::try_from(code)
        .or_else(|_| u8::try_from(GENERIC_FAILURE_CODE))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownermap_core::query::{QueryRequest, QueryResponse};

    const RESPONSE: &str = "source,sourceGUID,sourceOwner,sourceOwnerGUID,sourceAttributed\n\
                            Shadowfiend,Creature-0-1,Priestly,Player-1-1,\n\
                            Shadowfiend,Creature-0-1,Priestly,Player-1-1,\n\
                            Priestly,Player-1-1,,,\n\
                            Felhunter,Creature-0-2,Warlocky,Player-1-2,\n";

    struct Canned(QueryResponse);

    impl QueryEngine for Canned {
        fn run(&self, _request: &QueryRequest) -> Result<QueryResponse, QueryError> {
            Ok(self.0.clone())
        }
    }

    fn options(rows_file: Option<PathBuf>, command: &str) -> ResolveOptions {
        ResolveOptions {
            log_source: "raid.log".to_string(),
            limit: 500_000,
            rows_file,
            engine: EngineConfig::with_command(command),
        }
    }

    #[test]
    fn resolves_reference_rows() {
        let report = resolve_with(&Canned(QueryResponse::success(RESPONSE)), "raid.log", 500_000).unwrap();

        assert_eq!(report.rows_fetched, 4);
        assert!(!report.truncated);
        assert_eq!(report.attribution.len(), 2);
        assert_eq!(report.attribution.entries()[0].source, "Felhunter");
        assert_eq!(report.attribution.entries()[1].source, "Shadowfiend");
    }

    #[test]
    fn truncation_is_not_fatal() {
        let report = resolve_with(&Canned(QueryResponse::success(RESPONSE)), "raid.log", 4).unwrap();
        assert!(report.truncated);
        assert_eq!(report.attribution.len(), 2);
    }

    #[test]
    fn engine_failure_propagates() {
        let failed = Canned(QueryResponse {
            code: Some(4),
            stdout: Vec::new(),
            stderr: b"Missing required --input <path|- >\n".to_vec(),
        });
        let err = resolve_with(&failed, "", 10).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn engine_diagnostic_is_reported_verbatim() {
        let failed = Canned(QueryResponse {
            code: Some(7),
            stdout: Vec::new(),
            stderr: b"boom: bad path".to_vec(),
        });
        let err = resolve_with(&failed, "missing.log", 10).unwrap_err();

        let mut stderr = Vec::new();
        let status = report_failure(&mut stderr, &err);

        assert_eq!(status, 7);
        assert_eq!(stderr, b"boom: bad path");
    }

    #[test]
    fn other_failures_report_their_causes() {
        let err = resolve(&options(Some(PathBuf::from("/nonexistent/rows.csv")), "")).unwrap_err();

        let mut stderr = Vec::new();
        let status = report_failure(&mut stderr, &err);

        let text = String::from_utf8(stderr).unwrap();
        assert_eq!(status, 1);
        assert!(text.starts_with("error: "), "{text}");
        assert!(text.contains("\n  caused by: "), "{text}");
    }

    #[test]
    fn exit_status_bounds() {
        assert_eq!(exit_status(0), 0);
        assert_eq!(exit_status(3), 3);
        assert_eq!(exit_status(255), 255);
        assert_eq!(exit_status(256), 1);
        assert_eq!(exit_status(-1), 1);
    }

    #[test]
    fn rows_file_skips_engine_command() {
        let path = std::env::temp_dir().join(format!("ownermap-cli-rows-{}.csv", std::process::id()));
        std::fs::write(&path, RESPONSE).unwrap();

        // The command line is invalid, so building a process engine would fail.
        let report = resolve(&options(Some(path.clone()), "")).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(report.attribution.len(), 2);
    }

    #[test]
    fn invalid_engine_command() {
        let err = resolve(&options(None, "engine 'unterminated")).unwrap_err();
        assert!(matches!(err, QueryError::InvalidCommand { .. }));
    }
}
