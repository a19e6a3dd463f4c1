use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

/// Exit code for a missing or malformed argument.
pub const USAGE_EXIT_CODE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "resolve-ownership")]
#[command(about = "Map pets, guardians and other minions to the players that own them")]
#[command(version)]
pub struct Args {
    /// Combat log handed to the query engine
    pub log_source: String,

    /// Maximum number of damage rows to fetch (defaults to the configured limit)
    #[arg(value_parser = parse_row_limit)]
    pub row_limit: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // Engine
    // ─────────────────────────────────────────────────────────────────────────
    /// Read a captured engine response instead of running the engine
    #[arg(long, value_name = "PATH")]
    pub rows_file: Option<PathBuf>,

    /// Engine command line, overriding the configured one
    #[arg(long, value_name = "COMMAND")]
    pub engine: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────
    /// Emit the table as a single JSON document
    #[arg(long)]
    pub json: bool,
}

/// Exit code for a failed parse, or `None` when clap only asked to print
/// help or version text.
pub fn usage_exit_code(err: &clap::Error) -> Option<u8> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        _ => Some(USAGE_EXIT_CODE),
    }
}

fn parse_row_limit(value: &str) -> Result<usize, String> {
    let limit: usize = value
        .parse()
        .map_err(|_| format!("row limit must be a positive integer, got {value:?}"))?;
    if limit == 0 {
        return Err("row limit must be at least 1".to_string());
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_source_only() {
        let args = Args::try_parse_from(["resolve-ownership", "raid.log"]).unwrap();
        assert_eq!(args.log_source, "raid.log");
        assert_eq!(args.row_limit, None);
        assert!(args.rows_file.is_none());
        assert!(!args.json);
    }

    #[test]
    fn explicit_row_limit() {
        let args = Args::try_parse_from(["resolve-ownership", "raid.log", "1000"]).unwrap();
        assert_eq!(args.row_limit, Some(1000));
    }

    #[test]
    fn missing_log_source_is_usage_error() {
        let err = Args::try_parse_from(["resolve-ownership"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn usage_errors_exit_with_usage_code() {
        let missing = Args::try_parse_from(["resolve-ownership"]).unwrap_err();
        assert_eq!(usage_exit_code(&missing), Some(USAGE_EXIT_CODE));

        let unknown = Args::try_parse_from(["resolve-ownership", "raid.log", "--bogus"]).unwrap_err();
        assert_eq!(usage_exit_code(&unknown), Some(1));
    }

    #[test]
    fn help_and_version_are_not_failures() {
        for flag in ["--help", "--version"] {
            let err = Args::try_parse_from(["resolve-ownership", flag]).unwrap_err();
            assert_eq!(usage_exit_code(&err), None, "{flag}");
        }
    }

    #[test]
    fn invalid_row_limits() {
        for limit in ["0", "1.5", "many"] {
            let err = Args::try_parse_from(["resolve-ownership", "raid.log", limit]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{limit}");
        }
    }

    #[test]
    fn engine_options() {
        let args = Args::try_parse_from([
            "resolve-ownership",
            "raid.log",
            "--rows-file",
            "rows.csv",
            "--engine",
            "node dist/cli.js",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.rows_file, Some(PathBuf::from("rows.csv")));
        assert_eq!(args.engine.as_deref(), Some("node dist/cli.js"));
        assert!(args.json);
    }
}
