use std::io;
use std::process::ExitCode;

use clap::Parser;

use ownermap_cli::args::usage_exit_code;
use ownermap_cli::commands::{self, ResolveOptions};
use ownermap_cli::output::{self, OutputFormat};
use ownermap_cli::{Args, logging};
use ownermap_core::context::{AppConfig, AppConfigExt, EngineConfig};
use ownermap_core::query::GENERIC_FAILURE_CODE;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let Some(code) = usage_exit_code(&err) else {
                err.exit();
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    let _log_guard = logging::init();
    let config = AppConfig::load();

    let engine = match &args.engine {
        Some(command) => EngineConfig {
            command: command.clone(),
            ..config.engine.clone()
        },
        None => config.engine.clone(),
    };
    let options = ResolveOptions {
        log_source: args.log_source.clone(),
        limit: config.row_limit(args.row_limit),
        rows_file: args.rows_file.clone(),
        engine,
    };
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Lines
    };

    let report = match commands::resolve(&options) {
        Ok(report) => report,
        Err(err) => {
            let status = commands::report_failure(&mut io::stderr().lock(), &err);
            return ExitCode::from(status);
        }
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    if let Err(err) = output::write_report(&mut stdout.lock(), &mut stderr.lock(), &report, format) {
        tracing::error!(error = %err, "Failed to write report");
        return ExitCode::from(commands::exit_status(GENERIC_FAILURE_CODE));
    }

    ExitCode::SUCCESS
}
