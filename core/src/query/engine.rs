use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use encoding_rs::UTF_8;
use ownermap_types::EngineConfig;

use super::{QueryError, QueryRequest};

/// Anything that can answer a [`QueryRequest`] with a tabular payload.
pub trait QueryEngine {
    fn run(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError>;
}

/// Completed query: exit code plus both captured output channels.
#[derive(Debug, Clone, Default)]
pub struct QueryResponse {
    /// `None` when the engine was terminated without an exit code.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl QueryResponse {
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Tabular payload as text. Strips a byte-order mark and replaces invalid
    /// UTF-8.
    pub fn stdout_text(&self) -> Cow<'_, str> {
        UTF_8.decode(&self.stdout).0
    }

    /// The engine's own error text: stderr, or stdout when stderr is empty.
    pub fn diagnostic(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout_text().into_owned()
        } else {
            UTF_8.decode(&self.stderr).0.into_owned()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Process Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Runs the query engine as a child process, one process per query.
///
/// The caller blocks until the child exits; stdout and stderr are fully
/// captured and the child is reaped before `run` returns.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessEngine {
    pub fn from_config(config: &EngineConfig) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidCommand {
            command: config.command.clone(),
        };
        let mut parts = shlex::split(&config.command).ok_or_else(invalid)?;
        if parts.is_empty() {
            return Err(invalid());
        }
        let program = parts.remove(0);

        Ok(Self {
            program,
            args: parts,
            working_dir: config.working_dir.as_ref().map(PathBuf::from),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl QueryEngine for ProcessEngine {
    fn run(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .args(request.to_args())
            .stdin(Stdio::null());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::info!(
            program = %self.program,
            input = %request.input,
            limit = request.limit,
            "Querying combat log engine"
        );

        let output = command.output().map_err(|source| QueryError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        tracing::debug!(
            code = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Query engine exited"
        );

        Ok(QueryResponse {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Captured Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Replays a tabular response saved from an earlier engine run.
#[derive(Debug, Clone)]
pub struct CapturedEngine {
    path: PathBuf,
}

impl CapturedEngine {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl QueryEngine for CapturedEngine {
    fn run(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        tracing::info!(
            path = %self.path.display(),
            input = %request.input,
            "Reading captured query response"
        );
        let stdout = std::fs::read(&self.path).map_err(|source| QueryError::ReadCapture {
            path: self.path.clone(),
            source,
        })?;
        Ok(QueryResponse::success(stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(command: &str) -> ProcessEngine {
        ProcessEngine::from_config(&EngineConfig::with_command(command)).unwrap()
    }

    #[test]
    fn command_line_is_split_shell_style() {
        let engine = engine("npm run -s cli --");
        assert_eq!(engine.program(), "npm");
        assert_eq!(engine.args(), ["run", "-s", "cli", "--"]);

        let engine = ProcessEngine::from_config(&EngineConfig::with_command(
            "'/opt/log tools/engine' --quiet",
        ))
        .unwrap();
        assert_eq!(engine.program(), "/opt/log tools/engine");
        assert_eq!(engine.args(), ["--quiet"]);
    }

    #[test]
    fn invalid_command_lines() {
        for command in ["", "   ", "engine 'unterminated"] {
            let err = ProcessEngine::from_config(&EngineConfig::with_command(command)).unwrap_err();
            assert!(matches!(err, QueryError::InvalidCommand { .. }), "{command:?}");
        }
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let engine = engine("/nonexistent/ownermap-test-engine");
        let err = engine
            .run(&QueryRequest::ownership("raid.log", 10))
            .unwrap_err();
        assert!(matches!(err, QueryError::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn query_arguments_are_appended() {
        let engine = engine(r#"sh -c 'printf "%s\n" "$@"' engine"#);
        let response = engine
            .run(&QueryRequest::ownership("raid.log", 10))
            .unwrap();

        assert!(response.is_success());
        let text = response.stdout_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[..4], ["events", "search", "--input", "raid.log"]);
        assert_eq!(lines[6..8], ["--limit", "10"]);
        assert_eq!(lines.last(), Some(&"csv"));
    }

    #[cfg(unix)]
    #[test]
    fn failure_keeps_code_and_stderr() {
        let engine = engine(r#"sh -c 'echo "ENOENT: no such file" >&2; exit 3'"#);
        let response = engine
            .run(&QueryRequest::ownership("missing.log", 10))
            .unwrap();

        assert!(!response.is_success());
        assert_eq!(response.code, Some(3));
        assert_eq!(response.diagnostic(), "ENOENT: no such file\n");
    }

    #[test]
    fn diagnostic_falls_back_to_stdout() {
        let response = QueryResponse {
            code: Some(1),
            stdout: b"Missing required --input <path|- >\n".to_vec(),
            stderr: Vec::new(),
        };
        assert_eq!(response.diagnostic(), "Missing required --input <path|- >\n");
    }

    #[test]
    fn whitespace_stderr_is_still_the_diagnostic() {
        let response = QueryResponse {
            code: Some(2),
            stdout: b"partial output\n".to_vec(),
            stderr: b"\n".to_vec(),
        };
        assert_eq!(response.diagnostic(), "\n");
    }

    #[test]
    fn stdout_text_strips_bom() {
        let response = QueryResponse::success(b"\xEF\xBB\xBFsource\n".to_vec());
        assert_eq!(response.stdout_text(), "source\n");
    }

    #[test]
    fn captured_engine_missing_file() {
        let engine = CapturedEngine::new("/nonexistent/rows.csv");
        let err = engine
            .run(&QueryRequest::ownership("raid.log", 10))
            .unwrap_err();
        assert!(matches!(err, QueryError::ReadCapture { .. }));
    }
}
