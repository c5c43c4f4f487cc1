//! Error types used by the parsing and execution pipeline.
//!
//! Every failure reaches the user as the same fixed message on standard
//! error. The variants only exist so that the shell and its tests can tell
//! causes apart.

use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

/// The one message ever shown to the user for a failure.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// How far a failure reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Only the current command is abandoned.
    Command,

    /// The whole session terminates.
    Session,

    /// The shell never got as far as reading a command.
    Startup,
}

/// Result type for the shell pipeline.
pub type ShellResult<T> = Result<T, ShellError>;

/// A failure somewhere between reading a line and reaping its child.
#[derive(Debug, Error)]
pub enum ShellError {
    /// `>` in the wrong place, or followed by more than one target.
    #[error("malformed redirection: {reason}")]
    MalformedRedirect { reason: &'static str, fatal: bool },

    /// A built-in was given the wrong number of arguments.
    #[error("{builtin}: expected {expected} argument(s), got {got}")]
    BadArity {
        builtin: &'static str,
        expected: usize,
        got: usize,
    },

    /// The redirection target could not be opened for writing.
    #[error("cannot open `{}`: {source}", path.display())]
    OpenFailed { path: PathBuf, source: io::Error },

    /// The program could not be found or executed.
    #[error("cannot execute `{program}`: {source}")]
    ExecFailed { program: String, source: io::Error },

    /// No child process could be created.
    #[error("cannot create child process: {0}")]
    ForkFailed(#[source] io::Error),

    /// The shell was invoked with operands it does not understand.
    #[error("invalid invocation: {reason}")]
    InvocationShape { reason: String, status: i32 },

    /// The batch script could not be opened.
    #[error("cannot open script `{}`: {source}", path.display())]
    BatchOpen { path: PathBuf, source: io::Error },

    /// A line empty of anything but the redirection operator, or of anything
    /// at all, in a batch script.
    #[error("invalid batch line")]
    InvalidLine,

    /// Reading input failed.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    /// The line editor failed.
    #[error("line editor failed: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl ShellError {
    /// Classifies the error by how much of the shell it takes down.
    pub fn severity(&self) -> Severity {
        match self {
            ShellError::MalformedRedirect { fatal: true, .. } => Severity::Session,
            ShellError::MalformedRedirect { fatal: false, .. } => Severity::Command,
            ShellError::BadArity { .. } => Severity::Session,
            ShellError::OpenFailed { .. } => Severity::Command,
            ShellError::ExecFailed { .. } => Severity::Command,
            ShellError::ForkFailed(_) => Severity::Session,
            ShellError::InvocationShape { .. } => Severity::Startup,
            ShellError::BatchOpen { .. } => Severity::Startup,
            ShellError::InvalidLine => Severity::Command,
            ShellError::Io(_) => Severity::Session,
            ShellError::Readline(_) => Severity::Session,
        }
    }

    /// Process status to terminate with when this error ends the shell.
    pub fn exit_status(&self) -> i32 {
        match self {
            ShellError::InvocationShape { status, .. } => *status,
            ShellError::BatchOpen { .. } => 1,
            _ => 0,
        }
    }

    /// Whether the session survives this error.
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Command
    }
}

/// Writes the uniform error message. Failing to write it is ignored, there is
/// nowhere left to report to.
pub fn report(out: &mut dyn Write) {
    let _ = out.write_all(ERROR_MESSAGE.as_bytes());
    let _ = out.flush();
}
