//! Runs external programs, one at a time.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::process::{self, Stdio};

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::ast::CommandRequest;
use crate::config::REDIRECT_MODE;
use crate::error::{report, ShellError, ShellResult, ERROR_MESSAGE};
use crate::system::Context;

/// What to do about finished children the shell did not just spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrayPolicy {
    /// Reap every finished child without blocking.
    #[default]
    Reap,

    /// Leave them alone.
    Leave,
}

/// Spawns a child per command and blocks until it is gone.
#[derive(Clone, Copy, Debug, Default)]
pub struct Executor {
    strays: StrayPolicy,
}

impl Executor {
    pub fn new(strays: StrayPolicy) -> Executor {
        Executor { strays }
    }

    /// Runs `request` in the context's working directory and waits for it.
    ///
    /// The child's exit status is not inspected. A redirection target that
    /// cannot be opened is reported on `errors` and the program runs with the
    /// shell's own streams.
    pub fn execute(
        &self,
        context: &Context,
        request: &CommandRequest<'_>,
        errors: &mut dyn Write,
    ) -> ShellResult<()> {
        let mut command = process::Command::new(request.program());
        command.args(&request.args[1..]).current_dir(context.cwd());

        let sink = match request.target() {
            Some(target) => match redirect(&mut command, context, target) {
                Ok(sink) => Some(sink),
                Err(e) => {
                    tracing::warn!("{e}");
                    report(errors);
                    None
                }
            },
            None => None,
        };

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) if is_exhaustion(&source) => return Err(ShellError::ForkFailed(source)),
            Err(source) => {
                let err = ShellError::ExecFailed {
                    program: request.program().to_owned(),
                    source,
                };
                // The child would have reported after its streams moved.
                return match sink {
                    Some(mut file) => {
                        tracing::warn!("{err}");
                        file.write_all(ERROR_MESSAGE.as_bytes())?;
                        Ok(())
                    }
                    None => Err(err),
                };
            }
        };
        drop(sink);
        drop(command);

        tracing::debug!(pid = child.id(), program = request.program(), "spawned child");
        let status = child.wait()?;
        tracing::debug!(pid = child.id(), %status, "reaped child");

        if self.strays == StrayPolicy::Reap {
            reap_strays();
        }
        Ok(())
    }
}

/// Opens the redirection target and points both output streams at it.
///
/// Returns a handle on the file for reporting failures after the streams
/// have been handed over.
fn redirect(command: &mut process::Command, context: &Context, target: &str) -> ShellResult<File> {
    let path = context.resolve(target);
    let open_failed = |source| ShellError::OpenFailed {
        path: path.clone(),
        source,
    };

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(REDIRECT_MODE)
        .open(&path)
        .map_err(open_failed)?;
    let stdout = file.try_clone().map_err(open_failed)?;
    let stderr = file.try_clone().map_err(open_failed)?;
    command.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
    Ok(file)
}

/// Reaps any other finished children without blocking.
fn reap_strays() {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => return,
            Ok(status) => tracing::debug!(?status, "reaped stray child"),
            Err(Errno::EINTR) => continue,
            Err(e) => {
                tracing::debug!("stray reap failed: {e}");
                return;
            }
        }
    }
}

/// Whether a spawn failed because no process could be created at all.
fn is_exhaustion(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error().map(Errno::from_raw),
        Some(Errno::EAGAIN | Errno::ENOMEM)
    )
}
