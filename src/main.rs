use std::io;
use std::process::ExitCode;

use anyhow::anyhow;
use msh::config::{Settings, LOG_ENV};
use msh::error::report;
use msh::system::{describe, Context};
use msh::{driver, Invocation, ShellError, ShellResult};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    init_logging()?;

    match run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!("terminating: {e}");
            report(&mut io::stderr());
            Ok(exit_code(&e))
        }
    }
}

/// Installs a subscriber writing to standard error. Silent unless asked.
fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// Carries out one invocation of the shell.
fn run() -> ShellResult<()> {
    let invocation = Invocation::from_args(std::env::args_os())?;
    tracing::debug!(?invocation, "starting");

    let settings = Settings::default();
    match invocation {
        Invocation::Interactive => driver::interactive(Context::from_process()?, settings),
        Invocation::Exit => Ok(()),
        Invocation::CdRoot => {
            let mut context = Context::from_process()?;
            if let Err(e) = context.change_directory("/") {
                eprintln!("chdir: {}", describe(&e));
            }
            Ok(())
        }
        Invocation::Batch(path) => driver::batch(Context::from_process()?, settings, &path),
    }
}

fn exit_code(err: &ShellError) -> ExitCode {
    ExitCode::from(u8::try_from(err.exit_status()).unwrap_or(1))
}
