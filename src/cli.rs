//! Command line operands and what they ask the shell to do.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{ShellError, ShellResult};

/// msh - a minimal command interpreter
#[derive(Parser, Debug)]
#[command(
    name = "msh",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// `exit`, `cd`, or a script to run
    #[arg(num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
    operands: Vec<String>,
}

/// What a single invocation of the shell does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// Read commands from standard input.
    Interactive,

    /// Terminate at once.
    Exit,

    /// Change to the filesystem root and return.
    CdRoot,

    /// Read commands from the script at the given path.
    Batch(PathBuf),
}

impl Invocation {
    /// Classifies the full argument vector, program name included.
    pub fn from_args<I, T>(args: I) -> ShellResult<Invocation>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut args = args.into_iter().peekable();
        if args.peek().is_none() {
            return Err(ShellError::InvocationShape {
                reason: String::from("no program name"),
                status: 0,
            });
        }

        let parsed = Args::try_parse_from(args).map_err(|e| ShellError::InvocationShape {
            reason: e.to_string().trim_end().to_owned(),
            status: 1,
        })?;
        Invocation::from_operands(parsed.operands)
    }

    /// Classifies the operands that follow the program name.
    pub fn from_operands(operands: Vec<String>) -> ShellResult<Invocation> {
        match operands.as_slice() {
            [] => Ok(Invocation::Interactive),
            [word] if word == "exit" => Ok(Invocation::Exit),
            [word] if word == "cd" => Ok(Invocation::CdRoot),
            [path] => Ok(Invocation::Batch(PathBuf::from(path))),
            _ => Err(ShellError::InvocationShape {
                reason: format!("expected at most one operand, got {}", operands.len()),
                status: 1,
            }),
        }
    }
}
