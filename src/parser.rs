//! Command validation: redirection placement and built-in arity.

use crate::ast::{BuiltIn, Command, CommandRequest, Redirection};
use crate::config::REDIRECT_OPERATOR;
use crate::error::{ShellError, ShellResult};
use crate::scanner::TokenSequence;

/// Which driver is asking. Only batch scripts know the `exit` built-in with
/// an arity check; an interactive `exit` is recognised on the raw line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Batch,
}

/// Validates a token sequence and classifies it.
///
/// Returns `Ok(None)` when there is nothing to run.
pub fn parse<'a>(tokens: &TokenSequence<'a>, mode: Mode) -> ShellResult<Option<Command<'a>>> {
    let Some(name) = tokens.first() else {
        return Ok(None);
    };

    let redirection = redirection(tokens)?;
    let args = match redirection {
        Some((operator, _)) => &tokens.as_slice()[..operator],
        None => tokens.as_slice(),
    };

    let command = match name {
        "cd" => Command::BuiltIn(cd(args)?),
        "exit" if mode == Mode::Batch => Command::BuiltIn(exit(tokens)?),
        _ => Command::External(CommandRequest {
            args: args.to_vec(),
            redirection: match redirection {
                Some((operator, Some(target))) => Some(Redirection { operator, target }),
                Some((_, None)) => {
                    return Err(ShellError::MalformedRedirect {
                        reason: "no target after `>`",
                        fatal: false,
                    })
                }
                None => None,
            },
        }),
    };

    tracing::debug!(?command, "parsed command");
    Ok(Some(command))
}

/// Finds the redirection operator and checks what surrounds it.
///
/// A missing target is not an error here; built-ins ignore the redirection
/// and only a program that would be spawned needs somewhere to write.
fn redirection<'a>(tokens: &TokenSequence<'a>) -> ShellResult<Option<(usize, Option<&'a str>)>> {
    let Some(operator) = tokens.position(REDIRECT_OPERATOR) else {
        return Ok(None);
    };

    if operator == 0 {
        return Err(ShellError::MalformedRedirect {
            reason: "no command before `>`",
            fatal: true,
        });
    }

    match &tokens.as_slice()[operator + 1..] {
        &[target] => Ok(Some((operator, Some(target)))),
        &[] => Ok(Some((operator, None))),
        _ => Err(ShellError::MalformedRedirect {
            reason: "more than one target after `>`",
            fatal: false,
        }),
    }
}

/// Parses a cd command.
fn cd<'a>(args: &[&'a str]) -> ShellResult<BuiltIn<'a>> {
    match args {
        &[_, path] => Ok(BuiltIn::Cd(path)),
        _ => Err(ShellError::BadArity {
            builtin: "cd",
            expected: 1,
            got: args.len().saturating_sub(1),
        }),
    }
}

/// Parses an exit command.
fn exit<'a>(tokens: &TokenSequence<'a>) -> ShellResult<BuiltIn<'a>> {
    match tokens.len() {
        1 => Ok(BuiltIn::Exit),
        len => Err(ShellError::BadArity {
            builtin: "exit",
            expected: 0,
            got: len - 1,
        }),
    }
}
