//! Interactive and batch command loops.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Write};
use std::path::Path;

use crate::ast::{BuiltIn, Command};
use crate::config::{Settings, REDIRECT_OPERATOR};
use crate::editing::create_editor;
use crate::error::{report, ShellError, ShellResult};
use crate::executor::Executor;
use crate::input::{BoundedReader, EditorSource, LineSource, Prompted, RawLine};
use crate::parser::{parse, Mode};
use crate::scanner::tokenize;
use crate::system::{describe, get_path, Context};

/// Whether the loop keeps going after a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// State carried from one command to the next.
pub struct Session<E> {
    context: Context,
    executor: Executor,
    settings: Settings,
    errors: E,
}

impl<E: Write> Session<E> {
    pub fn new(context: Context, settings: Settings, errors: E) -> Session<E> {
        Session {
            context,
            executor: Executor::default(),
            settings,
            errors,
        }
    }

    /// Replaces the executor, e.g. to change how stray children are handled.
    pub fn with_executor(mut self, executor: Executor) -> Session<E> {
        self.executor = executor;
        self
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Runs lines until end of input or an `exit` line.
    ///
    /// Returns an error only when it ends the session.
    pub fn run_interactive(&mut self, source: &mut dyn LineSource) -> ShellResult<()> {
        while let Some(line) = source.next_line()? {
            // A final `exit` without its newline is not the built-in.
            if line.as_str() == "exit\n" {
                break;
            }
            if line.as_str() == "\n" {
                continue;
            }
            self.dispatch(&line, Mode::Interactive)?;
        }
        Ok(())
    }

    /// Runs every line of a script until its end or an `exit` line.
    ///
    /// Returns an error only when it ends the session.
    pub fn run_batch(&mut self, source: &mut dyn LineSource) -> ShellResult<()> {
        while let Some(line) = source.next_line()? {
            let content = line.content();
            if content.is_empty() || content == REDIRECT_OPERATOR {
                tracing::warn!(line = content, "{}", ShellError::InvalidLine);
                report(&mut self.errors);
                continue;
            }
            if self.dispatch(&line, Mode::Batch)? == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Tokenizes, validates and runs a single line.
    pub fn dispatch(&mut self, line: &RawLine, mode: Mode) -> ShellResult<Flow> {
        let tokens = tokenize(line.as_str(), self.settings.token_limit());
        let result = match parse(&tokens, mode) {
            Ok(Some(command)) => self.run(command),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => Err(e),
        };

        match result {
            Err(e) if e.is_recoverable() => {
                tracing::warn!("{e}");
                report(&mut self.errors);
                Ok(Flow::Continue)
            }
            other => other,
        }
    }

    fn run(&mut self, command: Command<'_>) -> ShellResult<Flow> {
        match command {
            Command::BuiltIn(BuiltIn::Cd(path)) => {
                if let Err(e) = self.context.change_directory(path) {
                    let _ = writeln!(self.errors, "chdir: {}", describe(&e));
                }
                Ok(Flow::Continue)
            }
            Command::BuiltIn(BuiltIn::Exit) => Ok(Flow::Exit),
            Command::External(request) => {
                self.executor
                    .execute(&self.context, &request, &mut self.errors)?;
                Ok(Flow::Continue)
            }
        }
    }
}

/// Runs the interactive loop on standard input.
///
/// A terminal gets a line editor; anything else gets the prompt on standard
/// output and plain reads.
pub fn interactive(context: Context, settings: Settings) -> ShellResult<()> {
    let limit = settings.line_limit();
    let prompt = settings.prompt.clone();
    let mut session = Session::new(context, settings, io::stderr());

    if io::stdin().is_terminal() {
        let editor = create_editor(&get_path())?;
        let mut source = EditorSource::new(editor, &prompt, limit);
        session.run_interactive(&mut source)
    } else {
        let mut source = Prompted::new(io::stdin().lock(), io::stdout(), &prompt, limit);
        session.run_interactive(&mut source)
    }
}

/// Runs the batch loop over the script at `path`.
pub fn batch(context: Context, settings: Settings, path: &Path) -> ShellResult<()> {
    let file = File::open(path).map_err(|source| ShellError::BatchOpen {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(script = %path.display(), "running batch script");

    let mut source = BoundedReader::new(BufReader::new(file), settings.line_limit());
    let mut session = Session::new(context, settings, io::stderr());
    session.run_batch(&mut source)
}
