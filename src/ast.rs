//! Validated command types.

/// Where `>` sits in a line and which file it names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirection<'a> {
    /// Index of the operator token.
    pub operator: usize,

    /// The single token following the operator.
    pub target: &'a str,
}

/// An argument vector ready for process creation, redirection tokens removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRequest<'a> {
    /// Program name followed by its arguments. Never empty.
    pub args: Vec<&'a str>,

    /// File receiving both standard output and standard error.
    pub redirection: Option<Redirection<'a>>,
}

impl<'a> CommandRequest<'a> {
    /// The program to run.
    pub fn program(&self) -> &'a str {
        self.args[0]
    }

    /// Path of the redirection target, if any.
    pub fn target(&self) -> Option<&'a str> {
        self.redirection.as_ref().map(|r| r.target)
    }
}

/// A command the shell interprets itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuiltIn<'a> {
    /// Changes the working directory to a given path.
    Cd(&'a str),

    /// Ends the session cleanly.
    Exit,
}

/// A shell command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    BuiltIn(BuiltIn<'a>),
    External(CommandRequest<'a>),
}
