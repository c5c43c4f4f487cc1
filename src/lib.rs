//! msh, a minimal command interpreter.
//!
//! Lines are read from a prompt or a script, split on whitespace, checked for
//! a single `>` redirection and run as child processes one at a time. `cd`
//! and `exit` are handled by the shell itself.

pub mod ast;
pub mod cli;
pub mod config;
pub mod driver;
pub mod editing;
pub mod error;
pub mod executor;
pub mod input;
pub mod parser;
pub mod scanner;
pub mod system;

pub use cli::Invocation;
pub use driver::Session;
pub use error::{ShellError, ShellResult, ERROR_MESSAGE};
