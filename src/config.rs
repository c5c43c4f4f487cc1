//! Policy constants and runtime settings for the shell.

/// Largest line buffer, in bytes, including room for a terminator. Physical
/// lines longer than `MAX_COMMAND_SIZE - 1` bytes are delivered in pieces.
pub const MAX_COMMAND_SIZE: usize = 255;

/// Argument vector capacity, including room for the end marker. At most
/// `MAX_ARGS - 1` tokens are kept from a line.
pub const MAX_ARGS: usize = 32;

/// Prompt printed before every interactive read.
pub const PROMPT: &str = "msh> ";

/// The only redirection operator understood by the shell.
pub const REDIRECT_OPERATOR: &str = ">";

/// Permission bits used when a redirection target has to be created.
pub const REDIRECT_MODE: u32 = 0o666;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "MSH_LOG";

/// Runtime knobs shared by both drivers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Text written before each interactive read.
    pub prompt: String,

    /// Token capacity, including the end marker.
    pub max_args: usize,

    /// Line buffer size, including the terminator.
    pub max_command_size: usize,
}

impl Settings {
    /// Number of tokens a single line may produce.
    pub fn token_limit(&self) -> usize {
        self.max_args.saturating_sub(1)
    }

    /// Number of bytes a single raw line may hold.
    pub fn line_limit(&self) -> usize {
        self.max_command_size.saturating_sub(1).max(1)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            prompt: String::from(PROMPT),
            max_args: MAX_ARGS,
            max_command_size: MAX_COMMAND_SIZE,
        }
    }
}
