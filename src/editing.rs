//! Module used to handle rustyline library.

use rustyline::completion::Candidate;
use rustyline::history::FileHistory;
use rustyline::{
    Completer, CompletionType, Config, Context, Editor, Helper, Highlighter, Hinter, Validator,
};
use std::path::PathBuf;
use trie_rs::{Trie, TrieBuilder};

use crate::system::executable_names;

/// Commands the shell handles itself.
const BUILT_INS: [&str; 2] = ["cd", "exit"];

pub fn create_editor(paths: &[PathBuf]) -> rustyline::Result<Editor<ShellHelper, FileHistory>> {
    let completer = ShellCompleter::new(paths);
    let helper = ShellHelper::new(completer);
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();
    let mut editor = Editor::with_config(config)?;
    editor.set_helper(Some(helper));
    Ok(editor)
}

#[derive(Helper, Completer, Hinter, Highlighter, Validator)]
pub struct ShellHelper {
    #[rustyline(Completer)]
    completer: ShellCompleter,
}

impl ShellHelper {
    fn new(completer: ShellCompleter) -> Self {
        Self { completer }
    }
}

/// Completes the command name from built-ins and executables on PATH.
pub struct ShellCompleter {
    trie: Trie<u8>,
}

impl ShellCompleter {
    fn new(paths: &[PathBuf]) -> Self {
        let mut trie_builder: TrieBuilder<u8> = TrieBuilder::new();
        for name in executable_names(paths) {
            trie_builder.push(name);
        }
        for built_in in BUILT_INS {
            trie_builder.push(built_in);
        }
        Self {
            trie: trie_builder.build(),
        }
    }

    /// Suffixes that extend `prefix` to a known command name.
    fn suffixes(&self, prefix: &str) -> Vec<String> {
        let mut suffixes: Vec<String> = self.trie.postfix_search(prefix).collect();
        suffixes.sort();
        suffixes.dedup();
        suffixes
    }
}

impl rustyline::completion::Completer for ShellCompleter {
    type Candidate = ShellCompletionCandidate;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<ShellCompletionCandidate>)> {
        let word = &line[..pos];

        // Only the command name is completed.
        if word.is_empty() || word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let completions = self
            .suffixes(word)
            .into_iter()
            .map(|completion| ShellCompletionCandidate::new(word, completion))
            .collect();

        Ok((pos, completions))
    }
}

pub struct ShellCompletionCandidate {
    display: String,
    replacement: String,
}

impl ShellCompletionCandidate {
    fn new(line: &str, completion: String) -> Self {
        let mut display = String::new();
        display.push_str(line);
        display.push_str(&completion);

        let mut replacement = completion;
        replacement.push(' ');

        Self {
            display,
            replacement,
        }
    }
}

impl Candidate for ShellCompletionCandidate {
    fn display(&self) -> &str {
        &self.display
    }

    fn replacement(&self) -> &str {
        &self.replacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_built_ins() {
        let completer = ShellCompleter::new(&[]);
        assert_eq!(completer.suffixes("ex"), vec![String::from("it")]);
        assert_eq!(completer.suffixes("c"), vec![String::from("d")]);
        assert!(completer.suffixes("zz").is_empty());
    }

    #[test]
    fn candidate_shows_whole_word_and_inserts_suffix() {
        let candidate = ShellCompletionCandidate::new("ex", String::from("it"));
        assert_eq!(candidate.display(), "exit");
        assert_eq!(candidate.replacement(), "it ");
    }
}
