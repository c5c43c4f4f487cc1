//! Line sources feeding the drivers.
//!
//! Every source hands out lines of at most a fixed number of bytes. A longer
//! physical line arrives in pieces, each of which is run as its own command.

use std::io::{self, BufRead, Cursor, Write};

use bytes::{BufMut, BytesMut};
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;

use crate::editing::ShellHelper;
use crate::error::ShellResult;

/// One raw line of input, trailing newline included when there was one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLine(String);

impl RawLine {
    pub fn new(text: impl Into<String>) -> RawLine {
        RawLine(text.into())
    }

    /// The full text as read.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The text without its line terminator.
    pub fn content(&self) -> &str {
        self.0.strip_suffix('\n').unwrap_or(&self.0)
    }
}

/// Supplies one raw line at a time until input is exhausted.
pub trait LineSource {
    /// Returns the next line, or `None` at end of input.
    fn next_line(&mut self) -> ShellResult<Option<RawLine>>;
}

/// Reads lines from any buffered reader, in pieces of at most `limit` bytes.
pub struct BoundedReader<R> {
    reader: R,
    limit: usize,
    buf: BytesMut,
}

impl<R: BufRead> BoundedReader<R> {
    pub fn new(reader: R, limit: usize) -> BoundedReader<R> {
        BoundedReader {
            reader,
            limit: limit.max(1),
            buf: BytesMut::with_capacity(limit),
        }
    }

    /// Reads through the next newline or until `limit` bytes are held.
    pub fn read_line(&mut self) -> io::Result<Option<RawLine>> {
        self.buf.clear();
        while self.buf.len() < self.limit {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }

            let room = self.limit - self.buf.len();
            let window = &available[..available.len().min(room)];
            let (take, done) = match window.iter().position(|&b| b == b'\n') {
                Some(newline) => (newline + 1, true),
                None => (window.len(), false),
            };
            self.buf.put_slice(&window[..take]);
            self.reader.consume(take);
            if done {
                break;
            }
        }

        if self.buf.is_empty() {
            return Ok(None);
        }
        let line = self.buf.split().freeze();
        Ok(Some(RawLine(String::from_utf8_lossy(&line).into_owned())))
    }
}

impl<R: BufRead> LineSource for BoundedReader<R> {
    fn next_line(&mut self) -> ShellResult<Option<RawLine>> {
        Ok(self.read_line()?)
    }
}

/// Writes a prompt before every read from a plain reader. Used when standard
/// input is not a terminal.
pub struct Prompted<R, W> {
    lines: BoundedReader<R>,
    prompt: String,
    out: W,
}

impl<R: BufRead, W: Write> Prompted<R, W> {
    pub fn new(reader: R, out: W, prompt: &str, limit: usize) -> Prompted<R, W> {
        Prompted {
            lines: BoundedReader::new(reader, limit),
            prompt: prompt.to_owned(),
            out,
        }
    }
}

impl<R: BufRead, W: Write> LineSource for Prompted<R, W> {
    fn next_line(&mut self) -> ShellResult<Option<RawLine>> {
        self.out.write_all(self.prompt.as_bytes())?;
        self.out.flush()?;
        Ok(self.lines.read_line()?)
    }
}

/// Reads lines through a rustyline editor.
///
/// Pieces of an overlong line are handed out before the editor is asked for
/// more, without a prompt in between.
pub struct EditorSource {
    editor: Editor<ShellHelper, FileHistory>,
    prompt: String,
    limit: usize,
    pending: Option<BoundedReader<Cursor<Vec<u8>>>>,
}

impl EditorSource {
    pub fn new(editor: Editor<ShellHelper, FileHistory>, prompt: &str, limit: usize) -> EditorSource {
        EditorSource {
            editor,
            prompt: prompt.to_owned(),
            limit,
            pending: None,
        }
    }

    fn next_piece(&mut self) -> Option<RawLine> {
        let pending = self.pending.as_mut()?;
        match pending.read_line() {
            Ok(Some(line)) => Some(line),
            _ => {
                self.pending = None;
                None
            }
        }
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self) -> ShellResult<Option<RawLine>> {
        if let Some(line) = self.next_piece() {
            return Ok(Some(line));
        }

        loop {
            match self.editor.readline(&self.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.editor.add_history_entry(line.as_str())?;
                    }
                    let mut bytes = line.into_bytes();
                    bytes.push(b'\n');
                    self.pending = Some(BoundedReader::new(Cursor::new(bytes), self.limit));
                    return Ok(self.next_piece());
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}
