//! Line-buffered input collaborators.
//!
//! The loader consumes a [`LineReader`] rather than a path so the same entry
//! point works for files and in-memory text. Implementations strip line
//! endings (LF and CRLF) before delivery and count lines 1-based.
//!
//! DBC files are 8-bit CANdb++ exports; [`FileLineReader`] decodes the raw
//! bytes as WINDOWS-1252 up front so umlauts in units and comments survive
//! into the model as valid text.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use encoding_rs::WINDOWS_1252;

/// Line-at-a-time input source.
pub trait LineReader {
    /// Reads the next line into `line` (cleared first, ending stripped).
    /// Returns `false` once the input is exhausted.
    fn read_line(&mut self, line: &mut String) -> bool;

    /// Number of the line most recently returned (1-based, 0 before the
    /// first read).
    fn line_number(&self) -> usize;
}

/// Reads a file through an internally buffered handle, one raw line at a
/// time, decoding each as WINDOWS-1252.
pub struct FileLineReader {
    reader: BufReader<File>,
    buf: Vec<u8>,
    line_number: usize,
    error: Option<io::Error>,
}

impl FileLineReader {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(FileLineReader {
            reader: BufReader::new(File::open(path)?),
            buf: Vec::new(),
            line_number: 0,
            error: None,
        })
    }

    /// I/O failure hit while reading, if any. A failure ends the line stream
    /// early (`read_line` returns `false`); callers that care check here
    /// after draining.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl LineReader for FileLineReader {
    fn read_line(&mut self, line: &mut String) -> bool {
        if self.error.is_some() {
            return false;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => false,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                let (text, _, _) = WINDOWS_1252.decode(&self.buf);
                line.clear();
                line.push_str(&text);
                self.line_number += 1;
                true
            }
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }

    fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Serves lines from an in-memory string.
pub struct StringLineReader {
    input: Vec<char>,
    position: usize,
    line_number: usize,
}

impl StringLineReader {
    pub fn new(input: impl Into<String>) -> Self {
        StringLineReader {
            input: input.into().chars().collect(),
            position: 0,
            line_number: 0,
        }
    }
}

impl LineReader for StringLineReader {
    fn read_line(&mut self, line: &mut String) -> bool {
        if self.position >= self.input.len() {
            return false;
        }

        line.clear();
        while self.position < self.input.len() {
            let ch = self.input[self.position];
            self.position += 1;
            match ch {
                '\n' => {
                    self.line_number += 1;
                    return true;
                }
                '\r' => {
                    if self.input.get(self.position) == Some(&'\n') {
                        self.position += 1;
                    }
                    self.line_number += 1;
                    return true;
                }
                _ => line.push(ch),
            }
        }

        // Last line without a trailing newline.
        self.line_number += 1;
        true
    }

    fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Drains a reader back into one LF-joined buffer for the parser.
pub(crate) fn read_all(reader: &mut dyn LineReader) -> String {
    let mut content = String::new();
    let mut line = String::new();
    while reader.read_line(&mut line) {
        content.push_str(&line);
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lf_and_crlf_lines() {
        let mut reader = StringLineReader::new("first\r\nsecond\nthird");
        let mut line = String::new();

        assert!(reader.read_line(&mut line));
        assert_eq!(line, "first");
        assert_eq!(reader.line_number(), 1);

        assert!(reader.read_line(&mut line));
        assert_eq!(line, "second");

        assert!(reader.read_line(&mut line));
        assert_eq!(line, "third");
        assert_eq!(reader.line_number(), 3);

        assert!(!reader.read_line(&mut line));
    }

    #[test]
    fn empty_input() {
        let mut reader = StringLineReader::new("");
        let mut line = String::new();
        assert!(!reader.read_line(&mut line));
        assert_eq!(reader.line_number(), 0);
    }

    #[test]
    fn blank_lines_are_delivered() {
        let mut reader = StringLineReader::new("a\n\nb\n");
        let mut line = String::new();
        assert!(reader.read_line(&mut line));
        assert!(reader.read_line(&mut line));
        assert_eq!(line, "");
        assert!(reader.read_line(&mut line));
        assert_eq!(line, "b");
        assert!(!reader.read_line(&mut line));
    }

    #[test]
    fn read_all_joins_with_lf() {
        let mut reader = StringLineReader::new("a\r\nb");
        assert_eq!(read_all(&mut reader), "a\nb\n");
    }

    #[test]
    fn file_reader_decodes_windows_1252() {
        let path = std::env::temp_dir().join("can_network_reader_test.dbc");
        // 0xB0 is the degree sign in Windows-1252 and invalid UTF-8.
        std::fs::write(&path, b"unit \xB0C\r\nnext\n").unwrap();

        let mut reader = FileLineReader::open(&path).unwrap();
        let mut line = String::new();
        assert!(reader.read_line(&mut line));
        assert_eq!(line, "unit °C");
        assert!(reader.read_line(&mut line));
        assert_eq!(line, "next");
        assert!(!reader.read_line(&mut line));
        assert!(reader.take_error().is_none());

        std::fs::remove_file(&path).ok();
    }
}
