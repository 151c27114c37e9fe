//! Raw line reading (spec.md §4.3 step 1).
//!
//! Grounded on `examples/original_source/src/input.c`'s `get_line`: reads
//! lines bounded by a per-line byte maximum, strips a trailing CR and/or
//! LF, and reports whether the final line carried its own line terminator
//! (so generation can avoid adding a spurious trailing newline).

use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("input line exceeds the maximum of {0} bytes")]
    LineTooLong(usize),
    #[error("I/O error reading input: {0}")]
    Io(#[from] io::Error),
}

/// Default cap matching the original project's `MAX_LINE_LENGTH`.
pub const DEFAULT_MAX_LINE_BYTES: usize = 131_072;

/// Read every line of `reader`, stripping a trailing `\r\n`/`\n`/`\r`.
/// Returns the lines and whether the input ended with a line terminator.
pub fn read_raw_lines<R: BufRead>(
    mut reader: R,
    max_line_bytes: usize,
) -> Result<(Vec<String>, bool), ReadError> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    let mut final_newline = true;
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        if buf.len() > max_line_bytes {
            return Err(ReadError::LineTooLong(max_line_bytes));
        }
        let had_newline = buf.last() == Some(&b'\n');
        if had_newline {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        } else if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
        final_newline = had_newline;
    }
    Ok((lines, final_newline))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines_and_strips_crlf() {
        let data = b"hello\r\nworld\n".as_slice();
        let (lines, final_nl) = read_raw_lines(data, DEFAULT_MAX_LINE_BYTES).unwrap();
        assert_eq!(lines, vec!["hello", "world"]);
        assert!(final_nl);
    }

    #[test]
    fn reports_missing_final_newline() {
        let data = b"hello\nworld".as_slice();
        let (lines, final_nl) = read_raw_lines(data, DEFAULT_MAX_LINE_BYTES).unwrap();
        assert_eq!(lines, vec!["hello", "world"]);
        assert!(!final_nl);
    }

    #[test]
    fn empty_input_has_no_lines() {
        let data = b"".as_slice();
        let (lines, _) = read_raw_lines(data, DEFAULT_MAX_LINE_BYTES).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn rejects_too_long_line() {
        let data = vec![b'a'; 10];
        let err = read_raw_lines(data.as_slice(), 4);
        assert!(err.is_err());
    }
}
