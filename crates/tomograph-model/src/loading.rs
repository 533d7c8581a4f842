// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Text loader for tomography instances.
//!
//! The format is two lines of whitespace-separated unsigned integers: the
//! row targets on the first line, the column targets on the second. Blank
//! lines are skipped and, unless disabled, everything after a `#` is treated
//! as a comment. Anything following the second target line is ignored.
//!
//! ```raw
//! # 3x3, two ones per row and column
//! 2 2 2
//! 2 2 2
//! ```
//!
//! The parser accepts any `BufRead`, a file path, a raw reader, or a string
//! slice. Parsed targets go through `ProblemInstance::new`, so a loaded
//! instance is always valid.

use crate::instance::{InstanceError, ProblemInstance};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};
use thiserror::Error;

/// The error type for the loading process.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// An I/O error occurred while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The input ended before both target lines were read.
    #[error("unexpected end of input: expected a line of row targets and a line of column targets")]
    UnexpectedEof,
    /// A token is not a non-negative integer.
    #[error("line {line}: could not parse token '{token}' as a non-negative integer")]
    Parse { line: usize, token: String },
    /// The targets were read but do not form a valid instance.
    #[error("invalid instance: {0}")]
    Instance(#[from] InstanceError),
}

/// A configurable loader for the two-line target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLoader {
    comment_marker: Option<char>,
}

impl Default for InstanceLoader {
    fn default() -> Self {
        Self {
            comment_marker: Some('#'),
        }
    }
}

impl InstanceLoader {
    /// Creates a new `InstanceLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the character that starts a line comment, or `None` to treat
    /// every character as data.
    #[inline]
    pub fn comment_marker(mut self, marker: Option<char>) -> Self {
        self.comment_marker = marker;
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<ProblemInstance, LoaderError> {
        let mut target_lines: Vec<Vec<usize>> = Vec::with_capacity(2);

        for (index, line) in rdr.lines().enumerate() {
            let line = line?;
            let data = match self.comment_marker {
                Some(marker) => line.split(marker).next().unwrap_or_default(),
                None => line.as_str(),
            };

            if data.trim().is_empty() {
                continue;
            }

            target_lines.push(parse_targets(data, index + 1)?);
            if target_lines.len() == 2 {
                break;
            }
        }

        let mut lines = target_lines.into_iter();
        let (Some(row_targets), Some(column_targets)) = (lines.next(), lines.next()) else {
            return Err(LoaderError::UnexpectedEof);
        };

        Ok(ProblemInstance::new(row_targets, column_targets)?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<ProblemInstance, LoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<ProblemInstance, LoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<ProblemInstance, LoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// Parses one line of targets. `line` is 1-based and only used for errors.
fn parse_targets(data: &str, line: usize) -> Result<Vec<usize>, LoaderError> {
    data.split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|_| LoaderError::Parse {
                line,
                token: token.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RowIndex;

    #[test]
    fn test_loads_two_lines() {
        let inst = InstanceLoader::new().from_str("1 1\n1 1\n").unwrap();
        assert_eq!(inst.row_targets(), &[1, 1]);
        assert_eq!(inst.column_targets(), &[1, 1]);
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        const INPUT: &str = r#"
            # a 3x3 instance
            2 2 2    # rows

            2 2 2    # columns
            this trailing line is never read
        "#;
        let inst = InstanceLoader::new().from_str(INPUT).unwrap();
        assert_eq!(inst.num_rows(), 3);
        assert_eq!(inst.column_targets(), &[2, 2, 2]);
    }

    #[test]
    fn test_missing_second_line_is_eof() {
        let res = InstanceLoader::new().from_str("1 2 3\n");
        assert!(matches!(res, Err(LoaderError::UnexpectedEof)));

        let res = InstanceLoader::new().from_str("");
        assert!(matches!(res, Err(LoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_parse_error_reports_line_and_token() {
        let res = InstanceLoader::new().from_str("1 1\n1 x\n");
        match res {
            Err(LoaderError::Parse { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("expected parse error, got {:?}", other),
        }

        let res = InstanceLoader::new().from_str("-1\n1\n");
        assert!(matches!(res, Err(LoaderError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_invalid_instance_is_forwarded() {
        let res = InstanceLoader::new().from_str("5\n1 1\n");
        match res {
            Err(LoaderError::Instance(InstanceError::RowTargetExceedsWidth { row, .. })) => {
                assert_eq!(row, RowIndex::new(0));
            }
            other => panic!("expected instance error, got {:?}", other),
        }
    }

    #[test]
    fn test_comment_marker_can_be_disabled() {
        let res = InstanceLoader::new()
            .comment_marker(None)
            .from_str("1 # 1\n1\n");
        assert!(matches!(res, Err(LoaderError::Parse { token, .. }) if token == "#"));
    }
}
