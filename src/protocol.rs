//! Line-oriented query protocol.
//!
//! Each input line is blank, a `#` comment, or `width length`. Every query is
//! answered with the line itself followed by `# <count>`.

use std::io::{BufRead, Write};

use log::info;

use crate::error::ProtocolError;
use crate::tiling::{result_with, SearchOptions};

/// A parsed `width length` query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Query<'a> {
    pub width: usize,
    pub length: usize,
    /// The trimmed input line, echoed back in the answer.
    pub line: &'a str,
}

/// Parses one input line; `Ok(None)` for blank and comment lines.
pub fn parse_line(line_number: usize, raw: &str) -> Result<Option<Query<'_>>, ProtocolError> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let &[width, length] = tokens.as_slice() else {
        return Err(ProtocolError::MalformedLine {
            line_number,
            line: line.to_string(),
        });
    };

    let dimension = |token: &str| {
        token
            .parse::<usize>()
            .map_err(|source| ProtocolError::InvalidDimension {
                line_number,
                token: token.to_string(),
                source,
            })
    };

    Ok(Some(Query {
        width: dimension(width)?,
        length: dimension(length)?,
        line,
    }))
}

/// Answers every query read from `input`, writing to `output`.
///
/// Returns the number of queries answered. Stops at the first malformed
/// line.
pub fn answer<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    options: SearchOptions,
) -> Result<usize, ProtocolError> {
    let mut answered = 0;

    for (index, raw) in input.lines().enumerate() {
        let raw = raw?;
        let line_number = index + 1;
        let Some(query) = parse_line(line_number, &raw)? else {
            continue;
        };

        info!("counting tilings of {}x{}", query.width, query.length);
        let count = result_with(query.width, query.length, options)
            .map_err(|source| ProtocolError::Tiling {
                line_number,
                source,
            })?;

        writeln!(output, "{}", query.line)?;
        writeln!(output, "# {count}")?;
        answered += 1;
    }

    output.flush()?;
    Ok(answered)
}
