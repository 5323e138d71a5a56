//! Tokenizer: splits a CEF line into header tokens and extension pairs.
//!
//! Escapes are recognised but never removed here: `\|` and `\=` reach the
//! coercion layer exactly as they appeared on the wire.

use super::model::ParseError;

/// Number of positional header fields.
pub const HEADER_SIZE: usize = 7;

/// Header tokens plus the raw extension blob that follows the seventh `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    pub header: [&'a str; HEADER_SIZE],
    pub extension: &'a str,
}

/// Split a line on unescaped `|` into seven header fields and the extension blob.
///
/// A backslash escapes the character after it, so `\|` stays inside the
/// field while `\\|` ends it. Lines with exactly seven fields get an empty
/// extension blob.
pub fn split_header(line: &str) -> Result<Tokens<'_>, ParseError> {
    let mut pieces: Vec<&str> = Vec::with_capacity(HEADER_SIZE);
    let mut start = 0;
    let mut escaped = false;

    for (idx, b) in line.bytes().enumerate() {
        if pieces.len() == HEADER_SIZE {
            break;
        }
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'|' => {
                pieces.push(&line[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    let extension = if pieces.len() == HEADER_SIZE {
        &line[start..]
    } else {
        pieces.push(&line[start..]);
        ""
    };

    let header: [&str; HEADER_SIZE] = pieces.try_into().map_err(|p: Vec<&str>| {
        ParseError::MalformedHeader(format!(
            "expected {} header fields, found {}",
            HEADER_SIZE,
            p.len()
        ))
    })?;

    Ok(Tokens { header, extension })
}

/// Version digit from the last character of the first header token (`CEF:0` → 0).
pub fn parse_version(token: &str) -> Result<i32, ParseError> {
    token
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as i32)
        .ok_or_else(|| ParseError::MalformedHeader(format!("invalid version token {:?}", token)))
}

/// Split an extension blob into ordered `(key, value)` pairs.
///
/// An `=` not directly preceded by `\` separates a key from its value. Values
/// may contain spaces, so a value ends at the last space before the next
/// separator. When no space lies between a value's start and the next
/// separator (`url=a?b=c`), that separator belongs to the value and the scan
/// moves on to the following one. Spaces inside keys are dropped and pairs
/// with an empty key are skipped.
pub fn split_extensions(blob: &str) -> Vec<(String, &str)> {
    let bytes = blob.as_bytes();
    let separators: Vec<usize> = bytes
        .iter()
        .enumerate()
        .filter(|&(idx, &b)| b == b'=' && (idx == 0 || bytes[idx - 1] != b'\\'))
        .map(|(idx, _)| idx)
        .collect();

    let mut pairs = Vec::new();
    let mut cursor = 0;
    let mut current = 0;

    while current < separators.len() {
        let eq = separators[current];
        let key: String = blob[cursor..eq].chars().filter(|c| *c != ' ').collect();
        let value_start = eq + 1;

        let mut next = current + 1;
        let mut value_end = None;
        while next < separators.len() {
            if let Some(space) = blob[value_start..separators[next]].rfind(' ') {
                value_end = Some(value_start + space);
                break;
            }
            next += 1;
        }

        let value = match value_end {
            Some(end) => {
                cursor = end + 1;
                &blob[value_start..end]
            }
            None => {
                cursor = blob.len();
                blob[value_start..].trim_end_matches(['\r', '\n'])
            }
        };

        if !key.is_empty() {
            pairs.push((key, value));
        }
        current = next;
    }

    pairs
}
