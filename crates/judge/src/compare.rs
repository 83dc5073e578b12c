//! Stream-IO output comparison.
//!
//! Outputs pass when they are equal after trimming. On a mismatch the first
//! differing line is reported together with the input line(s) that produced
//! it, so submitters can see which case they got wrong.

use tracing::debug;

/// How input lines map onto expected-output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMapping {
    /// One input line per output line.
    OneToOne,
    /// `size` contiguous input lines per output line.
    Block { size: usize },
    /// A leading count/header line, then `size` input lines per output line.
    HeaderBlock { size: usize },
    /// No policy fits; the corresponding input is reported empty.
    Unmapped,
}

impl InputMapping {
    /// Tries the policies in order: 1:1, N:1, N:1 after a header line.
    pub fn resolve(input_lines: usize, expected_lines: usize) -> Self {
        if expected_lines == 0 || input_lines == 0 {
            return InputMapping::Unmapped;
        }
        if input_lines == expected_lines {
            return InputMapping::OneToOne;
        }
        if input_lines % expected_lines == 0 {
            return InputMapping::Block {
                size: input_lines / expected_lines,
            };
        }
        if input_lines > 1 && (input_lines - 1) % expected_lines == 0 {
            return InputMapping::HeaderBlock {
                size: (input_lines - 1) / expected_lines,
            };
        }
        InputMapping::Unmapped
    }

    /// Input lines that produced expected line `index`.
    pub fn slice<'a>(&self, input_lines: &[&'a str], index: usize) -> Vec<&'a str> {
        let range = match *self {
            InputMapping::OneToOne => index..index + 1,
            InputMapping::Block { size } => index * size..(index + 1) * size,
            InputMapping::HeaderBlock { size } => 1 + index * size..1 + (index + 1) * size,
            InputMapping::Unmapped => return Vec::new(),
        };
        input_lines.get(range).map(<[_]>::to_vec).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub input: String,
    /// 0-based index of the first mismatching line.
    pub mismatch_line: Option<usize>,
    pub mapping: Option<InputMapping>,
}

pub fn compare(actual: &str, expected: &str, input: &str) -> Comparison {
    let actual_trimmed = actual.trim();
    let expected_trimmed = expected.trim();

    if actual_trimmed == expected_trimmed {
        return Comparison {
            passed: true,
            expected: expected.to_string(),
            actual: actual.to_string(),
            input: input.to_string(),
            mismatch_line: None,
            mapping: None,
        };
    }

    let actual_lines: Vec<&str> = actual_trimmed.lines().collect();
    let expected_lines: Vec<&str> = expected_trimmed.lines().collect();
    // Leading blank input lines are real lines; only the final newline goes.
    let input_lines: Vec<&str> = input.trim_end_matches(['\r', '\n']).lines().collect();
    let line_count = actual_lines.len().max(expected_lines.len());

    for index in 0..line_count {
        let actual_line = actual_lines.get(index).copied().unwrap_or("").trim();
        let expected_line = expected_lines.get(index).copied().unwrap_or("").trim();
        if actual_line == expected_line {
            continue;
        }

        let mapping = InputMapping::resolve(input_lines.len(), expected_lines.len());
        if mapping == InputMapping::Unmapped {
            debug!(
                input_lines = input_lines.len(),
                expected_lines = expected_lines.len(),
                "no input mapping fits; reporting empty input"
            );
        }

        return Comparison {
            passed: false,
            expected: expected_line.to_string(),
            actual: actual_line.to_string(),
            input: mapping.slice(&input_lines, index).join("\n"),
            mismatch_line: Some(index),
            mapping: Some(mapping),
        };
    }

    // Only whitespace inside lines differs; still a failure, shown in full.
    Comparison {
        passed: false,
        expected: expected.to_string(),
        actual: actual.to_string(),
        input: input.to_string(),
        mismatch_line: None,
        mapping: None,
    }
}
