//! Stage (1): preprocessing (§4.1).
//!
//! Erases document structure that would otherwise pollute extraction:
//! markdown headers, heading keywords (CHAPTER/PROLOGUE/EPILOGUE/PART/BOOK/
//! ACT/SCENE), and horizontal dividers. Every erased line is replaced by a
//! run of spaces of identical length so every downstream character offset
//! still lines up with the original document. Purely deterministic and
//! idempotent: running it twice on its own output is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(chapter|prologue|epilogue|part|book|act|scene)\b.*$")
        .expect("HEADING_KEYWORD regex must compile")
});

static MARKDOWN_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}[^\n]*$").expect("MARKDOWN_HEADER regex must compile"));

static DIVIDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([-=])\1{2,}\s*$").expect("DIVIDER regex must compile"));

/// Replaces a line that should be erased with spaces of the same character
/// length, preserving any trailing line terminator untouched.
fn blank_line(line: &str) -> String {
    line.chars().map(|_| ' ').collect()
}

fn should_erase(line: &str) -> bool {
    MARKDOWN_HEADER.is_match(line) || HEADING_KEYWORD.is_match(line) || DIVIDER.is_match(line)
}

/// Strips headings/dividers into offset-preserving blanks.
///
/// Output has exactly the same length (in characters) as `text`; only the
/// content of matched lines is replaced, never the line terminators between
/// them.
pub fn preprocess(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lines = text.split_inclusive('\n').peekable();
    while let Some(raw_line) = lines.next() {
        let (content, terminator) = match raw_line.strip_suffix('\n') {
            Some(content) => (content, "\n"),
            None => (raw_line, ""),
        };
        let content = if let Some(stripped) = content.strip_suffix('\r') {
            if should_erase(stripped) {
                out.push_str(&blank_line(stripped));
                out.push('\r');
                out.push_str(terminator);
                continue;
            }
            stripped
        } else {
            content
        };
        if should_erase(content) {
            out.push_str(&blank_line(content));
        } else {
            out.push_str(content);
        }
        out.push_str(terminator);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_length() {
        let text = "# Chapter One\nHarry woke up.\n----\nHe was cold.";
        let cleaned = preprocess(text);
        assert_eq!(cleaned.chars().count(), text.chars().count());
    }

    #[test]
    fn blanks_markdown_header() {
        let text = "## Prologue\nSomething happened.";
        let cleaned = preprocess(text);
        assert!(cleaned.starts_with("           \n"));
        assert!(cleaned.contains("Something happened."));
    }

    #[test]
    fn blanks_heading_keyword_line() {
        let text = "CHAPTER ONE\nHarry woke up.";
        let cleaned = preprocess(text);
        assert!(cleaned.lines().next().unwrap().trim().is_empty());
    }

    #[test]
    fn blanks_horizontal_divider() {
        let text = "Harry woke up.\n-----\nHe was cold.";
        let cleaned = preprocess(text);
        let lines: Vec<&str> = cleaned.lines().collect();
        assert!(lines[1].trim().is_empty());
    }

    #[test]
    fn leaves_ordinary_prose_untouched() {
        let text = "Harry visited Hogwarts and met Dumbledore.";
        assert_eq!(preprocess(text), text);
    }

    #[test]
    fn is_idempotent() {
        let text = "# Heading\nBody text.\n===\nMore body.";
        let once = preprocess(text);
        let twice = preprocess(&once);
        assert_eq!(once, twice);
    }
}
