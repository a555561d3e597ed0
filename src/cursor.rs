use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|[\r\n]").unwrap());

/// A non-empty, trimmed line and where it sits in the input (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn tokens(&self) -> std::str::SplitWhitespace<'a> {
        self.text.split_whitespace()
    }
}

/// Forward-only reader over the meaningful lines of a .bvh text.
///
/// Blank lines are skipped, so any run of `\r`/`\n` acts as one separator.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        let lines = LINE_BREAK
            .split(text)
            .enumerate()
            .map(|(i, raw)| Line {
                number: i + 1,
                text: raw.trim(),
            })
            .filter(|line| !line.text.is_empty())
            .collect();
        LineCursor { lines, pos: 0 }
    }

    /// Consumes and returns the next meaningful line, `None` at end of input.
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    pub fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    pub fn remaining(&self) -> usize {
        self.lines.len() - self.pos
    }
}
