//! Loaded program text
//!
//! A program is the ordered list of its source lines, fixed at load time.

use std::sync::Arc;

/// Immutable program: source lines indexed from 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    lines: Arc<[String]>,
}

impl Default for Program {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl Program {
    /// Build a program from already-split lines
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split source text into lines on `\n` or `\r\n`
    pub fn from_source(source: &str) -> Self {
        Self::new(source.lines())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Raw (untrimmed) line at `index`
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
