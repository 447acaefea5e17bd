//! Flavor text log
//!
//! A fixed-length ring of narrative lines describing recent events,
//! most recent first. The UI only reads it; every mutation funnels
//! through [`FlavorLog::push`], which capitalizes the first letter so
//! call sites can build lines from lowercase narrative references.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::FLAVOR_CAPACITY;

/// Ring buffer of narrative strings, most recent first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlavorLog {
    lines: VecDeque<String>,
}

impl FlavorLog {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(FLAVOR_CAPACITY),
        }
    }

    /// Push a line, capitalizing its first character. The oldest line
    /// falls off once the ring is full.
    pub fn push(&mut self, line: impl Into<String>) {
        let mut line = line.into();
        if let Some(first) = line.get(..1) {
            let upper = first.to_uppercase();
            line.replace_range(..1, &upper);
        }
        if self.lines.len() == FLAVOR_CAPACITY {
            self.lines.pop_back();
        }
        self.lines.push_front(line);
    }

    /// The most recent `n` lines, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        self.lines.iter().take(n).map(String::as_str)
    }

    /// The newest line, if any
    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_capitalizes() {
        let mut log = FlavorLog::new();
        log.push("the warrior stands up.");
        assert_eq!(log.latest(), Some("The warrior stands up."));
    }

    #[test]
    fn test_most_recent_first() {
        let mut log = FlavorLog::new();
        log.push("first");
        log.push("second");
        let lines: Vec<&str> = log.recent(2).collect();
        assert_eq!(lines, vec!["Second", "First"]);
    }

    #[test]
    fn test_ring_overwrites_oldest() {
        let mut log = FlavorLog::new();
        for i in 0..FLAVOR_CAPACITY + 4 {
            log.push(format!("line {i}"));
        }
        assert_eq!(log.len(), FLAVOR_CAPACITY);
        assert_eq!(log.latest(), Some(format!("Line {}", FLAVOR_CAPACITY + 3).as_str()));
        // the first four lines fell off
        let oldest = log.recent(FLAVOR_CAPACITY).last().unwrap().to_string();
        assert_eq!(oldest, "Line 4");
    }

    #[test]
    fn test_recent_caps_at_len() {
        let mut log = FlavorLog::new();
        log.push("only");
        assert_eq!(log.recent(10).count(), 1);
    }

    #[test]
    fn test_empty_line() {
        let mut log = FlavorLog::new();
        log.push("");
        assert_eq!(log.latest(), Some(""));
    }
}
