//! Ring of recent status lines
//!
//! The program overwrites its status line every tick. The simulator keeps
//! the last few so a run can be inspected after the fact.

use std::collections::VecDeque;

use turbine_core::ports::StatusSink;

/// Lines kept by default
pub const STATUS_LOG_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct StatusLog {
    lines: VecDeque<String>,
    capacity: usize,
    /// Lines reported since creation, including evicted ones
    total: u64,
}

impl StatusLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            total: 0,
        }
    }

    /// Most recent line
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// Kept lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Kept lines joined with blank lines between entries
    pub fn render(&self) -> String {
        self.lines.iter().cloned().collect::<Vec<_>>().join("\n\n")
    }
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new(STATUS_LOG_LEN)
    }
}

impl StatusSink for StatusLog {
    fn report(&mut self, line: &str) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
        self.total += 1;
        tracing::trace!(target: "status", "{}", line);
    }
}
