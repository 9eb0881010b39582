use std::fmt;

use serde_json::json;

/// Append-only battle narration. Lines are plain human-readable strings in
/// resolution order; consumers read the whole log or tail it incrementally
/// with `since`.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    lines: Vec<String>,
}

impl EventLog {
    pub fn new() -> EventLog {
        EventLog::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Retract the most recent line. Charge-turn handlers rewrite the
    /// "used move" announcement this way.
    pub fn pop_last(&mut self) -> Option<String> {
        self.lines.pop()
    }

    pub fn all(&self) -> &[String] {
        &self.lines
    }

    /// Lines appended at or after `start`, for incremental consumers.
    pub fn since(&self, start: usize) -> &[String] {
        &self.lines[start.min(self.lines.len())..]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({ "log": self.lines })
    }
}

impl fmt::Display for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incremental_reads_track_new_lines() {
        let mut log = EventLog::new();
        log.push("Turn 1:");
        let mark = log.len();
        log.push("PIKACHU used Thunderbolt!");
        assert_eq!(log.since(mark), ["PIKACHU used Thunderbolt!"]);
        assert_eq!(log.since(99), Vec::<String>::new().as_slice());
    }

    #[test]
    fn pop_last_retracts_latest_line() {
        let mut log = EventLog::new();
        log.push("a");
        log.push("b");
        assert_eq!(log.pop_last().as_deref(), Some("b"));
        assert_eq!(log.all(), ["a"]);
    }

    #[test]
    fn json_export_carries_all_lines() {
        let mut log = EventLog::new();
        log.push("PIKACHU fainted!");
        let value = log.to_json();
        assert_eq!(value["log"][0], "PIKACHU fainted!");
    }
}
