use std::fmt;

use serde::Serialize;

/// Number of tab-separated columns in one eternal history line.
pub const FIELD_COUNT: usize = 7;

/// `strftime` layout of the timestamp column: local date, time, year, epoch.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M:%S %Y %s";

/// One executed command as stored in the eternal history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub pid: u32,
    pub user: String,
    pub host: String,
    /// `screen:<n>` / `tmux:<pane>`, empty outside a multiplexer.
    pub window: String,
    pub timestamp: String,
    pub cwd: String,
    pub command: String,
}

impl HistoryRecord {
    /// Render the record as one line, without the trailing newline.
    pub fn to_line(&self) -> String {
        self.to_string()
    }

    /// Parse a line written by [`HistoryRecord::to_line`].
    ///
    /// The command column is last and may itself contain tabs, so the line is
    /// split at most six times. Returns `None` for lines with fewer columns or
    /// a non-numeric pid.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.splitn(FIELD_COUNT, '\t');
        let pid = fields.next()?.parse().ok()?;
        let user = fields.next()?.to_string();
        let host = fields.next()?.to_string();
        let window = fields.next()?.to_string();
        let timestamp = fields.next()?.to_string();
        let cwd = fields.next()?.to_string();
        let command = fields.next()?.to_string();
        Some(Self {
            pid,
            user,
            host,
            window,
            timestamp,
            cwd,
            command,
        })
    }

    /// Epoch seconds from the last word of the timestamp column.
    pub fn epoch(&self) -> Option<i64> {
        self.timestamp.split(' ').next_back()?.parse().ok()
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.pid, self.user, self.host, self.window, self.timestamp, self.cwd, self.command
        )
    }
}
