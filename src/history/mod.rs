//! Eternal history: one tab-delimited line per executed command, appended to a
//! file that is never rotated or truncated.

pub mod types;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context as _;
use chrono::{DateTime, Local};
use regex::Regex;

pub use types::{FIELD_COUNT, HistoryRecord, TIMESTAMP_FORMAT};

/// Identity of the session a record is emitted from, captured from the
/// environment at emission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub user: String,
    pub host: String,
    pub window: String,
}

impl SessionInfo {
    /// Capture user, short host name and multiplexer tag for this process.
    pub fn from_env() -> Self {
        let user = std::env::var("USER")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| std::env::var("LOGNAME").ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| home_user(dirs::home_dir().as_deref()));
        let full_host = gethostname::gethostname().to_string_lossy().into_owned();
        Self {
            user,
            host: short_host(&full_host).to_string(),
            window: window_tag(
                std::env::var("WINDOW").ok().as_deref(),
                std::env::var("TMUX_PANE").ok().as_deref(),
            ),
        }
    }
}

/// Last-resort user name: the home directory's final component.
pub fn home_user(home: Option<&Path>) -> String {
    home.and_then(Path::file_name)
        .map_or_else(|| "unknown".to_string(), |n| n.to_string_lossy().into_owned())
}

/// Host name up to the first `.`.
pub fn short_host(full: &str) -> &str {
    full.split('.').next().unwrap_or(full)
}

/// Multiplexer tag: GNU screen's `WINDOW` first, then tmux's `TMUX_PANE`.
/// Empty when neither is set.
pub fn window_tag(screen_window: Option<&str>, tmux_pane: Option<&str>) -> String {
    match (screen_window, tmux_pane) {
        (Some(w), _) if !w.is_empty() => format!("screen:{w}"),
        (_, Some(p)) if !p.is_empty() => format!("tmux:{p}"),
        _ => String::new(),
    }
}

impl HistoryRecord {
    /// Assemble a record from already-captured parts.
    pub fn new(
        pid: u32,
        session: &SessionInfo,
        at: &DateTime<Local>,
        cwd: &Path,
        command: &str,
    ) -> Self {
        Self {
            pid,
            user: session.user.clone(),
            host: session.host.clone(),
            window: session.window.clone(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            cwd: cwd.to_string_lossy().into_owned(),
            command: command.to_string(),
        }
    }

    /// Capture a record for `command` right now, from this process's environment.
    ///
    /// The working directory prefers `$PWD` (the shell's logical path, symlinks
    /// intact) and falls back to the process cwd.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `$PWD` nor the process cwd is available.
    pub fn capture(pid: u32, command: &str) -> anyhow::Result<Self> {
        let cwd = logical_cwd()?;
        Ok(Self::new(
            pid,
            &SessionInfo::from_env(),
            &Local::now(),
            &cwd,
            command,
        ))
    }
}

/// The shell's logical working directory (`$PWD`), else the process cwd.
///
/// # Errors
///
/// Returns an error if `$PWD` is unset and the process cwd is unavailable.
pub fn logical_cwd() -> anyhow::Result<PathBuf> {
    match std::env::var_os("PWD").filter(|p| !p.is_empty()) {
        Some(pwd) => Ok(pwd.into()),
        None => std::env::current_dir().context("determine working directory"),
    }
}

/// Strip the `  123  ` / `  123* ` prefix bash's `history 1` puts before the
/// command. Lines without the prefix are returned unchanged.
pub fn strip_history_number(line: &str) -> &str {
    HISTORY_NUMBER
        .find(line)
        .map_or(line, |m| &line[m.end()..])
}

#[allow(clippy::expect_used)]
static HISTORY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[ *] ").expect("history number pattern is valid"));

/// Append one record to the history file, creating it (and missing parent
/// directories) if needed.
///
/// The line and its newline go out in a single `write_all` on an `O_APPEND`
/// descriptor so that concurrent sessions appending to the same file do not
/// interleave mid-line. There is no locking and no retry.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or written.
pub fn append_record(path: &Path, record: &HistoryRecord) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create history dir {}", parent.display()))?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open history file {}", path.display()))?;

    let mut line = record.to_line();
    line.push('\n');
    file.write_all(line.as_bytes())
        .with_context(|| format!("append to history file {}", path.display()))?;
    Ok(())
}

/// Read every well-formed record, oldest first.
///
/// A missing file is an empty history. Lines that do not parse (for example
/// the tail of a command that contained a newline) are skipped.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_records(path: &Path) -> anyhow::Result<Vec<HistoryRecord>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("failed to read history file: {}", path.display())));
        }
    };
    let content = String::from_utf8_lossy(&bytes);
    Ok(content.lines().filter_map(HistoryRecord::parse).collect())
}

/// The last `limit` records, oldest first.
pub fn tail(records: &[HistoryRecord], limit: usize) -> &[HistoryRecord] {
    &records[records.len().saturating_sub(limit)..]
}

/// Records whose command contains `query`, newest first, at most `limit`.
/// When `cwd` is given only records logged from that directory match.
pub fn search<'a>(
    records: &'a [HistoryRecord],
    query: &str,
    cwd: Option<&str>,
    limit: usize,
) -> Vec<&'a HistoryRecord> {
    records
        .iter()
        .rev()
        .filter(|r| r.command.contains(query))
        .filter(|r| cwd.is_none_or(|dir| r.cwd == dir))
        .take(limit)
        .collect()
}
