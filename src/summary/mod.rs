//! `cs`: a one-screen overview of a directory.
//!
//! Prints filesystem usage, the path with counts of its immediate children,
//! the recursive disk usage, then a listing whose style depends on how many
//! rows the terminal has left.

pub mod disk;
pub mod listing;
pub mod term;

use std::fmt;
use std::io::{IsTerminal as _, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::types::SummarySection;
use disk::FsUsage;
use listing::{Entry, EntryKind, ListingStyle};
use term::TermSize;

/// Immediate-children tally. Symlinks count as links whatever they point to;
/// other special files are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryCounts {
    pub files: usize,
    pub dirs: usize,
    pub links: usize,
}

impl EntryCounts {
    pub fn tally(entries: &[Entry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, e| {
            match e.kind {
                EntryKind::File => acc.files += 1,
                EntryKind::Dir => acc.dirs += 1,
                EntryKind::Symlink => acc.links += 1,
                EntryKind::Other => {}
            }
            acc
        })
    }
}

impl fmt::Display for EntryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} files> <{} dirs/> <{} links@>",
            self.files, self.dirs, self.links
        )
    }
}

/// Everything `cs` prints, gathered before the screen is touched.
#[derive(Debug)]
pub struct DirSummary {
    /// Path as shown to the user.
    pub display_path: PathBuf,
    pub usage: Option<FsUsage>,
    pub counts: EntryCounts,
    pub total_bytes: u64,
    pub entries: Vec<Entry>,
}

impl DirSummary {
    /// Gather the summary of `dir`, shown as `display_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is not a readable directory.
    pub fn collect(dir: &Path, display_path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(dir.is_dir(), "{}: No such directory", dir.display());
        let entries =
            listing::read_entries(dir).with_context(|| format!("cannot read {}", dir.display()))?;
        Ok(Self {
            display_path: display_path.to_path_buf(),
            usage: disk::fs_usage(dir).ok(),
            counts: EntryCounts::tally(&entries),
            total_bytes: disk::disk_usage(dir),
            entries,
        })
    }

    /// The two header lines: filesystem usage, then path, counts and total.
    pub fn header(&self) -> String {
        let usage = self.usage.map_or_else(
            || "disk: usage unavailable".to_string(),
            |u| {
                format!(
                    "disk: {} used of {} ({}%), {} free",
                    disk::human_size(u.used),
                    disk::human_size(u.total),
                    u.percent_used(),
                    disk::human_size(u.available),
                )
            },
        );
        format!(
            "{usage}\n{}  {} <{} total>\n",
            self.display_path.display(),
            self.counts,
            disk::human_size(self.total_bytes),
        )
    }

    /// Header followed by the listing chosen for `size`.
    pub fn render(&self, size: TermSize, reserved_rows: u16) -> (ListingStyle, String) {
        let style = listing::choose_style(self.entries.len(), size.rows, reserved_rows);
        let body = match style {
            ListingStyle::Compact => listing::render_compact(&self.entries, size.cols),
            ListingStyle::Long => listing::render_long(&self.entries),
        };
        (style, format!("{}{body}", self.header()))
    }
}

/// Resolve the directory to summarise and the path to display for it.
///
/// Without an explicit directory the shell's logical `$PWD` is shown when it
/// still names the process cwd.
fn resolve_target(dir: Option<&Path>) -> anyhow::Result<(PathBuf, PathBuf)> {
    if let Some(dir) = dir {
        return Ok((dir.to_path_buf(), dir.to_path_buf()));
    }
    let cwd = std::env::current_dir().context("determine working directory")?;
    let display = std::env::var_os("PWD")
        .map(PathBuf::from)
        .filter(|pwd| same_dir(pwd, &cwd))
        .unwrap_or_else(|| cwd.clone());
    Ok((cwd, display))
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Print the summary of `dir` (or the current directory) to stdout.
///
/// The target is validated and fully summarised before the screen is cleared,
/// so a bad directory leaves the terminal untouched.
///
/// # Errors
///
/// Returns an error if the directory cannot be summarised or stdout fails.
pub fn run(dir: Option<&Path>, config: &SummarySection, verbose: bool) -> anyhow::Result<()> {
    let (target, display) = resolve_target(dir)?;
    let summary = DirSummary::collect(&target, &display)?;
    let size = term::term_size();
    let (style, text) = summary.render(size, config.reserved_rows);
    if verbose {
        eprintln!(
            "[shrc] summary: {} entries, {}x{} terminal, {style:?} listing",
            summary.entries.len(),
            size.cols,
            size.rows
        );
    }

    let stdout = std::io::stdout();
    let is_terminal = stdout.is_terminal();
    let mut out = stdout.lock();
    if config.clear_screen && is_terminal {
        term::clear_screen(&mut out).context("clear screen")?;
    }
    out.write_all(text.as_bytes()).context("write summary")?;
    out.flush().context("write summary")?;
    Ok(())
}

#[cfg(test)]
mod tests;
