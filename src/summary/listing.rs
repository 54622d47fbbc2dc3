use std::fmt::Write as _;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Layout of the full timestamp in long listings.
pub const FULL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f %z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    /// FIFOs, sockets and device nodes.
    Other,
}

impl EntryKind {
    /// Marker appended in compact listings.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Dir => "/",
            Self::Symlink => "@",
            Self::File | Self::Other => "",
        }
    }
}

/// One immediate child of the summarised directory. Symlinks describe the
/// link itself, not its target.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub link_target: Option<String>,
}

impl Entry {
    fn from_path(name: String, path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::symlink_metadata(path)?;
        let file_type = meta.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        let link_target = (kind == EntryKind::Symlink)
            .then(|| std::fs::read_link(path).ok())
            .flatten()
            .map(|t| t.to_string_lossy().into_owned());
        let (mode, nlink, uid, gid) = unix_fields(&meta);
        Ok(Self {
            name,
            kind,
            mode,
            nlink,
            uid,
            gid,
            size: meta.len(),
            modified: meta.modified().ok(),
            link_target,
        })
    }
}

#[cfg(unix)]
fn unix_fields(meta: &std::fs::Metadata) -> (u32, u64, u32, u32) {
    use std::os::unix::fs::MetadataExt;
    (meta.mode(), meta.nlink(), meta.uid(), meta.gid())
}

#[cfg(not(unix))]
fn unix_fields(meta: &std::fs::Metadata) -> (u32, u64, u32, u32) {
    let kind_bits = if meta.is_dir() { 0o040_000 } else { 0o100_000 };
    let perm = if meta.permissions().readonly() { 0o444 } else { 0o644 };
    (kind_bits | perm, 1, 0, 0)
}

/// Immediate children of `dir`, sorted by name. Entries that vanish or cannot
/// be inspected between listing and `lstat` are skipped.
///
/// # Errors
///
/// Returns an error if `dir` itself cannot be read.
pub fn read_entries(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter_map(|e| Entry::from_path(e.file_name().to_string_lossy().into_owned(), &e.path()).ok())
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStyle {
    /// Multi-column names only.
    Compact,
    /// One entry per line with mode, owner, size and full timestamp.
    Long,
}

/// Compact when the children would not fit in the rows left after the header.
pub const fn choose_style(entry_count: usize, rows: u16, reserved_rows: u16) -> ListingStyle {
    let usable = rows.saturating_sub(reserved_rows) as usize;
    if entry_count > usable {
        ListingStyle::Compact
    } else {
        ListingStyle::Long
    }
}

/// Column-major multi-column listing fitted to `width` terminal columns.
pub fn render_compact(entries: &[Entry], width: u16) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let cells: Vec<String> = entries
        .iter()
        .map(|e| format!("{}{}", e.name, e.kind.marker()))
        .collect();
    let cell_width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0) + 2;
    let columns = (usize::from(width) / cell_width).clamp(1, cells.len());
    let rows = cells.len().div_ceil(columns);

    let mut out = String::new();
    for row in 0..rows {
        let mut line = String::new();
        for col in 0..columns {
            let Some(cell) = cells.get(col * rows + row) else {
                break;
            };
            let _ = write!(line, "{cell:<cell_width$}");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// One line per entry: mode, links, uid, gid, size, full timestamp, name.
pub fn render_long(entries: &[Entry]) -> String {
    let nlink_w = column_width(entries, |e| e.nlink.to_string());
    let uid_w = column_width(entries, |e| e.uid.to_string());
    let gid_w = column_width(entries, |e| e.gid.to_string());
    let size_w = column_width(entries, |e| e.size.to_string());

    let mut out = String::new();
    for e in entries {
        let time = e.modified.map_or_else(
            || "?".to_string(),
            |t| DateTime::<Local>::from(t).format(FULL_TIME_FORMAT).to_string(),
        );
        let _ = write!(
            out,
            "{} {:>nlink_w$} {:>uid_w$} {:>gid_w$} {:>size_w$} {time} {}",
            mode_string(e.mode),
            e.nlink,
            e.uid,
            e.gid,
            e.size,
            e.name,
        );
        if let Some(target) = &e.link_target {
            let _ = write!(out, " -> {target}");
        }
        out.push('\n');
    }
    out
}

fn column_width(entries: &[Entry], field: impl Fn(&Entry) -> String) -> usize {
    entries.iter().map(|e| field(e).len()).max().unwrap_or(0)
}

/// `ls -l` style mode string, e.g. `drwxr-xr-x` or `-rwsr-x--T`.
pub fn mode_string(mode: u32) -> String {
    let kind = match mode & 0o170_000 {
        0o040_000 => 'd',
        0o120_000 => 'l',
        0o010_000 => 'p',
        0o140_000 => 's',
        0o020_000 => 'c',
        0o060_000 => 'b',
        _ => '-',
    };
    let mut out = String::with_capacity(10);
    out.push(kind);
    for (shift, special, special_set, special_unset) in [
        (6, 0o4000, 's', 'S'),
        (3, 0o2000, 's', 'S'),
        (0, 0o1000, 't', 'T'),
    ] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        let exec = bits & 0o1 != 0;
        out.push(match (mode & special != 0, exec) {
            (true, true) => special_set,
            (true, false) => special_unset,
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}
