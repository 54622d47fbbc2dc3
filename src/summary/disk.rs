use std::collections::HashSet;
use std::path::Path;

use walkdir::WalkDir;

/// Capacity of the filesystem holding a path, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsUsage {
    pub total: u64,
    pub used: u64,
    /// Available to unprivileged users.
    pub available: u64,
}

impl FsUsage {
    /// Used share of the space visible to unprivileged users, rounded up like `df`.
    pub fn percent_used(&self) -> u64 {
        let visible = self.used + self.available;
        if visible == 0 {
            return 0;
        }
        (self.used * 100).div_ceil(visible)
    }
}

/// Query the filesystem usage of the mount containing `path`.
///
/// # Errors
///
/// Returns the OS error from the underlying `statvfs`.
pub fn fs_usage(path: &Path) -> std::io::Result<FsUsage> {
    let total = fs2::total_space(path)?;
    let free = fs2::free_space(path)?;
    let available = fs2::available_space(path)?;
    Ok(FsUsage {
        total,
        used: total.saturating_sub(free),
        available,
    })
}

/// Total allocated size of the tree under `root`, in bytes, like `du -s`.
///
/// Symlinks are not followed, hard-linked files are counted once, and
/// entries that cannot be read are skipped.
pub fn disk_usage(root: &Path) -> u64 {
    let mut seen = HashSet::new();
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| entry.metadata().ok())
        .filter(|meta| first_sighting(&mut seen, meta))
        .map(|meta| allocated_bytes(&meta))
        .sum()
}

#[cfg(unix)]
fn first_sighting(seen: &mut HashSet<(u64, u64)>, meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    meta.nlink() <= 1 || seen.insert((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn first_sighting(_seen: &mut HashSet<(u64, u64)>, _meta: &std::fs::Metadata) -> bool {
    true
}

#[cfg(unix)]
fn allocated_bytes(meta: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.blocks() * 512
}

#[cfg(not(unix))]
fn allocated_bytes(meta: &std::fs::Metadata) -> u64 {
    meta.len()
}

/// Human-readable size in powers of 1024, like `du -h`: `512`, `4.0K`, `12M`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["K", "M", "G", "T", "P", "E"];
    if bytes < 1024 {
        return bytes.to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if value < 10.0 {
        // One decimal, rounded up so the figure never understates usage.
        let tenths = (value * 10.0).ceil() / 10.0;
        if tenths < 10.0 {
            return format!("{tenths:.1}{}", UNITS[unit]);
        }
    }
    format!("{:.0}{}", value.ceil(), UNITS[unit])
}
