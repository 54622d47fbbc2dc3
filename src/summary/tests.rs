#![allow(clippy::unwrap_used, clippy::expect_used)]

use tempfile::TempDir;

use super::disk::{FsUsage, human_size};
use super::listing::{choose_style, mode_string, render_compact, render_long};
use super::term::size_from_env;
use super::*;

/// Three files, two subdirectories, one symlink.
fn populated_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    for name in ["a.txt", "b.txt", "c.txt"] {
        std::fs::write(dir.path().join(name), "data").unwrap();
    }
    std::fs::create_dir(dir.path().join("sub1")).unwrap();
    std::fs::create_dir(dir.path().join("sub2")).unwrap();
    std::fs::write(dir.path().join("sub1/nested.txt"), "deeper").unwrap();
    #[cfg(unix)]
    std::os::unix::fs::symlink("a.txt", dir.path().join("link")).unwrap();
    dir
}

fn entry(name: &str, kind: EntryKind) -> Entry {
    Entry {
        name: name.to_string(),
        kind,
        mode: 0o100_644,
        nlink: 1,
        uid: 1000,
        gid: 1000,
        size: 4,
        modified: None,
        link_target: None,
    }
}

// --- counts ---

#[test]
#[cfg(unix)]
fn counts_immediate_children_only() {
    let dir = populated_dir();
    let summary = DirSummary::collect(dir.path(), dir.path()).expect("collect");
    assert_eq!(
        summary.counts,
        EntryCounts {
            files: 3,
            dirs: 2,
            links: 1,
        }
    );
}

#[test]
#[cfg(unix)]
fn header_prints_counts_in_documented_wording() {
    let dir = populated_dir();
    let summary = DirSummary::collect(dir.path(), dir.path()).expect("collect");
    let header = summary.header();
    assert!(header.contains("<3 files> <2 dirs/> <1 links@>"), "got: {header}");
    assert!(header.contains(&dir.path().display().to_string()));
    assert!(header.contains(" total>"));
    assert_eq!(header.lines().count(), 2);
}

#[test]
#[cfg(unix)]
fn dangling_symlink_still_counts_as_link() {
    let dir = TempDir::new().unwrap();
    std::os::unix::fs::symlink("missing-target", dir.path().join("dangling")).unwrap();
    let summary = DirSummary::collect(dir.path(), dir.path()).expect("collect");
    assert_eq!(summary.counts.links, 1);
    assert_eq!(summary.counts.files, 0);
}

#[test]
fn empty_dir_counts_zero() {
    let dir = TempDir::new().unwrap();
    let summary = DirSummary::collect(dir.path(), dir.path()).expect("collect");
    assert_eq!(summary.counts, EntryCounts::default());
    assert_eq!(summary.counts.to_string(), "<0 files> <0 dirs/> <0 links@>");
}

#[test]
fn collect_missing_dir_errors() {
    let dir = TempDir::new().unwrap();
    let err = DirSummary::collect(&dir.path().join("nope"), dir.path()).expect_err("missing");
    assert!(format!("{err:#}").contains("No such directory"));
}

#[test]
fn entries_are_sorted_by_name() {
    let dir = TempDir::new().unwrap();
    for name in ["zeta", "alpha", "mid"] {
        std::fs::write(dir.path().join(name), "").unwrap();
    }
    let summary = DirSummary::collect(dir.path(), dir.path()).expect("collect");
    let names: Vec<&str> = summary.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["alpha", "mid", "zeta"]);
}

// --- listing style ---

#[test]
fn style_is_long_when_entries_fit() {
    assert_eq!(choose_style(10, 24, 4), ListingStyle::Long);
    assert_eq!(choose_style(20, 24, 4), ListingStyle::Long);
}

#[test]
fn style_is_compact_when_entries_overflow() {
    assert_eq!(choose_style(21, 24, 4), ListingStyle::Compact);
    assert_eq!(choose_style(1, 3, 4), ListingStyle::Compact);
}

#[test]
#[cfg(unix)]
fn render_switches_style_with_row_count() {
    let dir = populated_dir();
    let summary = DirSummary::collect(dir.path(), dir.path()).expect("collect");

    let (tall, _) = summary.render(TermSize { rows: 40, cols: 80 }, 4);
    assert_eq!(tall, ListingStyle::Long);

    let (short, text) = summary.render(TermSize { rows: 6, cols: 80 }, 4);
    assert_eq!(short, ListingStyle::Compact);
    assert!(text.contains("sub1/"));
    assert!(text.contains("link@"));
}

// --- compact listing ---

#[test]
fn compact_listing_is_column_major() {
    let entries: Vec<Entry> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|n| entry(n, EntryKind::File))
        .collect();
    // cell width 3 -> 2 columns fit in 7 cols; 3 rows.
    let out = render_compact(&entries, 7);
    assert_eq!(out, "a  d\nb  e\nc\n");
}

#[test]
fn compact_listing_marks_dirs_and_links() {
    let entries = vec![
        entry("bin", EntryKind::Dir),
        entry("cfg", EntryKind::Symlink),
        entry("x", EntryKind::File),
    ];
    let out = render_compact(&entries, 80);
    assert_eq!(out, "bin/  cfg@  x\n");
}

#[test]
fn compact_listing_narrow_terminal_uses_one_column() {
    let entries = vec![entry("long-name", EntryKind::File), entry("b", EntryKind::File)];
    assert_eq!(render_compact(&entries, 3), "long-name\nb\n");
}

#[test]
fn compact_listing_empty() {
    assert_eq!(render_compact(&[], 80), "");
}

// --- long listing ---

#[test]
#[cfg(unix)]
fn long_listing_has_full_timestamps_and_link_targets() {
    let dir = populated_dir();
    let entries = listing::read_entries(dir.path()).unwrap();
    let out = render_long(&entries);

    assert_eq!(out.lines().count(), 6);
    let link_line = out.lines().find(|l| l.ends_with("link -> a.txt")).expect("link line");
    assert!(link_line.starts_with('l'));
    let dir_line = out.lines().find(|l| l.ends_with(" sub1")).expect("dir line");
    assert!(dir_line.starts_with('d'));
    // Nanosecond fraction and UTC offset.
    assert!(
        out.lines().all(|l| l.split(' ').any(|w| w.len() == 18 && w.contains('.'))),
        "got: {out}"
    );
}

#[test]
fn long_listing_aligns_size_column() {
    let mut small = entry("small", EntryKind::File);
    small.size = 7;
    let mut big = entry("big", EntryKind::File);
    big.size = 123_456;
    let out = render_long(&[small, big]);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].contains("      7 ?"), "got: {out}");
    assert!(lines[1].contains(" 123456 ?"), "got: {out}");
}

// --- mode_string ---

#[test]
fn mode_string_common_cases() {
    assert_eq!(mode_string(0o040_755), "drwxr-xr-x");
    assert_eq!(mode_string(0o100_644), "-rw-r--r--");
    assert_eq!(mode_string(0o120_777), "lrwxrwxrwx");
}

#[test]
fn mode_string_special_bits() {
    assert_eq!(mode_string(0o104_755), "-rwsr-xr-x");
    assert_eq!(mode_string(0o102_745), "-rwxr-Sr-x");
    assert_eq!(mode_string(0o041_777), "drwxrwxrwt");
    assert_eq!(mode_string(0o041_776), "drwxrwxrwT");
    assert_eq!(mode_string(0o010_600), "prw-------");
}

// --- disk ---

#[test]
fn human_size_matches_du_style() {
    assert_eq!(human_size(0), "0");
    assert_eq!(human_size(512), "512");
    assert_eq!(human_size(4096), "4.0K");
    assert_eq!(human_size(1536), "1.5K");
    assert_eq!(human_size(12 * 1024 * 1024), "12M");
    assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0G");
}

#[test]
fn percent_used_rounds_up() {
    let usage = FsUsage {
        total: 100,
        used: 1,
        available: 99,
    };
    assert_eq!(usage.percent_used(), 1);
    let usage = FsUsage {
        total: 300,
        used: 100,
        available: 200,
    };
    assert_eq!(usage.percent_used(), 34);
    let empty = FsUsage {
        total: 0,
        used: 0,
        available: 0,
    };
    assert_eq!(empty.percent_used(), 0);
}

#[test]
#[cfg(unix)]
fn fs_usage_reports_a_mounted_filesystem() {
    let dir = TempDir::new().unwrap();
    let usage = disk::fs_usage(dir.path()).expect("statvfs");
    assert!(usage.total > 0);
    assert!(usage.used <= usage.total);
}

#[test]
fn fs_usage_of_missing_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(disk::fs_usage(&dir.path().join("gone")).is_err());
}

#[test]
#[cfg(unix)]
fn disk_usage_counts_hard_links_once() {
    let dir = TempDir::new().unwrap();
    let original = dir.path().join("blob");
    std::fs::write(&original, vec![7u8; 64 * 1024]).unwrap();
    let single = disk::disk_usage(dir.path());

    std::fs::hard_link(&original, dir.path().join("blob-again")).unwrap();
    assert_eq!(disk::disk_usage(dir.path()), single);
}

#[test]
#[cfg(unix)]
fn disk_usage_includes_nested_files() {
    let dir = TempDir::new().unwrap();
    let empty_total = disk::disk_usage(dir.path());
    std::fs::create_dir_all(dir.path().join("x/y")).unwrap();
    std::fs::write(dir.path().join("x/y/data"), vec![1u8; 128 * 1024]).unwrap();
    assert!(disk::disk_usage(dir.path()) >= empty_total + 128 * 1024);
}

// --- terminal size ---

#[test]
fn size_from_env_parses_values() {
    assert_eq!(
        size_from_env(Some("50"), Some("120")),
        TermSize { rows: 50, cols: 120 }
    );
}

#[test]
fn size_from_env_falls_back_per_field() {
    assert_eq!(
        size_from_env(Some("abc"), None),
        TermSize { rows: 24, cols: 80 }
    );
    assert_eq!(size_from_env(Some("0"), Some("100")), TermSize { rows: 24, cols: 100 });
}
