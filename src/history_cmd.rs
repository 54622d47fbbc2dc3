use std::path::Path;

use serde::Serialize;

use shrc::config::types::ShrcConfig;
use shrc::history::{self, HistoryRecord};
use shrc::output;

/// `shrc log`: append one record for `command`.
///
/// A write failure is reported and turned into exit code 1; the generated
/// hook ignores it so the prompt still appears.
pub fn cmd_log(
    config: &ShrcConfig,
    pid: Option<u32>,
    history_line: bool,
    words: &[String],
    verbose: bool,
) -> i32 {
    if !config.history.enabled {
        if verbose {
            eprintln!("[shrc] history disabled, not logging");
        }
        return 0;
    }
    let joined = words.join(" ");
    let command = if history_line {
        history::strip_history_number(&joined)
    } else {
        joined.as_str()
    };
    let pid = pid.unwrap_or_else(std::os::unix::process::parent_id);

    let path = config.history.file_path();
    let result = HistoryRecord::capture(pid, command)
        .and_then(|record| history::append_record(&path, &record));
    match result {
        Ok(()) => {
            if verbose {
                eprintln!("[shrc] history: appended to {}", path.display());
            }
            0
        }
        Err(e) => {
            eprintln!("[shrc] history: {e:#}");
            1
        }
    }
}

fn load_records(path: &Path) -> Option<Vec<HistoryRecord>> {
    match history::read_records(path) {
        Ok(records) => Some(records),
        Err(e) => {
            eprintln!("[shrc] error reading history: {e:#}");
            None
        }
    }
}

/// JSON shape of one record: the stored columns plus the parsed epoch.
#[derive(Serialize)]
struct RecordView<'a> {
    #[serde(flatten)]
    record: &'a HistoryRecord,
    epoch: Option<i64>,
}

fn print_json_records<'a>(records: impl IntoIterator<Item = &'a HistoryRecord>) {
    let views: Vec<RecordView<'_>> = records
        .into_iter()
        .map(|record| RecordView {
            record,
            epoch: record.epoch(),
        })
        .collect();
    output::print_json(&views);
}

fn print_record(record: &HistoryRecord) {
    let window = if record.window.is_empty() {
        String::new()
    } else {
        format!(" [{}]", record.window)
    };
    println!(
        "{} {}@{}{} {} {}",
        record.timestamp, record.user, record.host, window, record.cwd, record.command
    );
}

pub fn cmd_history_list(config: &ShrcConfig, limit: usize, json: bool) -> i32 {
    let Some(records) = load_records(&config.history.file_path()) else {
        return 1;
    };
    let recent = history::tail(&records, limit);

    if json {
        print_json_records(recent);
        return 0;
    }
    if recent.is_empty() {
        eprintln!("[shrc] no history entries found");
        return 0;
    }
    for record in recent {
        print_record(record);
    }
    0
}

pub fn cmd_history_search(
    config: &ShrcConfig,
    query: &str,
    limit: usize,
    here: bool,
    json: bool,
) -> i32 {
    let Some(records) = load_records(&config.history.file_path()) else {
        return 1;
    };
    let cwd = if here {
        match history::logical_cwd() {
            Ok(dir) => Some(dir.to_string_lossy().into_owned()),
            Err(e) => {
                eprintln!("[shrc] error: {e:#}");
                return 1;
            }
        }
    } else {
        None
    };
    let hits = history::search(&records, query, cwd.as_deref(), limit);

    if json {
        print_json_records(hits.iter().copied());
        return 0;
    }
    if hits.is_empty() {
        eprintln!("[shrc] no matching history entries found");
        return 0;
    }
    for record in hits {
        print_record(record);
    }
    0
}
