use std::io::{IsTerminal as _, Write};

use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub rows: u16,
    pub cols: u16,
}

impl Default for TermSize {
    fn default() -> Self {
        Self { rows: 24, cols: 80 }
    }
}

/// Size of the terminal on stdout; `$LINES`/`$COLUMNS` when stdout is not a
/// terminal or the query fails; 24×80 otherwise.
pub fn term_size() -> TermSize {
    if std::io::stdout().is_terminal() {
        match crossterm::terminal::size() {
            Ok((cols, rows)) if rows > 0 && cols > 0 => return TermSize { rows, cols },
            Ok(_) => {}
            Err(e) => {
                if crate::output::env_debug() {
                    eprintln!("[shrc] terminal size query failed: {e}");
                }
            }
        }
    }
    size_from_env(
        std::env::var("LINES").ok().as_deref(),
        std::env::var("COLUMNS").ok().as_deref(),
    )
}

/// Parse `$LINES` / `$COLUMNS`, each falling back to the 24×80 default.
pub fn size_from_env(lines: Option<&str>, columns: Option<&str>) -> TermSize {
    let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<u16>().ok()).filter(|n| *n > 0);
    let default = TermSize::default();
    TermSize {
        rows: parse(lines).unwrap_or(default.rows),
        cols: parse(columns).unwrap_or(default.cols),
    }
}

/// Clear the visible screen and home the cursor.
///
/// # Errors
///
/// Returns an error if writing the escape sequences fails.
pub fn clear_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    crossterm::execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}
