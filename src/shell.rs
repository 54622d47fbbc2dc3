//! Shell dialects and quoting shared by the navigator and the init snippet.

use std::fmt;

/// Interactive shells `shrc init` can generate integration code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
        })
    }
}

/// Escape a string for safe inclusion in a shell command (single-quote wrapping).
pub fn escape(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}

/// Escape every word and join them with single spaces.
pub fn join_escaped<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| escape(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
