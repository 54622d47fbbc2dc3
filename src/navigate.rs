//! `cd` with a dot-run shorthand: `...` goes up two levels, `....` three.
//!
//! Arguments are classified into [`CdArg`] before anything is rewritten. Only
//! the shape `[-L|-P] [PATH]` is navigated; every other argument list reaches
//! the builtin untouched so its own error handling applies.

/// Symlink resolution flag accepted by the builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// `-L`: follow symbolic links logically (the builtin's default).
    Logical,
    /// `-P`: resolve to the physical directory.
    Physical,
}

impl LinkMode {
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Logical => "-L",
            Self::Physical => "-P",
        }
    }
}

/// One classified `cd` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdArg<'a> {
    Flag(LinkMode),
    /// Two or more dots and nothing else; carries the number of levels to
    /// ascend (dot count minus one).
    DotRun(usize),
    Path(&'a str),
}

/// Classify a single word.
pub fn classify(arg: &str) -> CdArg<'_> {
    match arg {
        "-L" => CdArg::Flag(LinkMode::Logical),
        "-P" => CdArg::Flag(LinkMode::Physical),
        _ if arg.len() >= 2 && arg.bytes().all(|b| b == b'.') => CdArg::DotRun(arg.len() - 1),
        _ => CdArg::Path(arg),
    }
}

/// Where a navigable request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a> {
    /// No positional argument: the builtin's own default (home).
    Home,
    Ascend(usize),
    Path(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan<'a> {
    Navigate {
        link_mode: Option<LinkMode>,
        target: Target<'a>,
    },
    /// Not of the `[-L|-P] [PATH]` shape; forwarded verbatim.
    Passthrough(Vec<&'a str>),
}

/// Decide what to do with the words given to `cd`.
pub fn plan<S: AsRef<str>>(args: &[S]) -> Plan<'_> {
    let words: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let classified: Vec<CdArg<'_>> = words.iter().copied().map(classify).collect();

    let (link_mode, rest) = match classified.as_slice() {
        [CdArg::Flag(mode), rest @ ..] => (Some(*mode), rest),
        rest => (None, rest),
    };

    let target = match rest {
        [] => Target::Home,
        [CdArg::DotRun(levels)] => Target::Ascend(*levels),
        [CdArg::Path(path)] if !path.starts_with('-') || *path == "-" => Target::Path(*path),
        _ => return Plan::Passthrough(words),
    };

    Plan::Navigate { link_mode, target }
}

/// `..` repeated `levels` times, joined with `/`.
pub fn ascend_path(levels: usize) -> String {
    vec![".."; levels.max(1)].join("/")
}

/// The words to hand to the builtin for `plan`.
pub fn builtin_args(plan: &Plan<'_>) -> Vec<String> {
    match plan {
        Plan::Passthrough(words) => words.iter().map(ToString::to_string).collect(),
        Plan::Navigate { link_mode, target } => {
            let mut out: Vec<String> = link_mode
                .iter()
                .map(|m| m.flag().to_string())
                .collect();
            match target {
                Target::Home => {}
                Target::Ascend(levels) => out.push(ascend_path(*levels)),
                Target::Path(path) => out.push((*path).to_string()),
            }
            out
        }
    }
}

/// Shell-quoted builtin arguments for the generated `cd` function.
pub fn render_cd_args<S: AsRef<str>>(args: &[S]) -> String {
    crate::shell::join_escaped(&builtin_args(&plan(args)))
}
