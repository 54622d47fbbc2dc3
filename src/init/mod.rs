//! `shrc init <shell>`: the shell code that wires the binary into an
//! interactive session.
//!
//! The binary cannot change its parent's directory or variables, so the
//! snippet holds the thin functions that call back into it and perform the
//! final `builtin cd`, plus the session environment rendered from the config.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::types::{ColorMode, ShrcConfig, UmaskPolicy};
use crate::shell::{Shell, escape};

/// Render the full integration snippet for `shell`.
///
/// `exe` is the absolute path of the running binary; every call back into it
/// goes through that path so a shadowing `shrc` on `$PATH` cannot interfere.
pub fn render(shell: Shell, config: &ShrcConfig, exe: &Path) -> String {
    let exe = escape(&exe.to_string_lossy());
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# shrc {} integration; load with: eval \"$(shrc init {shell})\"",
        env!("CARGO_PKG_VERSION")
    );
    render_environment(&mut out, config);
    render_umask(&mut out, config.env.umask);
    render_aliases(&mut out, config);
    render_prompt(&mut out, shell, config.prompt.color);
    render_runtime(&mut out, config);
    if config.history.enabled {
        render_history_hook(&mut out, shell, &exe);
    }
    render_navigation(&mut out, &exe);
    render_local_override(&mut out, config);
    out
}

/// Treat `""` as "not set" so a layer can switch a default off.
fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn export(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "export {name}={}", escape(value));
}

fn render_environment(out: &mut String, config: &ShrcConfig) {
    let env = &config.env;
    let pairs = [
        ("EDITOR", non_empty(env.editor.as_ref())),
        ("VISUAL", non_empty(env.editor.as_ref())),
        ("PAGER", non_empty(env.pager.as_ref())),
        ("LANG", non_empty(env.lang.as_ref())),
        ("LC_COLLATE", non_empty(env.lc_collate.as_ref())),
        ("GREP_COLORS", non_empty(env.grep_colors.as_ref())),
    ];
    for (name, value) in pairs {
        if let Some(value) = value {
            export(out, name, value);
        }
    }
    if config.runtime.disable_colors {
        export(out, "NODE_DISABLE_COLORS", "1");
    }
    for (name, value) in &env.extra {
        if is_valid_name(name, false) {
            export(out, name, &crate::paths::expand_tilde(value).to_string_lossy());
        } else {
            let _ = writeln!(out, "# skipped invalid variable name {}", escape(name));
        }
    }
}

fn render_umask(out: &mut String, policy: UmaskPolicy) {
    match policy {
        UmaskPolicy::UserPrivateGroup => {
            out.push_str(
                "if [ \"$(id -gn)\" = \"$(id -un)\" ] && [ \"$(id -u)\" -gt 99 ]; then umask 002; else umask 022; fi\n",
            );
        }
        UmaskPolicy::Fixed(mode) => {
            let _ = writeln!(out, "umask {mode:03o}");
        }
    }
}

fn render_aliases(out: &mut String, config: &ShrcConfig) {
    for (name, command) in &config.aliases {
        if command.is_empty() {
            continue;
        }
        if is_valid_name(name, true) {
            let _ = writeln!(out, "alias {name}={}", escape(command));
        } else {
            let _ = writeln!(out, "# skipped invalid alias name {}", escape(name));
        }
    }
}

fn render_prompt(out: &mut String, shell: Shell, color: ColorMode) {
    let (plain, colored) = match shell {
        Shell::Bash => (
            r"\u@\h:\w\$ ",
            r"\[\e[01;32m\]\u@\h\[\e[00m\]:\[\e[01;34m\]\w\[\e[00m\]\$ ",
        ),
        Shell::Zsh => ("%n@%m:%~%# ", "%F{green}%B%n@%m%b%f:%F{blue}%B%~%b%f%# "),
    };
    let var = match shell {
        Shell::Bash => "PS1",
        Shell::Zsh => "PROMPT",
    };
    match color {
        ColorMode::Always => {
            let _ = writeln!(out, "{var}={}", escape(colored));
        }
        ColorMode::Never => {
            let _ = writeln!(out, "{var}={}", escape(plain));
        }
        ColorMode::Auto => {
            let _ = writeln!(
                out,
                "if [ \"$(tput colors 2>/dev/null || echo 0)\" -ge 8 ]; then {var}={}; else {var}={}; fi",
                escape(colored),
                escape(plain)
            );
        }
    }
}

fn render_runtime(out: &mut String, config: &ShrcConfig) {
    let Some(script) = non_empty(config.runtime.manager_script.as_ref()) else {
        return;
    };
    let script = escape(&crate::paths::expand_tilde(script).to_string_lossy());
    let _ = writeln!(out, "if [ -s {script} ]; then");
    let _ = writeln!(out, "  . {script}");
    if let Some(version) = non_empty(config.runtime.version.as_ref()) {
        let _ = writeln!(out, "  nvm use {} >/dev/null 2>&1", escape(version));
    }
    out.push_str("fi\n");
}

/// Prompt hook that logs one record per executed command line.
///
/// bash: the hook fires when the shell's command counter (`\#`) has moved
/// since the previous prompt, so repeats dropped by `HISTCONTROL` are still
/// logged and an empty line is not. Before bash 4.4 there is no `@P`
/// expansion and the `history 1` line itself is compared instead.
/// zsh: `preexec` hands over the command text and `precmd` logs it.
fn render_history_hook(out: &mut String, shell: Shell, exe: &str) {
    match shell {
        Shell::Bash => {
            let _ = write!(
                out,
                r#"if (( BASH_VERSINFO[0] > 4 || (BASH_VERSINFO[0] == 4 && BASH_VERSINFO[1] >= 4) )); then
  __shrc_run_mark() {{
    __shrc_mark='\#'
    __shrc_mark=${{__shrc_mark@P}}
  }}
else
  __shrc_run_mark() {{
    __shrc_mark=$(HISTTIMEFORMAT= builtin history 1)
  }}
fi
__shrc_history_hook() {{
  local __shrc_rc=$? __shrc_mark __shrc_line
  __shrc_run_mark
  if [ "$__shrc_mark" != "${{__shrc_last_mark:-}}" ]; then
    __shrc_last_mark=$__shrc_mark
    __shrc_line=$(HISTTIMEFORMAT= builtin history 1)
    if [ -n "$__shrc_line" ]; then
      command {exe} log --pid "$$" --history-line -- "$__shrc_line"
    fi
  fi
  return $__shrc_rc
}}
__shrc_run_mark
__shrc_last_mark=$__shrc_mark
unset __shrc_mark
case ";${{PROMPT_COMMAND:-}};" in
  *";__shrc_history_hook;"*) ;;
  *) PROMPT_COMMAND="__shrc_history_hook${{PROMPT_COMMAND:+;$PROMPT_COMMAND}}" ;;
esac
"#
            );
        }
        Shell::Zsh => {
            let _ = write!(
                out,
                r#"__shrc_preexec() {{
  __shrc_pending=${{1:-$3}}
}}
__shrc_history_hook() {{
  local __shrc_rc=$?
  if [ -n "${{__shrc_pending+x}}" ]; then
    command {exe} log --pid "$$" -- "$__shrc_pending"
    unset __shrc_pending
  fi
  return $__shrc_rc
}}
unset __shrc_pending
if (( ${{preexec_functions[(Ie)__shrc_preexec]}} == 0 )); then
  preexec_functions+=(__shrc_preexec)
fi
if (( ${{precmd_functions[(Ie)__shrc_history_hook]}} == 0 )); then
  precmd_functions+=(__shrc_history_hook)
fi
"#
            );
        }
    }
}

fn render_navigation(out: &mut String, exe: &str) {
    let _ = write!(
        out,
        r#"cd() {{
  local __shrc_args
  __shrc_args=$(command {exe} cd-args -- "$@") || return
  eval "builtin cd $__shrc_args"
}}
mkcd() {{
  local __shrc_target __shrc_rc
  __shrc_target=$(command {exe} mkcd -- "$@")
  __shrc_rc=$?
  if [ -n "$__shrc_target" ]; then
    builtin cd -- "$__shrc_target" || return
  fi
  return $__shrc_rc
}}
cs() {{
  if [ "$#" -gt 0 ]; then
    cd "$@" || return
  fi
  command {exe} summary
}}
"#
    );
}

fn render_local_override(out: &mut String, config: &ShrcConfig) {
    let Some(path) = non_empty(config.rc.local_override.as_ref()) else {
        return;
    };
    let path = escape(&crate::paths::expand_tilde(path).to_string_lossy());
    let _ = writeln!(out, "if [ -f {path} ]; then . {path}; fi");
}

/// Shell identifier: letters, digits and `_`, not starting with a digit.
/// Alias names may also contain `-`.
fn is_valid_name(name: &str, allow_dash: bool) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || (allow_dash && c == '-'))
}
