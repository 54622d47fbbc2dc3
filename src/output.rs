/// Print a Serialize value as pretty JSON, logging errors to stderr.
pub fn print_json(value: &(impl serde::Serialize + ?Sized)) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("[shrc] JSON serialization error: {e}"),
    }
}

/// Returns `true` when `var` is set to a truthy value (`1`, `true`, `yes`).
pub fn env_flag(var: &str) -> bool {
    std::env::var(var)
        .ok()
        .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes"))
}

/// Verbose diagnostics requested through the environment (`SHRC_VERBOSE`).
pub fn env_verbose() -> bool {
    env_flag("SHRC_VERBOSE")
}

/// Debug diagnostics requested through the environment (`SHRC_DEBUG`).
pub fn env_debug() -> bool {
    env_flag("SHRC_DEBUG")
}
