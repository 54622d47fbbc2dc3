pub mod types;

use std::path::{Path, PathBuf};

use anyhow::Context;

use types::ShrcConfig;

/// Where a configuration layer comes from, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    User,
    Override,
}

impl LayerKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Override => "override",
        }
    }
}

/// Build the layer list in priority order:
/// 1. `{user_dir}/config.toml` (`SHRC_HOME` or the platform config dir)
/// 2. the explicit override file (`--config` / `SHRC_CONFIG`), if any
///
/// Built-in defaults sit beneath both and are not listed.
pub fn layer_paths(explicit: Option<&Path>) -> Vec<(LayerKind, PathBuf)> {
    let mut layers = Vec::new();
    if let Some(user) = crate::paths::user_config_file() {
        layers.push((LayerKind::User, user));
    }
    if let Some(path) = explicit {
        layers.push((LayerKind::Override, path.to_path_buf()));
    }
    layers
}

/// Load the effective configuration using the auto-detected layers.
///
/// # Errors
///
/// Returns an error if a layer exists but cannot be read, is not valid TOML,
/// or the merged result does not match the configuration schema.
pub fn load(explicit: Option<&Path>, verbose: bool) -> anyhow::Result<ShrcConfig> {
    let layers: Vec<PathBuf> = layer_paths(explicit)
        .into_iter()
        .map(|(_, path)| path)
        .collect();
    load_from(&layers, verbose)
}

/// Merge `layers` (lowest priority first) over the built-in defaults.
/// Missing files are skipped.
///
/// # Errors
///
/// See [`load`].
pub fn load_from(layers: &[PathBuf], verbose: bool) -> anyhow::Result<ShrcConfig> {
    let mut merged = match toml::Value::try_from(ShrcConfig::default())
        .context("serialize built-in defaults")?
    {
        toml::Value::Table(t) => t,
        _ => anyhow::bail!("built-in defaults did not serialize to a table"),
    };

    for path in layers {
        let Some(layer) = read_layer(path)? else {
            if verbose {
                eprintln!("[shrc] config layer not found: {}", path.display());
            }
            continue;
        };
        if verbose {
            eprintln!("[shrc] config layer loaded: {}", path.display());
        }
        merge_tables(&mut merged, layer);
    }

    toml::Value::Table(merged)
        .try_into()
        .context("invalid configuration")
}

/// Read one layer. Returns `Ok(None)` if the file does not exist.
fn read_layer(path: &Path) -> anyhow::Result<Option<toml::Table>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("failed to read config file: {}", path.display())));
        }
    };
    let table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(Some(table))
}

/// Deep-merge `overlay` into `base`: nested tables merge key by key, every
/// other value (arrays included) replaces the base value.
pub(crate) fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Commented starter file written by `shrc config init`.
pub const STARTER_CONFIG: &str = r#"# shrc user configuration. Every key is optional; unset keys keep their
# built-in defaults. Set a string to "" to disable it.

[env]
# editor = "vim"
# pager = "less"
# lc_collate = "C"
# lang = "en_US.UTF-8"
# grep_colors = "mt=1;32"
# umask = "auto"        # or an octal mode such as "022"

# [env.extra]
# GOPATH = "~/go"

[history]
# enabled = true
# file = "~/.bash_eternal_history"

[navigator]
# mkcd_fallback = "~/tmp"

[summary]
# clear_screen = true
# reserved_rows = 4

[prompt]
# color = "auto"        # auto | always | never

[runtime]
# manager_script = "~/.nvm/nvm.sh"
# version = "20"
# disable_colors = true

[rc]
# local_override = "~/.bashrc.local"

[aliases]
# ll = "ls -l"
"#;
