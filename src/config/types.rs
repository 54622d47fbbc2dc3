use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths::expand_tilde;

/// The whole session configuration, assembled once at start-up and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrcConfig {
    pub env: EnvSection,
    pub history: HistorySection,
    pub navigator: NavigatorSection,
    pub summary: SummarySection,
    pub prompt: PromptSection,
    pub runtime: RuntimeSection,
    pub rc: RcSection,
    pub aliases: BTreeMap<String, String>,
}

impl Default for ShrcConfig {
    fn default() -> Self {
        let aliases = [
            ("ll", "ls -l"),
            ("la", "ls -A"),
            ("l", "ls -CF"),
            ("grep", "grep --color=auto"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            env: EnvSection::default(),
            history: HistorySection::default(),
            navigator: NavigatorSection::default(),
            summary: SummarySection::default(),
            prompt: PromptSection::default(),
            runtime: RuntimeSection::default(),
            rc: RcSection::default(),
            aliases,
        }
    }
}

/// Exported environment variables and the umask policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSection {
    pub editor: Option<String>,
    pub pager: Option<String>,
    /// Sort-order override (`LC_COLLATE`).
    pub lc_collate: Option<String>,
    pub lang: Option<String>,
    /// Match colours for grep (`GREP_COLORS`).
    pub grep_colors: Option<String>,
    pub umask: UmaskPolicy,
    /// Additional `NAME = "value"` exports, emitted in key order.
    pub extra: BTreeMap<String, String>,
}

impl Default for EnvSection {
    fn default() -> Self {
        Self {
            editor: Some("vim".to_string()),
            pager: Some("less".to_string()),
            lc_collate: Some("C".to_string()),
            lang: None,
            grep_colors: Some("mt=1;32".to_string()),
            umask: UmaskPolicy::UserPrivateGroup,
            extra: BTreeMap::new(),
        }
    }
}

/// How the session umask is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UmaskPolicy {
    /// `002` when the primary group is named after the user, `022` otherwise.
    UserPrivateGroup,
    Fixed(u32),
}

impl TryFrom<String> for UmaskPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "auto" {
            return Ok(Self::UserPrivateGroup);
        }
        match u32::from_str_radix(&value, 8) {
            Ok(mode) if mode <= 0o777 && !value.is_empty() => Ok(Self::Fixed(mode)),
            _ => Err(format!(
                "invalid umask {value:?}: expected \"auto\" or an octal mode like \"022\""
            )),
        }
    }
}

impl From<UmaskPolicy> for String {
    fn from(value: UmaskPolicy) -> Self {
        value.to_string()
    }
}

impl fmt::Display for UmaskPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserPrivateGroup => f.write_str("auto"),
            Self::Fixed(mode) => write!(f, "{mode:03o}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    pub enabled: bool,
    pub file: String,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "~/.bash_eternal_history".to_string(),
        }
    }
}

impl HistorySection {
    /// The eternal history file with `~` expanded.
    pub fn file_path(&self) -> PathBuf {
        expand_tilde(&self.file)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorSection {
    /// Where `mkcd` lands when creation fails. Unset: `$OLDPWD`, then home.
    pub mkcd_fallback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySection {
    pub clear_screen: bool,
    /// Rows kept free for the summary header and the next prompt.
    pub reserved_rows: u16,
}

impl Default for SummarySection {
    fn default() -> Self {
        Self {
            clear_screen: true,
            reserved_rows: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSection {
    pub color: ColorMode,
}

/// Optional version manager for a companion language runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    /// Sourced only when the file exists.
    pub manager_script: Option<String>,
    /// Version selected after sourcing the manager.
    pub version: Option<String>,
    /// Export `NODE_DISABLE_COLORS=1`.
    pub disable_colors: bool,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            manager_script: Some("~/.nvm/nvm.sh".to_string()),
            version: None,
            disable_colors: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcSection {
    /// Personal override file sourced at the very end, if present.
    pub local_override: Option<String>,
}

impl Default for RcSection {
    fn default() -> Self {
        Self {
            local_override: Some("~/.bashrc.local".to_string()),
        }
    }
}
