//! `mkcd [MODE] DIR`: create a directory (with an optional octal mode) and
//! hand its path back to the shell to enter.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

/// Parsed `mkcd` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MkcdRequest {
    pub mode: Option<u32>,
    pub dir: PathBuf,
}

/// Parse `[MODE] DIR`.
///
/// # Errors
///
/// Returns an error for a missing directory, too many arguments, or a mode
/// that is not an octal number no larger than `7777`.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> anyhow::Result<MkcdRequest> {
    match args {
        [dir] => Ok(MkcdRequest {
            mode: None,
            dir: PathBuf::from(dir.as_ref()),
        }),
        [mode, dir] => Ok(MkcdRequest {
            mode: Some(parse_mode(mode.as_ref())?),
            dir: PathBuf::from(dir.as_ref()),
        }),
        [] => anyhow::bail!("usage: mkcd [MODE] DIR"),
        _ => anyhow::bail!("usage: mkcd [MODE] DIR (got {} arguments)", args.len()),
    }
}

/// Parse an octal permission string such as `755` or `0700`.
///
/// # Errors
///
/// Returns an error if `raw` is empty, not octal, or above `7777`.
pub fn parse_mode(raw: &str) -> anyhow::Result<u32> {
    let mode = u32::from_str_radix(raw, 8)
        .with_context(|| format!("invalid mode {raw:?}: expected octal like 755"))?;
    anyhow::ensure!(mode <= 0o7777, "invalid mode {raw:?}: larger than 7777");
    Ok(mode)
}

/// What `mkcd` did, and where the shell should go next.
#[derive(Debug)]
pub enum MkcdOutcome {
    /// Already a directory; left untouched.
    Existing(PathBuf),
    Created(PathBuf),
    /// Creation failed; the shell lands on `target` instead.
    Fallback {
        target: PathBuf,
        error: anyhow::Error,
    },
}

impl MkcdOutcome {
    /// The path the shell should change into.
    pub fn target(&self) -> &Path {
        match self {
            Self::Existing(p) | Self::Created(p) => p,
            Self::Fallback { target, .. } => target,
        }
    }

    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Fallback { .. })
    }
}

/// Create `request.dir` unless it is already a directory.
///
/// Never fails: a creation error becomes [`MkcdOutcome::Fallback`] pointing at
/// `fallback`.
pub fn make_dir(request: &MkcdRequest, fallback: &Path) -> MkcdOutcome {
    let dir = &request.dir;
    if dir.is_dir() {
        return MkcdOutcome::Existing(dir.clone());
    }
    match crate::fs::create_dir_with_mode(dir, request.mode) {
        Ok(()) => MkcdOutcome::Created(dir.clone()),
        Err(e) => MkcdOutcome::Fallback {
            target: fallback.to_path_buf(),
            error: anyhow::Error::new(e).context(format!("cannot create {}", dir.display())),
        },
    }
}

/// Where `mkcd` lands after a failed creation: the configured location, else
/// the previous directory (`$OLDPWD`), else home, else `.`.
pub fn fallback_location(configured: Option<&str>) -> PathBuf {
    if let Some(path) = configured.filter(|p| !p.is_empty()) {
        return crate::paths::expand_tilde(path);
    }
    if let Some(old) = std::env::var_os("OLDPWD").filter(|p| !p.is_empty()) {
        return PathBuf::from(old);
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;

    // --- parse_args ---

    #[test]
    fn parse_dir_only() {
        let req = parse_args(&["build"]).unwrap();
        assert_eq!(req.mode, None);
        assert_eq!(req.dir, PathBuf::from("build"));
    }

    #[test]
    fn parse_mode_then_dir() {
        let req = parse_args(&["755", "public"]).unwrap();
        assert_eq!(req.mode, Some(0o755));
        assert_eq!(req.dir, PathBuf::from("public"));
    }

    #[test]
    fn parse_leading_zero_mode() {
        assert_eq!(parse_mode("0700").unwrap(), 0o700);
        assert_eq!(parse_mode("1777").unwrap(), 0o1777);
    }

    #[test]
    fn parse_rejects_bad_modes() {
        assert!(parse_mode("789").is_err());
        assert!(parse_mode("rwx").is_err());
        assert!(parse_mode("").is_err());
        assert!(parse_mode("17777").is_err());
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        let none: [&str; 0] = [];
        assert!(parse_args(&none).is_err());
        assert!(parse_args(&["755", "a", "b"]).is_err());
    }

    // --- make_dir ---

    #[test]
    fn existing_dir_is_left_untouched() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("keep");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("file.txt"), "content").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700)).unwrap();
        }

        let outcome = make_dir(
            &MkcdRequest {
                mode: Some(0o755),
                dir: dir.clone(),
            },
            tmp.path(),
        );

        assert!(matches!(outcome, MkcdOutcome::Existing(_)));
        assert_eq!(outcome.target(), dir.as_path());
        assert_eq!(std::fs::read_to_string(dir.join("file.txt")).unwrap(), "content");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&dir).unwrap().permissions().mode();
            assert_eq!(mode & 0o7777, 0o700, "mode must not change");
        }
    }

    #[test]
    fn missing_dir_is_created_recursively() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a/b/c");

        let outcome = make_dir(
            &MkcdRequest {
                mode: None,
                dir: dir.clone(),
            },
            tmp.path(),
        );

        assert!(matches!(outcome, MkcdOutcome::Created(_)));
        assert!(outcome.is_success());
        assert!(dir.is_dir());
    }

    #[test]
    #[cfg(unix)]
    fn mode_is_applied_to_new_dir() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("web");

        let outcome = make_dir(
            &MkcdRequest {
                mode: Some(0o755),
                dir: dir.clone(),
            },
            tmp.path(),
        );

        assert!(outcome.is_success());
        let mode = std::fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o7777, 0o755);
    }

    #[test]
    fn creation_failure_falls_back() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("plain-file");
        std::fs::write(&blocker, "").unwrap();
        let fallback = tmp.path().join("safe");

        let outcome = make_dir(
            &MkcdRequest {
                mode: None,
                dir: blocker.join("child"),
            },
            &fallback,
        );

        assert!(!outcome.is_success());
        assert_eq!(outcome.target(), fallback.as_path());
        let MkcdOutcome::Fallback { error, .. } = outcome else {
            unreachable!("checked above");
        };
        assert!(format!("{error:#}").contains("cannot create"));
    }

    // --- fallback_location ---

    #[test]
    #[serial]
    fn fallback_prefers_configured_location() {
        assert_eq!(fallback_location(Some("/srv/scratch")), PathBuf::from("/srv/scratch"));
    }

    #[test]
    #[serial]
    fn fallback_uses_oldpwd_when_unconfigured() {
        // SAFETY: test-only env mutation; #[serial] prevents races.
        unsafe { std::env::set_var("OLDPWD", "/previous/place") };
        let got = fallback_location(None);
        unsafe { std::env::remove_var("OLDPWD") };
        assert_eq!(got, PathBuf::from("/previous/place"));
    }

    #[test]
    #[serial]
    fn fallback_ignores_empty_configured_value() {
        // SAFETY: test-only env mutation; #[serial] prevents races.
        unsafe { std::env::set_var("OLDPWD", "/prev") };
        let got = fallback_location(Some(""));
        unsafe { std::env::remove_var("OLDPWD") };
        assert_eq!(got, PathBuf::from("/prev"));
    }
}
