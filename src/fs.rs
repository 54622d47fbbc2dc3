use std::fs;
use std::path::Path;

/// Write a config file with restrictive permissions (0600 on Unix).
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_config_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(content.as_bytes())?;
    }
    #[cfg(not(unix))]
    {
        fs::write(path, content)?;
    }
    Ok(())
}

/// Create `path` and any missing parents. When `mode` is given, the leaf
/// directory ends up with exactly that mode regardless of the process umask;
/// intermediate directories get the default mode.
///
/// # Errors
///
/// Returns an error if any component cannot be created or the mode cannot be set.
pub fn create_dir_with_mode(path: &Path, mode: Option<u32>) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn write_config_file_creates_file_with_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        write_config_file(&path, "key = \"value\"").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "key = \"value\"");
    }

    #[test]
    #[cfg(unix)]
    fn write_config_file_sets_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.toml");
        write_config_file(&path, "").unwrap();
        let perms = fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }

    #[test]
    fn create_dir_with_mode_creates_intermediate_segments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c");
        create_dir_with_mode(&path, None).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    #[cfg(unix)]
    fn create_dir_with_mode_applies_exact_mode_to_leaf() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outer/leaf");
        create_dir_with_mode(&path, Some(0o750)).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o7777, 0o750);
    }
}
