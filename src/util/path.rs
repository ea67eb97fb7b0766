use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}` in a user-supplied path.
/// Unresolvable variables leave the input unchanged.
pub fn expand_path(path: &str) -> PathBuf {
    shellexpand::full(path)
        .map(|s| PathBuf::from(s.as_ref()))
        .unwrap_or_else(|_| PathBuf::from(path))
}

/// Directory holding `records`, used to look up the local config file.
/// A bare file name resolves to the current directory.
pub fn records_dir(records: &Path) -> &Path {
    match records.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_dir_of_bare_file_is_cwd() {
        assert_eq!(records_dir(Path::new("org.toml")), Path::new("."));
        assert_eq!(records_dir(Path::new("data/org.toml")), Path::new("data"));
    }

    #[test]
    fn test_expand_path_without_variables_is_identity() {
        assert_eq!(expand_path("data/org.toml"), PathBuf::from("data/org.toml"));
    }
}
