//! Runtime configuration
//!
//! The database location comes from `UMC_DATABASE_PATH`, falling back to
//! `data/umc.db` under the project root.

use std::path::{Path, PathBuf};

/// Environment variable overriding the database location
pub const DATABASE_PATH_VAR: &str = "UMC_DATABASE_PATH";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));
            default_database_path(&exe_dir)
        })
}

/// `<root>/data/umc.db`, where a `target/{debug,release}` executable
/// directory is walked back up to the project root
pub fn default_database_path(exe_dir: &Path) -> PathBuf {
    let mut path = exe_dir.to_path_buf();

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(Path::parent) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("umc.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_leaves_target_dir() {
        let path = default_database_path(Path::new("/work/umc/target/release"));
        assert_eq!(path, PathBuf::from("/work/umc/data/umc.db"));

        let path = default_database_path(Path::new("/work/umc/target/debug"));
        assert_eq!(path, PathBuf::from("/work/umc/data/umc.db"));
    }

    #[test]
    fn test_default_path_next_to_installed_binary() {
        let path = default_database_path(Path::new("/usr/local/bin"));
        assert_eq!(path, PathBuf::from("/usr/local/bin/data/umc.db"));
    }
}
