//! Locating the config file.

use std::path::{Path, PathBuf};

/// File names recognized as formflow configuration, in lookup order.
pub const CONFIG_FILE_NAMES: &[&str] = &["formflow.yaml", "formflow.yml", "formflow.toml"];

/// Walk up from `start` looking for a config file.
///
/// Returns the first match in the nearest directory, or `None` once the
/// filesystem root is reached.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;

    let mut current = start.as_path();
    loop {
        if let Some(found) = CONFIG_FILE_NAMES
            .iter()
            .map(|name| current.join(name))
            .find(|candidate| candidate.is_file())
        {
            return Some(found);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return None,
        }
    }
}
