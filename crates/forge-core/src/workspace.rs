use crate::config::ForgeConfig;
use crate::error::Result;
use crate::{io, paths};
use std::path::Path;

/// Outcome of initializing a project workspace.
#[derive(Debug)]
pub struct InitOutcome {
    pub config: ForgeConfig,
    pub created_config: bool,
}

/// Create the `.forge/` layout and write a default config if missing.
/// Idempotent: re-running on an initialized project changes nothing.
pub fn init(root: &Path) -> Result<InitOutcome> {
    for dir in [paths::FORGE_DIR, paths::TEMPLATES_DIR, paths::PROMPTS_DIR] {
        io::ensure_dir(&root.join(dir))?;
    }

    let config_path = paths::config_path(root);
    if config_path.exists() {
        return Ok(InitOutcome {
            config: ForgeConfig::load(root)?,
            created_config: false,
        });
    }

    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    let config = ForgeConfig::new(project_name);
    config.save(root)?;

    Ok(InitOutcome {
        config,
        created_config: true,
    })
}

/// True once `forge init` has been run under `root`.
pub fn is_initialized(root: &Path) -> bool {
    paths::config_path(root).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_layout_and_config() {
        let dir = TempDir::new().unwrap();
        let outcome = init(dir.path()).unwrap();
        assert!(outcome.created_config);
        assert!(dir.path().join(".forge/templates").is_dir());
        assert!(dir.path().join(".forge/prompts").is_dir());
        assert!(is_initialized(dir.path()));
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        init(dir.path()).unwrap();
        let second = init(dir.path()).unwrap();
        assert!(!second.created_config);
    }

    #[test]
    fn uninitialized_detected() {
        let dir = TempDir::new().unwrap();
        assert!(!is_initialized(dir.path()));
    }
}
