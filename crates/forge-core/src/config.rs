use crate::error::Result;
use crate::{io, paths};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// RoleDef
// ---------------------------------------------------------------------------

/// An agent role templates can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDef {
    pub key: String,
    pub label: String,
}

impl RoleDef {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Compliance score a generated document should reach.
    #[serde(default = "default_min_score")]
    pub min_score: u32,
    /// Word count under which a document is considered short.
    #[serde(default = "default_min_document_words")]
    pub min_document_words: usize,
}

fn default_min_score() -> u32 {
    70
}

fn default_min_document_words() -> usize {
    50
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            min_document_words: default_min_document_words(),
        }
    }
}

// ---------------------------------------------------------------------------
// ForgeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    pub project: ProjectConfig,
    #[serde(default = "default_roles")]
    pub roles: Vec<RoleDef>,
    #[serde(default = "default_workflow_phases")]
    pub workflow_phases: Vec<String>,
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn default_roles() -> Vec<RoleDef> {
    vec![
        RoleDef::new("orchestrator", "Orchestrator"),
        RoleDef::new("analyst", "Business Analyst"),
        RoleDef::new("pm", "Product Manager"),
        RoleDef::new("architect", "Solution Architect"),
        RoleDef::new("scrum_master", "Scrum Master"),
        RoleDef::new("developer", "Developer"),
        RoleDef::new("qa", "QA Engineer"),
    ]
}

fn default_workflow_phases() -> Vec<String> {
    ["planning", "development", "review", "deployment"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ForgeConfig {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            roles: default_roles(),
            workflow_phases: default_workflow_phases(),
            validation: ValidationConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(crate::error::ForgeError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Load the project config, falling back to defaults when the project
    /// has not been initialized.
    pub fn load_or_default(root: &Path) -> Self {
        Self::load(root).unwrap_or_else(|_| {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string());
            Self::new(name)
        })
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::config_path(root), data.as_bytes())
    }

    pub fn role_keys(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.key.as_str()).collect()
    }

    pub fn has_role(&self, key: &str) -> bool {
        self.roles.iter().any(|r| r.key == key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_config_has_default_roles() {
        let cfg = ForgeConfig::new("proj");
        assert_eq!(cfg.roles.len(), 7);
        assert!(cfg.has_role("qa"));
        assert!(cfg.has_role("scrum_master"));
        assert!(!cfg.has_role("wizard"));
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cfg = ForgeConfig::new("proj");
        cfg.save(dir.path()).unwrap();

        let loaded = ForgeConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.project.name, "proj");
        assert_eq!(loaded.validation.min_score, 70);
        assert_eq!(loaded.workflow_phases.len(), 4);
    }

    #[test]
    fn load_uninitialized_errors() {
        let dir = TempDir::new().unwrap();
        assert!(ForgeConfig::load(dir.path()).is_err());
    }

    #[test]
    fn load_or_default_uses_dir_name() {
        let dir = TempDir::new().unwrap();
        let cfg = ForgeConfig::load_or_default(dir.path());
        assert!(!cfg.project.name.is_empty());
        assert_eq!(cfg.validation.min_document_words, 50);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".forge")).unwrap();
        std::fs::write(
            dir.path().join(".forge/config.yaml"),
            "project:\n  name: partial\n",
        )
        .unwrap();

        let cfg = ForgeConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.project.name, "partial");
        assert_eq!(cfg.roles.len(), 7);
        assert_eq!(cfg.validation.min_score, 70);
    }
}
