use crate::error::{ForgeError, Result};
use crate::{io, paths};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// GeneratedPrompt
// ---------------------------------------------------------------------------

/// A generated document persisted for history. The core produces the data;
/// this record just freezes one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    pub id: String,
    pub template_slug: String,
    pub content: String,
    #[serde(default)]
    pub variable_values: BTreeMap<String, String>,
    pub is_compliant: bool,
    pub score: u32,
    pub created_at: DateTime<Utc>,
}

impl GeneratedPrompt {
    pub fn new(
        template_slug: impl Into<String>,
        content: impl Into<String>,
        variable_values: BTreeMap<String, String>,
        is_compliant: bool,
        score: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            template_slug: template_slug.into(),
            content: content.into(),
            variable_values,
            is_compliant,
            score,
            created_at: Utc::now(),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::prompt_path(root, &self.id), data.as_bytes())
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let path = paths::prompt_path(root, id);
        if !path.exists() {
            return Err(ForgeError::PromptNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// All stored prompts, newest first.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let prompts_dir = root.join(paths::PROMPTS_DIR);
        if !prompts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut prompts = Vec::new();
        for entry in std::fs::read_dir(&prompts_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let data = std::fs::read_to_string(&path)?;
                if let Ok(prompt) = serde_yaml::from_str::<GeneratedPrompt>(&data) {
                    prompts.push(prompt);
                }
            }
        }
        prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(prompts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
