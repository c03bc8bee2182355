use crate::compliance;
use crate::error::{ForgeError, Result};
use crate::sections;
use crate::variables;
use crate::{io, paths};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A stored prompt template. The manifest carries the bookkeeping fields;
/// the markdown body (with frontmatter and placeholders) lives alongside it
/// in `template.md` and is treated as an immutable input by the parsing and
/// validation modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Agent roles this template is tagged for.
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_phase: Option<String>,
    pub version: String,
    /// Placeholder names detected in the body, cached at save time.
    #[serde(default)]
    pub variables: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Markdown body. Stored as `template.md`, not in the manifest.
    #[serde(skip)]
    pub content: String,
}

impl Template {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            roles: Vec::new(),
            workflow_phase: None,
            version: "1.0.0".to_string(),
            variables: variables::extract_variable_names(&content),
            active: true,
            created_at: now,
            updated_at: now,
            content,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(
        root: &Path,
        slug: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        if paths::template_dir(root, &slug).exists() {
            return Err(ForgeError::TemplateExists(slug));
        }

        let template = Self::new(slug, title, content);
        template.save(root)?;
        Ok(template)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::template_manifest(root, slug);
        if !manifest.exists() {
            return Err(ForgeError::TemplateNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let mut template: Template = serde_yaml::from_str(&data)?;
        template.content = std::fs::read_to_string(paths::template_content(root, slug))?;
        Ok(template)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::template_manifest(root, &self.slug), data.as_bytes())?;
        io::atomic_write(
            &paths::template_content(root, &self.slug),
            self.content.as_bytes(),
        )
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let templates_dir = root.join(paths::TEMPLATES_DIR);
        if !templates_dir.exists() {
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        for entry in std::fs::read_dir(&templates_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(t) => templates.push(t),
                    Err(ForgeError::TemplateNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(templates)
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    /// Replace the markdown body and refresh the cached variable names.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.variables = variables::extract_variable_names(&self.content);
        self.updated_at = Utc::now();
    }

    pub fn set_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
        self.updated_at = Utc::now();
    }

    pub fn archive(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Structural self-check of the template body: required headings present,
    /// placeholders detected, canonical sections listed.
    pub fn structure(&self) -> TemplateStructure {
        let (is_valid, missing) = sections::check_required_headings(&self.content);
        let detected = sections::detect_headings(&self.content)
            .into_iter()
            .map(|d| d.heading)
            .collect();
        let mut warnings = Vec::new();
        if self.variables.is_empty() {
            warnings.push("No variables found in template".to_string());
        }
        TemplateStructure {
            is_valid,
            missing_sections: missing,
            sections: detected,
            variables: variables::extract_variables(&self.content),
            warnings,
        }
    }

    /// Run the quick compliance tier against the raw template body.
    pub fn compliance(&self) -> compliance::ComplianceReport {
        compliance::validate_with_metadata(&self.content, &self.content)
    }
}

/// Structural validation summary for a template body.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateStructure {
    pub is_valid: bool,
    pub missing_sections: Vec<String>,
    pub sections: Vec<String>,
    pub variables: Vec<variables::TemplateVariable>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BODY: &str = "## Your Role\nYou are {{role}}.\n\n## Input\n[task]\n\n## Output Requirements\nMarkdown.\n";

    #[test]
    fn create_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let template = Template::create(dir.path(), "code-review", "Code Review", BODY).unwrap();
        assert_eq!(template.variables, vec!["role", "task"]);

        let loaded = Template::load(dir.path(), "code-review").unwrap();
        assert_eq!(loaded.title, "Code Review");
        assert_eq!(loaded.content, BODY);
        assert!(loaded.active);
        assert_eq!(loaded.version, "1.0.0");
    }

    #[test]
    fn create_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        Template::create(dir.path(), "qa", "QA", BODY).unwrap();
        assert!(matches!(
            Template::create(dir.path(), "qa", "QA Again", BODY),
            Err(ForgeError::TemplateExists(_))
        ));
    }

    #[test]
    fn create_rejects_bad_slug() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Template::create(dir.path(), "Bad Slug", "X", BODY),
            Err(ForgeError::InvalidSlug(_))
        ));
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Template::load(dir.path(), "ghost"),
            Err(ForgeError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn list_sorts_by_creation() {
        let dir = TempDir::new().unwrap();
        Template::create(dir.path(), "first", "First", BODY).unwrap();
        Template::create(dir.path(), "second", "Second", BODY).unwrap();
        let templates = Template::list(dir.path()).unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].slug, "first");
    }

    #[test]
    fn list_empty_without_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Template::list(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn set_content_refreshes_variables() {
        let mut template = Template::new("t", "T", BODY);
        template.set_content("New body with {{only_one}} placeholder.");
        assert_eq!(template.variables, vec!["only_one"]);
    }

    #[test]
    fn has_role_checks_tags() {
        let mut template = Template::new("t", "T", BODY);
        template.set_roles(vec!["qa".to_string(), "developer".to_string()]);
        assert!(template.has_role("qa"));
        assert!(!template.has_role("pm"));
    }

    #[test]
    fn structure_reports_sections_and_variables() {
        let template = Template::new("t", "T", BODY);
        let structure = template.structure();
        assert!(structure.is_valid);
        assert_eq!(structure.sections.len(), 3);
        assert_eq!(structure.variables.len(), 2);
    }

    #[test]
    fn structure_flags_missing_sections() {
        let template = Template::new("t", "T", "## Your Role\nOnly this.");
        let structure = template.structure();
        assert!(!structure.is_valid);
        assert_eq!(
            structure.missing_sections,
            vec!["## Input", "## Output Requirements"]
        );
        assert!(structure.warnings.iter().any(|w| w.contains("No variables")));
    }

    #[test]
    fn manifest_omits_content() {
        let dir = TempDir::new().unwrap();
        Template::create(dir.path(), "t", "T", BODY).unwrap();
        let manifest =
            std::fs::read_to_string(paths::template_manifest(dir.path(), "t")).unwrap();
        assert!(!manifest.contains("You are {{role}}"));
        assert!(manifest.contains("slug: t"));
    }
}
