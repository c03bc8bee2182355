use crate::error::{ForgeError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const FORGE_DIR: &str = ".forge";
pub const TEMPLATES_DIR: &str = ".forge/templates";
pub const PROMPTS_DIR: &str = ".forge/prompts";

pub const CONFIG_FILE: &str = ".forge/config.yaml";
pub const MANIFEST_FILE: &str = "manifest.yaml";
pub const TEMPLATE_FILE: &str = "template.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn forge_dir(root: &Path) -> PathBuf {
    root.join(FORGE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn template_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(TEMPLATES_DIR).join(slug)
}

pub fn template_manifest(root: &Path, slug: &str) -> PathBuf {
    template_dir(root, slug).join(MANIFEST_FILE)
}

pub fn template_content(root: &Path, slug: &str) -> PathBuf {
    template_dir(root, slug).join(TEMPLATE_FILE)
}

pub fn prompt_path(root: &Path, id: &str) -> PathBuf {
    root.join(PROMPTS_DIR).join(format!("{id}.yaml"))
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(ForgeError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
