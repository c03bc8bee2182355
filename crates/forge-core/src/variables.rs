use crate::types::VariableSyntax;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Placeholder patterns
// ---------------------------------------------------------------------------

static DOUBLE_BRACE_RE: OnceLock<Regex> = OnceLock::new();
static SINGLE_BRACKET_RE: OnceLock<Regex> = OnceLock::new();
static BARE_NAME_RE: OnceLock<Regex> = OnceLock::new();

/// `{{NAME}}` or `{{NAME:default}}` — default is everything after the first
/// colon up to the closing braces.
fn double_brace_re() -> &'static Regex {
    DOUBLE_BRACE_RE.get_or_init(|| Regex::new(r"\{\{(\w+)(?::([^}]+))?\}\}").unwrap())
}

/// `[NAME]` — word characters only, so prose brackets like `[1.]` or
/// `[see below]` never qualify.
fn single_bracket_re() -> &'static Regex {
    SINGLE_BRACKET_RE.get_or_init(|| Regex::new(r"\[(\w+)\]").unwrap())
}

/// Bare placeholder forms only: `{{NAME}}` | `[NAME]`. Used by the
/// name-oriented views; a default-bearing `{{NAME:x}}` is only surfaced by
/// the positional extractor.
fn bare_name_re() -> &'static Regex {
    BARE_NAME_RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}|\[(\w+)\]").unwrap())
}

// ---------------------------------------------------------------------------
// TemplateVariable
// ---------------------------------------------------------------------------

/// One placeholder occurrence in template text. Identity for summary views
/// is by `name`; the extractor itself returns one record per occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    pub syntax: VariableSyntax,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract every placeholder occurrence from `text`, double-brace matches
/// first, then single-bracket. Both syntaxes may coexist in one document.
pub fn extract_variables(text: &str) -> Vec<TemplateVariable> {
    let mut variables = Vec::new();

    for caps in double_brace_re().captures_iter(text) {
        let whole = caps.get(0).unwrap();
        variables.push(TemplateVariable {
            name: caps[1].to_string(),
            syntax: VariableSyntax::DoubleBrace,
            start: whole.start(),
            end: whole.end(),
            default_value: caps.get(2).map(|m| m.as_str().to_string()),
        });
    }

    for caps in single_bracket_re().captures_iter(text) {
        let whole = caps.get(0).unwrap();
        variables.push(TemplateVariable {
            name: caps[1].to_string(),
            syntax: VariableSyntax::SingleBracket,
            start: whole.start(),
            end: whole.end(),
            default_value: None,
        });
    }

    variables
}

/// Sorted, de-duplicated names of bare placeholders (`{{NAME}}` / `[NAME]`).
pub fn extract_variable_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = bare_name_re()
        .captures_iter(text)
        .map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

// ---------------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------------

/// Substitute values into both placeholder syntaxes everywhere in `text`.
///
/// Replacement is literal string replacement, not regex: a name that is a
/// prefix of another name can partially collide, and `{{NAME:default}}`
/// occurrences are left untouched. Both quirks are kept for wire
/// compatibility with existing templates.
pub fn substitute_variables(text: &str, values: &BTreeMap<String, String>) -> String {
    let mut result = text.to_string();
    for (name, value) in values {
        result = result.replace(&format!("{{{{{name}}}}}"), value);
        result = result.replace(&format!("[{name}]"), value);
    }
    result
}

/// Names whose literal `{{name}}` or `[name]` form is still present in
/// `text` — i.e. placeholders that survived substitution.
pub fn find_unreplaced_variables(text: &str) -> Vec<String> {
    extract_variable_names(text)
        .into_iter()
        .filter(|name| {
            text.contains(&format!("{{{{{name}}}}}")) || text.contains(&format!("[{name}]"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
