use crate::sections;
use crate::types::{InputType, ValidationSeverity};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// StructuredField
// ---------------------------------------------------------------------------

/// One structured input field declared inside a section's metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredField {
    pub name: String,
    pub field_type: String,
    pub options: Vec<String>,
    pub required: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_pattern: Option<String>,
}

impl StructuredField {
    fn from_yaml(map: &Mapping) -> Self {
        Self {
            name: get_str(map, "name").unwrap_or_default(),
            field_type: get_str(map, "type").unwrap_or_else(|| "text".to_string()),
            options: get_str_list(map, "options"),
            required: get_bool(map, "required").unwrap_or(false),
            description: get_str(map, "description").unwrap_or_default(),
            default_value: get_str(map, "default"),
            validation_pattern: get_str(map, "validation"),
        }
    }
}

// ---------------------------------------------------------------------------
// SectionMetadata
// ---------------------------------------------------------------------------

/// Validation rules and input configuration for one template section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionMetadata {
    pub name: String,
    pub required: bool,
    pub min_words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
    pub input_type: InputType,
    pub help_text: String,
    pub keywords_required: Vec<String>,
    pub keywords_recommended: Vec<String>,
    pub validation_severity: ValidationSeverity,
    pub examples: Vec<String>,
    pub structured_fields: Vec<StructuredField>,
    pub placeholder: String,
}

impl SectionMetadata {
    /// Field defaults for a frontmatter-declared section with absent keys.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            min_words: 10,
            max_words: None,
            input_type: InputType::Textarea,
            help_text: String::new(),
            keywords_required: Vec::new(),
            keywords_recommended: Vec::new(),
            validation_severity: ValidationSeverity::Warning,
            examples: Vec::new(),
            structured_fields: Vec::new(),
            placeholder: String::new(),
        }
    }

    /// The fallback profile used for headings outside the canonical set.
    pub fn generic(name: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::new(name)
        }
    }

    fn from_yaml(name: &str, map: &Mapping) -> Self {
        let mut meta = Self::new(name);
        if let Some(required) = get_bool(map, "required") {
            meta.required = required;
        }
        if let Some(min_words) = get_usize(map, "min_words") {
            meta.min_words = min_words;
        }
        meta.max_words = get_usize(map, "max_words");
        if let Some(input_type) = get_str(map, "input_type") {
            meta.input_type = InputType::from_str_lossy(&input_type);
        }
        meta.help_text = get_str(map, "help_text").unwrap_or_default();
        meta.keywords_required = get_str_list(map, "keywords_required");
        meta.keywords_recommended = get_str_list(map, "keywords_recommended");
        if let Some(severity) = get_str(map, "validation_severity") {
            meta.validation_severity = ValidationSeverity::from_str_lossy(&severity);
        }
        meta.examples = get_str_list(map, "examples");
        if let Some(Value::Sequence(fields)) = map.get(Value::from("structured_fields")) {
            meta.structured_fields = fields
                .iter()
                .filter_map(|v| v.as_mapping().map(StructuredField::from_yaml))
                .collect();
        }
        meta.placeholder = get_str(map, "placeholder").unwrap_or_default();
        meta
    }
}

// ---------------------------------------------------------------------------
// VariableMetadata
// ---------------------------------------------------------------------------

/// Validation rules for one template variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableMetadata {
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub input_type: String,
    pub options: Vec<String>,
    pub help_text: String,
    pub placeholder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl VariableMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: true,
            validation_pattern: None,
            default_value: None,
            input_type: "text".to_string(),
            options: Vec::new(),
            help_text: String::new(),
            placeholder: String::new(),
            min_length: None,
            max_length: None,
        }
    }

    fn from_yaml(name: &str, map: &Mapping) -> Self {
        let mut meta = Self::new(name);
        meta.description = get_str(map, "description").unwrap_or_default();
        if let Some(required) = get_bool(map, "required") {
            meta.required = required;
        }
        meta.validation_pattern = get_str(map, "validation");
        meta.default_value = get_str(map, "default");
        // Both `input_type` and the shorter `type` key are accepted.
        if let Some(input_type) = get_str(map, "input_type").or_else(|| get_str(map, "type")) {
            meta.input_type = input_type;
        }
        meta.options = get_str_list(map, "options");
        meta.help_text = get_str(map, "help_text").unwrap_or_default();
        meta.placeholder = get_str(map, "placeholder").unwrap_or_default();
        meta.min_length = get_usize(map, "min_length");
        meta.max_length = get_usize(map, "max_length");
        meta
    }
}

// ---------------------------------------------------------------------------
// Frontmatter parsing
// ---------------------------------------------------------------------------

/// Split an optional leading `---`-delimited YAML block off `text`.
///
/// Returns the parsed mapping and the remaining (trimmed) body. A missing
/// closing delimiter leaves the text untouched; malformed YAML degrades to an
/// empty mapping with the block still consumed. Bad metadata means
/// "no metadata", never an error.
pub fn parse_frontmatter(text: &str) -> (Mapping, String) {
    let stripped = text.trim_start();
    let mut lines = stripped.lines();

    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return (Mapping::new(), text.to_string()),
    }

    let rest: Vec<&str> = lines.collect();
    let Some(close) = rest.iter().position(|line| line.trim() == "---") else {
        return (Mapping::new(), text.to_string());
    };

    let yaml_block = rest[..close].join("\n");
    let remainder = rest[close + 1..].join("\n").trim().to_string();

    let mapping = match serde_yaml::from_str::<Value>(&yaml_block) {
        Ok(Value::Mapping(map)) => map,
        _ => Mapping::new(),
    };

    (mapping, remainder)
}

/// Typed section metadata from the frontmatter `sections:` sub-map.
/// Entries that are not mappings are skipped.
pub fn parse_section_metadata(text: &str) -> BTreeMap<String, SectionMetadata> {
    let (frontmatter, _) = parse_frontmatter(text);
    sub_mappings(&frontmatter, "sections")
        .map(|(name, map)| (name.clone(), SectionMetadata::from_yaml(&name, map)))
        .collect()
}

/// Typed variable metadata from the frontmatter `variables:` sub-map.
pub fn parse_variable_metadata(text: &str) -> BTreeMap<String, VariableMetadata> {
    let (frontmatter, _) = parse_frontmatter(text);
    sub_mappings(&frontmatter, "variables")
        .map(|(name, map)| (name.clone(), VariableMetadata::from_yaml(&name, map)))
        .collect()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve metadata for every section detected in `text` through the
/// three-tier fallback: explicit frontmatter entry, then the built-in
/// canonical profile, then a generic default for unrecognized headings.
/// This keeps templates authored before metadata existed validating sensibly.
pub fn resolve_section_metadata(text: &str) -> BTreeMap<String, SectionMetadata> {
    let declared = parse_section_metadata(text);
    let profiles = canonical_profiles();
    let mut resolved = BTreeMap::new();

    for detected in sections::detect_headings(text) {
        let meta = declared
            .get(&detected.name)
            .cloned()
            .or_else(|| profiles.get(detected.name.as_str()).cloned())
            .unwrap_or_else(|| SectionMetadata::generic(&detected.name));
        resolved.insert(detected.name, meta);
    }

    // Headings outside the canonical vocabulary still get an entry so their
    // content is validated instead of ignored. Case variants of an already
    // resolved canonical heading stay with the canonical entry.
    for section in sections::extract_sections(text) {
        if resolved.keys().any(|k| k.eq_ignore_ascii_case(&section.name)) {
            continue;
        }
        let meta = declared
            .get(&section.name)
            .cloned()
            .unwrap_or_else(|| SectionMetadata::generic(&section.name));
        resolved.insert(section.name, meta);
    }

    resolved
}

/// Built-in default profiles for the nine canonical sections.
pub fn canonical_profiles() -> BTreeMap<&'static str, SectionMetadata> {
    let mut profiles = BTreeMap::new();

    profiles.insert(
        "Your Role",
        SectionMetadata {
            min_words: 20,
            validation_severity: ValidationSeverity::Critical,
            help_text: "Define the AI persona and primary responsibilities.".to_string(),
            keywords_recommended: strings(&["responsibility", "expertise", "role", "task"]),
            ..SectionMetadata::new("Your Role")
        },
    );
    profiles.insert(
        "Input",
        SectionMetadata {
            min_words: 15,
            validation_severity: ValidationSeverity::Critical,
            help_text: "Specify what information or data will be provided.".to_string(),
            keywords_recommended: strings(&["provide", "given", "receive", "include"]),
            ..SectionMetadata::new("Input")
        },
    );
    profiles.insert(
        "Output Requirements",
        SectionMetadata {
            min_words: 20,
            validation_severity: ValidationSeverity::Critical,
            help_text: "Define the expected output format and structure.".to_string(),
            keywords_recommended: strings(&["format", "structure", "output", "return", "produce"]),
            ..SectionMetadata::new("Output Requirements")
        },
    );
    profiles.insert(
        "Context",
        SectionMetadata {
            help_text: "Provide background information and context.".to_string(),
            ..SectionMetadata::generic("Context")
        },
    );
    profiles.insert(
        "Constraints",
        SectionMetadata {
            help_text: "Define any limitations or restrictions.".to_string(),
            ..SectionMetadata::generic("Constraints")
        },
    );
    profiles.insert(
        "Examples",
        SectionMetadata {
            validation_severity: ValidationSeverity::Info,
            help_text: "Provide examples of expected input/output.".to_string(),
            ..SectionMetadata::generic("Examples")
        },
    );
    profiles.insert(
        "Step-by-Step Instructions",
        SectionMetadata {
            help_text: "Break down the process into clear steps.".to_string(),
            ..SectionMetadata::generic("Step-by-Step Instructions")
        },
    );
    profiles.insert(
        "Success Criteria",
        SectionMetadata {
            help_text: "Define how success will be measured.".to_string(),
            ..SectionMetadata::generic("Success Criteria")
        },
    );
    profiles.insert(
        "Notes",
        SectionMetadata {
            min_words: 5,
            validation_severity: ValidationSeverity::Info,
            help_text: "Additional notes and considerations.".to_string(),
            ..SectionMetadata::generic("Notes")
        },
    );

    profiles
}

// ---------------------------------------------------------------------------
// Guidance
// ---------------------------------------------------------------------------

/// Contextual guidance shown to a user filling out a section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionGuidance {
    pub section_name: String,
    pub help_text: String,
    pub min_words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
    pub required: bool,
    pub examples: Vec<String>,
    pub keywords_required: Vec<String>,
    pub keywords_recommended: Vec<String>,
    pub input_type: InputType,
    pub structured_fields: Vec<StructuredField>,
    pub placeholder: String,
    pub validation_severity: ValidationSeverity,
}

/// Guidance for a section. An unknown name yields a generic record rather
/// than an error.
pub fn section_guidance(name: &str, metadata: Option<&SectionMetadata>) -> SectionGuidance {
    match metadata {
        Some(meta) => SectionGuidance {
            section_name: name.to_string(),
            help_text: meta.help_text.clone(),
            min_words: meta.min_words,
            max_words: meta.max_words,
            required: meta.required,
            examples: meta.examples.clone(),
            keywords_required: meta.keywords_required.clone(),
            keywords_recommended: meta.keywords_recommended.clone(),
            input_type: meta.input_type,
            structured_fields: meta.structured_fields.clone(),
            placeholder: meta.placeholder.clone(),
            validation_severity: meta.validation_severity,
        },
        None => SectionGuidance {
            section_name: name.to_string(),
            help_text: format!("Enter content for the {name} section."),
            min_words: 10,
            max_words: None,
            required: false,
            examples: Vec::new(),
            keywords_required: Vec::new(),
            keywords_recommended: Vec::new(),
            input_type: InputType::Textarea,
            structured_fields: Vec::new(),
            placeholder: String::new(),
            validation_severity: ValidationSeverity::Warning,
        },
    }
}

// ---------------------------------------------------------------------------
// YAML helpers
// ---------------------------------------------------------------------------

fn get_str(map: &Mapping, key: &str) -> Option<String> {
    match map.get(Value::from(key)) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

fn get_bool(map: &Mapping, key: &str) -> Option<bool> {
    map.get(Value::from(key)).and_then(Value::as_bool)
}

fn get_usize(map: &Mapping, key: &str) -> Option<usize> {
    map.get(Value::from(key))
        .and_then(Value::as_u64)
        .map(|n| n as usize)
}

fn get_str_list(map: &Mapping, key: &str) -> Vec<String> {
    match map.get(Value::from(key)) {
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn sub_mappings<'a>(
    frontmatter: &'a Mapping,
    key: &str,
) -> impl Iterator<Item = (String, &'a Mapping)> {
    frontmatter
        .get(Value::from(key))
        .and_then(Value::as_mapping)
        .into_iter()
        .flat_map(|map| {
            map.iter().filter_map(|(k, v)| {
                Some((k.as_str()?.to_string(), v.as_mapping()?))
            })
        })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_FRONTMATTER: &str = "---\nsections:\n  Your Role:\n    min_words: 30\n    keywords_required:\n      - responsibility\n    validation_severity: critical\nvariables:\n  PROJECT:\n    description: Project name\n    required: true\n    type: select\n    options:\n      - alpha\n      - beta\n---\n## Your Role\nYou are {{PROJECT}} lead.\n";

    #[test]
    fn parse_frontmatter_splits_block_and_body() {
        let (fm, body) = parse_frontmatter(WITH_FRONTMATTER);
        assert!(fm.contains_key(Value::from("sections")));
        assert!(body.starts_with("## Your Role"));
    }

    #[test]
    fn parse_frontmatter_without_block_returns_text_unchanged() {
        let text = "## Your Role\nplain";
        let (fm, body) = parse_frontmatter(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn parse_frontmatter_unclosed_returns_text_unchanged() {
        let text = "---\nsections:\n  foo: bar\nno closing delimiter";
        let (fm, body) = parse_frontmatter(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn parse_frontmatter_bad_yaml_degrades_to_empty() {
        let text = "---\n: : :\n  - [broken\n---\n## Body\n";
        let (fm, body) = parse_frontmatter(text);
        assert!(fm.is_empty());
        assert_eq!(body, "## Body");
    }

    #[test]
    fn parse_frontmatter_tolerates_leading_whitespace() {
        let text = "\n\n---\ntitle: x\n---\nbody";
        let (fm, body) = parse_frontmatter(text);
        assert!(fm.contains_key(Value::from("title")));
        assert_eq!(body, "body");
    }

    #[test]
    fn section_metadata_from_frontmatter() {
        let meta = parse_section_metadata(WITH_FRONTMATTER);
        let role = meta.get("Your Role").unwrap();
        assert_eq!(role.min_words, 30);
        assert_eq!(role.keywords_required, vec!["responsibility"]);
        assert_eq!(role.validation_severity, ValidationSeverity::Critical);
        // Absent keys keep their defaults.
        assert!(role.required);
        assert_eq!(role.input_type, InputType::Textarea);
    }

    #[test]
    fn variable_metadata_accepts_type_alias() {
        let meta = parse_variable_metadata(WITH_FRONTMATTER);
        let project = meta.get("PROJECT").unwrap();
        assert_eq!(project.input_type, "select");
        assert_eq!(project.options, vec!["alpha", "beta"]);
        assert_eq!(project.description, "Project name");
    }

    #[test]
    fn non_mapping_section_entries_are_skipped() {
        let text = "---\nsections:\n  Good:\n    min_words: 3\n  Bad: just-a-string\n---\nbody";
        let meta = parse_section_metadata(text);
        assert!(meta.contains_key("Good"));
        assert!(!meta.contains_key("Bad"));
    }

    #[test]
    fn resolve_prefers_frontmatter_over_profile() {
        let resolved = resolve_section_metadata(WITH_FRONTMATTER);
        let role = resolved.get("Your Role").unwrap();
        assert_eq!(role.min_words, 30);
        assert_eq!(role.keywords_required, vec!["responsibility"]);
    }

    #[test]
    fn resolve_uses_builtin_profiles_without_frontmatter() {
        let text = "## Your Role\nx\n\n## Input\ny\n\n## Output Requirements\nz\n\n## Notes\nn\n";
        let resolved = resolve_section_metadata(text);
        assert_eq!(resolved.get("Your Role").unwrap().min_words, 20);
        assert_eq!(
            resolved.get("Your Role").unwrap().validation_severity,
            ValidationSeverity::Critical
        );
        assert_eq!(resolved.get("Input").unwrap().min_words, 15);
        assert_eq!(resolved.get("Output Requirements").unwrap().min_words, 20);
        assert_eq!(resolved.get("Notes").unwrap().min_words, 5);
        assert_eq!(
            resolved.get("Notes").unwrap().validation_severity,
            ValidationSeverity::Info
        );
        assert!(!resolved.get("Notes").unwrap().required);
    }

    #[test]
    fn resolve_synthesizes_generic_default_for_unknown_heading() {
        let resolved = resolve_section_metadata("## Random Notes Thing\nsome content here\n");
        let meta = resolved.get("Random Notes Thing").unwrap();
        assert!(!meta.required);
        assert_eq!(meta.min_words, 10);
        assert_eq!(meta.validation_severity, ValidationSeverity::Warning);
    }

    #[test]
    fn resolve_only_covers_detected_sections() {
        let resolved = resolve_section_metadata("## Input\nonly input\n");
        assert!(resolved.contains_key("Input"));
        assert!(!resolved.contains_key("Your Role"));
    }

    #[test]
    fn guidance_with_metadata_mirrors_fields() {
        let profiles = canonical_profiles();
        let guidance = section_guidance("Your Role", profiles.get("Your Role"));
        assert_eq!(guidance.min_words, 20);
        assert!(guidance.required);
        assert!(guidance.help_text.contains("persona"));
        assert_eq!(guidance.keywords_recommended.len(), 4);
    }

    #[test]
    fn guidance_for_unknown_section_is_generic() {
        let guidance = section_guidance("Mystery", None);
        assert_eq!(guidance.min_words, 10);
        assert!(!guidance.required);
        assert_eq!(guidance.help_text, "Enter content for the Mystery section.");
    }

    #[test]
    fn structured_fields_parse() {
        let text = "---\nsections:\n  Input:\n    input_type: structured\n    structured_fields:\n      - name: env\n        type: select\n        options: [dev, prod]\n        required: true\n---\nbody";
        let meta = parse_section_metadata(text);
        let input = meta.get("Input").unwrap();
        assert_eq!(input.input_type, InputType::Structured);
        assert_eq!(input.structured_fields.len(), 1);
        assert_eq!(input.structured_fields[0].name, "env");
        assert_eq!(input.structured_fields[0].options, vec!["dev", "prod"]);
        assert!(input.structured_fields[0].required);
    }
}
