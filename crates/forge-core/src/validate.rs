use crate::metadata::{SectionMetadata, VariableMetadata};
use crate::types::ValidationSeverity;
use crate::variables;
use regex::Regex;
use serde::Serialize;

/// Word threshold below which draft content draws a "seems short" warning.
const MIN_DRAFT_WORDS: usize = 10;
/// Character threshold below which draft content is flagged as minimal.
const MIN_MEANINGFUL_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// SectionValidation
// ---------------------------------------------------------------------------

/// The single validation result shape shared by the metadata-driven
/// validator, the draft validator, and the compliance tiers. Always derived
/// fresh from (content, metadata) — never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SectionValidation {
    pub section: String,
    pub is_valid: bool,
    pub severity: ValidationSeverity,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
    pub suggestions: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub unreplaced_variables: Vec<String>,
    pub word_count: usize,
    pub min_words: usize,
    pub completion_percentage: f64,
}

impl SectionValidation {
    pub(crate) fn new(section: &str, severity: ValidationSeverity, min_words: usize) -> Self {
        Self {
            section: section.to_string(),
            is_valid: true,
            severity,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            suggestions: Vec::new(),
            missing_keywords: Vec::new(),
            unreplaced_variables: Vec::new(),
            word_count: 0,
            min_words,
            completion_percentage: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Section validation
// ---------------------------------------------------------------------------

/// Validate section content against its resolved metadata.
///
/// The checks are applied in order but never short-circuit; each contributes
/// independently to the result. Only critical word-count shortfalls, missing
/// required keywords, and unreplaced placeholders invalidate the section.
pub fn validate_section(
    name: &str,
    content: &str,
    meta: &SectionMetadata,
) -> SectionValidation {
    let mut result = SectionValidation::new(name, meta.validation_severity, meta.min_words);
    result.word_count = content.split_whitespace().count();

    if result.word_count < meta.min_words {
        if meta.validation_severity == ValidationSeverity::Critical {
            result.is_valid = false;
            result.errors.push(format!(
                "Section '{name}' has {} words, minimum required is {}.",
                result.word_count, meta.min_words
            ));
        } else {
            result.warnings.push(format!(
                "Section '{name}' has {} words, recommended minimum is {}.",
                result.word_count, meta.min_words
            ));
        }
    }

    if let Some(max_words) = meta.max_words {
        if result.word_count > max_words {
            result.warnings.push(format!(
                "Section '{name}' has {} words, recommended maximum is {max_words}.",
                result.word_count
            ));
        }
    }

    let content_lower = content.to_lowercase();
    let missing_required: Vec<&String> = meta
        .keywords_required
        .iter()
        .filter(|kw| !content_lower.contains(&kw.to_lowercase()))
        .collect();
    if !missing_required.is_empty() {
        result.is_valid = false;
        result.missing_keywords = missing_required.iter().map(|s| s.to_string()).collect();
        result.errors.push(format!(
            "Missing required keywords in '{name}': {}",
            result.missing_keywords.join(", ")
        ));
    }

    let missing_recommended: Vec<&String> = meta
        .keywords_recommended
        .iter()
        .filter(|kw| !content_lower.contains(&kw.to_lowercase()))
        .collect();
    if !missing_recommended.is_empty() {
        let listed: Vec<&str> = missing_recommended.iter().map(|s| s.as_str()).collect();
        result.info.push(format!(
            "Consider including these keywords in '{name}': {}",
            listed.join(", ")
        ));
    }

    let unreplaced = variables::find_unreplaced_variables(content);
    if !unreplaced.is_empty() {
        result.is_valid = false;
        result.errors.push(format!(
            "Unreplaced variables in '{name}': {}",
            unreplaced.join(", ")
        ));
        result.unreplaced_variables = unreplaced;
    }

    result.completion_percentage = completion_percentage(
        result.word_count,
        meta.min_words,
        meta.keywords_required.len() + meta.keywords_recommended.len(),
        missing_required.len() + missing_recommended.len(),
    );

    result
}

/// Completion blends word-count sufficiency with keyword coverage.
fn completion_percentage(
    word_count: usize,
    min_words: usize,
    keyword_total: usize,
    keywords_missing: usize,
) -> f64 {
    let word_pct = if min_words > 0 {
        (word_count as f64 / min_words as f64 * 100.0).min(100.0)
    } else if word_count > 0 {
        100.0
    } else {
        0.0
    };

    let keyword_pct = if keyword_total > 0 {
        (keyword_total - keywords_missing) as f64 / keyword_total as f64 * 100.0
    } else {
        100.0
    };

    (word_pct + keyword_pct) / 2.0
}

// ---------------------------------------------------------------------------
// Draft validation
// ---------------------------------------------------------------------------

/// Light validation for in-progress content during generation: leftover
/// placeholders are errors, thin content draws warnings, and keyword
/// heuristics produce suggestions. No metadata involved.
pub fn validate_draft(name: &str, content: &str) -> SectionValidation {
    let mut result = SectionValidation::new(name, ValidationSeverity::Info, MIN_DRAFT_WORDS);
    result.word_count = content.split_whitespace().count();

    let unreplaced = variables::extract_variable_names(content);
    if !unreplaced.is_empty() {
        result.is_valid = false;
        result.errors.push(format!(
            "Unreplaced variables found: {}",
            unreplaced.join(", ")
        ));
        result.unreplaced_variables = unreplaced;
    }

    if result.word_count < MIN_DRAFT_WORDS {
        result.warnings.push(format!(
            "Section content seems short ({} words). Consider adding more detail for clarity.",
            result.word_count
        ));
    }

    if content.trim().chars().count() < MIN_MEANINGFUL_LENGTH {
        result.warnings.push(
            "Section content appears to be minimal. Adding more context may improve document quality."
                .to_string(),
        );
    }

    result.suggestions = content_suggestions(name, content);
    result.completion_percentage =
        completion_percentage(result.word_count, MIN_DRAFT_WORDS, 0, 0);
    result
}

/// Keyword-heuristic improvement suggestions keyed off the section name.
pub fn content_suggestions(name: &str, content: &str) -> Vec<String> {
    let name_lower = name.to_lowercase();
    let content_lower = content.to_lowercase();
    let mut suggestions = Vec::new();

    let lacks = |words: &[&str]| !words.iter().any(|w| content_lower.contains(w));

    if name_lower.contains("role") {
        if lacks(&["responsibility", "task", "goal", "objective", "you will", "you are"]) {
            suggestions.push(
                "Consider specifying clear responsibilities or objectives for this role."
                    .to_string(),
            );
        }
        if lacks(&["expert", "specialist", "professional"]) {
            suggestions
                .push("Consider establishing expertise level or domain specialization.".to_string());
        }
    }

    if name_lower.contains("input") {
        if lacks(&["provide", "given", "receive", "include", "expect"]) {
            suggestions
                .push("Consider specifying what inputs or data will be provided.".to_string());
        }
        if lacks(&["format", "structure", "type"]) {
            suggestions.push(
                "Consider describing the format or structure of expected inputs.".to_string(),
            );
        }
    }

    if name_lower.contains("output") || name_lower.contains("requirement") {
        if lacks(&["format", "structure", "include", "return", "produce"]) {
            suggestions
                .push("Consider specifying the expected output format or structure.".to_string());
        }
        if lacks(&["deliverable", "file", "document", "response"]) {
            suggestions.push("Consider specifying the type of deliverable expected.".to_string());
        }
    }

    if name_lower.contains("context") && lacks(&["background", "situation", "environment"]) {
        suggestions
            .push("Consider providing background information or situational context.".to_string());
    }

    if name_lower.contains("constraint") && lacks(&["must", "should", "cannot", "avoid", "limit"]) {
        suggestions.push("Consider clearly stating what must or must not be done.".to_string());
    }

    suggestions
}

// ---------------------------------------------------------------------------
// Variable validation
// ---------------------------------------------------------------------------

/// Validate one variable value against its metadata.
///
/// Without metadata only blankness is checked. With metadata, a blank
/// required value short-circuits; all other checks are additive. A malformed
/// validation pattern is skipped silently and never surfaces as an error.
pub fn validate_variable_value(
    name: &str,
    value: &str,
    meta: Option<&VariableMetadata>,
) -> (bool, Vec<String>) {
    let blank = value.trim().is_empty();

    let Some(meta) = meta else {
        if blank {
            return (false, vec![format!("Variable '{name}' cannot be empty.")]);
        }
        return (true, Vec::new());
    };

    if meta.required && blank {
        return (false, vec![format!("Variable '{name}' is required.")]);
    }
    if blank {
        return (true, Vec::new());
    }

    let mut errors = Vec::new();
    let length = value.chars().count();

    if let Some(min_length) = meta.min_length {
        if length < min_length {
            errors.push(format!(
                "Variable '{name}' must be at least {min_length} characters."
            ));
        }
    }
    if let Some(max_length) = meta.max_length {
        if length > max_length {
            errors.push(format!(
                "Variable '{name}' must be at most {max_length} characters."
            ));
        }
    }

    if let Some(pattern) = &meta.validation_pattern {
        // Anchored at the start, matching the original match-semantics.
        if let Ok(re) = Regex::new(&format!("^(?:{pattern})")) {
            if !re.is_match(value) {
                errors.push(format!("Variable '{name}' does not match required format."));
            }
        }
    }

    if !meta.options.is_empty() && matches!(meta.input_type.as_str(), "select" | "multiselect") {
        if meta.input_type == "multiselect" {
            for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                if !meta.options.iter().any(|o| o == part) {
                    errors.push(format!(
                        "Invalid value '{part}' for variable '{name}'. Valid options: {}",
                        meta.options.join(", ")
                    ));
                }
            }
        } else if !meta.options.iter().any(|o| o == value) {
            errors.push(format!(
                "Invalid value for variable '{name}'. Valid options: {}",
                meta.options.join(", ")
            ));
        }
    }

    (errors.is_empty(), errors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{canonical_profiles, SectionMetadata};
    use crate::types::ValidationSeverity;

    fn critical_meta(min_words: usize) -> SectionMetadata {
        SectionMetadata {
            min_words,
            validation_severity: ValidationSeverity::Critical,
            ..SectionMetadata::new("Your Role")
        }
    }

    #[test]
    fn short_critical_section_is_invalid() {
        let meta = critical_meta(20);
        let result = validate_section("Your Role", "Too short.", &meta);
        assert!(!result.is_valid);
        assert_eq!(result.word_count, 2);
        assert!(result.errors[0].contains("minimum required is 20"));
    }

    #[test]
    fn short_warning_section_stays_valid() {
        let meta = SectionMetadata::generic("Notes");
        let result = validate_section("Notes", "Brief.", &meta);
        assert!(result.is_valid);
        assert_eq!(result.errors.len(), 0);
        assert!(result.warnings[0].contains("recommended minimum"));
    }

    #[test]
    fn max_words_exceeded_is_warning_only() {
        let meta = SectionMetadata {
            min_words: 1,
            max_words: Some(3),
            ..SectionMetadata::new("Notes")
        };
        let result = validate_section("Notes", "one two three four five", &meta);
        assert!(result.is_valid);
        assert!(result.warnings[0].contains("recommended maximum is 3"));
    }

    #[test]
    fn missing_required_keyword_is_error() {
        let meta = SectionMetadata {
            min_words: 1,
            keywords_required: vec!["responsibility".to_string()],
            ..SectionMetadata::new("Your Role")
        };
        let result = validate_section("Your Role", "You are a developer.", &meta);
        assert!(!result.is_valid);
        assert_eq!(result.missing_keywords, vec!["responsibility"]);
        assert!(result.errors[0].contains("responsibility"));
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let meta = SectionMetadata {
            min_words: 1,
            keywords_required: vec!["Format".to_string()],
            ..SectionMetadata::new("Output Requirements")
        };
        let result = validate_section("Output Requirements", "Use JSON formatting.", &meta);
        assert!(result.is_valid);
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn missing_recommended_keyword_is_info_only() {
        let profiles = canonical_profiles();
        let meta = profiles.get("Input").unwrap();
        let content = "You will be handed a markdown file with at least fifteen words of content in it.";
        let result = validate_section("Input", content, meta);
        assert!(result.is_valid);
        assert!(result.info[0].contains("Consider including"));
    }

    #[test]
    fn unreplaced_variable_in_section_is_error() {
        let meta = SectionMetadata {
            min_words: 1,
            ..SectionMetadata::new("Input")
        };
        let result = validate_section("Input", "Process {{file}} carefully now.", &meta);
        assert!(!result.is_valid);
        assert_eq!(result.unreplaced_variables, vec!["file"]);
    }

    #[test]
    fn completion_blends_words_and_keywords() {
        let meta = SectionMetadata {
            min_words: 10,
            keywords_required: vec!["alpha".to_string(), "beta".to_string()],
            ..SectionMetadata::new("S")
        };
        // 5 of 10 words → 50%; 1 of 2 keywords → 50%; mean 50%.
        let result = validate_section("S", "alpha two three four five", &meta);
        assert!((result.completion_percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn completion_without_keywords_is_word_driven() {
        let meta = SectionMetadata {
            min_words: 4,
            ..SectionMetadata::new("S")
        };
        let result = validate_section("S", "one two", &meta);
        // 50% words, 100% keywords (none declared) → 75%.
        assert!((result.completion_percentage - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn completion_zero_min_words() {
        let meta = SectionMetadata {
            min_words: 0,
            ..SectionMetadata::new("S")
        };
        assert!(
            (validate_section("S", "word", &meta).completion_percentage - 100.0).abs()
                < f64::EPSILON
        );
        assert!(
            (validate_section("S", "", &meta).completion_percentage - 50.0).abs() < f64::EPSILON
        );
    }

    #[test]
    fn draft_flags_unreplaced_variables() {
        let result = validate_draft("Input", "Use {{tool}} on the data.");
        assert!(!result.is_valid);
        assert_eq!(result.unreplaced_variables, vec!["tool"]);
    }

    #[test]
    fn draft_short_content_warns_twice() {
        let result = validate_draft("Notes", "tiny");
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("seems short"));
        assert!(result.warnings[1].contains("minimal"));
    }

    #[test]
    fn draft_adds_role_suggestions() {
        let result = validate_draft("Your Role", "A developer persona for reviews.");
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.contains("responsibilities or objectives")));
    }

    #[test]
    fn suggestions_absent_when_keywords_present() {
        let content = "You are an expert developer. Your responsibility is code review.";
        let suggestions = content_suggestions("Your Role", content);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn constraint_suggestion_fires() {
        let suggestions = content_suggestions("Constraints", "Keep it simple.");
        assert!(suggestions[0].contains("must or must not"));
    }

    #[test]
    fn variable_without_metadata_rejects_blank() {
        let (ok, errors) = validate_variable_value("role", "  ", None);
        assert!(!ok);
        assert!(errors[0].contains("cannot be empty"));
        assert!(validate_variable_value("role", "dev", None).0);
    }

    #[test]
    fn required_blank_short_circuits() {
        let meta = VariableMetadata {
            min_length: Some(5),
            ..VariableMetadata::new("name")
        };
        let (ok, errors) = validate_variable_value("name", "", Some(&meta));
        assert!(!ok);
        assert_eq!(errors, vec!["Variable 'name' is required."]);
    }

    #[test]
    fn optional_blank_is_valid() {
        let meta = VariableMetadata {
            required: false,
            min_length: Some(5),
            ..VariableMetadata::new("name")
        };
        assert!(validate_variable_value("name", "", Some(&meta)).0);
    }

    #[test]
    fn length_checks_are_additive() {
        let meta = VariableMetadata {
            min_length: Some(10),
            validation_pattern: Some(r"\d+".to_string()),
            ..VariableMetadata::new("id")
        };
        let (ok, errors) = validate_variable_value("id", "abc", Some(&meta));
        assert!(!ok);
        // Both the length and the pattern failure are reported.
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn pattern_anchors_at_start() {
        let meta = VariableMetadata {
            validation_pattern: Some(r"\d{3}".to_string()),
            ..VariableMetadata::new("code")
        };
        assert!(validate_variable_value("code", "123abc", Some(&meta)).0);
        assert!(!validate_variable_value("code", "ab123", Some(&meta)).0);
    }

    #[test]
    fn malformed_pattern_is_skipped() {
        let meta = VariableMetadata {
            validation_pattern: Some("[unclosed".to_string()),
            ..VariableMetadata::new("x")
        };
        assert!(validate_variable_value("x", "anything", Some(&meta)).0);
    }

    #[test]
    fn select_requires_declared_option() {
        let meta = VariableMetadata {
            input_type: "select".to_string(),
            options: vec!["dev".to_string(), "prod".to_string()],
            ..VariableMetadata::new("env")
        };
        assert!(validate_variable_value("env", "dev", Some(&meta)).0);
        let (ok, errors) = validate_variable_value("env", "staging", Some(&meta));
        assert!(!ok);
        assert!(errors[0].contains("Valid options: dev, prod"));
    }

    #[test]
    fn multiselect_reports_each_bad_value() {
        let meta = VariableMetadata {
            input_type: "multiselect".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            ..VariableMetadata::new("tags")
        };
        let (ok, errors) = validate_variable_value("tags", "a, x, y", Some(&meta));
        assert!(!ok);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("'x'"));
        assert!(errors[1].contains("'y'"));
    }

    #[test]
    fn options_ignored_for_text_inputs() {
        let meta = VariableMetadata {
            options: vec!["a".to_string()],
            ..VariableMetadata::new("free")
        };
        assert!(validate_variable_value("free", "anything", Some(&meta)).0);
    }
}
