use crate::metadata;
use crate::sections::{self, DetectedHeading};
use crate::types::ValidationSeverity;
use crate::validate::{self, SectionValidation};
use crate::variables;
use serde::Serialize;
use std::collections::BTreeMap;

/// Documents under this many words draw a score deduction in the quick tier.
const MIN_DOCUMENT_WORDS: usize = 50;

const MISSING_SECTION_PENALTY: i64 = 20;
const UNREPLACED_VARIABLE_PENALTY: i64 = 15;
const SECTION_ERROR_PENALTY: i64 = 10;
const SECTION_WARNING_PENALTY: i64 = 2;
const SHORT_DOCUMENT_PENALTY: i64 = 5;

// ---------------------------------------------------------------------------
// ComplianceReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct VariableResult {
    pub variable: String,
    pub is_valid: bool,
    pub error: String,
}

/// Unified compliance report produced by both validation tiers. The quick
/// tier leaves the metadata-derived fields (section results, completion)
/// empty; consumers serialize whichever view they need.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub is_compliant: bool,
    /// 0–100, deduction-based.
    pub score: u32,
    pub missing_sections: Vec<String>,
    pub unreplaced_variables: Vec<String>,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
    pub section_results: Vec<SectionValidation>,
    pub variable_results: Vec<VariableResult>,
    pub completion_percentage: f64,
}

impl ComplianceReport {
    fn new() -> Self {
        Self {
            is_compliant: true,
            score: 100,
            missing_sections: Vec::new(),
            unreplaced_variables: Vec::new(),
            issues: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            section_results: Vec::new(),
            variable_results: Vec::new(),
            completion_percentage: 0.0,
        }
    }
}

fn clamp_score(score: i64) -> u32 {
    score.clamp(0, 100) as u32
}

// ---------------------------------------------------------------------------
// Quick tier
// ---------------------------------------------------------------------------

/// Fixed-rule compliance check of a finished document: the three required
/// headings must be present and no placeholder may survive. A short document
/// only docks the score — it never fails compliance on its own.
pub fn validate_document(text: &str) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    let mut score: i64 = 100;

    let (_, missing) = sections::check_required_headings(text);
    for heading in &missing {
        score -= MISSING_SECTION_PENALTY;
        report.issues.push(format!("Missing required section: {heading}"));
    }
    report.missing_sections = missing;

    let unreplaced = variables::find_unreplaced_variables(text);
    if !unreplaced.is_empty() {
        score -= UNREPLACED_VARIABLE_PENALTY * unreplaced.len() as i64;
        report.issues.push(format!(
            "Unreplaced variables detected: {}",
            unreplaced.join(", ")
        ));
        report.unreplaced_variables = unreplaced;
    }

    let word_count = text.split_whitespace().count();
    if word_count < MIN_DOCUMENT_WORDS {
        score -= SHORT_DOCUMENT_PENALTY;
        report
            .warnings
            .push(format!("Document is relatively short ({word_count} words)"));
    }

    report.is_compliant =
        report.missing_sections.is_empty() && report.unreplaced_variables.is_empty();
    report.score = clamp_score(score);
    report
}

/// Terse pass/fail view of the quick tier.
pub fn quick_validate(text: &str) -> (bool, Vec<String>) {
    let mut issues = Vec::new();

    let (_, missing) = sections::check_required_headings(text);
    for heading in missing {
        issues.push(format!("Missing {heading}"));
    }

    let unreplaced = variables::find_unreplaced_variables(text);
    if !unreplaced.is_empty() {
        issues.push(format!("Unreplaced variables: {}", unreplaced.join(", ")));
    }

    (issues.is_empty(), issues)
}

// ---------------------------------------------------------------------------
// Metadata-aware tier
// ---------------------------------------------------------------------------

/// Metadata-aware compliance: resolve section rules from the template, slice
/// the document into per-section content by position, and aggregate the
/// per-section validations into one scored report.
///
/// A required section counts as missing only when its extracted content is
/// blank; weak content is validated (and may fail on word count) instead.
pub fn validate_with_metadata(document: &str, template: &str) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    let mut score: i64 = 100;

    let resolved = metadata::resolve_section_metadata(template);
    let contents = section_contents(document);

    let mut total_completion = 0.0;
    let mut validated = 0usize;

    for (name, meta) in &resolved {
        let content = contents.get(name).map(String::as_str).unwrap_or("");

        if meta.required && content.trim().is_empty() {
            report.is_compliant = false;
            score -= MISSING_SECTION_PENALTY;
            report
                .issues
                .push(format!("Missing required section: {name}"));
            report.missing_sections.push(heading_for(name));

            let mut entry = validate::validate_section(name, "", meta);
            entry.is_valid = false;
            entry.errors = vec!["Required section is missing".to_string()];
            entry.warnings.clear();
            entry.info.clear();
            entry.completion_percentage = 0.0;
            report.section_results.push(entry);
            continue;
        }

        let validation = validate::validate_section(name, content, meta);
        if !validation.is_valid {
            report.is_compliant = false;
            score -= SECTION_ERROR_PENALTY * validation.errors.len() as i64;
            report.issues.extend(validation.errors.iter().cloned());
        }
        score -= SECTION_WARNING_PENALTY * validation.warnings.len() as i64;
        report.warnings.extend(validation.warnings.iter().cloned());
        report.info.extend(validation.info.iter().cloned());

        total_completion += validation.completion_percentage;
        validated += 1;
        report.section_results.push(validation);
    }

    if validated > 0 {
        report.completion_percentage = total_completion / validated as f64;
    }

    let unreplaced = variables::find_unreplaced_variables(document);
    if !unreplaced.is_empty() {
        report.is_compliant = false;
        score -= UNREPLACED_VARIABLE_PENALTY * unreplaced.len() as i64;
        report
            .issues
            .push(format!("Unreplaced variables: {}", unreplaced.join(", ")));
        for variable in &unreplaced {
            report.variable_results.push(VariableResult {
                variable: variable.clone(),
                is_valid: false,
                error: "Variable not replaced".to_string(),
            });
        }
        report.unreplaced_variables = unreplaced;
    }

    report.score = clamp_score(score);
    report
}

/// Slice a document into per-section content. Sections come from both
/// scanners — canonical headings first, then generic headings that aren't
/// case variants of an already detected canonical one — ordered by position,
/// with each section's content running to the start of the next.
fn section_contents(document: &str) -> BTreeMap<String, String> {
    let mut spans: Vec<(String, usize, usize)> = sections::detect_headings(document)
        .into_iter()
        .map(|DetectedHeading { name, start, end, .. }| (name, start, end))
        .collect();

    for section in sections::extract_sections(document) {
        if spans.iter().any(|(n, _, _)| n.eq_ignore_ascii_case(&section.name)) {
            continue;
        }
        let heading_end = document[section.start..]
            .find('\n')
            .map(|i| section.start + i)
            .unwrap_or(document.len());
        spans.push((section.name, section.start, heading_end));
    }

    spans.sort_by_key(|&(_, start, _)| start);

    let mut contents = BTreeMap::new();
    for (i, (name, _, end)) in spans.iter().enumerate() {
        let content_end = spans
            .get(i + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(document.len());
        let content = document[*end..content_end].trim().to_string();
        contents.insert(name.clone(), content);
    }
    contents
}

/// Canonical heading form for a section name, for missing-section reports.
fn heading_for(name: &str) -> String {
    sections::all_headings()
        .find(|h| sections::clean_heading(h) == name)
        .map(str::to_string)
        .unwrap_or_else(|| name.to_string())
}

// ---------------------------------------------------------------------------
// Role fit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RoleCheck {
    pub role: String,
    pub is_valid: bool,
    pub severity: ValidationSeverity,
    pub message: String,
    pub expected_keywords: Vec<String>,
}

fn role_keywords(role: &str) -> &'static [&'static str] {
    match role {
        "orchestrator" => &["orchestrator", "coordination", "oversight", "workflow"],
        "analyst" => &["analyst", "analysis", "data", "insights"],
        "pm" => &["project manager", "product owner", "stakeholder"],
        "architect" => &["architect", "architecture", "design", "system"],
        "scrum_master" => &["scrum master", "agile", "sprint", "ceremony"],
        "developer" => &["developer", "engineer", "code", "implementation"],
        "qa" => &["qa", "quality assurance", "tester", "testing"],
        _ => &[],
    }
}

/// Check whether a document reads as appropriate for an agent role by
/// scanning for the role's keyword vocabulary.
pub fn validate_for_role(text: &str, role: &str) -> RoleCheck {
    let keywords = role_keywords(role);
    let text_lower = text.to_lowercase();
    let found = keywords.iter().any(|kw| text_lower.contains(kw));

    if found {
        RoleCheck {
            role: role.to_string(),
            is_valid: true,
            severity: ValidationSeverity::Info,
            message: format!("Prompt appears appropriate for {role} role"),
            expected_keywords: Vec::new(),
        }
    } else {
        RoleCheck {
            role: role.to_string(),
            is_valid: false,
            severity: ValidationSeverity::Warning,
            message: format!("Prompt may not be appropriately scoped for {role} role"),
            expected_keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
