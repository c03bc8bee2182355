use crate::metadata::{self, SectionGuidance, SectionMetadata, VariableMetadata};
use crate::sections::{self, TemplateSection};
use crate::types::{StepStatus, ValidationSeverity};
use crate::validate::{self, SectionValidation};
use crate::variables;
use serde::Serialize;
use std::collections::BTreeMap;

/// Wizard steps show at most this much of the section's template content.
const ORIGINAL_CONTENT_PREVIEW: usize = 500;

// ---------------------------------------------------------------------------
// Wizard step types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Variable,
    Content,
}

/// One input prompt inside a wizard step.
#[derive(Debug, Clone, Serialize)]
pub struct StepQuestion {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub textarea: bool,
}

/// One unit of interactive input collection, corresponding to one detected
/// section of the template.
#[derive(Debug, Clone, Serialize)]
pub struct WizardStep {
    pub step_number: usize,
    pub section_name: String,
    pub level: usize,
    pub description: String,
    pub variables: Vec<String>,
    pub questions: Vec<StepQuestion>,
    pub original_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SectionMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<SectionGuidance>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variable_metadata: BTreeMap<String, VariableMetadata>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepState {
    pub step_number: usize,
    pub section_name: String,
    pub status: StepStatus,
    pub completion_percentage: f64,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Aggregated completion picture across all wizard steps plus the supplied
/// variable values.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionStatus {
    pub overall_completion: f64,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub is_ready_to_generate: bool,
    pub steps: Vec<StepState>,
    pub variable_errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Synthesize the input prompts for a section: one per variable, plus one
/// free-form content prompt for the section itself.
pub fn section_questions(section: &TemplateSection) -> Vec<StepQuestion> {
    let mut questions: Vec<StepQuestion> = section
        .variables
        .iter()
        .map(|var| StepQuestion {
            kind: QuestionKind::Variable,
            name: var.clone(),
            label: title_case(&var.replace('_', " ")),
            placeholder: format!("Enter value for {var}"),
            required: true,
            textarea: false,
        })
        .collect();

    questions.push(StepQuestion {
        kind: QuestionKind::Content,
        name: format!("section_{}", section.name.to_lowercase().replace(' ', "_")),
        label: format!("Content for '{}'", section.name),
        placeholder: if section.description.is_empty() {
            format!("Enter content for {}", section.name)
        } else {
            section.description.clone()
        },
        required: false,
        textarea: true,
    });

    questions
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

/// One wizard step per generically-detected section.
pub fn wizard_steps(text: &str) -> Vec<WizardStep> {
    sections::extract_sections(text)
        .iter()
        .enumerate()
        .map(|(i, section)| base_step(i, section))
        .collect()
}

/// Wizard steps enriched with resolved section metadata, guidance, and
/// per-variable metadata.
pub fn enhanced_wizard_steps(text: &str) -> Vec<WizardStep> {
    let resolved = metadata::resolve_section_metadata(text);
    let variable_metadata = metadata::parse_variable_metadata(text);

    sections::extract_sections(text)
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let mut step = base_step(i, section);
            let meta = resolved.get(&section.name);
            step.guidance = Some(metadata::section_guidance(&section.name, meta));
            step.metadata = meta.cloned();
            step.variable_metadata = section
                .variables
                .iter()
                .map(|var| {
                    let meta = variable_metadata.get(var).cloned().unwrap_or_else(|| {
                        VariableMetadata {
                            placeholder: format!("Enter value for {var}"),
                            ..VariableMetadata::new(var.clone())
                        }
                    });
                    (var.clone(), meta)
                })
                .collect();
            step
        })
        .collect()
}

fn base_step(index: usize, section: &TemplateSection) -> WizardStep {
    WizardStep {
        step_number: index + 1,
        section_name: section.name.clone(),
        level: section.level,
        description: section.description.clone(),
        variables: section.variables.clone(),
        questions: section_questions(section),
        original_content: preview(&section.content),
        metadata: None,
        guidance: None,
        variable_metadata: BTreeMap::new(),
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() > ORIGINAL_CONTENT_PREVIEW {
        let truncated: String = content.chars().take(ORIGINAL_CONTENT_PREVIEW).collect();
        format!("{truncated}...")
    } else {
        content.to_string()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a document from a template plus caller-supplied section content
/// and variable values.
///
/// Variables are substituted first, everywhere in the text. Caller content
/// for a section is appended after the section's existing template content
/// (first occurrence, literal replacement), with a draft-validation record
/// per touched section. A final whole-document scan reports any placeholders
/// that survived.
pub fn generate_document(
    template_text: &str,
    section_values: &BTreeMap<String, String>,
    variable_values: &BTreeMap<String, String>,
) -> (String, Vec<SectionValidation>) {
    let mut result = variables::substitute_variables(template_text, variable_values);
    let mut validations = Vec::new();

    for section in sections::extract_sections(&result) {
        let Some(user_content) = section_values.get(&section.name) else {
            continue;
        };
        if user_content.is_empty() {
            continue;
        }

        validations.push(validate::validate_draft(&section.name, user_content));

        if !section.content.trim().is_empty() {
            let merged = format!("{}\n\n{}", section.content, user_content);
            result = result.replacen(&section.content, &merged, 1);
        }
    }

    let unreplaced = variables::extract_variable_names(&result);
    if !unreplaced.is_empty() {
        let mut doc = SectionValidation::new("Document", ValidationSeverity::Info, 0);
        doc.is_valid = false;
        doc.errors.push(format!(
            "Document still contains unreplaced variables: {}",
            unreplaced.join(", ")
        ));
        doc.unreplaced_variables = unreplaced;
        validations.push(doc);
    }

    (result, validations)
}

// ---------------------------------------------------------------------------
// Section validation against a template
// ---------------------------------------------------------------------------

/// Metadata-aware validation of one section's content, resolving rules from
/// the template and adding improvement suggestions. Used for real-time
/// feedback while a document is being filled in.
pub fn validate_section_in_template(
    section_name: &str,
    content: &str,
    template_text: &str,
) -> SectionValidation {
    let resolved = metadata::resolve_section_metadata(template_text);
    let generic;
    let meta = match resolved.get(section_name) {
        Some(meta) => meta,
        None => {
            generic = SectionMetadata::generic(section_name);
            &generic
        }
    };

    let mut validation = validate::validate_section(section_name, content, meta);
    validation.suggestions = validate::content_suggestions(section_name, content);
    validation
}

// ---------------------------------------------------------------------------
// Completion status
// ---------------------------------------------------------------------------

/// Classify every wizard step against the caller's current section content
/// and aggregate error/warning totals. Step state is computed fresh on every
/// call — the caller owns the in-progress content, not this module.
pub fn completion_status(
    steps: &[WizardStep],
    section_values: &BTreeMap<String, String>,
    variable_values: &BTreeMap<String, String>,
    template_text: &str,
) -> CompletionStatus {
    let variable_metadata = metadata::parse_variable_metadata(template_text);

    let mut step_states = Vec::with_capacity(steps.len());
    let mut total_completion = 0.0;
    let mut total_errors = 0;
    let mut total_warnings = 0;
    let mut completed_steps = 0;

    for step in steps {
        let content = section_values
            .get(&step.section_name)
            .map(String::as_str)
            .unwrap_or("");
        let validation = validate_section_in_template(&step.section_name, content, template_text);

        let status = if content.trim().is_empty() {
            StepStatus::NotStarted
        } else if !validation.errors.is_empty() {
            total_errors += validation.errors.len();
            StepStatus::HasErrors
        } else if !validation.warnings.is_empty() {
            total_warnings += validation.warnings.len();
            completed_steps += 1;
            StepStatus::HasWarnings
        } else {
            completed_steps += 1;
            StepStatus::Completed
        };

        total_completion += validation.completion_percentage;
        step_states.push(StepState {
            step_number: step.step_number,
            section_name: step.section_name.clone(),
            status,
            completion_percentage: validation.completion_percentage,
            error_count: validation.errors.len(),
            warning_count: validation.warnings.len(),
        });
    }

    let overall_completion = if steps.is_empty() {
        0.0
    } else {
        round1(total_completion / steps.len() as f64)
    };

    let mut variable_errors = Vec::new();
    for (name, value) in variable_values {
        let (_, errors) =
            validate::validate_variable_value(name, value, variable_metadata.get(name));
        variable_errors.extend(errors);
    }

    CompletionStatus {
        overall_completion,
        completed_steps,
        total_steps: steps.len(),
        is_ready_to_generate: total_errors == 0 && variable_errors.is_empty(),
        total_errors: total_errors + variable_errors.len(),
        total_warnings,
        steps: step_states,
        variable_errors,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
