use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ValidationSeverity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSeverity {
    Critical,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationSeverity::Critical => "critical",
            ValidationSeverity::Warning => "warning",
            ValidationSeverity::Info => "info",
        }
    }

    /// Lenient parse used for frontmatter values: unrecognized strings fall
    /// back to `Warning` rather than erroring, so malformed metadata degrades
    /// instead of failing the whole template.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "critical" => ValidationSeverity::Critical,
            "info" => ValidationSeverity::Info,
            _ => ValidationSeverity::Warning,
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValidationSeverity {
    type Err = crate::error::ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(ValidationSeverity::Critical),
            "warning" => Ok(ValidationSeverity::Warning),
            "info" => Ok(ValidationSeverity::Info),
            _ => Err(crate::error::ForgeError::InvalidSeverity(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// InputType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    #[default]
    Textarea,
    Text,
    Structured,
    Select,
    Multiselect,
    Checkbox,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Textarea => "textarea",
            InputType::Text => "text",
            InputType::Structured => "structured",
            InputType::Select => "select",
            InputType::Multiselect => "multiselect",
            InputType::Checkbox => "checkbox",
        }
    }

    /// Lenient parse for frontmatter values; unknown strings become
    /// `Textarea` (the original behavior for older templates).
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "text" => InputType::Text,
            "structured" => InputType::Structured,
            "select" => InputType::Select,
            "multiselect" => InputType::Multiselect,
            "checkbox" => InputType::Checkbox,
            _ => InputType::Textarea,
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InputType {
    type Err = crate::error::ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textarea" => Ok(InputType::Textarea),
            "text" => Ok(InputType::Text),
            "structured" => Ok(InputType::Structured),
            "select" => Ok(InputType::Select),
            "multiselect" => Ok(InputType::Multiselect),
            "checkbox" => Ok(InputType::Checkbox),
            _ => Err(crate::error::ForgeError::InvalidInputType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// VariableSyntax
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSyntax {
    DoubleBrace,
    SingleBracket,
}

impl VariableSyntax {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableSyntax::DoubleBrace => "double_brace",
            VariableSyntax::SingleBracket => "single_bracket",
        }
    }
}

impl fmt::Display for VariableSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StepStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    NotStarted,
    InProgress,
    Completed,
    HasErrors,
    HasWarnings,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::NotStarted => "not_started",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::HasErrors => "has_errors",
            StepStatus::HasWarnings => "has_warnings",
        }
    }

    /// A step counts toward the completed total once its content passes
    /// validation without errors.
    pub fn is_done(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::HasWarnings)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_roundtrip() {
        for sev in [
            ValidationSeverity::Critical,
            ValidationSeverity::Warning,
            ValidationSeverity::Info,
        ] {
            let parsed = ValidationSeverity::from_str(sev.as_str()).unwrap();
            assert_eq!(parsed, sev);
        }
    }

    #[test]
    fn severity_lossy_falls_back_to_warning() {
        assert_eq!(
            ValidationSeverity::from_str_lossy("CRITICAL"),
            ValidationSeverity::Critical
        );
        assert_eq!(
            ValidationSeverity::from_str_lossy("bogus"),
            ValidationSeverity::Warning
        );
        assert_eq!(
            ValidationSeverity::from_str_lossy(""),
            ValidationSeverity::Warning
        );
    }

    #[test]
    fn severity_strict_rejects_unknown() {
        assert!(ValidationSeverity::from_str("fatal").is_err());
    }

    #[test]
    fn input_type_lossy_falls_back_to_textarea() {
        assert_eq!(InputType::from_str_lossy("select"), InputType::Select);
        assert_eq!(InputType::from_str_lossy("SELECT"), InputType::Select);
        assert_eq!(InputType::from_str_lossy("dropdown"), InputType::Textarea);
    }

    #[test]
    fn input_type_default_is_textarea() {
        assert_eq!(InputType::default(), InputType::Textarea);
    }

    #[test]
    fn input_type_roundtrip() {
        for ty in [
            InputType::Textarea,
            InputType::Text,
            InputType::Structured,
            InputType::Select,
            InputType::Multiselect,
            InputType::Checkbox,
        ] {
            assert_eq!(InputType::from_str(ty.as_str()).unwrap(), ty);
        }
        assert!(InputType::from_str("dropdown").is_err());
    }

    #[test]
    fn step_status_serde_snake_case() {
        let json = serde_json::to_string(&StepStatus::HasWarnings).unwrap();
        assert_eq!(json, "\"has_warnings\"");
        let parsed: StepStatus = serde_json::from_str("\"not_started\"").unwrap();
        assert_eq!(parsed, StepStatus::NotStarted);
    }

    #[test]
    fn step_status_done() {
        assert!(StepStatus::Completed.is_done());
        assert!(StepStatus::HasWarnings.is_done());
        assert!(!StepStatus::HasErrors.is_done());
        assert!(!StepStatus::NotStarted.is_done());
        assert!(!StepStatus::InProgress.is_done());
    }

    #[test]
    fn variable_syntax_display() {
        assert_eq!(VariableSyntax::DoubleBrace.to_string(), "double_brace");
        assert_eq!(VariableSyntax::SingleBracket.to_string(), "single_bracket");
    }
}
