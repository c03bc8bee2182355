use crate::variables;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Canonical headings
// ---------------------------------------------------------------------------

/// The three headings every compliant document must carry.
pub const REQUIRED_HEADINGS: [&str; 3] = ["## Your Role", "## Input", "## Output Requirements"];

/// Headings that are recognized but optional.
pub const OPTIONAL_HEADINGS: [&str; 6] = [
    "## Context",
    "## Constraints",
    "## Examples",
    "## Step-by-Step Instructions",
    "## Success Criteria",
    "## Notes",
];

pub fn all_headings() -> impl Iterator<Item = &'static str> {
    REQUIRED_HEADINGS.iter().chain(OPTIONAL_HEADINGS.iter()).copied()
}

/// Strip the `## ` markdown prefix from a canonical heading.
pub fn clean_heading(heading: &str) -> &str {
    heading.strip_prefix("## ").unwrap_or(heading).trim()
}

// ---------------------------------------------------------------------------
// Canonical scan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedHeading {
    /// Literal heading text, e.g. `"## Your Role"`.
    pub heading: String,
    /// Heading without the markdown prefix, e.g. `"Your Role"`.
    pub name: String,
    /// Span of the matched heading text itself, not its content.
    pub start: usize,
    pub end: usize,
}

static HEADING_MATCHERS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();

fn heading_matchers() -> &'static [(&'static str, Regex)] {
    HEADING_MATCHERS.get_or_init(|| {
        all_headings()
            .map(|h| {
                let re = Regex::new(&format!("(?i){}", regex::escape(h))).unwrap();
                (h, re)
            })
            .collect()
    })
}

/// Detect canonical headings by case-insensitive substring search for the
/// literal `"## Name"` text. This is intentionally NOT the generic heading
/// scanner: compliance checking keys off the first textual occurrence of the
/// heading string wherever it appears, and the two scanners must stay
/// separate because they serve different consumers.
pub fn detect_headings(text: &str) -> Vec<DetectedHeading> {
    heading_matchers()
        .iter()
        .filter_map(|(heading, re)| {
            re.find(text).map(|m| DetectedHeading {
                heading: heading.to_string(),
                name: clean_heading(heading).to_string(),
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}

/// Check that all three required headings are present. Missing entries keep
/// their `"## "` prefix for reporting.
pub fn check_required_headings(text: &str) -> (bool, Vec<String>) {
    let detected = detect_headings(text);
    let missing: Vec<String> = REQUIRED_HEADINGS
        .iter()
        .filter(|h| !detected.iter().any(|d| d.heading == **h))
        .map(|h| h.to_string())
        .collect();
    (missing.is_empty(), missing)
}

// ---------------------------------------------------------------------------
// Generic heading scan
// ---------------------------------------------------------------------------

/// A section as produced by the generic heading scanner: any `#`–`######`
/// line starts one, and its content runs to the next heading or end of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub name: String,
    /// Heading level, 1–6.
    pub level: usize,
    pub content: String,
    /// One-sentence summary taken from the first prose lines of the content.
    pub description: String,
    pub start: usize,
    pub end: usize,
    /// Bare placeholder names found inside the section content.
    pub variables: Vec<String>,
}

static GENERIC_HEADING_RE: OnceLock<Regex> = OnceLock::new();

fn generic_heading_re() -> &'static Regex {
    GENERIC_HEADING_RE.get_or_init(|| Regex::new(r"(?m)^(#{1,6})\s+(.+)$").unwrap())
}

/// Extract ordered, non-overlapping sections from every markdown heading in
/// `text`. Adjacency determines boundaries: a section's content ends exactly
/// where the next heading begins.
pub fn extract_sections(text: &str) -> Vec<TemplateSection> {
    let matches: Vec<_> = generic_heading_re().captures_iter(text).collect();
    let mut sections = Vec::with_capacity(matches.len());

    for (i, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).unwrap();
        let level = caps[1].len();
        let name = caps[2].trim().to_string();

        let content_start = whole.end();
        let end = match matches.get(i + 1) {
            Some(next) => next.get(0).unwrap().start(),
            None => text.len(),
        };
        let content = text[content_start..end].trim().to_string();

        sections.push(TemplateSection {
            variables: variables::extract_variable_names(&content),
            description: section_description(&content),
            name,
            level,
            content,
            start: whole.start(),
            end,
        });
    }

    sections
}

/// Build a short description from the first few prose lines of a section:
/// up to three non-heading, non-list lines joined and truncated to 150
/// characters with an ellipsis.
fn section_description(content: &str) -> String {
    let description = content
        .trim()
        .lines()
        .take(3)
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with('#')
                && !line.starts_with('-')
                && !line.starts_with('*')
                && !line.starts_with("1.")
                && !line.starts_with('[')
        })
        .collect::<Vec<_>>()
        .join(" ");

    if description.chars().count() > 150 {
        let truncated: String = description.chars().take(147).collect();
        format!("{truncated}...")
    } else {
        description
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "## Your Role\nYou are a reviewer.\n\n## Input\nA diff.\n\n## Output Requirements\nA verdict.\n";

    #[test]
    fn detects_all_present_headings() {
        let detected = detect_headings(DOC);
        let names: Vec<_> = detected.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Your Role", "Input", "Output Requirements"]);
    }

    #[test]
    fn detection_is_case_insensitive() {
        let detected = detect_headings("## your role\nstuff");
        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].heading, "## Your Role");
    }

    #[test]
    fn detection_spans_cover_heading_text() {
        let detected = detect_headings(DOC);
        assert_eq!(&DOC[detected[0].start..detected[0].end], "## Your Role");
    }

    #[test]
    fn detection_finds_first_occurrence_anywhere() {
        // Substring search, not line-anchored: a heading mentioned mid-line
        // still counts.
        let text = "intro mentions ## Input inline\n## Input\nreal";
        let detected = detect_headings(text);
        let input = detected.iter().find(|d| d.name == "Input").unwrap();
        assert_eq!(input.start, text.find("## Input").unwrap());
    }

    #[test]
    fn required_headings_all_present() {
        let (ok, missing) = check_required_headings(DOC);
        assert!(ok);
        assert!(missing.is_empty());
    }

    #[test]
    fn required_headings_reports_missing_with_prefix() {
        let (ok, missing) = check_required_headings("## Your Role\nx\n## Output Requirements\ny");
        assert!(!ok);
        assert_eq!(missing, vec!["## Input"]);
    }

    #[test]
    fn extracts_sections_with_levels_and_content() {
        let text = "# Title\nIntro text.\n\n## Details\nMore {{info}} here.\n";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Title");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].content, "Intro text.");
        assert_eq!(sections[1].name, "Details");
        assert_eq!(sections[1].level, 2);
        assert_eq!(sections[1].variables, vec!["info"]);
    }

    #[test]
    fn section_content_ends_at_next_heading() {
        let text = "## A\nalpha\n### B\nbeta";
        let sections = extract_sections(text);
        assert_eq!(sections[0].content, "alpha");
        assert_eq!(sections[1].content, "beta");
        assert_eq!(sections[0].end, text.find("### B").unwrap());
    }

    #[test]
    fn last_section_runs_to_end_of_text() {
        let sections = extract_sections("## Only\ntail content");
        assert_eq!(sections[0].content, "tail content");
        assert_eq!(sections[0].end, "## Only\ntail content".len());
    }

    #[test]
    fn no_headings_no_sections() {
        assert!(extract_sections("plain text\nwith lines").is_empty());
    }

    #[test]
    fn description_skips_list_lines() {
        let text = "## S\n- bullet\nFirst prose line.\n* another bullet\n";
        let sections = extract_sections(text);
        assert_eq!(sections[0].description, "First prose line.");
    }

    #[test]
    fn description_truncates_long_prose() {
        let long = "word ".repeat(60);
        let text = format!("## S\n{long}\n");
        let sections = extract_sections(&text);
        assert!(sections[0].description.ends_with("..."));
        assert_eq!(sections[0].description.chars().count(), 150);
    }

    #[test]
    fn clean_heading_strips_prefix() {
        assert_eq!(clean_heading("## Your Role"), "Your Role");
        assert_eq!(clean_heading("Your Role"), "Your Role");
    }
}
