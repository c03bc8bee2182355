use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATE_BODY: &str = "## Your Role\nYou are {{role}}.\n\n## Input\n{{task}}\n\n## Output Requirements\nReturn markdown.\n";

fn forge(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("forge").unwrap();
    cmd.arg("--root").arg(dir.path());
    cmd
}

fn init_with_template(dir: &TempDir) {
    forge(dir).arg("init").assert().success();
    let template_path = dir.path().join("review.md");
    std::fs::write(&template_path, TEMPLATE_BODY).unwrap();
    forge(dir)
        .args(["template", "add", "review", "--file"])
        .arg(&template_path)
        .args(["--title", "Code Review", "--role", "qa"])
        .assert()
        .success();
}

#[test]
fn init_creates_layout() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .forge/config.yaml"));
    assert!(dir.path().join(".forge/templates").is_dir());
    assert!(dir.path().join(".forge/prompts").is_dir());
}

#[test]
fn template_add_reports_variables() {
    let dir = TempDir::new().unwrap();
    forge(&dir).arg("init").assert().success();
    let template_path = dir.path().join("t.md");
    std::fs::write(&template_path, TEMPLATE_BODY).unwrap();

    forge(&dir)
        .args(["template", "add", "review", "--file"])
        .arg(&template_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("variables: role, task"))
        .stdout(predicate::str::contains("structure: ok"));
}

#[test]
fn template_list_shows_entries() {
    let dir = TempDir::new().unwrap();
    init_with_template(&dir);

    forge(&dir)
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("review"))
        .stdout(predicate::str::contains("qa"));
}

#[test]
fn template_show_json_includes_content() {
    let dir = TempDir::new().unwrap();
    init_with_template(&dir);

    let output = forge(&dir)
        .args(["--json", "template", "show", "review"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["slug"], "review");
    assert!(value["content"].as_str().unwrap().contains("{{role}}"));
}

#[test]
fn unknown_template_fails() {
    let dir = TempDir::new().unwrap();
    forge(&dir).arg("init").assert().success();

    forge(&dir)
        .args(["template", "show", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn validate_compliant_document() {
    let dir = TempDir::new().unwrap();
    forge(&dir).arg("init").assert().success();

    let doc = dir.path().join("doc.md");
    std::fs::write(
        &doc,
        "## Your Role\nYou are a senior reviewer with clear responsibility and deep expertise in every assigned task area today.\n\n## Input\nYou will be given a diff and receive surrounding context to include in the review session.\n\n## Output Requirements\nProduce a structured markdown format verdict; the output must return severity labels and produce a concise summary block.\n",
    )
    .unwrap();

    forge(&dir)
        .arg("validate")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("compliant"));
}

#[test]
fn validate_noncompliant_document_fails() {
    let dir = TempDir::new().unwrap();
    forge(&dir).arg("init").assert().success();

    let doc = dir.path().join("bad.md");
    std::fs::write(&doc, "## Your Role\nLeftover {{x}} here.").unwrap();

    forge(&dir)
        .arg("validate")
        .arg(&doc)
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing: ## Input"))
        .stdout(predicate::str::contains("unreplaced: x"));
}

#[test]
fn generate_substitutes_and_saves() {
    let dir = TempDir::new().unwrap();
    init_with_template(&dir);

    forge(&dir)
        .args([
            "generate",
            "review",
            "--var",
            "role=QA engineer",
            "--var",
            "task=test it",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("You are QA engineer."))
        .stdout(predicate::str::contains("Saved prompt:"));

    forge(&dir)
        .args(["prompt", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("review"));
}

#[test]
fn generate_out_file_and_no_save() {
    let dir = TempDir::new().unwrap();
    init_with_template(&dir);

    let out = dir.path().join("generated.md");
    forge(&dir)
        .args(["generate", "review", "--var", "role=x", "--var", "task=y", "--no-save", "--out"])
        .arg(&out)
        .assert()
        .success();

    let generated = std::fs::read_to_string(&out).unwrap();
    assert!(generated.contains("You are x."));

    forge(&dir)
        .args(["prompt", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No prompts generated yet."));
}

#[test]
fn steps_lists_sections() {
    let dir = TempDir::new().unwrap();
    init_with_template(&dir);

    forge(&dir)
        .args(["steps", "review"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Your Role"))
        .stdout(predicate::str::contains("variables: role"));
}

#[test]
fn enhanced_steps_include_rules() {
    let dir = TempDir::new().unwrap();
    init_with_template(&dir);

    forge(&dir)
        .args(["steps", "review", "--enhanced"])
        .assert()
        .success()
        .stdout(predicate::str::contains("min 20 words"))
        .stdout(predicate::str::contains("critical"));
}

#[test]
fn guidance_for_unknown_section_is_generic() {
    let dir = TempDir::new().unwrap();
    init_with_template(&dir);

    forge(&dir)
        .args(["guidance", "review", "Mystery"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter content for the Mystery section."));
}
