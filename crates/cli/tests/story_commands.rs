use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const STORY: &str = r#"
{
  "title": "Neighborhood Outreach for I-70",
  "structure_type": "spider",
  "sections": [
    { "section_id": "background", "title": "Background and context", "root": true },
    { "section_id": "decisions", "title": "Decisions to be made" },
    { "section_id": "involved", "title": "Who has been involved" },
    { "section_id": "next", "title": "Next steps" },
    { "section_id": "last", "title": "Last section" },
    { "section_id": "draft", "title": "Unattached draft" }
  ],
  "relations": [
    { "parent": "background", "child": "decisions", "weight": 0 },
    { "parent": "decisions", "child": "involved", "weight": 0 },
    { "parent": "decisions", "child": "next", "weight": 1 },
    { "parent": "background", "child": "last", "weight": 1 }
  ]
}
"#;

fn write_story(raw: &str) -> (TempDir, PathBuf) {
    let temp = tempdir().unwrap();
    let path = temp.path().join("story.json");
    fs::write(&path, raw).unwrap();
    (temp, path)
}

#[allow(deprecated)]
fn storybase() -> Command {
    let mut cmd = Command::cargo_bin("storybase").expect("binary");
    cmd.env_remove("STORYBASE_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn run_json(args: &[&str], story: &Path) -> Value {
    let output = storybase()
        .args(args)
        .arg(story)
        .output()
        .expect("command run");

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn flat_lists_reading_order() {
    let (_temp, story) = write_story(STORY);
    let value = run_json(&["flat", "--json"], &story);
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["section_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["background", "decisions", "involved", "next", "last"]);
}

#[test]
fn nav_reports_neighbours() {
    let (_temp, story) = write_story(STORY);
    storybase()
        .arg("nav")
        .arg(&story)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("previous\tinvolved\tWho has been involved"))
        .stdout(predicate::str::contains("next\tlast\tLast section"));
}

#[test]
fn nav_fails_for_orphaned_section() {
    let (_temp, story) = write_story(STORY);
    storybase()
        .arg("nav")
        .arg(&story)
        .arg("draft")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Section not found: draft"));
}

#[test]
fn json_brackets_with_pseudo_sections() {
    let (_temp, story) = write_story(STORY);
    let value = run_json(&["json", "--summary", "--call-to-action"], &story);
    let nodes = value.as_array().unwrap();

    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["section_id"], "summary");
    assert_eq!(nodes[0]["next_section_id"], "background");
    assert_eq!(nodes[1]["previous_section_id"], "summary");
    assert_eq!(nodes[1]["children"][0]["children"][1]["section_id"], "next");
    assert_eq!(nodes[2]["section_id"], "call-to-action");
    assert_eq!(nodes[2]["previous_section_id"], "last");
}

#[test]
fn json_flat_layout_uses_child_ids() {
    let (_temp, story) = write_story(STORY);
    let value = run_json(&["json", "--flat"], &story);
    assert_eq!(value[0]["children"], serde_json::json!(["decisions", "last"]));
    assert_eq!(value[4]["section_id"], "last");
}

#[test]
fn toc_follows_story_structure_type() {
    let (_temp, story) = write_story(STORY);
    storybase()
        .arg("toc")
        .arg(&story)
        .arg("--class")
        .arg("story-toc")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<ul class='story-toc'>"))
        .stdout(predicate::str::contains("<li class='expandable'>"))
        .stdout(predicate::str::contains("#sections/involved").not());
}

#[test]
fn structure_flag_overrides_document() {
    let (_temp, story) = write_story(STORY);
    storybase()
        .args(["--structure", "linear", "toc"])
        .arg(&story)
        .assert()
        .success()
        .stdout(predicate::str::contains("<a href='#sections/involved'>Who has been involved</a>"))
        .stdout(predicate::str::contains("expandable").not());
}

#[test]
fn unknown_format_and_structure_fail() {
    let (_temp, story) = write_story(STORY);
    storybase()
        .args(["toc", "--format", "pdf"])
        .arg(&story)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format: pdf"));

    storybase()
        .args(["--structure", "carousel", "flat"])
        .arg(&story)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown structure type: carousel"));
}

#[test]
fn cycle_is_reported() {
    let cyclic = STORY.replace(
        r#"{ "parent": "background", "child": "last", "weight": 1 }"#,
        r#"{ "parent": "background", "child": "last", "weight": 1 },
    { "parent": "next", "child": "decisions", "weight": 0 }"#,
    );
    let (_temp, story) = write_story(&cyclic);
    storybase()
        .arg("flat")
        .arg(&story)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cycle detected at section: decisions"));
}

#[test]
fn orphans_lists_unreachable_sections() {
    let (_temp, story) = write_story(STORY);
    let value = run_json(&["orphans", "--json"], &story);
    assert_eq!(value, serde_json::json!([{ "section_id": "draft", "title": "Unattached draft" }]));
}

#[test]
fn config_file_sets_titles_and_default_structure() {
    let (temp, _) = write_story(STORY);
    let undeclared = temp.path().join("undeclared.json");
    fs::write(
        &undeclared,
        r#"{ "title": "Plain", "sections": [
            { "section_id": "hub", "title": "Hub", "root": true },
            { "section_id": "spoke", "title": "Spoke" },
            { "section_id": "deep", "title": "Deep" }
        ], "relations": [
            { "parent": "hub", "child": "spoke" },
            { "parent": "spoke", "child": "deep" }
        ] }"#,
    )
    .unwrap();
    let config = temp.path().join("structure.toml");
    fs::write(
        &config,
        "default_structure = \"spider\"\nsummary_title = \"Overview\"\n",
    )
    .unwrap();

    storybase()
        .arg("--config")
        .arg(&config)
        .args(["toc", "--summary"])
        .arg(&undeclared)
        .assert()
        .success()
        .stdout(predicate::str::contains("<li><a href='#sections/summary'>Overview</a></li>"))
        .stdout(predicate::str::contains("#sections/deep").not());
}

#[test]
fn story_from_stdin() {
    let output = storybase()
        .args(["flat", "-"])
        .write_stdin(STORY)
        .output()
        .expect("command run");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert_eq!(text.lines().next(), Some("background\tBackground and context"));
}

#[test]
fn structures_lists_options() {
    storybase()
        .arg("structures")
        .assert()
        .success()
        .stdout("linear\tLinear (default)\nspider\tSpider\n");
}
