use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn mealplan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mealplan"))
        .args(args)
        .output()
        .expect("failed to run mealplan binary")
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write test file");
    path
}

fn plan_json() -> Value {
    json!({
        "plan": {
            "weeks": [{
                "week": 1,
                "days": [{
                    "day": "Monday",
                    "menus": [
                        {"menu_name": "Classic", "lunch": {
                            "main_course": "Goulash",
                            "sides": ["Noodles", "Salad"],
                        }},
                        {"menu_name": "Vegetarian", "lunch": {
                            "main_course": "Lentil curry",
                            "sides": ["Rice", "Chutney"],
                        }},
                    ],
                }],
            }],
            "menu_lines": 2,
            "menu_names": ["Classic", "Vegetarian"],
        }
    })
}

#[test]
fn recover_repairs_broken_payload_from_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "broken.txt",
        "```json\n{\"day\": \"Monday\" \"menus\": [],}\n```",
    );

    let output = mealplan(&["recover", input.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["day"], "Monday");
}

#[test]
fn recover_report_names_the_strategy() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "prose.txt",
        r#"Here you go: {"recipes": []} enjoy!"#,
    );

    let output = mealplan(&["recover", "--report", input.to_str().unwrap()]);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["succeeded_with"], "extract-balanced");
}

#[test]
fn recover_normalize_unwraps_envelope() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "wrapped.txt",
        &json!({"result": {"recipes": [{"name": "Stew"}]}}).to_string(),
    );

    let output = mealplan(&["recover", "--normalize", input.to_str().unwrap()]);
    assert!(output.status.success());

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(doc.get("recipes").is_some());
    assert!(doc.get("result").is_none());
}

#[test]
fn recover_fails_loudly_on_unrecoverable_input() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "garbage.txt", "nothing structured in here");

    let output = mealplan(&["recover", input.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("all recovery strategies failed"));
}

#[test]
fn coverage_reports_missing_recipes_and_fails() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", &plan_json().to_string());
    let recipes = write_file(
        &dir,
        "recipes.json",
        &json!({"recipes": [
            {"week": 1, "day": "Monday", "menu": "Classic", "name": "Goulash with noodles"},
        ]})
        .to_string(),
    );

    let output = mealplan(&[
        "coverage",
        "--plan",
        plan.to_str().unwrap(),
        "--recipes",
        recipes.to_str().unwrap(),
    ]);
    // Missing items mean a non-zero exit.
    assert!(!output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["missing"].as_array().unwrap().len(), 1);
    assert_eq!(report["missing"][0]["menu"], "Vegetarian");
}

#[test]
fn coverage_succeeds_when_complete() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", &plan_json().to_string());
    let recipes = write_file(
        &dir,
        "recipes.json",
        &json!({"recipes": [
            {"week": 1, "day": "Monday", "menu": "Classic", "name": "Goulash"},
            {"week": 1, "day": "Monday", "menu": "Vegetarian", "name": "Lentil curry"},
        ]})
        .to_string(),
    );

    let output = mealplan(&[
        "coverage",
        "--plan",
        plan.to_str().unwrap(),
        "--recipes",
        recipes.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["missing"].as_array().unwrap().is_empty());
}

#[test]
fn followup_prints_plan_scoped_to_missing() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", &plan_json().to_string());
    let recipes = write_file(
        &dir,
        "recipes.json",
        &json!({"recipes": [
            {"week": 1, "day": "Monday", "menu": "Classic", "name": "Goulash"},
        ]})
        .to_string(),
    );

    let output = mealplan(&[
        "followup",
        "--plan",
        plan.to_str().unwrap(),
        "--recipes",
        recipes.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    let menus = doc["plan"]["weeks"][0]["days"][0]["menus"].as_array().unwrap();
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0]["menu_name"], "Vegetarian");
    // Configuration context survives into the follow-up request.
    assert_eq!(doc["plan"]["menu_lines"], 2);
}

#[test]
fn coverage_output_in_yaml() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", &plan_json().to_string());
    let recipes = write_file(&dir, "recipes.json", &json!({"recipes": []}).to_string());

    let output = mealplan(&[
        "coverage",
        "--plan",
        plan.to_str().unwrap(),
        "--recipes",
        recipes.to_str().unwrap(),
        "--format",
        "yaml",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("missing:"));
    assert!(stdout.contains("dish: Goulash"));
}
