use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use mealplan_core::{MealPlan, PlanDocument, ROOT_KEYS};
use mealplan_coverage::{coverage_report, expected_recipe_keys, followup_plan, LabelRule};
use mealplan_recovery::{normalize_root, recover, recover_with_report};

/// Output format for documents and reports.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Parser)]
#[command(
    name = "mealplan",
    version,
    about = "Recover and reconcile generated meal-plan documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recover a structured document from raw generator output.
    Recover(RecoverArgs),
    /// Reconcile produced recipes against a plan's expectation.
    Coverage(CoverageArgs),
    /// Build the follow-up request covering a plan's missing recipes.
    Followup(CoverageArgs),
}

#[derive(Args)]
struct RecoverArgs {
    /// Input file; reads stdin when omitted.
    input: Option<PathBuf>,
    /// Normalize the recovered document's envelope before printing.
    #[arg(long)]
    normalize: bool,
    /// Expected root keys for envelope normalization (default: plan,
    /// recipes, day).
    #[arg(long = "expect", value_name = "KEY")]
    expect: Vec<String>,
    /// Print the strategy report instead of the document.
    #[arg(long)]
    report: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Args)]
struct CoverageArgs {
    /// Plan document (either `{"plan": ...}` or a bare plan object).
    #[arg(long)]
    plan: PathBuf,
    /// Recipe document to reconcile against the plan.
    #[arg(long)]
    recipes: PathBuf,
    /// Dish-title separators for the item-key label rule.
    #[arg(long = "separator", value_name = "TEXT")]
    separators: Vec<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Recover(args) => run_recover(&args),
        Command::Coverage(args) => run_coverage(&args),
        Command::Followup(args) => run_followup(&args),
    };

    match result {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_recover(args: &RecoverArgs) -> Result<ExitCode, String> {
    let raw = read_input(args.input.as_deref())?;
    let run = recover_with_report(&raw);

    if args.report {
        print_serializable(&run.report, args.format)?;
        return Ok(match run.result {
            Ok(_) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        });
    }

    match run.result {
        Ok(doc) => {
            let doc = if args.normalize {
                if args.expect.is_empty() {
                    normalize_root(doc, &ROOT_KEYS)
                } else {
                    let keys: Vec<&str> = args.expect.iter().map(String::as_str).collect();
                    normalize_root(doc, &keys)
                }
            } else {
                doc
            };
            print_serializable(&doc, args.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Err(err.to_string()),
    }
}

fn run_coverage(args: &CoverageArgs) -> Result<ExitCode, String> {
    let plan = load_plan(&args.plan)?;
    let fragment = load_document(&args.recipes)?;
    let rule = label_rule(&args.separators);

    let expected = expected_recipe_keys(&plan, &rule);
    let report = coverage_report(expected, &[fragment], &rule);
    print_serializable(&report, args.format)?;

    Ok(if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_followup(args: &CoverageArgs) -> Result<ExitCode, String> {
    let plan = load_plan(&args.plan)?;
    let fragment = load_document(&args.recipes)?;
    let rule = label_rule(&args.separators);

    let expected = expected_recipe_keys(&plan, &rule);
    let report = coverage_report(expected, &[fragment], &rule);
    let reduced = followup_plan(&plan, &report.missing, &rule);
    print_serializable(&PlanDocument { plan: reduced }, args.format)?;
    Ok(ExitCode::SUCCESS)
}

fn label_rule(separators: &[String]) -> LabelRule {
    if separators.is_empty() {
        LabelRule::default()
    } else {
        let refs: Vec<&str> = separators.iter().map(String::as_str).collect();
        LabelRule::new(&refs)
    }
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            Ok(buffer)
        }
    }
}

/// Recovers and envelope-normalizes a document from a file, tolerating the
/// same defects as any other generator payload.
fn load_document(path: &Path) -> Result<Value, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value = recover(&text).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(normalize_root(value, &ROOT_KEYS))
}

fn load_plan(path: &Path) -> Result<MealPlan, String> {
    let value = load_document(path)?;
    let value = match value {
        Value::Object(mut map) if map.contains_key("plan") => {
            map.remove("plan").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|e| format!("{} is not a meal plan: {e}", path.display()))
}

fn print_serializable<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<(), String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}"))?,
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))?
        }
    };
    println!("{rendered}");
    Ok(())
}
