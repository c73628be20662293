//! Resilient recovery of structured documents from unreliable generator text.
//!
//! Text-generation services return payloads that are frequently fenced,
//! smart-quoted, commented, wrapped in prose, or missing separators. This
//! crate turns such text back into a valid in-memory document by trying
//! ordered strategies of increasing aggressiveness:
//!
//! 1. direct parse of the raw text;
//! 2. parse after [`sanitize`](sanitize::sanitize);
//! 3. parse of the [largest balanced bracket span](extract::largest_balanced_span)
//!    of the sanitized text;
//! 4. parse after tokenizing, [reinserting missing separators](repair), and
//!    re-serializing.
//!
//! The first success wins and is returned exactly; when everything fails the
//! caller gets a [`RecoveryError`] with diagnostics, never a default
//! document. [`normalize_root`](envelope::normalize_root) then locates the
//! expected payload inside conventional wrapper envelopes.
//!
//! # Main entry points
//!
//! - [`recover`] — recover a document, or fail with diagnostics.
//! - [`recover_with_report`] — same, plus a per-strategy attempt report.
//!
//! # Example
//!
//! ```
//! use mealplan_recovery::recover;
//!
//! let raw = "```json\n{\"day\": \"Monday\", \"menus\": [],}\n```";
//! let doc = recover(raw).unwrap();
//! assert_eq!(doc["day"], "Monday");
//! ```

pub mod envelope;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod repair;
pub mod report;
pub mod sanitize;

use serde_json::Value;
use tracing::debug;

pub use envelope::{normalize_root, WRAPPER_KEYS};
pub use error::RecoveryError;
pub use report::{RecoveryReport, StrategyAttempt};

/// The ordered recovery strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Parse the raw text as-is.
    Direct,
    /// Parse the sanitized text.
    Sanitized,
    /// Parse the largest balanced bracket span of the sanitized text.
    Extracted,
    /// Parse the sanitized text after separator repair.
    Repaired,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Sanitized => "sanitized",
            Self::Extracted => "extract-balanced",
            Self::Repaired => "repair-separators",
        }
    }
}

/// Result of a recovery run with full diagnostics.
#[derive(Debug)]
pub struct RecoveryRun {
    pub result: Result<Value, RecoveryError>,
    pub report: RecoveryReport,
}

/// Recovers a structured document from raw generator text.
///
/// Returns the first strategy's successful parse, or a [`RecoveryError`]
/// carrying the raw length, sanitized length, and the terminal parser
/// message from the most-recovered attempt.
pub fn recover(raw: &str) -> Result<Value, RecoveryError> {
    recover_with_report(raw).result
}

/// Like [`recover`], but additionally reports every strategy attempted.
pub fn recover_with_report(raw: &str) -> RecoveryRun {
    let mut attempts: Vec<StrategyAttempt> = Vec::new();
    let raw_len = raw.len();

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => return success(Strategy::Direct, value, raw_len, raw_len, attempts),
        Err(err) => record_failure(&mut attempts, Strategy::Direct, &err),
    }

    let sanitized = sanitize::sanitize(raw);
    let sanitized_len = sanitized.len();

    match serde_json::from_str::<Value>(&sanitized) {
        Ok(value) => {
            return success(Strategy::Sanitized, value, raw_len, sanitized_len, attempts);
        }
        Err(err) => record_failure(&mut attempts, Strategy::Sanitized, &err),
    }

    match extract::largest_balanced_span(&sanitized) {
        Some(span) => match serde_json::from_str::<Value>(span) {
            Ok(value) => {
                return success(Strategy::Extracted, value, raw_len, sanitized_len, attempts);
            }
            Err(err) => record_failure(&mut attempts, Strategy::Extracted, &err),
        },
        None => attempts.push(StrategyAttempt {
            strategy: Strategy::Extracted.name().to_string(),
            error: Some("no balanced span found".to_string()),
        }),
    }

    let repaired = repair::render(&repair::insert_missing_separators(&lexer::tokenize(
        &sanitized,
    )));
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => success(Strategy::Repaired, value, raw_len, sanitized_len, attempts),
        Err(err) => {
            let parse_error = err.to_string();
            attempts.push(StrategyAttempt {
                strategy: Strategy::Repaired.name().to_string(),
                error: Some(parse_error.clone()),
            });
            debug!(raw_len, sanitized_len, %parse_error, "all recovery strategies failed");
            RecoveryRun {
                result: Err(RecoveryError {
                    raw_len,
                    sanitized_len,
                    parse_error,
                }),
                report: RecoveryReport {
                    raw_len,
                    sanitized_len,
                    succeeded_with: None,
                    attempts,
                },
            }
        }
    }
}

fn success(
    strategy: Strategy,
    value: Value,
    raw_len: usize,
    sanitized_len: usize,
    mut attempts: Vec<StrategyAttempt>,
) -> RecoveryRun {
    debug!(strategy = strategy.name(), raw_len, "recovered document");
    attempts.push(StrategyAttempt {
        strategy: strategy.name().to_string(),
        error: None,
    });
    RecoveryRun {
        result: Ok(value),
        report: RecoveryReport {
            raw_len,
            sanitized_len,
            succeeded_with: Some(strategy.name().to_string()),
            attempts,
        },
    }
}

fn record_failure(attempts: &mut Vec<StrategyAttempt>, strategy: Strategy, err: &serde_json::Error) {
    attempts.push(StrategyAttempt {
        strategy: strategy.name().to_string(),
        error: Some(err.to_string()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_parse_returned_exactly() {
        let raw = r#"{"b": 1, "a": 2}"#;
        let expected: Value = serde_json::from_str(raw).unwrap();
        let run = recover_with_report(raw);
        assert_eq!(run.result.unwrap(), expected);
        assert_eq!(run.report.succeeded_with.as_deref(), Some("direct"));
        assert_eq!(run.report.attempts.len(), 1);
    }

    #[test]
    fn test_fenced_with_trailing_comma_uses_sanitize() {
        let raw = "```json\n{\"recipes\": [{\"name\": \"Stew\"},],}\n```";
        let run = recover_with_report(raw);
        assert_eq!(run.report.succeeded_with.as_deref(), Some("sanitized"));
        assert_eq!(
            run.result.unwrap(),
            json!({"recipes": [{"name": "Stew"}]})
        );
    }

    #[test]
    fn test_prose_wrapped_payload_uses_extraction() {
        let raw = r#"Here is your result: {"x": [1, 2, 3]} Thanks!"#;
        let run = recover_with_report(raw);
        assert_eq!(
            run.report.succeeded_with.as_deref(),
            Some("extract-balanced")
        );
        assert_eq!(run.result.unwrap(), json!({"x": [1, 2, 3]}));
    }

    #[test]
    fn test_missing_separator_uses_repair() {
        let raw = r#"{"a": 1 "b": 2}"#;
        let run = recover_with_report(raw);
        assert_eq!(
            run.report.succeeded_with.as_deref(),
            Some("repair-separators")
        );
        assert_eq!(run.result.unwrap(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_later_strategies_not_consulted_after_success() {
        let run = recover_with_report("[1, 2]");
        let names: Vec<_> = run
            .report
            .attempts
            .iter()
            .map(|a| a.strategy.as_str())
            .collect();
        assert_eq!(names, vec!["direct"]);
    }

    #[test]
    fn test_terminal_failure_carries_diagnostics() {
        let raw = "```\nno payload here at all\n```";
        let run = recover_with_report(raw);
        let err = run.result.unwrap_err();
        assert_eq!(err.raw_len, raw.len());
        assert!(err.sanitized_len < err.raw_len);
        assert!(!err.parse_error.is_empty());
        assert_eq!(run.report.attempts.len(), 4);
        assert!(run.report.succeeded_with.is_none());
    }

    #[test]
    fn test_empty_input_fails_not_defaults() {
        assert!(recover("").is_err());
    }

    #[test]
    fn test_combined_defects() {
        // Fenced, smart-quoted, commented, missing separator: needs the
        // whole pipeline.
        let raw = "```json\n{\u{201C}a\u{201D}: 1 // count\n\"b\": 2}\n```";
        let doc = recover(raw).unwrap();
        assert_eq!(doc, json!({"a": 1, "b": 2}));
    }
}
