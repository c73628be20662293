//! Structured reporting for recovery runs.

use serde::{Deserialize, Serialize};

/// One strategy attempt: which strategy ran and how it failed, if it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAttempt {
    pub strategy: String,
    /// Failure message; `None` for the succeeding attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Diagnostics for one recovery run.
///
/// Attempts are recorded in strategy order; a successful run stops at the
/// first success, so later strategies never appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecoveryReport {
    pub raw_len: usize,
    pub sanitized_len: usize,
    /// Name of the strategy that produced the document, when one did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub succeeded_with: Option<String>,
    pub attempts: Vec<StrategyAttempt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_omits_none_fields() {
        let report = RecoveryReport {
            raw_len: 10,
            sanitized_len: 8,
            succeeded_with: None,
            attempts: vec![StrategyAttempt {
                strategy: "direct".to_string(),
                error: Some("expected value at line 1".to_string()),
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("succeeded_with"));
        assert!(json.contains("expected value"));
    }

    #[test]
    fn test_report_roundtrip_serde() {
        let report = RecoveryReport {
            raw_len: 42,
            sanitized_len: 40,
            succeeded_with: Some("extract-balanced".to_string()),
            attempts: vec![
                StrategyAttempt {
                    strategy: "direct".to_string(),
                    error: Some("trailing characters".to_string()),
                },
                StrategyAttempt {
                    strategy: "sanitized".to_string(),
                    error: Some("trailing characters".to_string()),
                },
                StrategyAttempt {
                    strategy: "extract-balanced".to_string(),
                    error: None,
                },
            ],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: RecoveryReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
