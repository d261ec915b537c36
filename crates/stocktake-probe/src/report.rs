//! Probe outcome types and their one-line rendering.

use std::fmt;

/// Severity of a single probe check.
///
/// `Soft` covers findings that are expected during development (missing
/// table, empty table, 404 from a lookup) and never fail the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Ok,
    Soft,
    Failed,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f.pad so the outcome line's column width applies.
        f.pad(match self {
            ProbeStatus::Ok => "ok",
            ProbeStatus::Soft => "warn",
            ProbeStatus::Failed => "fail",
        })
    }
}

/// One check's result: a label naming the check and a short detail line.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub label: String,
    pub status: ProbeStatus,
    pub detail: String,
}

impl ProbeOutcome {
    pub fn ok(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: ProbeStatus::Ok,
            detail: detail.into(),
        }
    }

    pub fn soft(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: ProbeStatus::Soft,
            detail: detail.into(),
        }
    }

    pub fn failed(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: ProbeStatus::Failed,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:4}] {}: {}", self.status, self.label, self.detail)
    }
}

/// True when no outcome in the batch is a hard failure.
pub fn all_passed(outcomes: &[ProbeOutcome]) -> bool {
    outcomes.iter().all(|o| o.status != ProbeStatus::Failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_renders_one_line() {
        let outcome = ProbeOutcome::ok("GET /health", "200, object");
        assert_eq!(outcome.to_string(), "[ok  ] GET /health: 200, object");
    }

    #[test]
    fn test_soft_findings_do_not_fail_the_batch() {
        let outcomes = vec![
            ProbeOutcome::ok("GET /students", "200, 12 items"),
            ProbeOutcome::soft("table lenders", "empty"),
        ];
        assert!(all_passed(&outcomes));
    }

    #[test]
    fn test_hard_failure_fails_the_batch() {
        let outcomes = vec![
            ProbeOutcome::ok("GET /health", "200"),
            ProbeOutcome::failed("GET /orders", "timed out after 10s"),
        ];
        assert!(!all_passed(&outcomes));
    }
}
