//! SeoReport - Advisory search-optimization assessment of a draft
//!
//! Produced fresh on every analysis, never persisted, never blocks
//! generation or publication.

use serde::Serialize;

use crate::domain::value_objects::Verdict;

const FAIL_PENALTY: u32 = 15;
const WARN_PENALTY: u32 = 5;

/// One heuristic check result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeoCheck {
    /// Stable check name, e.g. "title-length".
    pub name: &'static str,
    pub verdict: Verdict,
    pub message: String,
}

/// Aggregated report over all checks
#[derive(Debug, Clone, Serialize, Default)]
pub struct SeoReport {
    pub checks: Vec<SeoCheck>,
}

impl SeoReport {
    pub fn push(&mut self, name: &'static str, verdict: Verdict, message: impl Into<String>) {
        self.checks.push(SeoCheck {
            name,
            verdict,
            message: message.into(),
        });
    }

    pub fn check(&self, name: &str) -> Option<&SeoCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Score out of 100: each fail costs 15 points, each warn 5.
    pub fn score(&self) -> u32 {
        let penalty: u32 = self
            .checks
            .iter()
            .map(|c| match c.verdict {
                Verdict::Pass => 0,
                Verdict::Warn => WARN_PENALTY,
                Verdict::Fail => FAIL_PENALTY,
            })
            .sum();
        100u32.saturating_sub(penalty)
    }

    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.verdict == Verdict::Fail)
    }
}
