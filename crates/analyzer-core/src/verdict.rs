//! Decision policy: blocklist hit plus class probabilities → risk level.

use serde::Serialize;

use crate::inference::Probabilities;

/// Benign-class probability (percent) at or above which a URL is Safe.
pub const SAFE_THRESHOLD: f32 = 60.0;

/// Malicious-class probability (percent) at or above which a URL is Danger.
pub const DANGER_THRESHOLD: f32 = 50.0;

const MSG_BLOCKLISTED: &str = "This URL is registered as a known malicious URL.";
const MSG_SAFE: &str = "This URL looks safe.";
const MSG_DANGER: &str = "This URL is dangerous!";
const MSG_CAUTION: &str = "This URL needs caution.";

/// Final risk tier for a single URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Caution,
    Danger,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Caution => "caution",
            RiskLevel::Danger => "danger",
        };
        f.write_str(s)
    }
}

/// Classification outcome, produced once per request.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub level: RiskLevel,
    pub message: &'static str,
}

/// Map a blocklist hit and class probabilities onto a verdict.
///
/// A blocklist hit is authoritative: it yields Danger and the
/// probabilities are ignored (the classifier was never consulted for such
/// URLs). Otherwise the three threshold branches are mutually exclusive
/// and jointly exhaustive for probability pairs summing to 100.
pub fn decide(blocklisted: bool, probs: Probabilities) -> Verdict {
    if blocklisted {
        return Verdict { level: RiskLevel::Danger, message: MSG_BLOCKLISTED };
    }

    if probs.safe >= SAFE_THRESHOLD {
        Verdict { level: RiskLevel::Safe, message: MSG_SAFE }
    } else if probs.malicious >= DANGER_THRESHOLD {
        Verdict { level: RiskLevel::Danger, message: MSG_DANGER }
    } else {
        Verdict { level: RiskLevel::Caution, message: MSG_CAUTION }
    }
}
