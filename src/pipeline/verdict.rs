use regex::Regex;
use serde::Deserialize;

/// The validator's verdict on whether a request can be answered.
/// Absent fields default to a rejection with no explanation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// How a verdict was obtained: parsed from the validator's JSON, or
/// synthesized because the output was not usable JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum VerdictOutcome {
    Parsed(Verdict),
    Fallback(Verdict),
}

impl VerdictOutcome {
    pub fn into_verdict(self) -> Verdict {
        match self {
            Self::Parsed(verdict) | Self::Fallback(verdict) => verdict,
        }
    }
}

/// Interpret the validator's raw output. Tries the text as-is, then the
/// contents of a fenced code block; anything else becomes an invalid
/// verdict quoting the raw text. Never fails.
pub fn parse_verdict(raw: &str) -> VerdictOutcome {
    if let Ok(verdict) = serde_json::from_str::<Verdict>(raw.trim()) {
        return VerdictOutcome::Parsed(verdict);
    }

    if let Some(inner) = extract_fenced_block(raw) {
        if let Ok(verdict) = serde_json::from_str::<Verdict>(&inner) {
            return VerdictOutcome::Parsed(verdict);
        }
    }

    VerdictOutcome::Fallback(Verdict {
        is_valid: false,
        message: Some(format!("Invalid JSON from validator: {raw}")),
    })
}

/// Contents of the first triple-backtick block, optionally tagged json.
fn extract_fenced_block(text: &str) -> Option<String> {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(.*?)```").unwrap();
    fence
        .captures(text)
        .map(|captures| captures[1].trim().to_string())
}
