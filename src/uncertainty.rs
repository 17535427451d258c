//! Selection of low-confidence tokens from per-token log-probabilities.

use serde::{Serialize, Deserialize};

use crate::llm::tokens::{TokenInfo, TopLogprob};

/// Default threshold: tokens the model gave less than ~37% (e^-1) are flagged.
pub const DEFAULT_LOGPROB_THRESHOLD: f64 = -1.0;

/// A generated token whose log-probability fell below the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertainToken {
    pub token: String,
    pub logprob: f64,
    /// Alternatives the service reported for the same position.
    #[serde(default)]
    pub alternatives: Vec<TopLogprob>,
}

impl UncertainToken {
    /// Display probability in percent, see [`probability_percent`].
    pub fn probability_percent(&self) -> f64 {
        probability_percent(self.logprob)
    }
}

/// `exp(logprob) * 100`, rounded to two decimals. Presentation only.
pub fn probability_percent(logprob: f64) -> f64 {
    (logprob.exp() * 100.0 * 100.0).round() / 100.0
}

/// Keep the tokens whose log-probability is known and strictly below
/// `threshold`, in generation order.
///
/// Tokens without a log-probability carry no information and are never
/// flagged. The threshold is not validated.
pub fn find_uncertain_tokens(tokens: &[TokenInfo], threshold: f64) -> Vec<UncertainToken> {
    tokens
        .iter()
        .filter_map(|info| match info.logprob {
            Some(logprob) if logprob < threshold => Some(UncertainToken {
                token: info.token.clone(),
                logprob,
                alternatives: info.top_logprobs.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Token texts joined with single spaces, in their original order.
pub fn join_tokens(tokens: &[UncertainToken]) -> String {
    tokens
        .iter()
        .map(|t| t.token.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
