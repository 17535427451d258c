use serde::{Serialize, Deserialize};

/// Token accounting reported by the service for one call.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn add(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// One alternative token the service considered at a position.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TopLogprob {
    pub token: String,
    pub logprob: f64,
}

/// A generated token with its log-probability.
///
/// `logprob` is `None` when the service did not compute one for this
/// position. Present values are always `<= 0`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenInfo {
    pub token: String,
    #[serde(default)]
    pub logprob: Option<f64>,
    #[serde(default)]
    pub top_logprobs: Vec<TopLogprob>,
}

impl TokenInfo {
    pub fn new(token: impl Into<String>, logprob: Option<f64>) -> Self {
        Self {
            token: token.into(),
            logprob,
            top_logprobs: Vec::new(),
        }
    }
}
