pub mod traits;
pub mod openai;
pub mod request;
pub mod tokens;
pub mod error;


use serde::{Serialize, Deserialize};
use serde_json::Value as JsonValue;
use tokens::{TokenInfo, TokenUsage};

pub use request::{GenerationRequest, GenerationRequestBuilder, Stop};

/// Result of a text generation from an LLM.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GenerateResult {
    pub tokens: TokenUsage,
    pub generation: String,
    /// Per-token log-probability data in generation order. Empty when the
    /// request did not ask for log-probabilities.
    #[serde(default)]
    pub token_logprobs: Vec<TokenInfo>,
    /// Tool calls the LLM asked for during this generation. They are
    /// recorded only; nothing here executes them.
    #[serde(default)]
    pub tool_calls: Vec<CallInfo>,
}

/// Structured information about a single tool call requested by the LLM.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CallInfo {
    pub name: String,
    #[serde(default)]
    pub args: JsonValue,
}

/// Result type for LLM operations.
pub type LLMResult<T> = std::result::Result<T, error::LLMError>;
