use std::sync::Arc;
use serde::{Serialize, Deserialize};

use super::error::ReflectionError;
use crate::config::{Settings, DEFAULT_TOP_LOGPROBS};
use crate::llm::{traits::LLM, tokens::TokenUsage, GenerateResult, Stop};
use crate::llm::request::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SEED, DEFAULT_TEMPERATURE};
use crate::tools::ToolDeclaration;
use crate::uncertainty::{UncertainToken, DEFAULT_LOGPROB_THRESHOLD};

/// Drives the describe-then-reflect sequence against one LLM.
pub struct Phenomenologist {
    /// The LLM implementation used for both calls.
    pub llm: Arc<dyn LLM>,

    /// Generation parameters and the uncertainty threshold.
    pub options: ReflectionOptions,
}

/// Caller-tunable knobs for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionOptions {
    pub model: String,
    /// Tokens with a log-probability strictly below this are uncertain.
    pub logprob_threshold: f64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub seed: i64,
    pub stop: Option<Stop>,
    pub tools: Option<Vec<ToolDeclaration>>,
    /// Alternatives requested per position (0-5).
    pub top_logprobs: u8,
    /// Fail with [`ReflectionError::EmptyPassage`] instead of sending a blank passage.
    pub reject_empty_passage: bool,
}

impl Default for ReflectionOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            logprob_threshold: DEFAULT_LOGPROB_THRESHOLD,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            seed: DEFAULT_SEED,
            stop: None,
            tools: None,
            top_logprobs: DEFAULT_TOP_LOGPROBS,
            reject_empty_passage: false,
        }
    }
}

impl From<&Settings> for ReflectionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            model: settings.model.clone(),
            logprob_threshold: settings.logprob_threshold,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            seed: settings.seed,
            top_logprobs: settings.top_logprobs,
            ..Self::default()
        }
    }
}

/// Progress of a run through describe and reflect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionState {
    /// The description was made and analyzed; the reflection step has not run yet.
    Described,
    /// No token crossed the threshold; only the description call was made.
    Done,
    /// Uncertain tokens were found and the reflection call was made.
    Reflected,
}

/// Structured outcome of one run, ready for any presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenomenologyReport {
    pub passage: String,
    pub threshold: f64,
    /// First call, with its text trimmed.
    pub description: GenerateResult,
    /// Tokens of the description below the threshold, in generation order.
    pub uncertain_tokens: Vec<UncertainToken>,
    /// Second call, present only once `state` is `Reflected`.
    pub reflection: Option<GenerateResult>,
    pub state: ReflectionState,
}

impl PhenomenologyReport {
    /// Token usage summed over every call made.
    pub fn total_usage(&self) -> TokenUsage {
        let mut usage = self.description.tokens;
        if let Some(reflection) = &self.reflection {
            usage.add(&reflection.tokens);
        }
        usage
    }

    pub fn is_finished(&self) -> bool {
        self.state != ReflectionState::Described
    }

    pub fn call_count(&self) -> usize {
        1 + usize::from(self.reflection.is_some())
    }
}

pub type ReflectionResult = Result<PhenomenologyReport, ReflectionError>;
