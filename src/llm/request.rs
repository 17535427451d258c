use serde::{Serialize, Deserialize};

use crate::message::Message;
use crate::tools::ToolDeclaration;
use crate::llm::{error::LLMError, LLMResult};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 16000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_SEED: i64 = 123;
/// Largest `top_logprobs` the service accepts.
pub const MAX_TOP_LOGPROBS: u8 = 5;

/// Stop condition(s): a single sequence or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stop {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Stop {
    fn from(s: &str) -> Self {
        Stop::One(s.to_string())
    }
}

impl From<String> for Stop {
    fn from(s: String) -> Self {
        Stop::One(s)
    }
}

impl From<Vec<String>> for Stop {
    fn from(v: Vec<String>) -> Self {
        Stop::Many(v)
    }
}

/// A single chat-completion call. Serializes directly into the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Stop>,
    pub seed: i64,
    #[serde(skip_serializing_if = "no_tools")]
    pub tools: Option<Vec<ToolDeclaration>>,
    pub logprobs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u8>,
}

// `tools: []` is rejected by the service, so an empty list is omitted like an absent one.
fn no_tools(tools: &Option<Vec<ToolDeclaration>>) -> bool {
    tools.as_ref().is_none_or(|t| t.is_empty())
}

impl GenerationRequest {
    pub fn builder(messages: Vec<Message>) -> GenerationRequestBuilder {
        GenerationRequestBuilder::new(messages)
    }

    /// Check the parameters before anything goes on the wire.
    pub fn validate(&self) -> LLMResult<()> {
        if self.model.trim().is_empty() {
            return Err(LLMError::Validation("model must not be empty".into()));
        }
        if self.messages.is_empty() {
            return Err(LLMError::Validation("at least one message is required".into()));
        }
        if self.max_tokens == 0 {
            return Err(LLMError::Validation("max_tokens must be positive".into()));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(LLMError::Validation(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if let Some(top) = self.top_logprobs {
            if !self.logprobs {
                return Err(LLMError::Validation(
                    "top_logprobs requires logprobs to be enabled".into(),
                ));
            }
            if top > MAX_TOP_LOGPROBS {
                return Err(LLMError::Validation(format!(
                    "top_logprobs must be between 0 and {MAX_TOP_LOGPROBS}, got {top}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequestBuilder {
    request: GenerationRequest,
}

impl GenerationRequestBuilder {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            request: GenerationRequest {
                model: DEFAULT_MODEL.to_string(),
                messages,
                max_tokens: DEFAULT_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
                stop: None,
                seed: DEFAULT_SEED,
                tools: None,
                logprobs: false,
                top_logprobs: None,
            },
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.request.model = model.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.request.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.request.temperature = temperature;
        self
    }

    pub fn stop(mut self, stop: impl Into<Stop>) -> Self {
        self.request.stop = Some(stop.into());
        self
    }

    pub fn seed(mut self, seed: i64) -> Self {
        self.request.seed = seed;
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDeclaration>) -> Self {
        self.request.tools = Some(tools);
        self
    }

    /// Ask for per-token log-probabilities with `top` alternatives per position.
    pub fn logprobs(mut self, top: u8) -> Self {
        self.request.logprobs = true;
        self.request.top_logprobs = Some(top);
        self
    }

    pub fn top_logprobs(mut self, top: Option<u8>) -> Self {
        self.request.top_logprobs = top;
        self
    }

    /// Finish the request, rejecting invalid parameter combinations.
    pub fn build(self) -> LLMResult<GenerationRequest> {
        self.request.validate()?;
        Ok(self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(text: &str) -> Vec<Message> {
        vec![Message::user(text)]
    }

    #[test]
    fn defaults_follow_the_cheap_model_profile() {
        let req = GenerationRequest::builder(user("hi")).build().unwrap();
        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(req.max_tokens, 16000);
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.seed, 123);
        assert!(!req.logprobs);
        assert_eq!(req.top_logprobs, None);
    }

    #[test]
    fn absent_optionals_are_omitted_from_body() {
        let req = GenerationRequest::builder(user("hi")).build().unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("stop").is_none());
        assert!(body.get("top_logprobs").is_none());
        assert_eq!(body["logprobs"], false);
    }

    #[test]
    fn empty_tool_list_is_omitted() {
        let req = GenerationRequest::builder(user("hi")).tools(Vec::new()).build().unwrap();
        assert!(serde_json::to_value(&req).unwrap().get("tools").is_none());
    }

    #[test]
    fn body_carries_logprob_and_stop_fields() {
        let req = GenerationRequest::builder(user("hi"))
            .stop(vec!["\n\n".to_string(), "END".to_string()])
            .logprobs(2)
            .build()
            .unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["stop"], json!(["\n\n", "END"]));
        assert_eq!(body["logprobs"], true);
        assert_eq!(body["top_logprobs"], 2);
        assert_eq!(body["messages"], json!([{ "role": "user", "content": "hi" }]));
    }

    #[test]
    fn single_stop_serializes_as_string() {
        let req = GenerationRequest::builder(user("hi")).stop("END").build().unwrap();
        assert_eq!(serde_json::to_value(&req).unwrap()["stop"], "END");
    }

    #[test]
    fn top_logprobs_without_logprobs_is_rejected() {
        let err = GenerationRequest::builder(user("hi"))
            .top_logprobs(Some(2))
            .build()
            .unwrap_err();
        assert!(matches!(err, LLMError::Validation(_)));
    }

    #[test]
    fn top_logprobs_above_five_is_rejected() {
        let err = GenerationRequest::builder(user("hi")).logprobs(6).build().unwrap_err();
        assert!(matches!(err, LLMError::Validation(_)));
        assert!(GenerationRequest::builder(user("hi")).logprobs(5).build().is_ok());
        assert!(GenerationRequest::builder(user("hi")).logprobs(0).build().is_ok());
    }

    #[test]
    fn structural_parameters_are_checked() {
        assert!(matches!(
            GenerationRequest::builder(Vec::new()).build(),
            Err(LLMError::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::builder(user("hi")).model("  ").build(),
            Err(LLMError::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::builder(user("hi")).max_tokens(0).build(),
            Err(LLMError::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::builder(user("hi")).temperature(f32::NAN).build(),
            Err(LLMError::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::builder(user("hi")).temperature(2.5).build(),
            Err(LLMError::Validation(_))
        ));
    }
}
