pub use async_openai::config::{Config, OpenAIConfig};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use futures::{
    FutureExt,
    future::BoxFuture,
};

use crate::config::Settings;
use crate::llm::{
    traits::LLM,
    tokens::{TokenInfo, TokenUsage},
    error::LLMError,
    CallInfo,
    GenerateResult,
    GenerationRequest,
    LLMResult,
};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Chat-completions client for OpenAI-compatible endpoints.
///
/// The credential is injected by the caller; this type never reads the
/// environment on its own.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub(crate) http: reqwest::Client,
    pub(crate) config: OpenAIConfig,
}

impl OpenAI {
    pub fn with_api_key(api_key: impl Into<String>) -> LLMResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LLMError::Authentication("no API key supplied".into()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            config: OpenAIConfig::new().with_api_key(api_key),
        })
    }

    /// Build a client from loaded settings (key, base URL, organization).
    pub fn from_settings(settings: &Settings) -> LLMResult<Self> {
        let mut llm = Self::with_api_key(settings.api_key.clone())?;
        if let Some(base) = settings.api_base.as_deref() {
            llm = llm.with_api_base(base);
        }
        if let Some(org) = settings.organization.as_deref() {
            llm = llm.with_org_id(org);
        }
        Ok(llm)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let base: String = api_base.into();
        self.config = self.config.with_api_base(base.trim_end_matches('/'));
        self
    }

    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.config = self.config.with_org_id(org_id);
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    async fn send(&self, request: &GenerationRequest) -> LLMResult<GenerateResult> {
        request.validate()?;
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            logprobs = request.logprobs,
            top_logprobs = ?request.top_logprobs,
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.config.url(CHAT_COMPLETIONS_PATH))
            .headers(self.config.headers())
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(error_for_status(status, &body));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| LLMError::InvalidResponse(format!("malformed completion payload: {e}")))?;
        let result = completion.into_result()?;
        if request.logprobs && result.token_logprobs.is_empty() {
            warn!("log-probabilities were requested but the response carried none");
        }
        debug!(
            completion_tokens = result.tokens.completion_tokens,
            scored_tokens = result.token_logprobs.len(),
            "chat completion received"
        );
        Ok(result)
    }
}

impl LLM for OpenAI {
    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, LLMResult<GenerateResult>> {
        self.send(request).boxed()
    }
}

/// Map a non-success status and its body onto an error kind.
fn error_for_status(status: u16, body: &str) -> LLMError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    match status {
        401 | 403 => LLMError::Authentication(message),
        429 => LLMError::RateLimitExceeded(message),
        _ => LLMError::Service { status, message },
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    logprobs: Option<ChoiceLogprobs>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChoiceLogprobs {
    #[serde(default)]
    content: Option<Vec<TokenInfo>>,
}

impl ChatCompletionResponse {
    fn into_result(self) -> LLMResult<GenerateResult> {
        let tokens = self.usage.unwrap_or_default();
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InvalidResponse("response contained no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                // arguments arrive as a JSON-encoded string
                let args = serde_json::from_str::<Value>(&call.function.arguments)
                    .unwrap_or(Value::String(call.function.arguments));
                CallInfo { name: call.function.name, args }
            })
            .collect();

        let token_logprobs = choice
            .logprobs
            .and_then(|lp| lp.content)
            .unwrap_or_default();

        Ok(GenerateResult {
            tokens,
            generation: choice.message.content.unwrap_or_default(),
            token_logprobs,
            tool_calls,
        })
    }
}
