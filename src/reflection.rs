use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::llm::{error::LLMError, openai::OpenAI, traits::{llm_to_arc_dyn, LLM}, GenerateResult, GenerationRequest};
use crate::message::Message;
use crate::uncertainty::{find_uncertain_tokens, join_tokens};

pub mod types;
pub mod error;
pub mod traits;
pub mod prompts;

use traits::Reflector;
use types::{Phenomenologist, PhenomenologyReport, ReflectionOptions, ReflectionResult, ReflectionState};
use error::ReflectionError;


impl Phenomenologist {
    /// Create a phenomenologist over `llm` with default options.
    pub fn new(llm: Arc<dyn LLM>) -> Self {
        Self {
            llm,
            options: ReflectionOptions::default(),
        }
    }

    /// OpenAI-backed phenomenologist configured from `settings`.
    pub fn from_settings(settings: &Settings) -> crate::error::Result<Self> {
        let llm = llm_to_arc_dyn(OpenAI::from_settings(settings)?);
        Ok(Self::new(llm).with_options(ReflectionOptions::from(settings)))
    }

    /// Load [`Settings`] from the environment and build from them.
    pub fn from_env() -> crate::error::Result<Self> {
        let settings = Settings::from_env()?;
        info!(model = %settings.model, threshold = settings.logprob_threshold, "configuration loaded");
        Self::from_settings(&settings)
    }

    pub fn with_options(mut self, options: ReflectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Change the log-probability below which a token counts as uncertain.
    pub fn with_threshold(mut self, logprob_threshold: f64) -> Self {
        self.options.logprob_threshold = logprob_threshold;
        self
    }

    // Both calls share every parameter except the prompt, and both ask for logprobs.
    fn build_request(&self, prompt: String) -> Result<GenerationRequest, LLMError> {
        let mut builder = GenerationRequest::builder(vec![Message::user(prompt)])
            .model(self.options.model.clone())
            .max_tokens(self.options.max_tokens)
            .temperature(self.options.temperature)
            .seed(self.options.seed)
            .logprobs(self.options.top_logprobs);
        if let Some(stop) = &self.options.stop {
            builder = builder.stop(stop.clone());
        }
        if let Some(tools) = &self.options.tools {
            builder = builder.tools(tools.clone());
        }
        builder.build()
    }

    async fn call(&self, request: &GenerationRequest) -> Result<GenerateResult, LLMError> {
        let mut result = self.llm.generate(request).await?;
        result.generation = result.generation.trim().to_string();
        Ok(result)
    }

    /// First stage: ask for a description of `passage` and flag its uncertain tokens.
    ///
    /// The returned report is in [`ReflectionState::Described`]; pass it to
    /// [`Phenomenologist::finish`] to complete the run.
    pub async fn describe(&self, passage: &str) -> ReflectionResult {
        if passage.trim().is_empty() {
            if self.options.reject_empty_passage {
                return Err(ReflectionError::EmptyPassage);
            }
            warn!("text passage is empty, describing it anyway");
        }

        let request = self.build_request(prompts::description_prompt(passage))?;
        info!(model = %request.model, "requesting initial description");
        let description = self.call(&request).await.map_err(ReflectionError::Description)?;

        if description.token_logprobs.is_empty() {
            warn!("description carried no token log-probabilities");
        }
        let uncertain_tokens =
            find_uncertain_tokens(&description.token_logprobs, self.options.logprob_threshold);
        info!(
            scored = description.token_logprobs.len(),
            uncertain = uncertain_tokens.len(),
            threshold = self.options.logprob_threshold,
            "analyzed description tokens"
        );

        Ok(PhenomenologyReport {
            passage: passage.to_string(),
            threshold: self.options.logprob_threshold,
            description,
            uncertain_tokens,
            reflection: None,
            state: ReflectionState::Described,
        })
    }

    /// Second stage: reflect on the uncertain tokens of a described report.
    ///
    /// With no uncertain tokens the run ends in `Done` without another call.
    /// Reports that already reached a terminal state are returned unchanged.
    pub async fn finish(&self, mut report: PhenomenologyReport) -> ReflectionResult {
        if report.is_finished() {
            return Ok(report);
        }
        if report.uncertain_tokens.is_empty() {
            info!("no tokens below the confidence threshold, skipping reflection");
            report.state = ReflectionState::Done;
            return Ok(report);
        }

        let tokens = join_tokens(&report.uncertain_tokens);
        let request = self.build_request(prompts::reflection_prompt(&tokens, &report.passage))?;
        info!(tokens = %tokens, "requesting reflection on uncertain tokens");
        let reflection = self.call(&request).await.map_err(ReflectionError::Reflection)?;

        report.reflection = Some(reflection);
        report.state = ReflectionState::Reflected;
        Ok(report)
    }
}


#[async_trait::async_trait]
impl Reflector for Phenomenologist {
    async fn reflect(&self, passage: &str) -> ReflectionResult {
        let described = self.describe(passage).await?;
        self.finish(described).await
    }
}
