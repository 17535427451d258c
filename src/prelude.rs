pub use crate::config::Settings;
pub use crate::error::{Error, Result};
pub use crate::llm::{
    openai::OpenAI,
    tokens::{TokenInfo, TokenUsage},
    traits::{llm_to_arc_dyn, LLM},
    GenerateResult,
    GenerationRequest,
    Stop,
};
pub use crate::message::Message;
pub use crate::reflection::{
    traits::Reflector,
    types::{Phenomenologist, PhenomenologyReport, ReflectionOptions, ReflectionState},
};
pub use crate::tools::{ArgSchema, ToolDeclaration, ToolSchema};
pub use crate::uncertainty::{find_uncertain_tokens, probability_percent, UncertainToken};
