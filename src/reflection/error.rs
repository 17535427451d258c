use crate::llm::error::LLMError;

#[derive(Debug, thiserror::Error)]
pub enum ReflectionError {
    #[error("The text passage is empty")]
    EmptyPassage,

    #[error("Description call failed: {0}")]
    Description(#[source] LLMError),

    #[error("Reflection call failed: {0}")]
    Reflection(#[source] LLMError),

    #[error("LLM error: {0}")]
    LLMExecutionError(#[from] LLMError),
}

impl ReflectionError {
    /// The requester error behind this failure, if any.
    pub fn llm_error(&self) -> Option<&LLMError> {
        match self {
            ReflectionError::Description(e)
            | ReflectionError::Reflection(e)
            | ReflectionError::LLMExecutionError(e) => Some(e),
            ReflectionError::EmptyPassage => None,
        }
    }
}
