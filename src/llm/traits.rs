use std::sync::Arc;
use crate::llm::{LLMResult, GenerateResult, GenerationRequest};
use futures::future::BoxFuture;

/// Convert a concrete L into an `Arc<dyn LLM + Send + Sync>`.
/// Convenience so callers can do `llm_to_arc_dyn(MyLlm::new(...))`.
pub fn llm_to_arc_dyn<L>(llm: L) -> Arc<dyn LLM + Send + Sync>
where
    L: 'static + LLM + Send + Sync,
{
    Arc::new(llm)
}

/// Core LLM trait: one request in, one generation out.
///
/// Note:
/// - The returned future borrows the request, so implementations can
///   serialize it without cloning the messages.
/// - Implementations perform exactly one call per `generate`; there is no
///   retry at this layer.
pub trait LLM: Send + Sync {
    /// Produce a generation result. The returned future may borrow from `request`.
    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, LLMResult<GenerateResult>>;
}
