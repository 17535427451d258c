use super::types::ReflectionResult;

/// Runtime operation of a phenomenologist: read a passage, report on it.
#[async_trait::async_trait]
pub trait Reflector: Send + Sync {
    /// Describe `passage`, flag uncertain tokens, and reflect on them if any.
    async fn reflect(&self, passage: &str) -> ReflectionResult;
}
