//! The `Generator` trait -- the seam to the external text-generation service.
//!
//! Everything behind this trait is a black box: a prompt goes in, free
//! text comes out, possibly slowly and possibly not at all. The trait is
//! object-safe so agents can hold an `Arc<dyn Generator>`.

use async_trait::async_trait;

use super::types::GenerationError;

/// Turns a natural-language prompt into natural-language response text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable name for this generator (e.g. "claude-code").
    fn name(&self) -> &str;

    /// Run one generation request and return the raw response text.
    ///
    /// Implementations enforce their own timeout and must not return an
    /// empty string on success; use [`GenerationError::EmptyResponse`].
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

// Compile-time assertion: Generator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Echoes the prompt back, to prove the trait works as `dyn Generator`.
    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            if prompt.is_empty() {
                return Err(GenerationError::EmptyResponse);
            }
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn generator_is_object_safe() {
        let generator: Arc<dyn Generator> = Arc::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");
    }

    #[tokio::test]
    async fn dyn_generator_round_trips_prompt() {
        let generator: Box<dyn Generator> = Box::new(EchoGenerator);
        assert_eq!(generator.generate("hello").await.unwrap(), "hello");
        assert!(matches!(
            generator.generate("").await,
            Err(GenerationError::EmptyResponse)
        ));
    }
}
