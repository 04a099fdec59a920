pub mod gemini;
pub mod openai;

use crate::errors::LlmError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This defines a common interface for the content-generation stages over
/// different backends. A streaming backend consumes its stream to
/// completion and concatenates the fragments, so callers always receive the
/// full response text in one string.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, LlmError>;
}

dyn_clone::clone_trait_object!(AiProvider);
