//! Marketing copy generation: prompt assembly, the provider call and
//! response parsing.

pub mod error;
pub mod models;
pub mod prompts;
pub mod provider;
pub mod service;

pub use error::GenerationError;
pub use models::{GenerationRequest, GenerationResult, IntelligencePack};
pub use provider::{ChatCompletion, CompletionProvider, OpenAiProvider};
pub use service::IntelligenceService;
