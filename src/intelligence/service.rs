use std::sync::Arc;

use super::error::GenerationError;
use super::models::{
    GenerationOptions, GenerationRequest, GenerationResult, IntelligencePack, Mode,
};
use super::prompts;
use super::provider::{ChatCompletion, CompletionProvider};

/// Validates a request, builds the prompt, makes exactly one provider call and
/// parses the answer. Nothing is cached between calls.
#[derive(Clone)]
pub struct IntelligenceService {
    provider: Arc<dyn CompletionProvider>,
}

impl IntelligenceService {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Input checks only; never touches the provider.
    pub fn prepare(
        request: &GenerationRequest,
    ) -> Result<(String, GenerationOptions), GenerationError> {
        let text = request
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GenerationError::InvalidInput("text is required".to_string()))?;

        let options = GenerationOptions::parse(
            request.mode.as_deref(),
            request.tone.as_deref(),
            request.client_type.as_deref(),
        )?;

        Ok((text.to_string(), options))
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let (text, options) = Self::prepare(&request)?;

        let completion = ChatCompletion {
            system: prompts::system_prompt(&options),
            user: prompts::user_prompt(&text),
            json_output: options.mode == Mode::Pack,
        };

        let content = self.provider.complete(completion).await?;

        match options.mode {
            Mode::Pack => {
                let pack = IntelligencePack::from_completion(&content)?;
                Ok(GenerationResult::Pack(Box::new(pack)))
            }
            Mode::SellerStudio | Mode::BuyerStudio => Ok(GenerationResult::Text { text: content }),
        }
    }
}
