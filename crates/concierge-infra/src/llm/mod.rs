//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `concierge-core` and a factory ([`create_provider`]) that builds it
//! from configuration.
//!
//! [`LlmProvider`]: concierge_core::llm::provider::LlmProvider

pub mod gemini;

use std::time::Duration;

use secrecy::SecretString;

use concierge_core::llm::box_provider::BoxLlmProvider;
use concierge_types::config::ModelProviderConfig;
use concierge_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Create a [`BoxLlmProvider`] from provider settings and a resolved API key.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is available.
pub fn create_provider(
    config: &ModelProviderConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let api_key = api_key.ok_or(LlmError::AuthenticationFailed)?;
    let mut provider =
        GeminiProvider::new(api_key, Duration::from_secs(config.request_timeout_secs));
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(BoxLlmProvider::new(provider))
}
