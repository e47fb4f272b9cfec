//! Stable construction surface for the OpenAI completion provider and assistants backend.

use std::sync::Arc;

use reqwest::Client;

use crate::{
    AssistantBackend, ClientConfig, CompletionProvider, ProviderError, SecureCredentialManager,
};

pub fn build_completion_provider_from_api_key(
    api_key: impl Into<String>,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    build_completion_provider(&ClientConfig::new(api_key))
}

pub fn build_completion_provider(
    config: &ClientConfig,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let (credentials, http) = prepare(config)?;
    build_openai_provider(credentials, http, config.base_url.clone())
}

pub fn build_assistant_backend(
    config: &ClientConfig,
) -> Result<Arc<dyn AssistantBackend>, ProviderError> {
    let (credentials, http) = prepare(config)?;
    build_openai_backend(credentials, http, config.base_url.clone())
}

fn prepare(config: &ClientConfig) -> Result<(Arc<SecureCredentialManager>, Client), ProviderError> {
    let api_key = config.api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(ProviderError::authentication(
            "provider API key must not be empty",
        ));
    }

    let credentials = Arc::new(SecureCredentialManager::new());
    store_api_key(&credentials, api_key)?;

    let http = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    Ok((credentials, http))
}

#[cfg(feature = "openai")]
fn store_api_key(
    credentials: &SecureCredentialManager,
    api_key: String,
) -> Result<(), ProviderError> {
    credentials.set_openai_api_key(api_key)
}

#[cfg(not(feature = "openai"))]
fn store_api_key(
    credentials: &SecureCredentialManager,
    api_key: String,
) -> Result<(), ProviderError> {
    credentials.set_api_key(api_key)
}

#[cfg(feature = "openai")]
fn build_openai_provider(
    credentials: Arc<SecureCredentialManager>,
    http: Client,
    base_url: Option<String>,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let mut transport = sprovider::adapters::openai::OpenAiHttpTransport::new(http);
    if let Some(base_url) = base_url {
        transport = transport.with_base_url(base_url);
    }
    Ok(Arc::new(sprovider::adapters::openai::OpenAiProvider::new(
        credentials,
        Arc::new(transport),
    )))
}

#[cfg(not(feature = "openai"))]
fn build_openai_provider(
    _credentials: Arc<SecureCredentialManager>,
    _http: Client,
    _base_url: Option<String>,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    Err(ProviderError::invalid_request(
        "openai feature is not enabled on sizzle",
    ))
}

#[cfg(feature = "openai")]
fn build_openai_backend(
    credentials: Arc<SecureCredentialManager>,
    http: Client,
    base_url: Option<String>,
) -> Result<Arc<dyn AssistantBackend>, ProviderError> {
    let mut backend = sassistant::openai::OpenAiAssistantsBackend::new(http, credentials);
    if let Some(base_url) = base_url {
        backend = backend.with_base_url(base_url);
    }
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "openai"))]
fn build_openai_backend(
    _credentials: Arc<SecureCredentialManager>,
    _http: Client,
    _base_url: Option<String>,
) -> Result<Arc<dyn AssistantBackend>, ProviderError> {
    Err(ProviderError::invalid_request(
        "openai feature is not enabled on sizzle",
    ))
}

#[cfg(all(test, feature = "openai"))]
mod tests {
    use crate::{ClientConfig, ProviderErrorKind};

    use super::{
        build_assistant_backend, build_completion_provider, build_completion_provider_from_api_key,
    };

    #[test]
    fn completion_provider_builds_from_valid_key() {
        let provider =
            build_completion_provider_from_api_key("sk-test").expect("provider should build");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn builders_reject_blank_and_malformed_keys() {
        let blank = build_completion_provider(&ClientConfig::new("   "))
            .err()
            .expect("blank key should fail");
        assert_eq!(blank.kind, ProviderErrorKind::Authentication);

        let malformed = build_assistant_backend(&ClientConfig::new("not-a-key"))
            .err()
            .expect("key without sk- prefix should fail");
        assert_eq!(malformed.kind, ProviderErrorKind::Authentication);
    }

    #[test]
    fn assistant_backend_accepts_custom_base_url() {
        let config = ClientConfig::new("sk-test").with_base_url("http://localhost:9999/v1");
        assert!(build_assistant_backend(&config).is_ok());
    }
}
