//! OpenAI provider implementation over transport and shared models.

use std::sync::Arc;

use crate::{
    CompletionProvider, CompletionRequest, CompletionResponse, ProviderError, ProviderFuture,
    SecureCredentialManager,
};

use super::auth::resolve_openai_auth;
use super::transport::OpenAiTransport;
use super::types::{OpenAiFunction, OpenAiMessage, OpenAiRequest};

#[derive(Clone)]
pub struct OpenAiProvider {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn OpenAiTransport>,
}

impl OpenAiProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn OpenAiTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub(crate) fn build_openai_request(&self, request: CompletionRequest) -> OpenAiRequest {
        let messages = request
            .messages
            .into_iter()
            .map(OpenAiMessage::from)
            .collect::<Vec<_>>();

        let functions = request
            .tools
            .into_iter()
            .map(OpenAiFunction::from)
            .collect::<Vec<_>>();

        OpenAiRequest {
            model: request.model,
            messages,
            n: request.n,
            functions,
            function_call: request.forced_function,
            temperature: request.options.temperature,
            top_p: request.options.top_p,
            max_tokens: request.options.max_tokens,
            extra: request.extra,
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<CompletionResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = resolve_openai_auth(&self.credentials)?;
            let openai_request = self.build_openai_request(request);
            let response = self.transport.complete(openai_request, auth).await?;
            Ok(response.into_completion_response())
        })
    }
}
