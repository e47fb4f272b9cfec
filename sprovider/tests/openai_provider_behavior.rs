#![cfg(feature = "provider-openai")]

use std::sync::{Arc, Mutex};

use serde_json::json;
use sprovider::adapters::openai::{
    OpenAiAuth, OpenAiChoice, OpenAiFinishReason, OpenAiFunctionCall, OpenAiProvider,
    OpenAiRequest, OpenAiResponse, OpenAiRole, OpenAiTransport, OpenAiUsage,
};
use sprovider::{
    Candidate, CompletionProvider, CompletionRequest, Message, ProviderError, ProviderErrorKind,
    ProviderFuture, SecureCredentialManager, ToolDefinition,
};

#[derive(Debug, Default)]
struct FakeTransport {
    captured_key: Mutex<Option<String>>,
    captured_request: Mutex<Option<OpenAiRequest>>,
}

impl OpenAiTransport for FakeTransport {
    fn complete<'a>(
        &'a self,
        request: OpenAiRequest,
        auth: OpenAiAuth,
    ) -> ProviderFuture<'a, Result<OpenAiResponse, ProviderError>> {
        Box::pin(async move {
            *self.captured_request.lock().expect("request lock") = Some(request);
            *self.captured_key.lock().expect("key lock") = Some(auth.api_key().to_string());

            Ok(OpenAiResponse {
                model: "gpt-4o-mini".to_string(),
                choices: vec![OpenAiChoice {
                    content: None,
                    function_call: Some(OpenAiFunctionCall {
                        name: Some("get_recipe".to_string()),
                        arguments: "{\"dish\":\"ramen\"}".to_string(),
                    }),
                    finish_reason: OpenAiFinishReason::FunctionCall,
                }],
                usage: OpenAiUsage {
                    prompt_tokens: 7,
                    completion_tokens: 3,
                    total_tokens: 10,
                },
            })
        })
    }
}

#[tokio::test]
async fn complete_maps_function_call_response_to_candidates() {
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials
        .set_openai_api_key("sk-live-123")
        .expect("key should store");
    let transport = Arc::new(FakeTransport::default());
    let provider = OpenAiProvider::new(credentials, transport.clone());

    let request = CompletionRequest::builder("gpt-4o-mini")
        .message(Message::system("You are a chef."))
        .message(Message::user("What is for dinner?"))
        .tools(vec![ToolDefinition::new(
            "get_recipe",
            "Fetches a recipe",
            json!({"type": "object", "properties": {"dish": {"type": "string"}}}),
        )])
        .forced_function("get_recipe")
        .build()
        .expect("request should build");

    let response = provider.complete(request).await.expect("completion should succeed");

    assert_eq!(provider.name(), "openai");
    assert_eq!(response.usage.total_tokens, 10);
    match &response.candidates[0] {
        Candidate::FunctionCall(intent) => {
            assert_eq!(intent.name.as_deref(), Some("get_recipe"));
            assert_eq!(intent.arguments, "{\"dish\":\"ramen\"}");
        }
        other => panic!("expected function call, got {other:?}"),
    }

    assert_eq!(
        transport.captured_key.lock().expect("key lock").as_deref(),
        Some("sk-live-123")
    );
    let captured = transport
        .captured_request
        .lock()
        .expect("request lock")
        .clone()
        .expect("request should be captured");
    assert_eq!(captured.function_call.as_deref(), Some("get_recipe"));
    assert_eq!(captured.messages[0].role, OpenAiRole::System);
}

#[tokio::test]
async fn invalid_request_is_rejected_before_transport() {
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials
        .set_openai_api_key("sk-live-123")
        .expect("key should store");
    let transport = Arc::new(FakeTransport::default());
    let provider = OpenAiProvider::new(credentials, transport.clone());

    let mut request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("hi")]);
    request.n = 0;

    let error = provider
        .complete(request)
        .await
        .expect_err("n=0 should be rejected");
    assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    assert!(
        transport
            .captured_request
            .lock()
            .expect("request lock")
            .is_none()
    );
}
