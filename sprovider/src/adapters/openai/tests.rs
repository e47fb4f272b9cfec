//! Focused unit tests for OpenAI adapter internals.

#![cfg(test)]

use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde_json::{Map, json};

use crate::{
    Candidate, CompletionProvider, CompletionRequest, GenerationOptions, Message,
    ProviderError, ProviderErrorKind, ProviderFuture, SecureCredentialManager, ToolDefinition,
};

use super::provider::OpenAiProvider;
use super::serde_api::{OpenAiApiResponse, build_api_request, parse_finish_reason};
use super::transport::{OpenAiTransport, error_from_status};
use super::types::{
    OpenAiAuth, OpenAiChoice, OpenAiFinishReason, OpenAiFunctionCall, OpenAiMessage,
    OpenAiRequest, OpenAiResponse, OpenAiRole, OpenAiUsage,
};

#[derive(Debug, Default)]
struct RecordingTransport {
    requests: Mutex<Vec<OpenAiRequest>>,
}

impl OpenAiTransport for RecordingTransport {
    fn complete<'a>(
        &'a self,
        request: OpenAiRequest,
        _auth: OpenAiAuth,
    ) -> ProviderFuture<'a, Result<OpenAiResponse, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            Ok(OpenAiResponse {
                model: "gpt-4o-mini".to_string(),
                choices: vec![
                    OpenAiChoice {
                        content: Some("first".to_string()),
                        function_call: None,
                        finish_reason: OpenAiFinishReason::Stop,
                    },
                    OpenAiChoice {
                        content: None,
                        function_call: Some(OpenAiFunctionCall {
                            name: Some("lookup".to_string()),
                            arguments: "{\"dish\":\"pasta\"}".to_string(),
                        }),
                        finish_reason: OpenAiFinishReason::FunctionCall,
                    },
                ],
                usage: OpenAiUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                },
            })
        })
    }
}

fn lookup_tool() -> ToolDefinition {
    ToolDefinition::new(
        "lookup",
        "Looks up a recipe",
        json!({"type": "object", "properties": {"dish": {"type": "string"}}}),
    )
}

fn openai_request(messages: Vec<OpenAiMessage>) -> OpenAiRequest {
    OpenAiRequest {
        model: "gpt-4o-mini".to_string(),
        messages,
        n: 1,
        functions: Vec::new(),
        function_call: None,
        temperature: None,
        top_p: None,
        max_tokens: None,
        extra: Map::new(),
    }
}

#[test]
fn build_openai_request_maps_tools_and_forced_function() {
    let provider = OpenAiProvider::new(
        Arc::new(SecureCredentialManager::new()),
        Arc::new(RecordingTransport::default()),
    );
    let request = CompletionRequest::builder("gpt-4o-mini")
        .message(Message::user("dinner?"))
        .message(Message::function("lookup", "pasta"))
        .n(3)
        .tools(vec![lookup_tool()])
        .forced_function("lookup")
        .options(GenerationOptions::default().with_top_p(0.5))
        .build()
        .expect("request should build");

    let built = provider.build_openai_request(request);
    assert_eq!(built.n, 3);
    assert_eq!(built.functions.len(), 1);
    assert_eq!(built.function_call.as_deref(), Some("lookup"));
    assert_eq!(built.top_p, Some(0.5));
    assert_eq!(built.messages[1].role, OpenAiRole::Function);
    assert_eq!(built.messages[1].name.as_deref(), Some("lookup"));
}

#[test]
fn api_request_serializes_legacy_function_format_and_extra() {
    let mut request = openai_request(vec![OpenAiMessage {
        role: OpenAiRole::User,
        content: "hi".to_string(),
        name: None,
    }]);
    request.functions = vec![lookup_tool().into()];
    request.function_call = Some("lookup".to_string());
    request.extra.insert("user".to_string(), json!("tenant-1"));

    let api_request = build_api_request(request).expect("request should build");
    let payload = serde_json::to_value(&api_request).expect("payload should serialize");

    assert_eq!(payload["functions"][0]["name"], "lookup");
    assert_eq!(payload["function_call"], json!({"name": "lookup"}));
    assert_eq!(payload["user"], "tenant-1");
    assert_eq!(payload["n"], 1);
    assert!(payload.get("temperature").is_none());
}

#[test]
fn api_request_drops_directive_without_functions() {
    let mut request = openai_request(vec![OpenAiMessage {
        role: OpenAiRole::User,
        content: "hi".to_string(),
        name: None,
    }]);
    request.function_call = Some("lookup".to_string());

    let payload = serde_json::to_value(build_api_request(request).expect("request should build"))
        .expect("payload should serialize");
    assert!(payload.get("function_call").is_none());
    assert!(payload.get("functions").is_none());
}

#[test]
fn function_message_without_name_is_rejected() {
    let request = openai_request(vec![OpenAiMessage {
        role: OpenAiRole::Function,
        content: "pasta".to_string(),
        name: None,
    }]);

    let error = build_api_request(request).expect_err("nameless function message must fail");
    assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
}

#[test]
fn response_choices_keep_backend_order_and_usage() {
    let body = json!({
        "model": "gpt-4o-mini",
        "choices": [
            {"index": 1, "message": {"content": null, "function_call": {"name": "lookup", "arguments": "{}"}}, "finish_reason": "function_call"},
            {"index": 0, "message": {"content": "hello"}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}
    });
    let parsed: OpenAiApiResponse = serde_json::from_value(body).expect("response should parse");
    let response = OpenAiResponse::try_from(parsed)
        .expect("response should convert")
        .into_completion_response();

    assert_eq!(response.usage.total_tokens, 7);
    assert_eq!(response.candidates[0], Candidate::Text("hello".to_string()));
    match &response.candidates[1] {
        Candidate::FunctionCall(intent) => {
            assert_eq!(intent.name.as_deref(), Some("lookup"));
            assert_eq!(intent.arguments, "{}");
        }
        other => panic!("expected function call, got {other:?}"),
    }
}

#[test]
fn response_without_choices_is_transport_error() {
    let parsed: OpenAiApiResponse =
        serde_json::from_value(json!({"model": "gpt", "choices": []})).expect("parse");
    let error = OpenAiResponse::try_from(parsed).expect_err("empty choices must fail");
    assert_eq!(error.kind, ProviderErrorKind::Transport);
    assert!(error.retryable);
}

#[test]
fn parse_finish_reason_maps_expected_values() {
    assert_eq!(parse_finish_reason(Some("stop")), OpenAiFinishReason::Stop);
    assert_eq!(
        parse_finish_reason(Some("function_call")),
        OpenAiFinishReason::FunctionCall
    );
    assert_eq!(
        parse_finish_reason(Some("content_filter")),
        OpenAiFinishReason::ContentFilter
    );
    assert_eq!(parse_finish_reason(None), OpenAiFinishReason::Other);
}

#[test]
fn status_codes_map_to_error_kinds() {
    let body = "{\"error\":{\"message\":\"slow down\"}}";
    let rate_limited = error_from_status(StatusCode::TOO_MANY_REQUESTS, body);
    assert_eq!(rate_limited.kind, ProviderErrorKind::RateLimited);
    assert_eq!(rate_limited.message, "slow down");

    assert_eq!(
        error_from_status(StatusCode::UNAUTHORIZED, "").kind,
        ProviderErrorKind::Authentication
    );
    assert_eq!(
        error_from_status(StatusCode::GATEWAY_TIMEOUT, "").kind,
        ProviderErrorKind::Timeout
    );
    assert_eq!(
        error_from_status(StatusCode::BAD_GATEWAY, "").kind,
        ProviderErrorKind::Unavailable
    );

    let internal = error_from_status(StatusCode::INTERNAL_SERVER_ERROR, "not json");
    assert_eq!(internal.kind, ProviderErrorKind::Transport);
    assert!(internal.retryable);
}

#[tokio::test]
async fn provider_requires_api_key_before_transport_call() {
    let transport = Arc::new(RecordingTransport::default());
    let provider = OpenAiProvider::new(Arc::new(SecureCredentialManager::new()), transport.clone());

    let error = provider
        .complete(CompletionRequest::new("gpt-4o-mini", vec![Message::user("hi")]))
        .await
        .expect_err("missing key must fail");

    assert_eq!(error.kind, ProviderErrorKind::Authentication);
    assert!(transport.requests.lock().expect("requests lock").is_empty());
}

#[tokio::test]
async fn provider_returns_candidates_in_order() {
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials
        .set_openai_api_key("sk-test")
        .expect("key should store");
    let transport = Arc::new(RecordingTransport::default());
    let provider = OpenAiProvider::new(credentials, transport.clone());

    let response = provider
        .complete(
            CompletionRequest::builder("gpt-4o-mini")
                .message(Message::user("hi"))
                .n(2)
                .build()
                .expect("request should build"),
        )
        .await
        .expect("completion should succeed");

    assert_eq!(response.candidates.len(), 2);
    assert_eq!(response.first_text(), "first");
    assert_eq!(response.usage.total_tokens, 15);
    assert_eq!(transport.requests.lock().expect("requests lock")[0].n, 2);
}

#[test]
fn openai_key_prefix_is_enforced() {
    let credentials = SecureCredentialManager::new();
    let error = credentials
        .set_openai_api_key("pk-wrong")
        .expect_err("prefix must be checked");
    assert_eq!(error.kind, ProviderErrorKind::Authentication);
}
