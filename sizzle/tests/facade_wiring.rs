use std::sync::{Arc, Mutex};
use std::time::Duration;

use sizzle::prelude::*;
use sizzle::{
    AssistantErrorKind, ChatErrorKind, CompletionProvider, CompletionRequest, CompletionResponse,
    ObservabilityBundle, OperationHooks, ProviderFuture, RecordingSleeper, RetryClassify,
    Sleeper, chat_service_builder_with,
};

#[derive(Default)]
struct FailingProvider {
    calls: Mutex<u32>,
}

impl CompletionProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn complete<'a>(
        &'a self,
        _request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<CompletionResponse, ProviderError>> {
        Box::pin(async move {
            *self.calls.lock().expect("calls lock") += 1;
            Err(ProviderError::unavailable("backend overloaded"))
        })
    }
}

#[derive(Default)]
struct CountingOperationHooks {
    scheduled: Mutex<u32>,
    failures: Mutex<u32>,
}

impl OperationHooks for CountingOperationHooks {
    fn on_retry_scheduled(
        &self,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &dyn RetryClassify,
    ) {
        *self.scheduled.lock().expect("scheduled lock") += 1;
    }

    fn on_failure(&self, _operation: &str, _attempts: u32, _error: &dyn RetryClassify) {
        *self.failures.lock().expect("failures lock") += 1;
    }
}

#[tokio::test]
async fn chat_builder_applies_client_retry_budget() {
    let provider = Arc::new(FailingProvider::default());
    let sleeper = Arc::new(RecordingSleeper::new());
    let config = ClientConfig::new("sk-test").with_max_attempts(2);

    let chat = chat_service_builder(provider.clone(), "gpt-4o-mini", &config)
        .sleeper(sleeper.clone() as Arc<dyn Sleeper>)
        .build()
        .expect("chat service should build");

    let error = chat
        .chat(&sz_messages![user => "hi"], 1, &FunctionCallPolicy::none())
        .await
        .expect_err("every attempt fails");

    assert_eq!(error.kind, ChatErrorKind::RetryExhausted);
    assert_eq!(error.attempts, Some(2));
    assert_eq!(*provider.calls.lock().expect("calls lock"), 2);
    assert_eq!(sleeper.count(), 1);
}

#[tokio::test]
async fn custom_observability_bundle_receives_retry_events() {
    let provider = Arc::new(FailingProvider::default());
    let hooks = Arc::new(CountingOperationHooks::default());
    let bundle = ObservabilityBundle {
        operation: hooks.clone(),
        ..ObservabilityBundle::default()
    };
    let config = ClientConfig::new("sk-test").with_max_attempts(3);

    let chat = chat_service_builder_with(provider, "gpt-4o-mini", &config, bundle)
        .sleeper(Arc::new(RecordingSleeper::new()))
        .build()
        .expect("chat service should build");

    let _ = chat
        .chat(&sz_messages![user => "hi"], 1, &FunctionCallPolicy::none())
        .await;

    assert_eq!(*hooks.scheduled.lock().expect("scheduled lock"), 2);
    assert_eq!(*hooks.failures.lock().expect("failures lock"), 1);
}

#[test]
fn assistant_config_inherits_client_settings() {
    let config = ClientConfig::new("sk-test")
        .with_max_attempts(4)
        .with_poll_interval(Duration::from_millis(50));

    let assistant = assistant_config(&config, "gpt-4o-mini");

    assert_eq!(assistant.retry.max_attempts, 4);
    assert_eq!(assistant.poll.interval, Duration::from_millis(50));
    assert_eq!(assistant.profile.model, "gpt-4o-mini");
}

#[tokio::test]
async fn create_assistant_rejects_unapproved_model_before_network() {
    let config = ClientConfig::new("sk-test").with_base_url("http://127.0.0.1:9/v1");
    let backend = build_assistant_backend(&config).expect("backend should build");

    let error = create_assistant(backend, assistant_config(&config, "davinci-002"), None)
        .await
        .err()
        .expect("unapproved model should be rejected");

    assert_eq!(error.kind, AssistantErrorKind::Configuration);
}
