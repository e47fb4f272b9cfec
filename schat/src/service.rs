//! Single-turn chat orchestration with optional function calling.

use std::sync::Arc;

use scommon::{DelaySleeper, Sleeper};
use serde_json::{Map, Value};
use sprovider::{
    Candidate, CompletionProvider, CompletionRequest, FunctionCallIntent, GenerationOptions,
    Message, NoopOperationHooks, OperationHooks, RetryPolicy, ToolDefinition, execute_with_retry,
};
use stooling::{
    Dispatcher, FunctionCall, FunctionDispatcher, FunctionRegistry, InvocationContext,
    NoopToolRuntimeHooks, ToolRuntimeHooks,
};

use crate::{CandidateResult, ChatError, ChatTurnResult, FunctionCallPolicy};

const CHAT_OPERATION: &str = "chat_turn";

#[derive(Clone)]
struct FunctionSetup {
    descriptors: Vec<ToolDefinition>,
    dispatcher: Arc<dyn Dispatcher>,
    capture_dispatcher: Arc<dyn Dispatcher>,
}

#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    persona: Option<String>,
    options: GenerationOptions,
    extra: Map<String, Value>,
    functions: Option<FunctionSetup>,
    empty_dispatcher: Arc<dyn Dispatcher>,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    operation_hooks: Arc<dyn OperationHooks>,
}

impl ChatService {
    pub fn builder(
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
    ) -> ChatServiceBuilder {
        ChatServiceBuilder::new(provider, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn function_calling_enabled(&self) -> bool {
        self.functions.is_some()
    }

    /// Plain turn without function directives.
    pub async fn chat_plain(&self, history: &[Message], n: u32) -> Result<ChatTurnResult, ChatError> {
        self.chat(history, n, &FunctionCallPolicy::none()).await
    }

    /// Runs one turn over caller-owned `history`, retrying the whole turn on
    /// transient failures.
    pub async fn chat(
        &self,
        history: &[Message],
        n: u32,
        policy: &FunctionCallPolicy,
    ) -> Result<ChatTurnResult, ChatError> {
        self.validate_call(n, policy)?;

        execute_with_retry(
            CHAT_OPERATION,
            &self.retry_policy,
            self.operation_hooks.as_ref(),
            self.sleeper.as_ref(),
            |_attempt| self.run_turn(history, n, policy),
        )
        .await
        .map_err(ChatError::from_retry)
    }

    fn validate_call(&self, n: u32, policy: &FunctionCallPolicy) -> Result<(), ChatError> {
        if n == 0 {
            return Err(ChatError::invalid_request("n must be at least 1"));
        }

        let Some(functions) = &self.functions else {
            if policy.has_directives() {
                return Err(ChatError::configuration(
                    "function directives require function calling to be configured",
                ));
            }
            return Ok(());
        };

        if let Some(forced) = policy.forced_function()
            && !functions
                .descriptors
                .iter()
                .any(|descriptor| descriptor.name == forced)
        {
            return Err(ChatError::configuration(format!(
                "forced function '{forced}' is not a declared function"
            )));
        }

        Ok(())
    }

    fn prompt(&self, history: &[Message]) -> Vec<Message> {
        let mut prompt = Vec::with_capacity(history.len() + 1);
        if let Some(persona) = &self.persona {
            prompt.push(Message::system(persona.clone()));
        }
        prompt.extend_from_slice(history);
        prompt
    }

    fn dispatcher_for(&self, policy: &FunctionCallPolicy) -> Arc<dyn Dispatcher> {
        match &self.functions {
            Some(functions) if policy.invocation_mode().is_capture() => {
                Arc::clone(&functions.capture_dispatcher)
            }
            Some(functions) => Arc::clone(&functions.dispatcher),
            None => Arc::clone(&self.empty_dispatcher),
        }
    }

    async fn run_turn(
        &self,
        history: &[Message],
        n: u32,
        policy: &FunctionCallPolicy,
    ) -> Result<ChatTurnResult, ChatError> {
        let prompt = self.prompt(history);

        let mut builder = CompletionRequest::builder(self.model.clone())
            .messages(prompt.clone())
            .n(n)
            .options(self.options)
            .extra(self.extra.clone());
        if let Some(functions) = &self.functions {
            builder = builder.tools(functions.descriptors.clone());
        }
        if let Some(forced) = policy.forced_function() {
            builder = builder.forced_function(forced);
        }

        let response = self.provider.complete(builder.build()?).await?;
        let mut total_tokens = response.usage.total_tokens;
        let dispatcher = self.dispatcher_for(policy);

        let mut candidates = Vec::with_capacity(response.candidates.len());
        for (index, candidate) in response.candidates.into_iter().enumerate() {
            match candidate {
                Candidate::Text(text) => {
                    candidates.push(CandidateResult::text(text.trim()));
                }
                Candidate::FunctionCall(intent) => {
                    let result = self
                        .run_function_candidate(index, intent, &prompt, policy, dispatcher.as_ref())
                        .await?;
                    total_tokens += result.used_tokens.unwrap_or(0);
                    candidates.push(result);
                }
            }
        }

        Ok(ChatTurnResult {
            candidates,
            total_tokens,
        })
    }

    async fn run_function_candidate(
        &self,
        index: usize,
        intent: FunctionCallIntent,
        prompt: &[Message],
        policy: &FunctionCallPolicy,
        dispatcher: &dyn Dispatcher,
    ) -> Result<CandidateResult, ChatError> {
        let context = InvocationContext::new().with_metadata("candidate_index", index.to_string());
        let outcome = dispatcher
            .dispatch(FunctionCall::from(intent), policy.argument_mode(), &context)
            .await?;

        if policy.invocation_mode().is_capture() {
            return Ok(CandidateResult {
                content: outcome.output,
                used_function: Some(outcome.name),
                used_tokens: None,
                args: outcome.args,
            });
        }

        let mut messages = prompt.to_vec();
        messages.push(Message::function(outcome.name.clone(), outcome.output));

        let follow_up = CompletionRequest::builder(self.model.clone())
            .messages(messages)
            .n(1)
            .options(self.options)
            .extra(self.extra.clone())
            .build()?;
        let response = self.provider.complete(follow_up).await?;

        Ok(CandidateResult {
            content: response.first_text(),
            used_function: Some(outcome.name),
            used_tokens: Some(response.usage.total_tokens),
            args: outcome.args,
        })
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("function_calling", &self.functions.is_some())
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

pub struct ChatServiceBuilder {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    persona: Option<String>,
    options: GenerationOptions,
    extra: Map<String, Value>,
    descriptors: Option<Vec<ToolDefinition>>,
    registry: Option<FunctionRegistry>,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    operation_hooks: Arc<dyn OperationHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
}

impl ChatServiceBuilder {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            persona: None,
            options: GenerationOptions::default(),
            extra: Map::new(),
            descriptors: None,
            registry: None,
            retry_policy: RetryPolicy::default(),
            sleeper: Arc::new(DelaySleeper),
            operation_hooks: Arc::new(NoopOperationHooks),
            tool_hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    /// System message prepended to every prompt.
    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    /// Free-form request fields forwarded verbatim to the backend.
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn descriptors(mut self, descriptors: Vec<ToolDefinition>) -> Self {
        self.descriptors = Some(descriptors);
        self
    }

    pub fn registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn functions(self, descriptors: Vec<ToolDefinition>, registry: FunctionRegistry) -> Self {
        self.descriptors(descriptors).registry(registry)
    }

    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn operation_hooks(mut self, hooks: Arc<dyn OperationHooks>) -> Self {
        self.operation_hooks = hooks;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.tool_hooks = hooks;
        self
    }

    pub fn build(self) -> Result<ChatService, ChatError> {
        if self.model.trim().is_empty() {
            return Err(ChatError::configuration("model must not be empty"));
        }

        if self.retry_policy.max_attempts == 0 {
            return Err(ChatError::configuration(
                "retry policy must allow at least one attempt",
            ));
        }

        let functions = match (self.descriptors, self.registry) {
            (None, None) => None,
            (Some(descriptors), Some(registry)) => {
                if descriptors.is_empty() {
                    return Err(ChatError::configuration(
                        "function calling requires at least one descriptor",
                    ));
                }

                let unresolved = registry.unresolved(&descriptors);
                if !unresolved.is_empty() {
                    return Err(ChatError::configuration(format!(
                        "declared functions without a registered implementation: {}",
                        unresolved.join(", ")
                    )));
                }

                let dispatcher = FunctionDispatcher::new(Arc::new(registry))
                    .with_hooks(Arc::clone(&self.tool_hooks));
                let capture_dispatcher =
                    FunctionDispatcher::new(Arc::new(FunctionRegistry::capturing(&descriptors)))
                        .with_hooks(Arc::clone(&self.tool_hooks));

                Some(FunctionSetup {
                    descriptors,
                    dispatcher: Arc::new(dispatcher),
                    capture_dispatcher: Arc::new(capture_dispatcher),
                })
            }
            _ => {
                return Err(ChatError::configuration(
                    "function descriptors and registry must be provided together",
                ));
            }
        };

        let empty_dispatcher = FunctionDispatcher::new(Arc::new(FunctionRegistry::new()))
            .with_hooks(Arc::clone(&self.tool_hooks));

        Ok(ChatService {
            provider: self.provider,
            model: self.model,
            persona: self.persona,
            options: self.options,
            extra: self.extra,
            functions,
            empty_dispatcher: Arc::new(empty_dispatcher),
            retry_policy: self.retry_policy,
            sleeper: self.sleeper,
            operation_hooks: self.operation_hooks,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use scommon::RecordingSleeper;
    use serde_json::json;
    use sprovider::{
        CompletionResponse, FunctionCallIntent, ProviderError, ProviderFuture, Role, TokenUsage,
    };
    use stooling::parse_json_object;

    use super::*;
    use crate::ChatErrorKind;

    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<CompletionResponse, ProviderError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<CompletionResponse, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().expect("requests lock").clone()
        }
    }

    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn complete<'a>(
            &'a self,
            request: CompletionRequest,
        ) -> ProviderFuture<'a, Result<CompletionResponse, ProviderError>> {
            Box::pin(async move {
                self.requests.lock().expect("requests lock").push(request);
                self.responses
                    .lock()
                    .expect("responses lock")
                    .pop_front()
                    .unwrap_or_else(|| Err(ProviderError::other("script exhausted")))
            })
        }
    }

    fn response(candidates: Vec<Candidate>, total_tokens: u32) -> CompletionResponse {
        CompletionResponse {
            model: "gpt-4o-mini".to_string(),
            candidates,
            usage: TokenUsage {
                prompt_tokens: 0,
                completion_tokens: 0,
                total_tokens,
            },
        }
    }

    fn recipe_descriptor() -> ToolDefinition {
        ToolDefinition::new(
            "get_recipe",
            "Returns a recipe",
            json!({"type": "object", "properties": {"dish": {"type": "string"}}}),
        )
    }

    fn recipe_registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        registry.register_sync_fn("get_recipe", |args, _ctx| {
            let dish = args
                .get("dish")
                .and_then(Value::as_str)
                .unwrap_or("rice")
                .to_string();
            Ok(Value::String(format!("recipe for {dish}")))
        });
        registry
    }

    fn service(provider: Arc<ScriptedProvider>, functions: bool) -> ChatService {
        let mut builder = ChatService::builder(provider, "gpt-4o-mini")
            .persona("You are Sizzle, a cooking guide.")
            .sleeper(Arc::new(RecordingSleeper::new()));
        if functions {
            builder = builder.functions(vec![recipe_descriptor()], recipe_registry());
        }
        builder.build().expect("service should build")
    }

    #[tokio::test]
    async fn plain_turn_trims_candidates_and_prepends_persona() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(response(
            vec![
                Candidate::Text("  Try bibimbap.  ".to_string()),
                Candidate::Text("Try ramen.".to_string()),
            ],
            21,
        ))]));
        let service = service(provider.clone(), false);

        let result = service
            .chat_plain(&[Message::user("What should I eat?")], 2)
            .await
            .expect("turn should succeed");

        assert_eq!(result.candidates.len(), 2);
        assert_eq!(result.first_content(), Some("Try bibimbap."));
        assert!(result.candidates.iter().all(|c| c.used_function.is_none()));
        assert_eq!(result.total_tokens, 21);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].n, 2);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert!(requests[0].tools.is_empty());
    }

    #[tokio::test]
    async fn model_args_feed_the_function_and_follow_up_request() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(response(
                vec![Candidate::FunctionCall(FunctionCallIntent::new(
                    "get_recipe",
                    "{\"dish\":\"japchae\"}",
                ))],
                30,
            )),
            Ok(response(vec![Candidate::Text("Here is japchae.".to_string())], 12)),
        ]));
        let service = service(provider.clone(), true);
        let policy = FunctionCallPolicy::builder()
            .forced_function("get_recipe")
            .use_model_args(true)
            .build()
            .expect("policy should build");

        let result = service
            .chat(&[Message::user("japchae please")], 1, &policy)
            .await
            .expect("turn should succeed");

        let candidate = &result.candidates[0];
        assert_eq!(candidate.content, "Here is japchae.");
        assert_eq!(candidate.used_function.as_deref(), Some("get_recipe"));
        assert_eq!(candidate.used_tokens, Some(12));
        assert_eq!(
            candidate.args,
            Some(parse_json_object("{\"dish\":\"japchae\"}").expect("args parse"))
        );
        assert_eq!(result.total_tokens, 42);

        let requests = provider.requests();
        assert_eq!(requests[0].forced_function.as_deref(), Some("get_recipe"));
        let follow_up = &requests[1];
        assert_eq!(follow_up.n, 1);
        assert!(follow_up.tools.is_empty());
        let last = follow_up.messages.last().expect("function message");
        assert_eq!(last, &Message::function("get_recipe", "recipe for japchae"));
    }

    #[tokio::test]
    async fn capture_mode_returns_arguments_without_follow_up() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(response(
            vec![Candidate::FunctionCall(FunctionCallIntent::new(
                "get_recipe",
                "{\"dish\":\"tteokbokki\"}",
            ))],
            9,
        ))]));
        let service = service(provider.clone(), true);
        let policy = FunctionCallPolicy::builder()
            .forced_function("get_recipe")
            .return_args_only(true)
            .build()
            .expect("policy should build");

        let result = service
            .chat(&[Message::user("spicy rice cakes")], 1, &policy)
            .await
            .expect("turn should succeed");

        let candidate = &result.candidates[0];
        assert_eq!(
            parse_json_object(&candidate.content).expect("captured JSON"),
            parse_json_object("{\"dish\":\"tteokbokki\"}").expect("args parse")
        );
        assert_eq!(candidate.used_function.as_deref(), Some("get_recipe"));
        assert_eq!(result.total_tokens, 9);
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn undeclared_forced_function_fails_before_network() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let service = service(provider.clone(), true);
        let policy = FunctionCallPolicy::builder()
            .forced_function("order_food")
            .build()
            .expect("policy should build");

        let error = service
            .chat(&[Message::user("hi")], 1, &policy)
            .await
            .expect_err("undeclared function must fail");

        assert_eq!(error.kind, ChatErrorKind::Configuration);
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn directives_without_functions_are_rejected() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let service = service(provider.clone(), false);
        let policy = FunctionCallPolicy::builder()
            .use_model_args(true)
            .build()
            .expect("policy should build");

        let error = service
            .chat(&[Message::user("hi")], 1, &policy)
            .await
            .expect_err("directives need functions");
        assert_eq!(error.kind, ChatErrorKind::Configuration);
        assert!(provider.requests().is_empty());
    }

    #[test]
    fn builder_requires_descriptors_and_registry_together() {
        let provider: Arc<dyn CompletionProvider> = Arc::new(ScriptedProvider::new(Vec::new()));

        let error = ChatService::builder(Arc::clone(&provider), "gpt-4o-mini")
            .descriptors(vec![recipe_descriptor()])
            .build()
            .expect_err("descriptors alone must fail");
        assert_eq!(error.kind, ChatErrorKind::Configuration);

        let error = ChatService::builder(Arc::clone(&provider), "gpt-4o-mini")
            .registry(recipe_registry())
            .build()
            .expect_err("registry alone must fail");
        assert_eq!(error.kind, ChatErrorKind::Configuration);

        let error = ChatService::builder(provider, "gpt-4o-mini")
            .functions(
                vec![recipe_descriptor(), ToolDefinition::new("order", "", json!({}))],
                recipe_registry(),
            )
            .build()
            .expect_err("unresolved descriptor must fail");
        assert!(error.message.contains("order"));
    }

    #[tokio::test]
    async fn zero_candidates_is_invalid_request() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let service = service(provider.clone(), false);

        let error = service
            .chat_plain(&[Message::user("hi")], 0)
            .await
            .expect_err("n=0 must fail");
        assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
        assert!(provider.requests().is_empty());
    }
}
