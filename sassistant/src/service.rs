//! Multi-turn assistant orchestration over a thread/run backend.

use std::sync::Arc;
use std::time::Instant;

use scommon::{DelaySleeper, RunId, Sleeper, ThreadId};
use sprovider::{NoopOperationHooks, OperationHooks, execute_with_retry};
use stooling::{
    ArgumentMode, Dispatcher, FunctionCall, FunctionDispatcher, FunctionRegistry,
    InvocationContext, NoopToolRuntimeHooks, ToolRuntimeHooks,
};

use crate::{
    AssistantBackend, AssistantConfig, AssistantError, AssistantReply, AssistantTurnResult,
    Attachment, CapturedCall, FileUpload, MessageRole, NewMessage, NoopRunHooks, PollOutcome,
    RequiredToolCall, Run, RunHooks, RunRequest, ToolInvocation, ToolOutput, UserTurn,
    poll_run_until, wait_for_file,
};

const TURN_OPERATION: &str = "assistant_turn";
const UPLOAD_OPERATION: &str = "file_upload";
const THREAD_OPERATION: &str = "create_thread";

#[derive(Clone)]
pub struct AssistantService {
    backend: Arc<dyn AssistantBackend>,
    assistant_id: String,
    config: AssistantConfig,
    dispatcher: Arc<dyn Dispatcher>,
    sleeper: Arc<dyn Sleeper>,
    operation_hooks: Arc<dyn OperationHooks>,
    run_hooks: Arc<dyn RunHooks>,
}

impl AssistantService {
    pub fn builder(
        backend: Arc<dyn AssistantBackend>,
        config: AssistantConfig,
    ) -> AssistantServiceBuilder {
        AssistantServiceBuilder::new(backend, config)
    }

    /// Validates `config` and creates the remote assistant.
    pub async fn create(
        backend: Arc<dyn AssistantBackend>,
        config: AssistantConfig,
        registry: Option<FunctionRegistry>,
    ) -> Result<Self, AssistantError> {
        let mut builder = Self::builder(backend, config);
        if let Some(registry) = registry {
            builder = builder.registry(registry);
        }
        builder.create().await
    }

    /// Binds to an assistant that already exists on the backend.
    pub fn attach(
        backend: Arc<dyn AssistantBackend>,
        config: AssistantConfig,
        registry: Option<FunctionRegistry>,
        assistant_id: impl Into<String>,
    ) -> Result<Self, AssistantError> {
        let mut builder = Self::builder(backend, config);
        if let Some(registry) = registry {
            builder = builder.registry(registry);
        }
        builder.attach(assistant_id)
    }

    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Starts a new thread and runs the first turn on it.
    pub async fn first_chat(&self, turn: UserTurn) -> Result<AssistantTurnResult, AssistantError> {
        self.ensure_uploads_allowed(&turn)?;
        let thread_id = execute_with_retry(
            THREAD_OPERATION,
            &self.config.retry,
            self.operation_hooks.as_ref(),
            self.sleeper.as_ref(),
            |_attempt| async move {
                self.backend
                    .create_thread()
                    .await
                    .map_err(AssistantError::from)
            },
        )
        .await
        .map_err(AssistantError::from_retry)?;
        self.chat(&thread_id, turn).await
    }

    /// Runs one turn on an existing thread, retrying the whole turn on transient failures.
    pub async fn chat(
        &self,
        thread_id: &ThreadId,
        turn: UserTurn,
    ) -> Result<AssistantTurnResult, AssistantError> {
        self.ensure_uploads_allowed(&turn)?;

        let mut attachments = Vec::with_capacity(turn.files.len());
        for file in turn.files {
            let file_id = self.upload(file).await?;
            attachments.push(Attachment {
                file_id,
                tools: self.config.profile.file_tools(),
            });
        }

        let message = NewMessage {
            content: turn.content,
            attachments,
        };
        let return_tool_info = turn.return_tool_info;

        let result = execute_with_retry(
            TURN_OPERATION,
            &self.config.retry,
            self.operation_hooks.as_ref(),
            self.sleeper.as_ref(),
            |_attempt| self.run_turn(thread_id, message.clone(), return_tool_info),
        )
        .await
        .map_err(AssistantError::from_retry);

        if let Err(error) = &result {
            self.run_hooks.on_turn_failure(thread_id, error);
        }
        result
    }

    /// Uploads one file for assistant use and waits until the backend has processed it.
    pub async fn upload(&self, file: FileUpload) -> Result<String, AssistantError> {
        if !self.config.accepts_files() {
            return Err(Self::uploads_rejected());
        }

        let uploaded = execute_with_retry(
            UPLOAD_OPERATION,
            &self.config.retry,
            self.operation_hooks.as_ref(),
            self.sleeper.as_ref(),
            |_attempt| {
                let file = file.clone();
                async move {
                    self.backend
                        .upload_file(file)
                        .await
                        .map_err(AssistantError::from)
                }
            },
        )
        .await
        .map_err(AssistantError::from_retry)?;

        wait_for_file(
            self.backend.as_ref(),
            &uploaded.id,
            &self.config.poll,
            self.sleeper.as_ref(),
            self.run_hooks.as_ref(),
        )
        .await
    }

    fn ensure_uploads_allowed(&self, turn: &UserTurn) -> Result<(), AssistantError> {
        if !turn.files.is_empty() && !self.config.accepts_files() {
            return Err(Self::uploads_rejected());
        }
        Ok(())
    }

    fn uploads_rejected() -> AssistantError {
        AssistantError::configuration(
            "file uploads require the assistant to declare code_interpreter or file_search",
        )
    }

    async fn run_turn(
        &self,
        thread_id: &ThreadId,
        message: NewMessage,
        return_tool_info: bool,
    ) -> Result<AssistantTurnResult, AssistantError> {
        let user_message = self.backend.create_message(thread_id, message).await?;
        let run = self
            .backend
            .create_run(
                thread_id,
                RunRequest {
                    assistant_id: self.assistant_id.clone(),
                    tool_choice: self.config.tool_choice.clone(),
                },
            )
            .await?;
        let run_id = run.id;
        let started = Instant::now();
        self.run_hooks.on_run_started(thread_id, &run_id);

        let mut tool_info = Vec::new();
        let mut rounds = 0_u32;

        let final_run = loop {
            let outcome = poll_run_until(
                self.backend.as_ref(),
                thread_id,
                &run_id,
                &self.config.poll,
                self.sleeper.as_ref(),
                self.run_hooks.as_ref(),
            )
            .await?;

            match outcome {
                PollOutcome::Completed(run) => break run,
                PollOutcome::Fatal(run) => {
                    self.run_hooks
                        .on_run_finished(thread_id, &run_id, run.status, started.elapsed());
                    return Err(Self::terminal_error(&run));
                }
                PollOutcome::RequiresAction(run) => {
                    rounds += 1;
                    if rounds > self.config.max_tool_rounds {
                        self.run_hooks.on_run_finished(
                            thread_id,
                            &run_id,
                            run.status,
                            started.elapsed(),
                        );
                        return Err(AssistantError::run_terminal(
                            run.status,
                            format!(
                                "run {run_id} still required action after {} tool round(s)",
                                self.config.max_tool_rounds
                            ),
                        ));
                    }

                    if self.config.invocation_mode.is_capture() {
                        let captured = self.capture_calls(thread_id, &run).await?;
                        self.abandon_run(thread_id, &run_id).await;
                        return Ok(AssistantTurnResult {
                            thread_id: thread_id.clone(),
                            reply: AssistantReply::CapturedCalls(captured),
                            tools: None,
                            total_tokens: run.usage.map(|usage| usage.total_tokens),
                        });
                    }

                    let outputs = self
                        .dispatch_calls(thread_id, &run.required_tool_calls, &mut tool_info)
                        .await?;
                    if outputs.is_empty() {
                        continue;
                    }
                    let count = outputs.len();
                    let submitted = self
                        .backend
                        .submit_tool_outputs(thread_id, &run_id, outputs)
                        .await?;
                    self.run_hooks
                        .on_tool_outputs_submitted(thread_id, &run_id, count);

                    if submitted.status.is_fatal() {
                        self.run_hooks.on_run_finished(
                            thread_id,
                            &run_id,
                            submitted.status,
                            started.elapsed(),
                        );
                        return Err(Self::terminal_error(&submitted));
                    }
                }
            }
        };

        self.run_hooks
            .on_run_finished(thread_id, &run_id, final_run.status, started.elapsed());

        let mut messages = self
            .backend
            .list_messages_after(thread_id, &user_message.id)
            .await?;
        messages.reverse();
        let texts = messages
            .into_iter()
            .filter(|message| message.role == MessageRole::Assistant)
            .map(|message| message.text)
            .collect::<Vec<_>>();

        let tools = (return_tool_info && rounds > 0).then_some(tool_info);

        Ok(AssistantTurnResult {
            thread_id: thread_id.clone(),
            reply: AssistantReply::Messages(texts),
            tools,
            total_tokens: final_run.usage.map(|usage| usage.total_tokens),
        })
    }

    fn terminal_error(run: &Run) -> AssistantError {
        let detail = run
            .last_error
            .as_deref()
            .map(|error| format!(": {error}"))
            .unwrap_or_default();
        AssistantError::run_terminal(
            run.status,
            format!("run {} ended with status {}{detail}", run.id, run.status),
        )
    }

    fn call_context(thread_id: &ThreadId, call: &RequiredToolCall) -> InvocationContext {
        InvocationContext::new()
            .with_thread_id(thread_id.clone())
            .with_tool_call_id(call.id.clone())
    }

    async fn dispatch_calls(
        &self,
        thread_id: &ThreadId,
        calls: &[RequiredToolCall],
        tool_info: &mut Vec<ToolInvocation>,
    ) -> Result<Vec<ToolOutput>, AssistantError> {
        let mut outputs = Vec::with_capacity(calls.len());

        for call in calls {
            let context = Self::call_context(thread_id, call);
            let function_call = FunctionCall {
                id: Some(call.id.clone()),
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            };
            let outcome = self
                .dispatcher
                .dispatch(function_call, &ArgumentMode::ModelSupplied, &context)
                .await?;

            tool_info.push(ToolInvocation {
                name: outcome.name,
                arguments: call.arguments.clone(),
            });
            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output: outcome.output,
            });
        }

        Ok(outputs)
    }

    async fn capture_calls(
        &self,
        thread_id: &ThreadId,
        run: &Run,
    ) -> Result<Vec<CapturedCall>, AssistantError> {
        let mut captured = Vec::with_capacity(run.required_tool_calls.len());

        for call in &run.required_tool_calls {
            let context = Self::call_context(thread_id, call);
            let function_call = FunctionCall {
                id: Some(call.id.clone()),
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            };
            let outcome = self
                .dispatcher
                .dispatch(function_call, &ArgumentMode::ModelSupplied, &context)
                .await?;

            captured.push(CapturedCall {
                func_name: outcome.name,
                args: outcome.args,
            });
        }

        Ok(captured)
    }

    async fn abandon_run(&self, thread_id: &ThreadId, run_id: &RunId) {
        if !self.config.cancel_abandoned_runs {
            self.run_hooks.on_run_abandoned(thread_id, run_id, false);
            return;
        }

        let cancelled = self.backend.cancel_run(thread_id, run_id).await.is_ok();
        self.run_hooks.on_run_abandoned(thread_id, run_id, cancelled);
    }
}

impl std::fmt::Debug for AssistantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantService")
            .field("assistant_id", &self.assistant_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub struct AssistantServiceBuilder {
    backend: Arc<dyn AssistantBackend>,
    config: AssistantConfig,
    registry: Option<FunctionRegistry>,
    sleeper: Arc<dyn Sleeper>,
    operation_hooks: Arc<dyn OperationHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
    run_hooks: Arc<dyn RunHooks>,
}

impl AssistantServiceBuilder {
    pub fn new(backend: Arc<dyn AssistantBackend>, config: AssistantConfig) -> Self {
        Self {
            backend,
            config,
            registry: None,
            sleeper: Arc::new(DelaySleeper),
            operation_hooks: Arc::new(NoopOperationHooks),
            tool_hooks: Arc::new(NoopToolRuntimeHooks),
            run_hooks: Arc::new(NoopRunHooks),
        }
    }

    pub fn registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = Some(registry);
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

    pub fn run_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.run_hooks = hooks;
        self
    }

    /// Validates the configuration, then creates the remote assistant.
    pub async fn create(self) -> Result<AssistantService, AssistantError> {
        let dispatcher = self.build_dispatcher()?;
        let assistant_id = self
            .backend
            .create_assistant(&self.config.profile)
            .await?;
        Ok(self.finish(dispatcher, assistant_id))
    }

    pub fn attach(self, assistant_id: impl Into<String>) -> Result<AssistantService, AssistantError> {
        let assistant_id = assistant_id.into();
        if assistant_id.trim().is_empty() {
            return Err(AssistantError::configuration(
                "assistant id must not be empty",
            ));
        }

        let dispatcher = self.build_dispatcher()?;
        Ok(self.finish(dispatcher, assistant_id))
    }

    fn build_dispatcher(&self) -> Result<Arc<dyn Dispatcher>, AssistantError> {
        self.config.validate(self.registry.as_ref())?;

        let registry = if self.config.invocation_mode.is_capture() {
            FunctionRegistry::capturing(&self.config.profile.function_tools())
        } else {
            self.registry.clone().unwrap_or_default()
        };

        Ok(Arc::new(
            FunctionDispatcher::new(Arc::new(registry)).with_hooks(Arc::clone(&self.tool_hooks)),
        ))
    }

    fn finish(self, dispatcher: Arc<dyn Dispatcher>, assistant_id: String) -> AssistantService {
        AssistantService {
            backend: self.backend,
            assistant_id,
            config: self.config,
            dispatcher,
            sleeper: self.sleeper,
            operation_hooks: self.operation_hooks,
            run_hooks: self.run_hooks,
        }
    }
}
