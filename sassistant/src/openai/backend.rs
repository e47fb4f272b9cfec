//! reqwest-based Assistants v2 backend.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use scommon::{RunId, ThreadId};
use serde::de::DeserializeOwned;
use serde_json::json;
use sprovider::adapters::openai::{
    DEFAULT_OPENAI_BASE_URL, error_from_response, error_from_send, resolve_openai_auth,
};
use sprovider::{ProviderError, SecureCredentialManager};

use crate::{
    AssistantBackend, AssistantProfile, BackendFuture, FileObject, FileUpload, NewMessage, Run,
    RunRequest, ThreadMessage, ToolOutput,
};

use super::wire::{
    ApiCreateAssistant, ApiCreateMessage, ApiCreateRun, ApiFile, ApiMessage, ApiMessageList,
    ApiObjectId, ApiRun, ApiSubmitToolOutputs,
};

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VALUE: &str = "assistants=v2";
const FILE_PURPOSE: &str = "assistants";

#[derive(Clone)]
pub struct OpenAiAssistantsBackend {
    client: Client,
    base_url: String,
    credentials: Arc<SecureCredentialManager>,
}

impl OpenAiAssistantsBackend {
    pub fn new(client: Client, credentials: Arc<SecureCredentialManager>) -> Self {
        Self {
            client,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            credentials,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ProviderError> {
        let auth = resolve_openai_auth(&self.credentials)?;
        Ok(request
            .bearer_auth(auth.api_key())
            .header(BETA_HEADER, BETA_VALUE))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let response = self
            .authorize(request)?
            .send()
            .await
            .map_err(error_from_send)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ProviderError::transport(err.to_string()))
    }
}

impl std::fmt::Debug for OpenAiAssistantsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAssistantsBackend")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl AssistantBackend for OpenAiAssistantsBackend {
    fn create_assistant<'a>(
        &'a self,
        profile: &'a AssistantProfile,
    ) -> BackendFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.endpoint("assistants"))
                .json(&ApiCreateAssistant::from(profile));
            let created: ApiObjectId = self.send(request).await?;
            Ok(created.id)
        })
    }

    fn create_thread<'a>(&'a self) -> BackendFuture<'a, Result<ThreadId, ProviderError>> {
        Box::pin(async move {
            let request = self.client.post(self.endpoint("threads")).json(&json!({}));
            let created: ApiObjectId = self.send(request).await?;
            Ok(ThreadId::from(created.id))
        })
    }

    fn create_message<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        message: NewMessage,
    ) -> BackendFuture<'a, Result<ThreadMessage, ProviderError>> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.endpoint(&format!("threads/{thread_id}/messages")))
                .json(&ApiCreateMessage::from(message));
            let created: ApiMessage = self.send(request).await?;
            ThreadMessage::try_from(created)
        })
    }

    fn create_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        request: RunRequest,
    ) -> BackendFuture<'a, Result<Run, ProviderError>> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.endpoint(&format!("threads/{thread_id}/runs")))
                .json(&ApiCreateRun::from(request));
            let run: ApiRun = self.send(request).await?;
            Ok(run.into())
        })
    }

    fn retrieve_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a RunId,
    ) -> BackendFuture<'a, Result<Run, ProviderError>> {
        Box::pin(async move {
            let request = self
                .client
                .get(self.endpoint(&format!("threads/{thread_id}/runs/{run_id}")));
            let run: ApiRun = self.send(request).await?;
            Ok(run.into())
        })
    }

    fn list_messages_after<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        message_id: &'a str,
    ) -> BackendFuture<'a, Result<Vec<ThreadMessage>, ProviderError>> {
        Box::pin(async move {
            // Descending order: `before` the user message means newer than it.
            let request = self
                .client
                .get(self.endpoint(&format!("threads/{thread_id}/messages")))
                .query(&[("order", "desc"), ("before", message_id)]);
            let list: ApiMessageList = self.send(request).await?;
            list.data.into_iter().map(ThreadMessage::try_from).collect()
        })
    }

    fn submit_tool_outputs<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a RunId,
        outputs: Vec<ToolOutput>,
    ) -> BackendFuture<'a, Result<Run, ProviderError>> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.endpoint(&format!(
                    "threads/{thread_id}/runs/{run_id}/submit_tool_outputs"
                )))
                .json(&ApiSubmitToolOutputs::from(outputs));
            let run: ApiRun = self.send(request).await?;
            Ok(run.into())
        })
    }

    fn cancel_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a RunId,
    ) -> BackendFuture<'a, Result<Run, ProviderError>> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.endpoint(&format!("threads/{thread_id}/runs/{run_id}/cancel")));
            let run: ApiRun = self.send(request).await?;
            Ok(run.into())
        })
    }

    fn upload_file<'a>(
        &'a self,
        upload: FileUpload,
    ) -> BackendFuture<'a, Result<FileObject, ProviderError>> {
        Box::pin(async move {
            let form = Form::new()
                .text("purpose", FILE_PURPOSE)
                .part("file", Part::bytes(upload.bytes).file_name(upload.file_name));
            let request = self.client.post(self.endpoint("files")).multipart(form);
            let file: ApiFile = self.send(request).await?;
            Ok(file.into())
        })
    }

    fn retrieve_file<'a>(
        &'a self,
        file_id: &'a str,
    ) -> BackendFuture<'a, Result<FileObject, ProviderError>> {
        Box::pin(async move {
            let request = self.client.get(self.endpoint(&format!("files/{file_id}")));
            let file: ApiFile = self.send(request).await?;
            Ok(file.into())
        })
    }
}
