//! Thread/run backend contract.

use scommon::{BoxFuture, RunId, ThreadId};
use sprovider::ProviderError;

use crate::{
    AssistantProfile, FileObject, FileUpload, NewMessage, Run, RunRequest, ThreadMessage,
    ToolOutput,
};

pub type BackendFuture<'a, T> = BoxFuture<'a, T>;

/// Remote assistant, thread, run and file operations. Each call is one request with no
/// internal retry.
pub trait AssistantBackend: Send + Sync {
    /// Creates the remote assistant and returns its id.
    fn create_assistant<'a>(
        &'a self,
        profile: &'a AssistantProfile,
    ) -> BackendFuture<'a, Result<String, ProviderError>>;

    fn create_thread<'a>(&'a self) -> BackendFuture<'a, Result<ThreadId, ProviderError>>;

    fn create_message<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        message: NewMessage,
    ) -> BackendFuture<'a, Result<ThreadMessage, ProviderError>>;

    fn create_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        request: RunRequest,
    ) -> BackendFuture<'a, Result<Run, ProviderError>>;

    fn retrieve_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a RunId,
    ) -> BackendFuture<'a, Result<Run, ProviderError>>;

    /// Messages added after `message_id`, newest first.
    fn list_messages_after<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        message_id: &'a str,
    ) -> BackendFuture<'a, Result<Vec<ThreadMessage>, ProviderError>>;

    fn submit_tool_outputs<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a RunId,
        outputs: Vec<ToolOutput>,
    ) -> BackendFuture<'a, Result<Run, ProviderError>>;

    fn cancel_run<'a>(
        &'a self,
        thread_id: &'a ThreadId,
        run_id: &'a RunId,
    ) -> BackendFuture<'a, Result<Run, ProviderError>>;

    fn upload_file<'a>(
        &'a self,
        upload: FileUpload,
    ) -> BackendFuture<'a, Result<FileObject, ProviderError>>;

    fn retrieve_file<'a>(
        &'a self,
        file_id: &'a str,
    ) -> BackendFuture<'a, Result<FileObject, ProviderError>>;
}
