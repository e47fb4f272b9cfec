use std::future::Future;
use std::pin::Pin;

use crate::{CompletionRequest, CompletionResponse, ProviderError};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One request/response exchange against a completion backend.
///
/// Implementations send exactly one backend request per call and never retry;
/// candidate order must match the order the backend returned.
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<CompletionResponse, ProviderError>>;
}
