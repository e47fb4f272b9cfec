//! Function registry for lookup by declared function name.

use std::future::Future;
use std::sync::Arc;

use scommon::Registry;
use serde_json::Value;
use sprovider::ToolDefinition;

use crate::{
    CaptureArgs, FunctionInvocable, Invocable, InvocationContext, ToolArgs, ToolError,
};

#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: Registry<String, Arc<dyn Invocable>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry where every declared function name maps to the [`CaptureArgs`] stub.
    pub fn capturing(descriptors: &[ToolDefinition]) -> Self {
        let capture: Arc<dyn Invocable> = Arc::new(CaptureArgs);
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry
                .functions
                .insert(descriptor.name.clone(), Arc::clone(&capture));
        }
        registry
    }

    pub fn register<I>(&mut self, name: impl Into<String>, invocable: I)
    where
        I: Invocable + 'static,
    {
        self.functions.insert(name.into(), Arc::new(invocable));
    }

    pub fn register_shared(&mut self, name: impl Into<String>, invocable: Arc<dyn Invocable>) {
        self.functions.insert(name.into(), invocable);
    }

    pub fn register_fn<F, Fut>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(ToolArgs, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        self.register(name, FunctionInvocable::new(handler));
    }

    pub fn register_sync_fn<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(ToolArgs, InvocationContext) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        self.register(name, FunctionInvocable::from_sync(handler));
    }

    pub fn register_text_fn<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(ToolArgs) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register(name, FunctionInvocable::text(handler));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Invocable>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Invocable>> {
        self.functions.remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names = self.functions.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Names declared in `descriptors` that have no registered function.
    pub fn unresolved(&self, descriptors: &[ToolDefinition]) -> Vec<String> {
        descriptors
            .iter()
            .filter(|descriptor| !self.contains(&descriptor.name))
            .map(|descriptor| descriptor.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
