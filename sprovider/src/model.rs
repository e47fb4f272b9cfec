//! Provider-agnostic request, response, and message model types.
//!
//! ```rust
//! use sprovider::{CompletionRequest, Message, ProviderErrorKind};
//!
//! let ok = CompletionRequest::builder("gpt-4o-mini")
//!     .message(Message::user("What should I cook tonight?"))
//!     .n(2)
//!     .build();
//! assert!(ok.is_ok());
//!
//! let err = CompletionRequest::builder("gpt-4o-mini")
//!     .message(Message::user("hi"))
//!     .n(0)
//!     .build()
//!     .err()
//!     .expect("n=0 should fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use serde_json::{Map, Value};

use scommon::GenerationOptions;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Function => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub name: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Result of a dispatched function, fed back to the model on the next request.
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Role::Function, content).with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A callable the backend may ask to invoke, with a JSON schema for its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Function-call intent as the backend reported it; arguments are raw JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCallIntent {
    pub name: Option<String>,
    pub arguments: String,
}

impl FunctionCallIntent {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            arguments: arguments.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Text(String),
    FunctionCall(FunctionCallIntent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub model: String,
    pub candidates: Vec<Candidate>,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Text of the first candidate, or an empty string when it is not text.
    pub fn first_text(&self) -> String {
        match self.candidates.first() {
            Some(Candidate::Text(text)) => text.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub n: u32,
    pub tools: Vec<ToolDefinition>,
    pub forced_function: Option<String>,
    pub options: GenerationOptions,
    pub extra: Map<String, Value>,
}

impl CompletionRequest {
    pub fn builder(model: impl Into<String>) -> CompletionRequestBuilder {
        CompletionRequestBuilder::new(model)
    }

    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            n: 1,
            tools: Vec::new(),
            forced_function: None,
            options: GenerationOptions::default(),
            extra: Map::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one message is required",
            ));
        }

        if self.n == 0 {
            return Err(ProviderError::invalid_request("n must be at least 1"));
        }

        if let Some(max_tokens) = self.options.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if let Some(temperature) = self.options.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        if let Some(top_p) = self.options.top_p
            && !(0.0..=1.0).contains(&top_p)
        {
            return Err(ProviderError::invalid_request(
                "top_p must be in the inclusive range 0.0..=1.0",
            ));
        }

        if let Some(forced) = &self.forced_function
            && !self.tools.iter().any(|tool| &tool.name == forced)
        {
            return Err(ProviderError::invalid_request(format!(
                "forced function '{forced}' is not among the declared tools"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequestBuilder {
    request: CompletionRequest,
}

impl CompletionRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            request: CompletionRequest::new(model, Vec::new()),
        }
    }

    pub fn message(mut self, message: Message) -> Self {
        self.request.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages.extend(messages);
        self
    }

    pub fn n(mut self, n: u32) -> Self {
        self.request.n = n;
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.request.tools = tools;
        self
    }

    pub fn forced_function(mut self, name: impl Into<String>) -> Self {
        self.request.forced_function = Some(name.into());
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.request.options = options;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.request.options.temperature = Some(temperature);
        self
    }

    pub fn extra(mut self, extra: Map<String, Value>) -> Self {
        self.request.extra = extra;
        self
    }

    pub fn build(self) -> Result<CompletionRequest, ProviderError> {
        self.request.validate()?;
        Ok(self.request)
    }
}
