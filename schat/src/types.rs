//! Chat turn result types.

use stooling::ToolArgs;

/// One reported candidate of a chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    pub content: String,
    /// Name of the function dispatched for this candidate, if any.
    pub used_function: Option<String>,
    /// Tokens spent by the follow-up request for this candidate.
    pub used_tokens: Option<u32>,
    pub args: Option<ToolArgs>,
}

impl CandidateResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            used_function: None,
            used_tokens: None,
            args: None,
        }
    }

    pub fn used_function(&self) -> bool {
        self.used_function.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatTurnResult {
    pub candidates: Vec<CandidateResult>,
    /// Sum of token usage across every request issued for the turn.
    pub total_tokens: u32,
}

impl ChatTurnResult {
    pub fn first_content(&self) -> Option<&str> {
        self.candidates
            .first()
            .map(|candidate| candidate.content.as_str())
    }
}
