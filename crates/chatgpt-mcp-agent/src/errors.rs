use crate::runner::RunnerError;
use crate::validation::{MAX_CONVERSATION_ID_LENGTH, MAX_PROMPT_LENGTH};
use thiserror::Error;

/// Every failure a tool call can end in. The `Display` text is what the
/// calling agent sees after the `Error: ` prefix.
#[derive(Error, Debug)]
pub enum ChatGptError {
    #[error("Prompt must be a non-empty string")]
    EmptyPrompt,

    #[error("Prompt exceeds maximum allowed length of {} characters", MAX_PROMPT_LENGTH)]
    PromptTooLong,

    #[error("{0} contains invalid control characters")]
    InvalidCharacters(InputField),

    #[error("Conversation ID must be a string")]
    InvalidConversationIdType,

    #[error(
        "Conversation ID exceeds maximum allowed length of {} characters",
        MAX_CONVERSATION_ID_LENGTH
    )]
    ConversationIdTooLong,

    #[error("Could not activate ChatGPT app. Please start it manually.")]
    ActivationFailed(#[source] RunnerError),

    #[error("Cannot access ChatGPT app. Please make sure ChatGPT is installed and properly configured. Error: {0}")]
    AccessCheckFailed(#[source] RunnerError),

    #[error("Failed to get response from ChatGPT: {0}")]
    ExecutionFailed(#[source] RunnerError),

    #[error("No arguments provided")]
    MissingArguments,

    #[error("{0}")]
    InvalidArguments(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

impl ChatGptError {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        ChatGptError::InvalidArguments(message.into())
    }

    /// Stable name of the variant, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatGptError::EmptyPrompt => "EmptyPrompt",
            ChatGptError::PromptTooLong => "PromptTooLong",
            ChatGptError::InvalidCharacters(_) => "InvalidCharacters",
            ChatGptError::InvalidConversationIdType => "InvalidConversationIdType",
            ChatGptError::ConversationIdTooLong => "ConversationIdTooLong",
            ChatGptError::ActivationFailed(_) => "ActivationFailed",
            ChatGptError::AccessCheckFailed(_) => "AccessCheckFailed",
            ChatGptError::ExecutionFailed(_) => "ExecutionFailed",
            ChatGptError::MissingArguments => "MissingArguments",
            ChatGptError::InvalidArguments(_) => "InvalidArguments",
            ChatGptError::UnknownOperation(_) => "UnknownOperation",
        }
    }
}

/// User-supplied field named in `InvalidCharacters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Prompt,
    ConversationId,
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputField::Prompt => write!(f, "Prompt"),
            InputField::ConversationId => write!(f, "Conversation ID"),
        }
    }
}

pub type Result<T, E = ChatGptError> = std::result::Result<T, E>;
