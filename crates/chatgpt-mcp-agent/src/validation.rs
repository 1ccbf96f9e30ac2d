//! Shape and safety checks on user input. Runs before any script text is
//! built; it is what keeps raw control bytes away from the escaper.

use crate::errors::{ChatGptError, InputField, Result};

pub const MAX_PROMPT_LENGTH: usize = 10_000;
pub const MAX_CONVERSATION_ID_LENGTH: usize = 200;

/// ASCII control characters other than tab, line feed and carriage return.
pub fn is_forbidden_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

fn contains_forbidden_control(s: &str) -> bool {
    s.chars().any(is_forbidden_control)
}

/// Validates the arguments of an `ask` operation.
///
/// Lengths are counted in Unicode scalar values, so a prompt of exactly
/// `MAX_PROMPT_LENGTH` characters passes regardless of its byte length.
pub fn validate_input(prompt: &str, conversation_id: Option<&str>) -> Result<()> {
    if prompt.is_empty() {
        return Err(ChatGptError::EmptyPrompt);
    }

    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(ChatGptError::PromptTooLong);
    }

    if contains_forbidden_control(prompt) {
        return Err(ChatGptError::InvalidCharacters(InputField::Prompt));
    }

    if let Some(conversation_id) = conversation_id {
        if conversation_id.chars().count() > MAX_CONVERSATION_ID_LENGTH {
            return Err(ChatGptError::ConversationIdTooLong);
        }

        if contains_forbidden_control(conversation_id) {
            return Err(ChatGptError::InvalidCharacters(InputField::ConversationId));
        }
    }

    Ok(())
}
