//! The two operations exposed by the `chatgpt` tool.
//!
//! Both take the UI lock for their whole run: the app has one window and one
//! keyboard focus, and two scripts typing into it at once would mix their
//! keystrokes.

use crate::config::AutomationDelays;
use crate::errors::{ChatGptError, Result};
use crate::probe;
use crate::runner::ScriptRunner;
use crate::script::{
    ask_script, escape, list_conversations_script, CONVERSATION_DELIMITER, UNREADABLE_MARKER,
};
use crate::validation::validate_input;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Placeholder results used when the UI could not be scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The reply text area could not be read.
    ResponseUnavailable,
    /// The script ran but printed nothing.
    NoResponse,
    /// The sidebar buttons could not be enumerated.
    ConversationsUnavailable,
    /// The listing script itself failed.
    ListingFailed,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Fallback::ResponseUnavailable => "Could not retrieve the response from ChatGPT.",
            Fallback::NoResponse => "No response received from ChatGPT.",
            Fallback::ConversationsUnavailable => "Unable to retrieve conversations",
            Fallback::ListingFailed => "Error retrieving conversations",
        };
        f.write_str(text)
    }
}

/// Outcome of `ask`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Fallback(Fallback),
}

impl Reply {
    pub fn from_output(output: String) -> Self {
        if output.is_empty() {
            Reply::Fallback(Fallback::NoResponse)
        } else if output.trim() == UNREADABLE_MARKER {
            Reply::Fallback(Fallback::ResponseUnavailable)
        } else {
            Reply::Text(output)
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Reply::Fallback(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Text(text) => f.write_str(text),
            Reply::Fallback(fallback) => fallback.fmt(f),
        }
    }
}

/// Outcome of `list_conversations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversations {
    /// Names in on-screen order. Names are not deduplicated.
    Listed(Vec<String>),
    Degraded(Fallback),
}

impl Conversations {
    /// Parses what the listing script printed.
    ///
    /// osascript prints a list as `a, b, c`. A name that itself contains
    /// `", "` is split in two; the output carries no quoting to tell them
    /// apart.
    pub fn from_output(output: &str) -> Self {
        let output = output.trim_end();
        if output.is_empty() {
            return Conversations::Listed(Vec::new());
        }
        if output == UNREADABLE_MARKER {
            return Conversations::Degraded(Fallback::ConversationsUnavailable);
        }
        Conversations::Listed(
            output
                .split(CONVERSATION_DELIMITER)
                .map(str::to_string)
                .collect(),
        )
    }

    /// Lines shown to the caller. A degraded result shows as a one-entry
    /// list holding the fallback text.
    pub fn names(&self) -> Vec<String> {
        match self {
            Conversations::Listed(names) => names.clone(),
            Conversations::Degraded(fallback) => vec![fallback.to_string()],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Conversations::Degraded(_))
    }

    pub fn to_message(&self) -> String {
        let names = self.names();
        if names.is_empty() {
            "No conversations found in ChatGPT.".to_string()
        } else {
            format!(
                "Found {} conversation(s):\n\n{}",
                names.len(),
                names.join("\n")
            )
        }
    }
}

/// Drives the ChatGPT desktop app through a [`ScriptRunner`].
pub struct ChatGptAutomation {
    runner: Arc<dyn ScriptRunner>,
    delays: AutomationDelays,
    ui_lock: Mutex<()>,
}

impl ChatGptAutomation {
    pub fn new(runner: Arc<dyn ScriptRunner>, delays: AutomationDelays) -> Self {
        Self {
            runner,
            delays,
            ui_lock: Mutex::new(()),
        }
    }

    pub async fn ensure_available(&self) -> Result<()> {
        probe::ensure_available(self.runner.as_ref(), &self.delays).await
    }

    /// Sends `prompt`, optionally inside the conversation whose sidebar name
    /// contains `conversation_id`, and returns the scraped reply.
    pub async fn ask(&self, prompt: &str, conversation_id: Option<&str>) -> Result<Reply> {
        validate_input(prompt, conversation_id)?;

        let _ui = self.ui_lock.lock().await;
        self.ensure_available().await?;

        let prompt_literal = escape(prompt);
        let conversation_literal = conversation_id.filter(|id| !id.is_empty()).map(escape);
        let script = ask_script(
            &prompt_literal,
            conversation_literal.as_ref(),
            &self.delays,
        );

        info!(
            prompt_chars = prompt.chars().count(),
            has_conversation = conversation_literal.is_some(),
            "sending prompt to ChatGPT"
        );

        let output = self.runner.run(&script).await.map_err(|e| {
            error!("error interacting with ChatGPT: {}", e);
            ChatGptError::ExecutionFailed(e)
        })?;

        let reply = Reply::from_output(output);
        if reply.is_fallback() {
            warn!("ChatGPT reply could not be scraped: {}", reply);
        }
        Ok(reply)
    }

    /// Lists conversation names from the sidebar. Never fails; runner errors
    /// turn into [`Conversations::Degraded`].
    pub async fn list_conversations(&self) -> Conversations {
        let _ui = self.ui_lock.lock().await;

        if let Err(e) = self.ensure_available().await {
            warn!("cannot list conversations, app unavailable: {}", e);
            return Conversations::Degraded(Fallback::ListingFailed);
        }

        let conversations = match self
            .runner
            .run(&list_conversations_script(&self.delays))
            .await
        {
            Ok(output) => Conversations::from_output(&output),
            Err(e) => {
                error!("error getting ChatGPT conversations: {}", e);
                Conversations::Degraded(Fallback::ListingFailed)
            }
        };

        if let Conversations::Degraded(fallback) = &conversations {
            warn!(%fallback, "conversation listing degraded");
        }
        conversations
    }
}
