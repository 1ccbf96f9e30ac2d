pub mod automation;
pub mod config;
pub mod errors;
pub mod probe;
pub mod prompt;
pub mod request;
pub mod runner;
pub mod script;
pub mod server;
pub mod utils;
pub mod validation;

pub use automation::{ChatGptAutomation, Conversations, Fallback, Reply};
pub use errors::ChatGptError;
pub use runner::{OsaScriptRunner, RunnerError, ScriptRunner};
pub use server::ChatGptServer;
