use chrono::Local;
use std::env;

pub fn get_server_instructions() -> String {
    let current_date_time = Local::now().to_string();
    let current_os = env::consts::OS;

    format!(
        "
You can talk to the ChatGPT desktop app on macOS through the `chatgpt` tool.

**Operations**

*   `ask`: sends `prompt` to ChatGPT and returns the reply shown in the app. Pass `conversation_id` to continue the sidebar conversation whose name contains that text; if no such conversation is visible the prompt goes to the current one.
*   `get_conversations`: lists the conversation names visible in the sidebar.

**Things to know**

*   The app must be installed. It is launched if it is not running, and it is brought to the foreground for every call.
*   Replies are read from the app's window after a fixed wait. A long answer may still be streaming when it is read.
*   Calls run one at a time; a second call waits for the first to finish.
*   Prompts are limited to 10000 characters and conversation ids to 200. Control characters other than tab and newline are rejected.

Contextual information:
- The current date and time is {}.
- Current operating system: {}.
",
        current_date_time, current_os
    )
}
