//! AppleScript generation.
//!
//! User-controlled text reaches a script only through [`escape`], which
//! returns a [`ScriptFragment`]. The template builders accept fragments, never
//! `&str`, so a raw value cannot be interpolated by accident.

use crate::config::{applescript_seconds, AutomationDelays};
use std::fmt;

pub const CHATGPT_APP_NAME: &str = "ChatGPT";

/// Sidebar button that starts a conversation rather than naming one.
pub const NEW_CHAT_BUTTON: &str = "New chat";

/// Separator osascript uses when printing an AppleScript list.
pub const CONVERSATION_DELIMITER: &str = ", ";

/// Returned by a script when the UI element it reads could not be found.
pub const UNREADABLE_MARKER: &str = "<<chatgpt-mcp:unreadable>>";

/// A quoted AppleScript string literal. Evaluates to exactly the value it
/// was built from and cannot close early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFragment(String);

impl ScriptFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quotes `value` as an AppleScript string literal.
///
/// Backslash and double quote are backslash-escaped; AppleScript has no
/// doubled-quote escape, `""` would end the literal. Tab, line feed and
/// carriage return use their escape sequences so the literal stays on one
/// line.
pub fn escape(value: &str) -> ScriptFragment {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    ScriptFragment(out)
}

/// Complete script text ready for a [`crate::runner::ScriptRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script(String);

impl Script {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prints `true` when the app's process exists, `false` otherwise.
pub fn process_exists_script() -> Script {
    Script(format!(
        r#"tell application "System Events"
    return application process "{CHATGPT_APP_NAME}" exists
end tell"#
    ))
}

pub fn launch_script(delays: &AutomationDelays) -> Script {
    Script(format!(
        r#"tell application "{CHATGPT_APP_NAME}" to activate
delay {settle}"#,
        settle = applescript_seconds(delays.launch_settle),
    ))
}

/// Types `prompt` into the focused composer, submits it and reads back the
/// reply. With a conversation, first tries to open the sidebar entry whose
/// name contains it; a missing entry is ignored.
pub fn ask_script(
    prompt: &ScriptFragment,
    conversation: Option<&ScriptFragment>,
    delays: &AutomationDelays,
) -> Script {
    let select_conversation = match conversation {
        Some(conversation) => format!(
            r#"
            try
                set targetConversation to {conversation}
                click (first button of group 1 of group 1 of window 1 whose name contains targetConversation)
                delay {select}
            end try"#,
            select = applescript_seconds(delays.conversation_select),
        ),
        None => String::new(),
    };

    Script(format!(
        r#"tell application "{CHATGPT_APP_NAME}"
    activate
    delay {activate}

    tell application "System Events"
        tell process "{CHATGPT_APP_NAME}"{select_conversation}
            set promptText to {prompt}
            keystroke promptText
            delay {keystroke}
            keystroke return
            delay {response}

            set responseText to ""
            try
                set responseText to value of text area 2 of group 1 of group 1 of window 1
            on error
                set responseText to {unreadable}
            end try

            return responseText
        end tell
    end tell
end tell"#,
        activate = applescript_seconds(delays.activate),
        keystroke = applescript_seconds(delays.keystroke_settle),
        response = applescript_seconds(delays.response_settle),
        unreadable = escape(UNREADABLE_MARKER),
    ))
}

/// Lists sidebar conversation names, skipping the "New chat" button.
pub fn list_conversations_script(delays: &AutomationDelays) -> Script {
    Script(format!(
        r#"tell application "{CHATGPT_APP_NAME}"
    activate
    delay {activate}

    tell application "System Events"
        tell process "{CHATGPT_APP_NAME}"
            set conversationsList to {{}}

            try
                set chatButtons to buttons of group 1 of group 1 of window 1
                repeat with chatButton in chatButtons
                    set buttonName to name of chatButton
                    if buttonName is not {new_chat} then
                        set end of conversationsList to buttonName
                    end if
                end repeat
            on error
                set conversationsList to {{{unreadable}}}
            end try

            return conversationsList
        end tell
    end tell
end tell"#,
        activate = applescript_seconds(delays.activate),
        new_chat = escape(NEW_CHAT_BUTTON),
        unreadable = escape(UNREADABLE_MARKER),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::Rng;

    /// Reads one AppleScript string literal from the start of `s`. Returns the
    /// decoded value and the byte offset just past the closing quote.
    fn scan_literal(s: &str) -> Option<(String, usize)> {
        let mut chars = s.char_indices();
        if chars.next()?.1 != '"' {
            return None;
        }
        let mut value = String::new();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Some((value, i + 1)),
                '\\' => match chars.next()?.1 {
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    't' => value.push('\t'),
                    other => value.push(other),
                },
                _ => value.push(c),
            }
        }
        None
    }

    #[test]
    fn test_escape_plain_text() {
        assert_eq!(escape("Hello").as_str(), r#""Hello""#);
    }

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"say "hi""#).as_str(), r#""say \"hi\"""#);
        assert_eq!(escape(r"C:\path\").as_str(), r#""C:\\path\\""#);
        assert_eq!(escape("a\nb\tc\r").as_str(), r#""a\nb\tc\r""#);
    }

    #[test]
    fn test_injection_attempt_stays_inside_literal() {
        let hostile = r#"" & (do shell script "rm -rf ~") & ""#;
        let fragment = escape(hostile);
        let (decoded, end) = scan_literal(fragment.as_str()).unwrap();
        assert_eq!(decoded, hostile);
        assert_eq!(end, fragment.as_str().len());
    }

    #[test]
    fn test_trailing_backslash_cannot_escape_closing_quote() {
        let fragment = escape(r#"\"#);
        let (decoded, end) = scan_literal(fragment.as_str()).unwrap();
        assert_eq!(decoded, "\\");
        assert_eq!(end, fragment.as_str().len());
    }

    #[test]
    fn test_randomized_values_never_terminate_early() {
        let alphabet = [
            "\"", "\\", "a", "Z", " ", "&", "\n", "\t", "\r", "'", "end tell", "»", "é", "\\\"",
        ];
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let len = rng.gen_range(0..40);
            let value: String = (0..len)
                .map(|_| *alphabet.choose(&mut rng).unwrap())
                .collect();
            let fragment = escape(&value);
            let (decoded, end) = scan_literal(fragment.as_str())
                .unwrap_or_else(|| panic!("unterminated literal for {value:?}"));
            assert_eq!(decoded, value);
            assert_eq!(end, fragment.as_str().len(), "literal closed early for {value:?}");
        }
    }

    #[test]
    fn test_ask_script_interpolates_fragments() {
        let prompt = escape(r#"What is "Rust"?"#);
        let conversation = escape("Trip");
        let script = ask_script(&prompt, Some(&conversation), &AutomationDelays::default());
        let text = script.as_str();

        assert!(text.contains(r#"set promptText to "What is \"Rust\"?""#));
        assert!(text.contains(r#"set targetConversation to "Trip""#));
        assert!(text.contains("delay 5"));
        assert!(text.contains("delay 0.5"));
        assert!(text.contains(UNREADABLE_MARKER));
    }

    #[test]
    fn test_ask_script_without_conversation_skips_click() {
        let script = ask_script(&escape("Hi"), None, &AutomationDelays::default());
        assert!(!script.as_str().contains("targetConversation"));
        assert!(script.as_str().contains("keystroke promptText"));
    }

    #[test]
    fn test_list_script_excludes_new_chat() {
        let script = list_conversations_script(&AutomationDelays::default());
        assert!(script.as_str().contains(r#"if buttonName is not "New chat" then"#));
        assert!(script.as_str().contains("set conversationsList to {}"));
        assert!(script
            .as_str()
            .contains(&format!("set conversationsList to {{\"{UNREADABLE_MARKER}\"}}")));
    }

    #[test]
    fn test_launch_script_uses_settle_delay() {
        let delays = AutomationDelays {
            launch_settle: std::time::Duration::from_millis(1500),
            ..AutomationDelays::default()
        };
        assert!(launch_script(&delays).as_str().ends_with("delay 1.5"));
    }
}
