use std::path::PathBuf;

use ragchat_core::Msg;

use crate::platform::app::AppEvent;

pub const HELP_LINES: &[&str] = &[
    "Commands:",
    "  /upload <path>   upload a PDF into this session",
    "  /url <address>   index a web page into this session",
    "  /session         show the full session id",
    "  /help            show this help",
    "  /quit            exit",
    "Anything else is sent as a chat message; start with // to send a leading /.",
];

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Upload(Option<PathBuf>),
    IndexUrl(String),
    Chat(String),
    ShowSession,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_line(line: &str) -> InputCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return InputCommand::Empty;
    }
    let chat = line.trim_end_matches(['\r', '\n']);
    let Some(command) = trimmed.strip_prefix('/') else {
        return InputCommand::Chat(chat.to_string());
    };
    if command.starts_with('/') {
        return InputCommand::Chat(command.to_string());
    }

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    // Leading paths like /etc/hosts are questions, not commands.
    if name.contains('/') {
        return InputCommand::Chat(chat.to_string());
    }
    match name {
        "upload" => InputCommand::Upload((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "url" => InputCommand::IndexUrl(rest.to_string()),
        "session" => InputCommand::ShowSession,
        "help" => InputCommand::Help,
        "quit" | "exit" => InputCommand::Quit,
        other => InputCommand::Unknown(other.to_string()),
    }
}

impl InputCommand {
    /// Events to feed the main loop, in order.
    pub fn into_events(self) -> Vec<AppEvent> {
        match self {
            InputCommand::Upload(path) => {
                let mut events = Vec::with_capacity(2);
                if path.is_some() {
                    events.push(AppEvent::Core(Msg::FileSelected(path)));
                }
                events.push(AppEvent::Core(Msg::UploadClicked));
                events
            }
            InputCommand::IndexUrl(url) => vec![
                AppEvent::Core(Msg::UrlChanged(url)),
                AppEvent::Core(Msg::IndexUrlClicked),
            ],
            InputCommand::Chat(text) => vec![
                AppEvent::Core(Msg::ChatInputChanged(text)),
                AppEvent::Core(Msg::SendClicked),
            ],
            InputCommand::ShowSession => vec![AppEvent::ShowSession],
            InputCommand::Help | InputCommand::Unknown(_) => vec![AppEvent::Help],
            InputCommand::Quit => vec![AppEvent::Quit],
            InputCommand::Empty => vec![AppEvent::Core(Msg::NoOp)],
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(
            parse_line("What is X?\n"),
            InputCommand::Chat("What is X?".to_string())
        );
        assert_eq!(parse_line("   "), InputCommand::Empty);
    }

    #[test]
    fn slash_commands_parse_arguments() {
        assert_eq!(
            parse_line("/upload  docs/my paper.pdf "),
            InputCommand::Upload(Some(PathBuf::from("docs/my paper.pdf")))
        );
        assert_eq!(parse_line("/upload"), InputCommand::Upload(None));
        assert_eq!(
            parse_line("/url https://example.com"),
            InputCommand::IndexUrl("https://example.com".to_string())
        );
        assert_eq!(parse_line("/quit"), InputCommand::Quit);
        assert_eq!(
            parse_line("/frobnicate"),
            InputCommand::Unknown("frobnicate".to_string())
        );
    }

    #[test]
    fn slashes_can_still_be_chatted() {
        assert_eq!(
            parse_line("/etc/hosts is what?"),
            InputCommand::Chat("/etc/hosts is what?".to_string())
        );
        assert_eq!(
            parse_line("//help me"),
            InputCommand::Chat("/help me".to_string())
        );
    }

    #[test]
    fn upload_without_path_only_clicks() {
        let events = InputCommand::Upload(None).into_events();
        assert_eq!(events, vec![AppEvent::Core(Msg::UploadClicked)]);
    }

    #[test]
    fn chat_sets_input_then_sends() {
        let events = parse_line("hello").into_events();
        assert_eq!(
            events,
            vec![
                AppEvent::Core(Msg::ChatInputChanged("hello".to_string())),
                AppEvent::Core(Msg::SendClicked),
            ]
        );
    }
}
