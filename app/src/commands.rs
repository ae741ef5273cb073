use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain input is a question, submitted as typed.
    Ask(String),
    SelectFile(PathBuf),
    Upload,
    Documents,
    Health,
    Clear,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '/{0}'. Type /help for a list of commands.")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Blank input is an empty question so the controller can reject it.
    /// A leading `//` asks a question that starts with `/`.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let trimmed = line.trim();

        if let Some(question) = trimmed.strip_prefix("//") {
            return Ok(Command::Ask(format!("/{}", question)));
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Ok(Command::Ask(line.trim_end().to_string()));
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "file" | "select" => {
                if argument.is_empty() {
                    return Err(CommandError::Usage("/file <path-to-pdf>"));
                }
                Command::SelectFile(PathBuf::from(argument))
            }
            "ask" => Command::Ask(argument.to_string()),
            "upload" => Command::Upload,
            "docs" | "documents" => Command::Documents,
            "health" => Command::Health,
            "clear" => Command::Clear,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

pub const HELP: &str = "\
Type a question and press Enter to ask it.
Start a question with // (or use /ask) when it begins with a slash.

  /ask <text>    ask a question
  /file <path>   select a PDF to upload
  /upload        upload the selected PDF
  /docs          refresh the list of uploaded documents
  /health        check the backend status
  /clear         delete every uploaded document
  /status        show the current view
  /help          show this help
  /quit          exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            Command::parse("What is the summary?\n").unwrap(),
            Command::Ask("What is the summary?".into())
        );
    }

    #[test]
    fn blank_input_is_an_empty_question() {
        assert_eq!(Command::parse("   ").unwrap(), Command::Ask(String::new()));
        assert_eq!(Command::parse("").unwrap(), Command::Ask(String::new()));
    }

    #[test]
    fn questions_starting_with_slash_can_be_asked() {
        assert_eq!(
            Command::parse("//etc/hosts: what is it for?").unwrap(),
            Command::Ask("/etc/hosts: what is it for?".into())
        );
        assert_eq!(
            Command::parse("/ask /usr/bin layout?").unwrap(),
            Command::Ask("/usr/bin layout?".into())
        );
    }

    #[test]
    fn file_command_keeps_spaces_in_path() {
        assert_eq!(
            Command::parse("/file  my docs/report.pdf ").unwrap(),
            Command::SelectFile(PathBuf::from("my docs/report.pdf"))
        );
        assert_eq!(
            Command::parse("/file").unwrap_err(),
            CommandError::Usage("/file <path-to-pdf>")
        );
    }

    #[test]
    fn slash_commands_are_case_insensitive() {
        assert_eq!(Command::parse("/UPLOAD").unwrap(), Command::Upload);
        assert_eq!(Command::parse("/exit").unwrap(), Command::Quit);
        assert_eq!(
            Command::parse("/uplaod").unwrap_err(),
            CommandError::Unknown("uplaod".into())
        );
    }
}
