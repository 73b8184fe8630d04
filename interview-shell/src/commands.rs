//! Line commands understood by the shell.

use interview_core::Language;

#[derive(Debug, PartialEq)]
pub enum PanelCommand {
    /// Replace the buffer. `\n` in the argument becomes a newline.
    Edit(String),
    /// Replace the buffer with a file's contents.
    Load(String),
    /// Append one line to the buffer.
    Append(String),
    Select(usize, usize),
    Lang(Language),
    Font(FontChange),
    Run,
    Record(RecordCommand),
    Done,
    Show,
    Help,
    Quit,
    Empty,
    /// Anything unparseable, with the reason.
    Unknown(String),
}

#[derive(Debug, PartialEq)]
pub enum FontChange {
    Increase,
    Decrease,
}

#[derive(Debug, PartialEq)]
pub enum RecordCommand {
    Start,
    Stop,
}

pub const HELP: &str = "\
commands:
  edit <text>        replace the code (\\n for newlines)
  load <path>        replace the code with a file
  append <line>      add a line to the code
  select <from> <to> select a char range
  lang <language>    cpp | python | java | javascript
  font + | font -    change the font size
  run                run the code
  rec start|stop     control the recorder
  done               end the interview
  show               print the panel state
  quit";

pub struct CommandParser;

impl CommandParser {
    pub fn parse(input: &str) -> PanelCommand {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return PanelCommand::Empty;
        }

        let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim_start()),
            None => (trimmed, ""),
        };

        match cmd {
            "edit" => PanelCommand::Edit(rest.replace("\\n", "\n")),
            "load" if !rest.is_empty() => PanelCommand::Load(rest.to_string()),
            "load" => PanelCommand::Unknown("load needs a path".to_string()),
            "append" => PanelCommand::Append(rest.to_string()),
            "select" => Self::parse_select(rest),
            "lang" => match rest.parse::<Language>() {
                Ok(language) => PanelCommand::Lang(language),
                Err(e) => PanelCommand::Unknown(e.to_string()),
            },
            "font" => match rest {
                "+" => PanelCommand::Font(FontChange::Increase),
                "-" => PanelCommand::Font(FontChange::Decrease),
                _ => PanelCommand::Unknown("font takes + or -".to_string()),
            },
            "run" => PanelCommand::Run,
            "rec" => match rest {
                "start" => PanelCommand::Record(RecordCommand::Start),
                "stop" => PanelCommand::Record(RecordCommand::Stop),
                _ => PanelCommand::Unknown("rec takes start or stop".to_string()),
            },
            "done" => PanelCommand::Done,
            "show" => PanelCommand::Show,
            "help" | "?" => PanelCommand::Help,
            "quit" | "exit" => PanelCommand::Quit,
            other => PanelCommand::Unknown(format!("unknown command '{}'", other)),
        }
    }

    fn parse_select(rest: &str) -> PanelCommand {
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let offsets: Option<Vec<usize>> = parts.iter().map(|p| p.parse().ok()).collect();
        match offsets.as_deref() {
            Some([at]) => PanelCommand::Select(*at, *at),
            Some([from, to]) => PanelCommand::Select(*from, *to),
            _ => PanelCommand::Unknown("select takes one or two offsets".to_string()),
        }
    }
}
