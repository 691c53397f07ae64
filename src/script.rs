//! Line-oriented edit scripts for driving a [`Session`] without a UI.
//!
//! One command per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! caret 5
//! enter
//! type second item
//! select 0..20
//! numbers
//! ```

use std::num::ParseIntError;

use thiserror::Error;
use tracing::debug;

use crate::editor::Selection;
use crate::session::Session;

/// A single scripted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type the text over the selection.
    Type(String),
    Enter,
    /// Press Backspace this many times.
    Backspace(usize),
    Select(Selection),
    Caret(usize),
    /// Toggle `"• "` markers.
    Bullets,
    /// Toggle numbered markers.
    Numbers,
    Bold,
    Link(String),
    Unlink,
    /// Advance this many input frames.
    Frame(u32),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` needs an argument")]
    MissingArgument { line: usize, command: &'static str },
    #[error("line {line}: `{value}` is not a valid count or offset")]
    InvalidNumber {
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("line {line}: `{value}` is not a range like `3..8`")]
    InvalidRange { line: usize, value: String },
}

fn number<T: std::str::FromStr<Err = ParseIntError>>(
    line: usize,
    value: &str,
) -> Result<T, ScriptError> {
    value.parse().map_err(|source| ScriptError::InvalidNumber {
        line,
        value: value.to_string(),
        source,
    })
}

/// An optional repeat count, defaulting to one.
fn count<T: std::str::FromStr<Err = ParseIntError> + From<u8>>(
    line: usize,
    arg: &str,
) -> Result<T, ScriptError> {
    if arg.is_empty() {
        Ok(T::from(1))
    } else {
        number(line, arg)
    }
}

fn required(line: usize, command: &'static str, arg: &str) -> Result<String, ScriptError> {
    if arg.is_empty() {
        Err(ScriptError::MissingArgument { line, command })
    } else {
        Ok(arg.to_string())
    }
}

fn parse_range(line: usize, arg: &str) -> Result<Selection, ScriptError> {
    let Some((start, end)) = arg.split_once("..") else {
        return Err(ScriptError::InvalidRange {
            line,
            value: arg.to_string(),
        });
    };
    Ok(Selection::new(
        number(line, start.trim())?,
        number(line, end.trim())?,
    ))
}

/// Parse one script line. `line` is the 1-based line number for errors.
pub fn parse_line(line: usize, source: &str) -> Result<Option<Command>, ScriptError> {
    let trimmed = source.trim_start();
    if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (name, rest) = trimmed.split_once(' ').unwrap_or((trimmed.trim_end(), ""));
    let arg = rest.trim();

    let command = match name {
        // The text after `type ` is taken verbatim, trailing spaces included.
        "type" => Command::Type(required(line, "type", rest.trim_end_matches(['\r', '\n']))?),
        "enter" => Command::Enter,
        "backspace" => Command::Backspace(count(line, arg)?),
        "select" => Command::Select(parse_range(line, &required(line, "select", arg)?)?),
        "caret" => Command::Caret(number(line, &required(line, "caret", arg)?)?),
        "bullets" => Command::Bullets,
        "numbers" => Command::Numbers,
        "bold" => Command::Bold,
        "link" => Command::Link(required(line, "link", arg)?),
        "unlink" => Command::Unlink,
        "frame" => Command::Frame(count(line, arg)?),
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    Ok(Some(command))
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse_script(source: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if let Some(command) = parse_line(idx + 1, line)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

impl Command {
    /// Feed this command to `session`.
    pub fn apply(&self, session: &mut Session) {
        match self {
            Self::Type(text) => {
                session.type_text(text);
            }
            Self::Enter => {
                session.enter();
            }
            Self::Backspace(times) => {
                for _ in 0..*times {
                    session.backspace();
                }
            }
            Self::Select(selection) => {
                session.select(*selection);
            }
            Self::Caret(offset) => {
                session.select(Selection::caret(*offset));
            }
            Self::Bullets => {
                session.toggle_unordered_list();
            }
            Self::Numbers => {
                session.toggle_ordered_list();
            }
            Self::Bold => session.toggle_bold(),
            Self::Link(url) => {
                session.set_link(url);
            }
            Self::Unlink => session.remove_link(),
            Self::Frame(frames) => {
                for _ in 0..*frames {
                    session.frame();
                }
            }
        }
    }
}

/// Run `commands` in order against `session`.
pub fn run(session: &mut Session, commands: &[Command]) {
    let _scope = crate::perf::scope("script.run");
    for command in commands {
        debug!(?command, "script command");
        command.apply(session);
        crate::perf::log_event("script.command", format!("{command:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::StyledBuffer;

    #[test]
    fn test_parse_all_commands() {
        let script = "\
# build a list
caret 3
type  hello
enter
backspace
backspace 2
select 4..1
bullets
numbers
bold
link https://example.com
unlink
frame
frame 5
";
        let commands = parse_script(script).unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Caret(3),
                Command::Type(" hello".to_string()),
                Command::Enter,
                Command::Backspace(1),
                Command::Backspace(2),
                Command::Select(Selection::new(1, 4)),
                Command::Bullets,
                Command::Numbers,
                Command::Bold,
                Command::Link("https://example.com".to_string()),
                Command::Unlink,
                Command::Frame(1),
                Command::Frame(5),
            ]
        );
    }

    #[test]
    fn test_unknown_command_reports_line() {
        let err = parse_script("enter\n\nindent").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownCommand { line: 3, .. }));
        assert_eq!(err.to_string(), "line 3: unknown command `indent`");
    }

    #[test]
    fn test_missing_and_bad_arguments() {
        assert!(matches!(
            parse_line(1, "link"),
            Err(ScriptError::MissingArgument { command: "link", .. })
        ));
        assert!(matches!(
            parse_line(2, "caret x"),
            Err(ScriptError::InvalidNumber { line: 2, .. })
        ));
        assert!(matches!(
            parse_line(3, "select 4"),
            Err(ScriptError::InvalidRange { line: 3, .. })
        ));
        assert!(matches!(
            parse_line(4, "type"),
            Err(ScriptError::MissingArgument { command: "type", .. })
        ));
    }

    #[test]
    fn test_run_builds_a_numbered_list() {
        let mut session = Session::new(StyledBuffer::empty());
        let commands = parse_script(
            "type first\nenter\ntype second\nselect 0..12\nnumbers\ncaret 18\nenter\ntype third",
        )
        .unwrap();
        run(&mut session, &commands);
        assert_eq!(session.text(), "1. first\n2. second\n3. third");
    }
}
