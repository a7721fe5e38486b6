use std::str::FromStr;

use crate::{
    error::AppError,
    form::{FieldEdit, Meridiem},
};

pub const HELP: &str = "\
Commands:
  name <full name>      dob <YYYY-MM-DD>
  hour <1-12>           minute <0-59>        ampm <AM|PM>
  place <text>          pick <n>             retry
  show                  submit               help      exit";

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Edit(FieldEdit),
    /// 1-based position in the suggestion list
    Pick(usize),
    Retry,
    Show,
    Submit,
    Help,
    Exit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let raw = line
            .trim_start_matches('>')
            .trim_start()
            .trim_end_matches(['\r', '\n']);
        let line = raw.trim_end();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "name" => Command::Edit(FieldEdit::Name(rest.to_string())),
            "dob" => Command::Edit(FieldEdit::Dob(rest.to_string())),
            "hour" => Command::Edit(FieldEdit::BirthHour(rest.to_string())),
            "minute" => Command::Edit(FieldEdit::BirthMinute(rest.to_string())),
            "ampm" => Command::Edit(FieldEdit::AmPm(rest.parse::<Meridiem>()?)),
            // Place text is kept verbatim, trailing spaces count towards the minimum length
            "place" => Command::Edit(FieldEdit::PlaceText(
                raw.get(word.len()..)
                    .map(|text| text.strip_prefix(' ').unwrap_or(text))
                    .unwrap_or_default()
                    .to_string(),
            )),
            "pick" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Pick(n),
                _ => {
                    return Err(AppError::Validation(format!(
                        "pick needs a suggestion number, got {:?}",
                        rest
                    )));
                }
            },
            "retry" => Command::Retry,
            "show" => Command::Show,
            "submit" => Command::Submit,
            "help" | "?" => Command::Help,
            "exit" | "quit" => Command::Exit,
            _ => return Err(AppError::UnknownCommand(line.to_string())),
        };
        Ok(command)
    }
}
