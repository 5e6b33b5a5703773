//! Parsing of the interactive commands typed at the prompt.

use std::path::PathBuf;

/// How many lines a `+` command asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStep {
    /// `+`: `window.small_step` lines.
    Small,
    /// `++`: `window.large_step` lines.
    Large,
    /// `+<k>`: exactly `k` lines.
    Count(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    /// `/<pattern>`; a bare `/` clears the search.
    Search(Option<String>),
    /// Repeat the last search.
    Next,
    Read(ReadStep),
    Show,
    Info,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("usage: open <path>")]
    MissingPath,

    #[error("invalid line count '{0}'")]
    InvalidCount(String),
}

pub const HELP: &str = "\
commands:
  open <path>   open a file (.gz is decompressed)
  /<pattern>    search the window (regex, case-insensitive); '/' clears
  n             next match of the last pattern
  +  ++  +<k>   read a few, many, or k more lines
  show          print the window
  info          file, encoding and line numbers
  help          this text
  q             quit";

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        if let Some(pattern) = line.strip_prefix('/') {
            let pattern = (!pattern.is_empty()).then(|| pattern.to_string());
            return Ok(Some(Command::Search(pattern)));
        }

        if let Some(count) = line.strip_prefix('+') {
            let step = match count {
                "" => ReadStep::Small,
                "+" => ReadStep::Large,
                k => ReadStep::Count(
                    k.parse()
                        .map_err(|_| CommandError::InvalidCount(k.to_string()))?,
                ),
            };
            return Ok(Some(Command::Read(step)));
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word {
            "open" | "o" if rest.is_empty() => return Err(CommandError::MissingPath),
            "open" | "o" => Command::Open(PathBuf::from(rest)),
            "n" | "next" => Command::Next,
            "show" | "s" => Command::Show,
            "info" | "i" => Command::Info,
            "help" | "h" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(line.to_string())),
        };
        Ok(Some(command))
    }
}

/// `true` for an affirmative answer to a yes/no prompt.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
