//! Session: one window model plus the command semantics of the prompt.
//!
//! Everything here is synchronous and returns text, so it can be driven from
//! tests; the async loop in `repl` owns stdin, Ctrl-C and the worker thread.

use std::fmt::Write as _;

use lazyline_common::Result;
use lazyline_config::LazylineConfig;
use lazyline_window::{ReadAhead, ReadAheadReport, SearchMatch, SearchOutcome, WindowModel};

use crate::commands::{Command, ReadStep, HELP};

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// The window holds no (further) match for `pattern` but the source has
    /// more lines; the loop may offer a read-ahead.
    Miss { pattern: String },
    Quit,
}

pub struct Session {
    model: WindowModel,
    config: LazylineConfig,
    last_pattern: Option<String>,
}

impl Session {
    pub fn new(config: LazylineConfig) -> Self {
        let max_lines = config.window.max_lines.max(1) as usize;
        Session {
            model: WindowModel::with_capacity(max_lines),
            config,
            last_pattern: None,
        }
    }

    pub fn model(&self) -> &WindowModel {
        &self.model
    }

    pub fn config(&self) -> &LazylineConfig {
        &self.config
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        let reply = match command {
            Command::Open(path) => {
                self.model.open_path(&path)?;
                self.last_pattern = None;
                let mut out = format!(
                    "opened {} ({})\n",
                    path.display(),
                    self.model.encoding().map_or("unknown", |e| e.name())
                );
                out.push_str(&self.render_window());
                Reply::Text(out)
            }
            Command::Search(Some(pattern)) => {
                self.last_pattern = Some(pattern.clone());
                self.search(pattern)?
            }
            Command::Search(None) => {
                self.model.search(None)?;
                self.last_pattern = None;
                Reply::Text("search cleared".into())
            }
            Command::Next => match self.last_pattern.clone() {
                Some(pattern) => self.search(pattern)?,
                None => Reply::Text("no previous search".into()),
            },
            Command::Read(step) => {
                let count = self.step_count(step);
                let read = self.model.read_next(count)?;
                let mut out = self.render_window();
                let _ = write!(out, "read {read} line(s)");
                if self.model.is_end_of_stream() {
                    out.push_str(", end of input");
                }
                Reply::Text(out)
            }
            Command::Show => Reply::Text(self.render_window()),
            Command::Info => Reply::Text(self.info()),
            Command::Help => Reply::Text(HELP.into()),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    /// Detach a read-ahead for `pattern` from the model.
    pub fn begin_read_ahead(&mut self, pattern: &str) -> Result<Option<ReadAhead>> {
        self.model.begin_read_ahead(Some(pattern))
    }

    /// The read-ahead worker died without a report; the file is closed.
    pub fn abandon_read_ahead(&mut self) {
        self.model.abandon_read_ahead();
    }

    /// Commit a finished read-ahead and describe where it stopped.
    pub fn finish_read_ahead(&mut self, report: ReadAheadReport) -> Result<String> {
        let read = report.lines_read();
        let outcome = self.model.finish_read_ahead(report)?;
        let last = self.model.last_line_number().map_or(0, |n| n + 1);

        let out = match outcome {
            SearchOutcome::Found(m) => {
                format!("{}{}", self.render_window(), self.describe_match(m))
            }
            SearchOutcome::NotFound => {
                format!("read {read} line(s), no match before end of input (line {last})")
            }
            SearchOutcome::Canceled => format!("canceled after {read} line(s), at line {last}"),
        };
        Ok(out)
    }

    /// The window, one line per row, numbered from 1.
    pub fn render_window(&self) -> String {
        let Some(first) = self.model.first_line_number() else {
            return "no file open\n".into();
        };
        let mut out = String::new();
        for (index, line) in self.model.lines().enumerate() {
            let _ = writeln!(out, "{:>7}  {line}", first + index as i64 + 1);
        }
        out
    }

    pub fn describe_match(&self, m: SearchMatch) -> String {
        let text = m.as_str(self.model.text()).unwrap_or_default();
        match self.model.locate(m.start) {
            Some(pos) => format!(
                "match at line {}, column {}: {text:?}",
                pos.line_number + 1,
                pos.column + 1
            ),
            None => format!("match at end of window: {text:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn search(&mut self, pattern: String) -> Result<Reply> {
        if self.model.last_line_number().is_none() {
            return Ok(Reply::Text("no file open".into()));
        }
        let reply = match self.model.search(Some(&pattern))? {
            Some(m) => Reply::Text(self.describe_match(m)),
            None if self.model.is_open() && !self.model.is_end_of_stream() => {
                Reply::Miss { pattern }
            }
            None => Reply::Text(format!("no match for {pattern:?}")),
        };
        Ok(reply)
    }

    fn step_count(&self, step: ReadStep) -> usize {
        match step {
            ReadStep::Small => self.config.window.small_step as usize,
            ReadStep::Large => self.config.window.large_step as usize,
            ReadStep::Count(k) => k,
        }
    }

    fn info(&self) -> String {
        let model = &self.model;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "file:     {}",
            model
                .file_path()
                .map_or_else(|| "-".into(), |p| p.display().to_string())
        );
        let _ = writeln!(
            out,
            "encoding: {}",
            model.encoding().map_or("-", |e| e.name())
        );
        match (model.first_line_number(), model.last_line_number()) {
            (Some(first), Some(last)) if last >= first => {
                let _ = writeln!(out, "lines:    {}-{}", first + 1, last + 1);
            }
            _ => out.push_str("lines:    -\n"),
        }
        let _ = writeln!(out, "window:   {}/{}", model.len(), model.capacity());
        let _ = write!(out, "at end:   {}", model.is_end_of_stream());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn session_over(content: &str, max_lines: u32) -> (Session, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, content).unwrap();

        let mut config = LazylineConfig::default();
        config.window.max_lines = max_lines;
        config.window.small_step = 1;
        config.window.large_step = 3;

        let mut session = Session::new(config);
        session.execute(Command::Open(path)).unwrap();
        (session, dir)
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) => text,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn open_renders_numbered_window() {
        let (session, _dir) = session_over("alpha\nbeta\ngamma\n", 2);
        assert_eq!(session.render_window(), "      1  alpha\n      2  beta\n");
    }

    #[test]
    fn open_missing_file_is_error() {
        let mut session = Session::new(LazylineConfig::default());
        let result = session.execute(Command::Open(Path::new("/nonexistent/x.log").into()));
        assert!(result.is_err());
        assert_eq!(session.render_window(), "no file open\n");
    }

    #[test]
    fn read_steps_follow_config() {
        let (mut session, _dir) = session_over("a\nb\nc\nd\ne\nf\n", 2);

        session.execute(Command::Read(ReadStep::Small)).unwrap();
        assert_eq!(session.model().last_line_number(), Some(2));

        session.execute(Command::Read(ReadStep::Large)).unwrap();
        assert_eq!(session.model().last_line_number(), Some(5));

        let out = text(session.execute(Command::Read(ReadStep::Count(9))).unwrap());
        assert!(out.ends_with("read 0 line(s), end of input"));
    }

    #[test]
    fn search_then_next_then_miss() {
        let (mut session, _dir) = session_over("ab\nxx ab\ncd\nab\n", 2);

        let first = text(session.execute(Command::Search(Some("ab".into()))).unwrap());
        assert_eq!(first, "match at line 1, column 1: \"ab\"");
        let second = text(session.execute(Command::Next).unwrap());
        assert_eq!(second, "match at line 2, column 4: \"ab\"");

        assert_eq!(
            session.execute(Command::Next).unwrap(),
            Reply::Miss {
                pattern: "ab".into()
            }
        );
    }

    #[test]
    fn miss_at_end_of_input_is_plain_text() {
        let (mut session, _dir) = session_over("ab\ncd\n", 5);
        let out = text(session.execute(Command::Search(Some("zz".into()))).unwrap());
        assert_eq!(out, "no match for \"zz\"");
    }

    #[test]
    fn read_ahead_commits_and_describes_match() {
        let (mut session, _dir) = session_over("a\nb\nc\nd\nneedle here\ne\n", 2);

        let job = session.begin_read_ahead("needle").unwrap().unwrap();
        let report = job.run(&lazyline_window::CancellationToken::new());
        let out = session.finish_read_ahead(report).unwrap();

        assert!(out.contains("      5  needle here"));
        assert!(out.ends_with("match at line 5, column 1: \"needle\""));
    }

    #[test]
    fn canceled_read_ahead_reports_position() {
        let (mut session, _dir) = session_over("a\nb\nc\n", 2);
        let token = lazyline_window::CancellationToken::new();
        token.cancel();

        let job = session.begin_read_ahead("c").unwrap().unwrap();
        let out = session.finish_read_ahead(job.run(&token)).unwrap();
        assert_eq!(out, "canceled after 0 line(s), at line 2");
        assert!(session.model().is_open());
    }

    #[test]
    fn next_without_search() {
        let (mut session, _dir) = session_over("a\n", 2);
        assert_eq!(
            text(session.execute(Command::Next).unwrap()),
            "no previous search"
        );
    }

    #[test]
    fn info_lists_lines_and_encoding() {
        let (session, _dir) = session_over("a\nb\nc\n", 2);
        let out = session.info();
        assert!(out.contains("encoding: UTF-8"));
        assert!(out.contains("lines:    1-2"));
        assert!(out.contains("window:   2/2"));
        assert!(out.ends_with("at end:   false"));
    }

    #[test]
    fn quit() {
        let mut session = Session::new(LazylineConfig::default());
        assert_eq!(session.execute(Command::Quit).unwrap(), Reply::Quit);
    }

    #[test]
    fn lost_worker_closes_file_but_keeps_window() {
        let (mut session, _dir) = session_over("a\nb\nc\n", 2);

        let job = session.begin_read_ahead("c").unwrap().unwrap();
        drop(job);
        session.abandon_read_ahead();

        assert!(!session.model().is_open());
        assert_eq!(session.render_window(), "      1  a\n      2  b\n");
        let out = text(session.execute(Command::Search(Some("zz".into()))).unwrap());
        assert_eq!(out, "no match for \"zz\"");
    }
}
