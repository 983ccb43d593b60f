//! Line-based interactive extractor.
//!
//! Plain lines accumulate as HTML input; lines starting with `:` are commands.
//! Errors are shown and the session keeps reading.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use harvester_core::{update_extractor, ExtractorMsg, ExtractorState, ExtractorViewModel};

use crate::effects::EffectRunner;

const HELP: &str = "Paste HTML, then use :extract to list PDF links.
Commands: :extract  :csv  :clear  :show  :help  :quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Extract,
    Csv,
    Clear,
    Show,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Input(String),
    Command(Command),
}

fn parse_line(line: &str) -> Line {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Line::Input(line.to_string());
    };
    let command = match command.trim().to_ascii_lowercase().as_str() {
        "extract" | "e" => Command::Extract,
        "csv" => Command::Csv,
        "clear" | "c" => Command::Clear,
        "show" | "s" => Command::Show,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    };
    Line::Command(command)
}

pub fn run_interactive(out_dir: PathBuf) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(EffectRunner::new(out_dir)).run(stdin.lock(), stdout.lock())
}

struct Session {
    runner: EffectRunner,
    state: ExtractorState,
    buffer: String,
    /// Lines appended since the state last saw the buffer.
    unsynced: bool,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            runner,
            state: ExtractorState::new(),
            buffer: String::new(),
            unsynced: false,
        }
    }

    fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        writeln!(out, "{HELP}")?;
        for line in input.lines() {
            let line = line?;
            let command = match parse_line(&line) {
                Line::Input(text) => {
                    if !self.buffer.is_empty() {
                        self.buffer.push('\n');
                    }
                    self.buffer.push_str(&text);
                    self.unsynced = true;
                    continue;
                }
                Line::Command(command) => command,
            };

            match command {
                Command::Extract => {
                    self.sync_input();
                    self.dispatch(ExtractorMsg::ExtractRequested);
                    self.render(&mut out, true)?;
                }
                Command::Csv => {
                    self.dispatch(ExtractorMsg::ExportRequested);
                    self.render(&mut out, false)?;
                }
                Command::Clear => {
                    self.buffer.clear();
                    self.unsynced = false;
                    self.dispatch(ExtractorMsg::ClearRequested);
                    writeln!(out, "Cleared.")?;
                }
                Command::Show => {
                    self.sync_input();
                    show(&self.state.view(), &mut out)?;
                }
                Command::Help => writeln!(out, "{HELP}")?,
                Command::Quit => break,
                Command::Unknown(name) => {
                    self.dispatch(ExtractorMsg::NoOp);
                    writeln!(out, "Unknown command :{name}\n{HELP}")?;
                }
            }
            out.flush()?;
        }
        Ok(())
    }

    fn sync_input(&mut self) {
        if std::mem::take(&mut self.unsynced) {
            self.dispatch(ExtractorMsg::InputChanged(self.buffer.clone()));
        }
    }

    fn dispatch(&mut self, msg: ExtractorMsg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update_extractor(state, msg);
            self.state = state;
            inbox.extend(self.runner.run(effects));
        }
    }

    fn render(&mut self, out: &mut impl Write, with_output: bool) -> io::Result<()> {
        let view = self.state.view();
        if !self.state.consume_dirty() {
            return Ok(());
        }
        if let Some(error) = &view.error {
            writeln!(out, "error: {error}")?;
        }
        if let Some(notice) = &view.notice {
            writeln!(out, "{notice}")?;
        }
        if with_output {
            if let Some(output) = &view.output {
                writeln!(out, "{output}")?;
            }
        }
        Ok(())
    }
}

fn show(view: &ExtractorViewModel, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "input: {} bytes", view.input.len())?;
    match &view.output {
        Some(output) => writeln!(out, "{} links:\n{output}", view.link_count),
        None => writeln!(out, "(no output)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_script(script: &str, out_dir: PathBuf) -> String {
        let mut out = Vec::new();
        Session::new(EffectRunner::new(out_dir))
            .run(script.as_bytes(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn commands_are_recognized() {
        assert_eq!(parse_line(":extract"), Line::Command(Command::Extract));
        assert_eq!(parse_line("  :Q "), Line::Command(Command::Quit));
        assert_eq!(
            parse_line(":nope"),
            Line::Command(Command::Unknown("nope".to_string()))
        );
        assert_eq!(
            parse_line("<a href=\"x.pdf\">"),
            Line::Input("<a href=\"x.pdf\">".to_string())
        );
    }

    #[test]
    fn pasted_lines_reach_the_state_once_per_command() {
        let temp = TempDir::new().unwrap();
        let mut session = Session::new(EffectRunner::new(temp.path().to_path_buf()));
        let mut out = Vec::new();
        session
            .run("<p>one</p>\n<p>two</p>\n".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(session.buffer, "<p>one</p>\n<p>two</p>");
        assert!(session.unsynced);
        assert_eq!(session.state.view().input, "");

        session.sync_input();
        assert!(!session.unsynced);
        assert_eq!(session.state.view().input, "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn show_reports_pasted_input() {
        let temp = TempDir::new().unwrap();
        let output = run_script("abc\nde\n:show\n", temp.path().to_path_buf());
        assert!(output.contains("input: 6 bytes"));
    }

    #[test]
    fn extract_prints_notice_and_json() {
        let temp = TempDir::new().unwrap();
        let output = run_script(
            "<a href=\"x.pdf\">x</a>\n<object data=\"r.pdf\"></object>\n:extract\n:quit\n",
            temp.path().to_path_buf(),
        );

        assert!(output.contains("Found 2 PDF links!"));
        assert!(output.contains("[\n  \"x.pdf\",\n  \"r.pdf\"\n]"));
    }

    #[test]
    fn session_survives_errors_and_accepts_new_input() {
        let temp = TempDir::new().unwrap();
        let output = run_script(
            ":extract\n<p>none</p>\n:extract\n:csv\n:clear\n<embed src=\"e.pdf\">\n:extract\n",
            temp.path().to_path_buf(),
        );

        assert!(output.contains("error: Please paste some HTML content"));
        assert!(output.contains("error: No PDF links found in the HTML"));
        assert!(output.contains("error: Error creating CSV file"));
        assert!(output.contains("Found 1 PDF link!"));
        assert!(output.contains("\"e.pdf\""));
    }

    #[test]
    fn csv_command_writes_file_into_out_dir() {
        let temp = TempDir::new().unwrap();
        let output = run_script(
            "<a href=\"a.pdf\"></a>\n:extract\n:csv\n",
            temp.path().to_path_buf(),
        );

        assert!(output.contains("CSV file saved to"));
        let written: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".csv"))
            .collect();
        assert_eq!(written.len(), 1);
        assert!(written[0].starts_with("pdf-links-"));
    }
}
