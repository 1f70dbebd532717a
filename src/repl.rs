//! Line-oriented live mode. Each input line is one state change; every
//! change prints the re-rendered result.

use std::io::{self, BufRead, Write};

use crate::render::Format;
use crate::session::{Event, Session};

const HELP: &str = "\
commands:
  :term TEXT       set the search term (empty clears it)
  :text TEXT       replace the source text
  :append TEXT     add a new line of source text
  :case            toggle case sensitivity
  :case on|off     set case sensitivity
  :format F        html | ansi | marked | json
  :show            print current state
  :help            this message
  :q               quit
any other line replaces the source text";

enum Command<'a> {
    Event(Event),
    Append(&'a str),
    Format(Format),
    Show,
    Help,
    Quit,
}

/// Run the interactive loop until `:q` or end of input.
pub fn run(session: &mut Session, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
    writeln!(out, "highlighter: type text, :term to search, :help for commands")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        let command = match parse(line) {
            Ok(c) => c,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Show => writeln!(
                out,
                "text: {:?}\nterm: {:?}\ncase sensitive: {}\nformat: {}",
                session.source(),
                session.term(),
                session.case_sensitive(),
                session.format()
            )?,
            Command::Format(f) => {
                session.set_format(f);
                writeln!(out, "{}", session.render())?;
            }
            Command::Append(text) => {
                let mut chunk = String::with_capacity(text.len() + 1);
                if !session.source().is_empty() {
                    chunk.push('\n');
                }
                chunk.push_str(text);
                writeln!(out, "{}", session.append_source(&chunk))?;
            }
            Command::Event(event) => writeln!(out, "{}", session.handle(event))?,
        }
        out.flush()?;
    }

    Ok(())
}

fn parse(line: &str) -> Result<Command<'_>, String> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Event(Event::SetSource(line.to_string())));
    };

    let (name, arg) = match rest.split_once(' ') {
        Some((name, arg)) => (name, Some(arg)),
        None => (rest, None),
    };

    match (name, arg) {
        ("q" | "quit" | "exit", _) => Ok(Command::Quit),
        ("help" | "h", _) => Ok(Command::Help),
        ("show", _) => Ok(Command::Show),
        ("term", arg) => Ok(Command::Event(Event::SetTerm(arg.unwrap_or("").to_string()))),
        ("text", arg) => Ok(Command::Event(Event::SetSource(arg.unwrap_or("").to_string()))),
        ("append", arg) => Ok(Command::Append(arg.unwrap_or(""))),
        ("case", None) => Ok(Command::Event(Event::ToggleCaseSensitive)),
        ("case", Some(arg)) => match arg.trim() {
            "on" | "true" | "yes" => Ok(Command::Event(Event::SetCaseSensitive(true))),
            "off" | "false" | "no" => Ok(Command::Event(Event::SetCaseSensitive(false))),
            other => Err(format!("expected :case on|off, got {other:?}")),
        },
        ("format", Some(arg)) => arg.parse().map(Command::Format),
        ("format", None) => Err("usage: :format html|ansi|marked|json".into()),
        (other, _) => Err(format!("unknown command :{other} (try :help)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Style;

    fn drive(script: &str) -> (Session, Vec<String>) {
        let mut session = Session::new(Format::Html, Style::default());
        let mut out = Vec::new();
        run(&mut session, script.as_bytes(), &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect();
        (session, lines)
    }

    #[test]
    fn every_change_re_renders() {
        let (_, lines) = drive("hello world\n:term o\n:case\n:term O\n");
        assert_eq!(
            lines,
            [
                "hello world",
                "hell<mark>o</mark> w<mark>o</mark>rld",
                "hell<mark>o</mark> w<mark>o</mark>rld",
                "hello world",
            ]
        );
    }

    #[test]
    fn case_toggles_repeatedly() {
        let (session, _) = drive(":case\n:case\n:case\n");
        assert!(session.case_sensitive());
        let (session, _) = drive(":case on\n:case off\n");
        assert!(!session.case_sensitive());
    }

    #[test]
    fn quit_stops_reading() {
        let (session, lines) = drive("first\n:q\nsecond\n");
        assert_eq!(session.source(), "first");
        assert_eq!(lines, ["first"]);
    }

    #[test]
    fn append_builds_multiline_source() {
        let (session, _) = drive(":append one\n:append two\n");
        assert_eq!(session.source(), "one\ntwo");
    }

    #[test]
    fn term_preserves_spaces() {
        let (session, _) = drive(":term  a b \n");
        assert_eq!(session.term(), " a b ");
    }

    #[test]
    fn bad_commands_report_and_continue() {
        let (session, lines) = drive(":nope\n:case maybe\n:format xml\nok\n");
        assert!(lines[0].contains("unknown command"));
        assert!(lines[1].contains(":case on|off"));
        assert!(lines[2].contains("unknown format"));
        assert_eq!(lines[3], "ok");
        assert_eq!(session.source(), "ok");
    }

    #[test]
    fn format_switch_re_renders() {
        let (_, lines) = drive("ab\n:term b\n:format marked\n");
        assert_eq!(lines[2], "a**b**");
    }
}
