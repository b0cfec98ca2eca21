//! Interactive prompting.
//!
//! Every question the tools ask goes through the [`Console`] trait so the
//! command flows can be driven by a terminal or by a scripted double.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use crate::constants::dates::INPUT_DATE_FORMAT;
use crate::error::{Error, Result};

/// Source of interactive answers and sink for user-facing lines.
pub trait Console {
    /// Print one line to the user.
    fn show(&mut self, line: &str) -> Result<()>;

    /// Ask a question and return the trimmed answer.
    ///
    /// Fails with [`Error::Input`] once no more input is available.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Present a numbered list and return the zero-based index picked.
    ///
    /// Invalid answers are reported and the question is asked again.
    fn choose(&mut self, title: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            return Err(Error::Msg(format!("Nothing to choose from for: {title}")));
        }

        self.show(title)?;
        for (i, option) in options.iter().enumerate() {
            self.show(&format!("{}. {option}", i + 1))?;
        }

        loop {
            let answer = self.ask("Enter the number of your choice: ")?;
            match parse_choice(&answer, options.len()) {
                Some(index) => return Ok(index),
                None => self.show("Invalid choice. Please enter a number from the list.")?,
            }
        }
    }
}

/// Parse a one-based menu answer into a zero-based index.
fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let n: usize = answer.trim().parse().ok()?;
    n.checked_sub(1).filter(|&i| i < len)
}

/// Ask for a `YYYY-MM-DD` date until a valid one is entered.
pub fn ask_date(console: &mut dyn Console, question: &str) -> Result<NaiveDate> {
    loop {
        let answer = console.ask(question)?;
        match NaiveDate::parse_from_str(answer.trim(), INPUT_DATE_FORMAT) {
            Ok(date) => return Ok(date),
            Err(_) => console.show("Invalid date. Please use the YYYY-MM-DD format.")?,
        }
    }
}

/// Console backed by a reader and a writer, usually stdin and stdout.
pub struct TerminalConsole<R, W> {
    input: R,
    output: W,
}

impl TerminalConsole<io::StdinLock<'static>, io::Stdout> {
    /// Console on the process's standard streams.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    /// Wrap an arbitrary reader and writer.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn show(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Input("input closed before an answer was given".into()));
        }
        Ok(line.trim().to_string())
    }
}

/// Console that replays canned answers and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    /// Create a console that will answer with `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Lines shown so far.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn show(&mut self, line: &str) -> Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.transcript.push(question.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or_else(|| Error::Input(format!("no scripted answer for: {question}")))
    }
}
