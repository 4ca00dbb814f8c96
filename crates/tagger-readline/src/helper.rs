use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::COMMAND_WORDS;

/// Rustyline helper: completes command words, and tag names after `t ` or
/// `d `.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
    tag_names: Vec<String>,
}

impl CliHelper {
    pub fn new(tag_names: Vec<String>) -> Self {
        Self {
            commands: COMMAND_WORDS.iter().map(|word| word.to_string()).collect(),
            tag_names,
        }
    }

    fn tag_argument_start(line: &str) -> Option<usize> {
        ["t ", "d ", "toggle ", "def "]
            .iter()
            .find(|prefix| line.starts_with(*prefix))
            .map(|prefix| prefix.len())
    }

    fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        if let Some(start) = Self::tag_argument_start(line) {
            let partial = line[start..].to_lowercase();
            let names = self
                .tag_names
                .iter()
                .filter(|name| name.to_lowercase().starts_with(&partial))
                .cloned()
                .collect();
            return (start, names);
        }

        if line.contains(' ') {
            return (0, Vec::new());
        }

        let commands = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .cloned()
            .collect();
        (0, commands)
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Borrowed(line)
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let line = &line[..pos];
        let (start, matches) = self.candidates(line);
        let typed = line.len() - start;
        // Hint only when the typed prefix has a single continuation
        match matches.as_slice() {
            [only] if only.len() > typed && typed > 0 => only.get(typed..).map(str::to_string),
            _ => None,
        }
    }
}

impl Validator for CliHelper {}
