//! REPL command parsing.

use tagger_core::Taxonomy;

/// Command words offered by tab completion.
pub const COMMAND_WORDS: &[&str] = &[
    "show", "tags", "t", "d", "suggest", "save", "skip", "back", "help", "quit",
];

/// One line of reviewer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Show,
    Tags,
    Toggle(String),
    Define(String),
    Suggest,
    Save,
    Skip,
    Back,
    Help,
    Quit,
    /// A known command without its required argument; holds the usage line.
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parses a trimmed input line. Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "show" | "ls" => ReplCommand::Show,
            "tags" => ReplCommand::Tags,
            "t" | "toggle" if rest.is_empty() => ReplCommand::Usage("t <tag name|number>"),
            "t" | "toggle" => ReplCommand::Toggle(rest.to_string()),
            "d" | "def" | "define" if rest.is_empty() => {
                ReplCommand::Usage("d <tag name|number>")
            }
            "d" | "def" | "define" => ReplCommand::Define(rest.to_string()),
            "suggest" | "g" => ReplCommand::Suggest,
            "save" | "s" | "commit" => ReplCommand::Save,
            "skip" | "next" | "n" => ReplCommand::Skip,
            "back" | "prev" | "b" => ReplCommand::Back,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        };
        Some(command)
    }
}

/// Resolves a tag argument to a taxonomy name.
///
/// Numbers refer to the listing shown by `tags` (1-based). Names match
/// exactly first, then case-insensitively if that is unambiguous.
pub fn resolve_tag(taxonomy: &Taxonomy, arg: &str) -> Option<String> {
    let arg = arg.trim();

    if let Ok(number) = arg.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| taxonomy.display_order().get(index).map(|tag| tag.name.clone()));
    }

    if taxonomy.contains(arg) {
        return Some(arg.to_string());
    }

    let lowered = arg.to_lowercase();
    let mut matches = taxonomy
        .names()
        .filter(|name| name.to_lowercase() == lowered);
    match (matches.next(), matches.next()) {
        (Some(name), None) => Some(name.to_string()),
        _ => None,
    }
}
