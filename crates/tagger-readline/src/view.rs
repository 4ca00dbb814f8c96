//! Terminal rendering of the review session.
//!
//! Everything here only reads the session; state changes go through the
//! session's own operations in `main.rs`.

use colored::Colorize;
use tagger_core::{ReviewSession, SuggestionOutcome, Tag};

pub fn print_banner() {
    println!("{}", "=== Abstract Tagger ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'help' for commands, 'tags' to list the vocabulary, or 'quit' to exit."
            .bright_black()
    );
    println!();
}

pub fn print_help() {
    let rows = [
        ("show", "redisplay the current item"),
        ("tags", "list tags by category with their numbers"),
        ("t <name|n>", "toggle a tag in the current selection"),
        ("d <name|n>", "show a tag's definition"),
        ("suggest", "ask Gemini to propose tags for this abstract"),
        ("save", "save the selection (+ reviewed) and move on"),
        ("skip", "move on without saving"),
        ("back", "go to the previous item"),
        ("quit", "leave (saved work is already on disk)"),
    ];
    for (command, description) in rows {
        println!("  {:<12} {}", command.bright_cyan(), description);
    }
}

/// Renders the item under the cursor, or the completion message.
pub fn print_current(session: &ReviewSession) {
    let Some(item) = session.current() else {
        print_finished(session);
        return;
    };

    println!("{}", session.progress().to_string().bright_black());
    let title = if item.title.is_empty() {
        "(untitled)"
    } else {
        item.title.as_str()
    };
    println!("{} {}", title.bold(), format!("[{}]", item.key).bright_black());
    println!();
    for line in item.abstract_text.lines() {
        println!("{}", line);
    }
    println!();

    let source_tags = item.source_tag_names();
    if !source_tags.is_empty() {
        println!(
            "{} {}",
            "Library tags:".bright_black(),
            source_tags.join(", ").bright_black()
        );
    }
    print_selection(session);
}

pub fn print_selection(session: &ReviewSession) {
    let selected = session.pending_ordered();
    if selected.is_empty() {
        println!("{} {}", "Selected:".yellow(), "(none)".bright_black());
    } else {
        println!("{} {}", "Selected:".yellow(), selected.join(", ").green());
    }
}

/// Lists the taxonomy grouped by category, numbering tags in listing order.
pub fn print_tags(session: &ReviewSession) {
    let mut number = 0;
    for (category, tags) in session.taxonomy().by_category() {
        let heading = if category.is_empty() {
            "(uncategorized)"
        } else {
            category
        };
        println!("{}", heading.bright_magenta().bold());
        for tag in tags {
            number += 1;
            let marker = if session.is_selected(&tag.name) {
                "[x]".green()
            } else {
                "[ ]".normal()
            };
            println!("  {:>3}. {} {}", number, marker, tag.name);
        }
    }
}

pub fn print_definition(tag: &Tag) {
    println!(
        "{} {}",
        tag.name.bold(),
        format!("({})", tag.category).bright_black()
    );
    if tag.definition.is_empty() {
        println!("{}", "No definition recorded.".bright_black());
    } else {
        println!("{}", tag.definition);
    }
}

pub fn print_suggestion_outcome(outcome: &SuggestionOutcome) {
    match outcome {
        SuggestionOutcome::Applied { selected, ignored } => {
            if selected.is_empty() {
                println!("{}", "No matching tags suggested.".yellow());
            } else {
                println!("{} {}", "Suggested:".bright_blue(), selected.join(", "));
            }
            if !ignored.is_empty() {
                println!(
                    "{} {}",
                    "Ignored (not in vocabulary):".bright_black(),
                    ignored.join(", ").bright_black()
                );
            }
        }
        SuggestionOutcome::Failed(message) => {
            println!("{}", format!("No suggestion available: {}", message).red());
        }
        SuggestionOutcome::Stale => {
            println!(
                "{}",
                "Suggestion arrived for a different item and was discarded.".bright_black()
            );
        }
    }
}

fn print_finished(session: &ReviewSession) {
    let progress = session.progress();
    println!(
        "{}",
        "All items have been processed.".bright_green().bold()
    );
    println!(
        "{}",
        format!(
            "{} of {} items reviewed. Type 'quit' to exit.",
            progress.reviewed, progress.total
        )
        .bright_black()
    );
}
