use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use tagger_core::{
    ReviewSession, SuggestionOutcome, SuggestionProvider, TaggerError, Taxonomy,
    TaxonomyRepository,
};
use tagger_infrastructure::{ConfigService, CsvTaxonomyRepository, JsonItemRepository};
use tagger_interaction::GeminiSuggestionProvider;

mod command;
mod helper;
mod view;

use command::{ReplCommand, resolve_tag};
use helper::CliHelper;

const LOG_FILE_NAME: &str = "review.log";

enum Flow {
    Continue,
    Quit,
}

/// Everything the REPL needs between commands.
struct ReviewApp {
    session: ReviewSession,
    taxonomy: Arc<Taxonomy>,
    /// The provider, or the reason suggestions are unavailable.
    provider: std::result::Result<Arc<dyn SuggestionProvider>, TaggerError>,
}

impl ReviewApp {
    async fn handle(&mut self, command: ReplCommand) -> Flow {
        match command {
            ReplCommand::Show => view::print_current(&self.session),
            ReplCommand::Tags => view::print_tags(&self.session),
            ReplCommand::Toggle(arg) => self.toggle(&arg),
            ReplCommand::Define(arg) => {
                match resolve_tag(&self.taxonomy, &arg).and_then(|name| self.taxonomy.get(&name)) {
                    Some(tag) => view::print_definition(tag),
                    None => println!("{}", format!("Unknown tag: {}", arg).red()),
                }
            }
            ReplCommand::Suggest => self.suggest().await,
            ReplCommand::Save => self.save(),
            ReplCommand::Skip => {
                self.session.skip();
                view::print_current(&self.session);
            }
            ReplCommand::Back => {
                if self.session.is_exhausted() {
                    println!("{}", "The review is finished; there is nothing to go back to.".yellow());
                } else if self.session.cursor() == 0 {
                    println!("{}", "Already at the first item.".yellow());
                } else {
                    self.session.retreat();
                    view::print_current(&self.session);
                }
            }
            ReplCommand::Help => view::print_help(),
            ReplCommand::Quit => return Flow::Quit,
            ReplCommand::Usage(usage) => println!("{}", format!("Usage: {}", usage).yellow()),
            ReplCommand::Unknown(line) => {
                println!("{}", format!("Unknown command: {} (try 'help')", line).bright_black());
            }
        }
        Flow::Continue
    }

    fn toggle(&mut self, arg: &str) {
        if self.session.is_exhausted() {
            view::print_current(&self.session);
            return;
        }

        // Unresolvable input goes through as-is so the session reports it
        let name = resolve_tag(&self.taxonomy, arg).unwrap_or_else(|| arg.to_string());
        match self.session.toggle(&name) {
            Ok(true) => println!("{}", format!("+ {}", name).green()),
            Ok(false) => println!("{}", format!("- {}", name).yellow()),
            Err(err) => {
                if err.is_invalid_tag() {
                    tracing::warn!(tag = %name, "Rejected toggle of unknown tag");
                } else {
                    tracing::error!(tag = %name, error = %err, "Toggle failed");
                }
                println!("{}", err.to_string().red());
                return;
            }
        }
        view::print_selection(&self.session);
    }

    fn save(&mut self) {
        if self.session.is_exhausted() {
            view::print_current(&self.session);
            return;
        }

        match self.session.commit() {
            Ok(()) => {
                println!("{}", "Saved.".bright_green());
                println!();
                view::print_current(&self.session);
            }
            Err(err) => {
                println!("{}", format!("Save failed: {}", err).red());
                println!(
                    "{}",
                    "Your selection is kept; type 'save' to try again.".yellow()
                );
            }
        }
    }

    async fn suggest(&mut self) {
        let provider = match &self.provider {
            Ok(provider) => Arc::clone(provider),
            Err(err) => {
                println!("{}", err.to_string().yellow());
                return;
            }
        };

        let request = match self.session.begin_suggestion() {
            Ok(Some(request)) => request,
            Ok(None) => {
                view::print_current(&self.session);
                return;
            }
            Err(err) => {
                println!("{}", err.to_string().yellow());
                return;
            }
        };

        println!("{}", format!("Asking {}... (Ctrl-C to cancel)", provider.name()).bright_black());
        // tokio keeps its SIGINT handler installed after the first ctrl_c()
        // call, so from here on Ctrl-C outside the prompt no longer kills the
        // process; quit/exit/Ctrl-D remain the way out.
        let result = run_cancellable(
            provider.suggest(request.abstract_text(), &self.taxonomy),
            tokio::signal::ctrl_c(),
        )
        .await;

        match result {
            Some(result) => {
                let outcome = self.session.complete_suggestion(request, result);
                view::print_suggestion_outcome(&outcome);
                if matches!(outcome, SuggestionOutcome::Applied { .. }) {
                    view::print_selection(&self.session);
                }
            }
            None => {
                self.session.cancel_suggestion(&request);
                println!("{}", "Suggestion cancelled.".yellow());
            }
        }
    }
}

/// Drives `work` to completion unless `cancel` resolves first.
async fn run_cancellable<W, C>(work: W, cancel: C) -> Option<W::Output>
where
    W: Future,
    C: Future,
{
    tokio::select! {
        output = work => Some(output),
        _ = cancel => None,
    }
}

/// Sends log output to `<log_dir>/review.log` so it never interleaves with
/// the prompt. The returned guard must live until exit to flush the writer.
fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Loads configuration, taxonomy and items, then runs the review REPL.
///
/// Any failure before the first prompt is fatal; after that, errors are
/// reported inline and the session continues.
#[tokio::main]
async fn main() -> Result<()> {
    // ===== Startup =====
    let config_service = ConfigService::new();
    if !config_service.path().exists() {
        println!(
            "{}",
            format!(
                "No config file at {}; using defaults (run `tagger init-config` to create one).",
                config_service.path().display()
            )
            .yellow()
        );
    }
    let config = config_service
        .load()
        .context("Failed to load configuration")?;

    let _log_guard = init_logging(&config.paths.log_dir)?;
    tracing::info!(config = %config_service.path().display(), "Starting review");

    let taxonomy = CsvTaxonomyRepository::new(&config.paths.taxonomy)
        .load()
        .with_context(|| {
            format!("Failed to load taxonomy from {}", config.paths.taxonomy.display())
        })?;
    let taxonomy = Arc::new(taxonomy);

    let repository = Arc::new(JsonItemRepository::new(
        &config.paths.items_input,
        &config.paths.items_output,
        config.review.resume,
    ));
    let source = repository.input_path().to_path_buf();
    let output = repository.output_path().to_path_buf();
    let session = ReviewSession::load(repository, Arc::clone(&taxonomy))
        .with_context(|| format!("Failed to load items from {}", source.display()))?;

    let provider = match GeminiSuggestionProvider::from_config(&config.gemini) {
        Ok(provider) => {
            tracing::info!(model = provider.model(), "Suggestions enabled");
            Ok(Arc::new(provider) as Arc<dyn SuggestionProvider>)
        }
        Err(err) => {
            tracing::info!(reason = %err, "Suggestions unavailable");
            Err(err)
        }
    };

    let mut app = ReviewApp {
        session,
        taxonomy: Arc::clone(&taxonomy),
        provider,
    };

    // ===== REPL Setup =====
    let helper = CliHelper::new(taxonomy.names().map(str::to_string).collect());
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    view::print_banner();
    println!(
        "{}",
        format!(
            "Loaded {} items from {} and {} tags.",
            app.session.len(),
            source.display(),
            taxonomy.len()
        )
        .bright_black()
    );
    println!(
        "{}",
        format!("Saving to {}.", output.display()).bright_black()
    );
    println!();
    view::print_current(&app.session);

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let Some(command) = ReplCommand::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());

                if let Flow::Quit = app.handle(command).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    let progress = app.session.progress();
    tracing::info!(reviewed = progress.reviewed, total = progress.total, "Review ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wins_over_pending_work() {
        let (cancel_tx, cancel_rx) = tokio::sync::oneshot::channel::<()>();
        cancel_tx.send(()).unwrap();

        let result = run_cancellable(std::future::pending::<u32>(), cancel_rx).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_finished_work_is_returned() {
        let result = run_cancellable(
            async { vec!["A".to_string()] },
            tokio::time::sleep(Duration::from_secs(60)),
        )
        .await;
        assert_eq!(result, Some(vec!["A".to_string()]));
    }
}
