//! Spinner that follows the analyzer's published state.

use bookscan_core::{AnalysisState, Stage};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A running spinner and the task feeding it stage updates.
pub struct Spinner {
    bar: ProgressBar,
    task: JoinHandle<()>,
}

impl Spinner {
    /// Start a spinner on stderr, or a hidden one when stderr is not a terminal.
    pub fn start(mut updates: watch::Receiver<AnalysisState>) -> Self {
        let bar = if console::Term::stderr().is_term() {
            create_spinner()
        } else {
            ProgressBar::hidden()
        };

        let task = tokio::spawn({
            let bar = bar.clone();
            async move {
                while updates.changed().await.is_ok() {
                    let state = updates.borrow_and_update().clone();
                    if state.status.is_terminal() {
                        break;
                    }
                    if let Some(stage) = state.stage {
                        bar.set_message(stage_message(stage));
                    }
                }
            }
        });

        Self { bar, task }
    }

    /// Stop updating and remove the spinner line.
    pub fn finish(self) {
        self.task.abort();
        self.bar.finish_and_clear();
    }
}

fn create_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.set_message("starting...");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn stage_message(stage: Stage) -> &'static str {
    match stage {
        Stage::ImagePreparation => "preparing image...",
        Stage::Extraction => "reading the cover...",
        Stage::CatalogSearch => "searching the catalog...",
        Stage::SummaryGeneration => "writing the summary...",
    }
}
