use std::sync::Arc;

use tokio::sync::mpsc;

use scholarsight_core::{AnalysisTicket, GenerativeModel, PaperAssistant, RephraseTicket};

use crate::tui_event::BackendEvent;

/// Run an analysis on its own task and report the outcome to the TUI.
///
/// Nothing cancels the task; the session drops the result if the ticket has
/// been superseded by the time it arrives.
pub fn spawn_analysis<M: GenerativeModel + 'static>(
    assistant: Arc<PaperAssistant<M>>,
    ticket: AnalysisTicket,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    tokio::spawn(async move {
        let result = assistant.explain_paper(&ticket.file).await;
        let _ = tx.send(BackendEvent::AnalysisFinished {
            generation: ticket.generation,
            result,
        });
    });
}

/// Run a rephrase on its own task and report the outcome to the TUI.
pub fn spawn_rephrase<M: GenerativeModel + 'static>(
    assistant: Arc<PaperAssistant<M>>,
    ticket: RephraseTicket,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    tokio::spawn(async move {
        let result = assistant.rephrase_text(&ticket.text).await;
        let _ = tx.send(BackendEvent::RephraseFinished {
            generation: ticket.generation,
            result,
        });
    });
}
