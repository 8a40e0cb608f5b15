//! Interactive session state shared by the front-ends.
//!
//! The main analysis flow moves `Idle -> Loading -> {Success, Error}`. The
//! rephrase flow is independent: a modal opens in a loading state and then
//! shows a result or an error until it is closed. State only changes through
//! the methods below; async work is started by the caller with the ticket a
//! transition hands out and reported back with the ticket's [`Generation`].
//! Completions for a superseded generation are dropped.

use thiserror::Error;

use crate::encode::PaperFile;
use crate::explanation::Explanation;
use crate::orchestrator::AnalysisError;

/// Selections must be at least this many characters (after trimming).
pub const MIN_SELECTION_CHARS: usize = 16;

pub const NO_FILE_MESSAGE: &str = "Please select a PDF file to analyze.";
pub const NOT_PDF_MESSAGE: &str = "Please upload a valid PDF file.";
pub const EXPLAIN_FAILED_MESSAGE: &str = "An error occurred while explaining the paper. The PDF might be corrupted, protected, or an issue with the API. Please try again.";
pub const REPHRASE_FAILED_MESSAGE: &str = "Failed to simplify the selected text. Please try again.";

/// A user action rejected locally, before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a PDF file to analyze.")]
    NoFile,
    #[error("Please upload a valid PDF file.")]
    NotPdf { mime_type: String },
    #[error("An analysis is already running.")]
    Busy,
}

/// Main display state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Success(Explanation),
    Error(String),
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn explanation(&self) -> Option<&Explanation> {
        match self {
            Self::Success(e) => Some(e),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Identifies one request. Each new request of a flow gets a fresh value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Where a selection popup is drawn, in the front-end's own coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub x: u16,
    pub y: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPopup {
    pub anchor: Anchor,
    pub text: String,
}

/// State of the rephrase modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RephraseSession {
    pub original_text: String,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<String>,
    generation: Generation,
}

/// Work to run for a submitted analysis.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub generation: Generation,
    pub file: PaperFile,
}

/// Work to run for a requested rephrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RephraseTicket {
    pub generation: Generation,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct SessionState {
    file: Option<PaperFile>,
    analysis: AnalysisState,
    analysis_generation: Generation,
    popup: Option<SelectionPopup>,
    rephrase: Option<RephraseSession>,
    rephrase_generation: Generation,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&PaperFile> {
        self.file.as_ref()
    }

    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    pub fn popup(&self) -> Option<&SelectionPopup> {
        self.popup.as_ref()
    }

    pub fn rephrase(&self) -> Option<&RephraseSession> {
        self.rephrase.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.analysis.is_loading()
    }

    /// Accept a picked or dropped file. Only PDFs are accepted; a rejected
    /// file leaves the state untouched.
    pub fn set_file(&mut self, file: PaperFile) -> Result<(), ValidationError> {
        if self.analysis.is_loading() {
            return Err(ValidationError::Busy);
        }
        if !file.is_pdf() {
            return Err(ValidationError::NotPdf {
                mime_type: file.mime_type().to_string(),
            });
        }
        self.file = Some(file);
        Ok(())
    }

    /// Remove the selected file. Not allowed while an analysis is running.
    pub fn clear_file(&mut self) -> bool {
        if self.analysis.is_loading() || self.file.is_none() {
            return false;
        }
        self.file = None;
        true
    }

    /// Start an analysis of the selected file.
    ///
    /// Without a file the validation message becomes the displayed error and
    /// no ticket is issued. Otherwise any previous result or error is cleared
    /// and the state enters `Loading`.
    pub fn submit(&mut self) -> Result<AnalysisTicket, ValidationError> {
        if self.analysis.is_loading() {
            return Err(ValidationError::Busy);
        }
        let Some(file) = self.file.clone() else {
            self.analysis = AnalysisState::Error(NO_FILE_MESSAGE.to_string());
            self.popup = None;
            return Err(ValidationError::NoFile);
        };

        self.analysis_generation = self.analysis_generation.next();
        self.analysis = AnalysisState::Loading;
        self.popup = None;
        Ok(AnalysisTicket {
            generation: self.analysis_generation,
            file,
        })
    }

    /// Record the outcome of an analysis. Returns false if it was stale.
    pub fn finish_analysis(
        &mut self,
        generation: Generation,
        result: Result<Explanation, AnalysisError>,
    ) -> bool {
        if generation != self.analysis_generation || !self.analysis.is_loading() {
            log::debug!("dropping stale analysis result {generation:?}");
            return false;
        }
        self.analysis = match result {
            Ok(explanation) => AnalysisState::Success(explanation),
            Err(_) => AnalysisState::Error(EXPLAIN_FAILED_MESSAGE.to_string()),
        };
        true
    }

    /// Update the popup for the current text selection. The popup is shown
    /// only over a displayed breakdown, and only when the trimmed selection
    /// is at least [`MIN_SELECTION_CHARS`] long; anything else clears it.
    pub fn select_text(&mut self, text: &str, anchor: Anchor) -> bool {
        let text = text.trim();
        self.popup = if self.analysis.explanation().is_some()
            && text.chars().count() >= MIN_SELECTION_CHARS
        {
            Some(SelectionPopup {
                anchor,
                text: text.to_string(),
            })
        } else {
            None
        };
        self.popup.is_some()
    }

    pub fn dismiss_popup(&mut self) {
        self.popup = None;
    }

    /// Rephrase the text under the popup. Clears the popup.
    pub fn confirm_rephrase(&mut self) -> Option<RephraseTicket> {
        let popup = self.popup.take()?;
        Some(self.request_rephrase(popup.text))
    }

    /// Open the modal for `text` in its loading state.
    pub fn request_rephrase(&mut self, text: impl Into<String>) -> RephraseTicket {
        let text = text.into();
        self.rephrase_generation = self.rephrase_generation.next();
        self.rephrase = Some(RephraseSession {
            original_text: text.clone(),
            loading: true,
            error: None,
            result: None,
            generation: self.rephrase_generation,
        });
        RephraseTicket {
            generation: self.rephrase_generation,
            text,
        }
    }

    /// Record the outcome of a rephrase. Results for a closed or replaced
    /// modal are dropped.
    pub fn finish_rephrase(
        &mut self,
        generation: Generation,
        result: Result<String, AnalysisError>,
    ) -> bool {
        let Some(session) = self.rephrase.as_mut() else {
            log::debug!("dropping rephrase result {generation:?}: modal closed");
            return false;
        };
        if session.generation != generation {
            log::debug!("dropping stale rephrase result {generation:?}");
            return false;
        }
        session.loading = false;
        match result {
            Ok(text) => session.result = Some(text),
            Err(_) => session.error = Some(REPHRASE_FAILED_MESSAGE.to_string()),
        }
        true
    }

    /// Close the modal. An in-flight request keeps running; its result is
    /// dropped when it arrives.
    pub fn close_rephrase(&mut self) {
        self.rephrase = None;
    }
}
