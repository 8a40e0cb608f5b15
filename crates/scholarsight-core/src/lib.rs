//! Core of ScholarSight: turns a research paper PDF into a structured
//! breakdown using the Gemini API, and simplifies selected passages.
//!
//! The crate is UI-agnostic. Front-ends (terminal, web, command line) drive a
//! [`SessionState`] and hand the tickets it issues to a [`PaperAssistant`].

pub mod config;
pub mod encode;
pub mod explanation;
pub mod format;
pub mod gemini;
pub mod orchestrator;
pub mod session;

// Re-export for convenience
pub use config::{Config, ConfigError, ConfigFile, Overrides};
pub use encode::{EncodeError, InlineData, PDF_MIME, PaperFile, encode_file};
pub use explanation::{Explanation, Section, SectionBody, response_schema};
pub use format::format_file_size;
pub use gemini::{GeminiClient, GenerateRequest, GenerativeModel, Part, ServiceError};
pub use orchestrator::{AnalysisError, PaperAssistant};
pub use session::{
    AnalysisState, AnalysisTicket, Anchor, EXPLAIN_FAILED_MESSAGE, Generation,
    MIN_SELECTION_CHARS, NO_FILE_MESSAGE, NOT_PDF_MESSAGE, REPHRASE_FAILED_MESSAGE,
    RephraseSession, RephraseTicket, SelectionPopup, SessionState, ValidationError,
};
