use scholarsight_core::{AnalysisError, Explanation, Generation};

/// Events flowing from backend tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// An analysis request resolved.
    AnalysisFinished {
        generation: Generation,
        result: Result<Explanation, AnalysisError>,
    },
    /// A rephrase request resolved.
    RephraseFinished {
        generation: Generation,
        result: Result<String, AnalysisError>,
    },
}
