//! Request orchestration for paper analysis and passage simplification.
//!
//! Failures of any kind (file read, network, service, JSON) are logged in
//! full and surfaced to callers as one generic [`AnalysisError`] per action.

use thiserror::Error;

use crate::config::{Config, DEFAULT_EXPLAIN_MODEL, DEFAULT_REPHRASE_MODEL};
use crate::encode::{EncodeError, PaperFile, encode_file};
use crate::explanation::{Explanation, response_schema};
use crate::gemini::{GenerateRequest, GenerativeModel, Part, ServiceError};

pub const EXPLAIN_PROMPT: &str = "Please analyze the following computer science research paper PDF and provide a structured breakdown. Explain any algorithms mentioned in detail. Focus on clarifying the complex concepts for someone building their own research paper.";

pub const EXPLAIN_SYSTEM_INSTRUCTION: &str = "You are an expert research assistant specializing in computer science. Your task is to dissect academic papers and present the information in a clear, structured JSON format, making it easy for other researchers to understand and cite the work.";

pub const EXPLAIN_TEMPERATURE: f32 = 0.5;

pub const REPHRASE_SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that simplifies complex topics.";

pub const REPHRASE_TEMPERATURE: f32 = 0.7;

/// Generic failure reported to callers. The underlying cause is only logged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Failed to get explanation from the AI model.")]
    ExplanationFailed,
    #[error("Failed to get rephrased text from the AI model.")]
    RephraseFailed,
}

#[derive(Error, Debug)]
enum Failure {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("response did not match the breakdown schema: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("nothing to rephrase")]
    EmptyInput,
}

/// Prompt asking for a plain-language rewrite of `text`.
pub fn rephrase_prompt(text: &str) -> String {
    format!(
        "Please rephrase and elaborate on the following text in simple, easy-to-understand terms for a non-expert. Break down any jargon and use analogies if helpful. \n\nTEXT TO EXPLAIN:\n\"\"\"\n{text}\n\"\"\""
    )
}

/// Runs the two user-facing actions against a [`GenerativeModel`].
pub struct PaperAssistant<M> {
    model: M,
    explain_model: String,
    rephrase_model: String,
}

impl<M: GenerativeModel> PaperAssistant<M> {
    /// Use the model names from `config`.
    pub fn new(model: M, config: &Config) -> Self {
        Self {
            model,
            explain_model: config.explain_model.clone(),
            rephrase_model: config.rephrase_model.clone(),
        }
    }

    /// Use the default model names.
    pub fn with_default_models(model: M) -> Self {
        Self {
            model,
            explain_model: DEFAULT_EXPLAIN_MODEL.to_string(),
            rephrase_model: DEFAULT_REPHRASE_MODEL.to_string(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Produce a structured breakdown of a paper.
    pub async fn explain_paper(&self, file: &PaperFile) -> Result<Explanation, AnalysisError> {
        log::info!(
            "explaining {} ({} bytes) with {}",
            file.name(),
            file.size(),
            self.explain_model
        );
        self.try_explain(file).await.map_err(|e| {
            log::error!("Error calling Gemini API for {}: {e}", file.name());
            AnalysisError::ExplanationFailed
        })
    }

    async fn try_explain(&self, file: &PaperFile) -> Result<Explanation, Failure> {
        let attachment = encode_file(file).await?;
        let request = GenerateRequest {
            model: self.explain_model.clone(),
            parts: vec![
                Part::Text(EXPLAIN_PROMPT.to_string()),
                Part::InlineData(attachment),
            ],
            system_instruction: Some(EXPLAIN_SYSTEM_INSTRUCTION.to_string()),
            temperature: EXPLAIN_TEMPERATURE,
            response_schema: Some(response_schema()),
        };

        let text = self.model.generate_content(request).await?;
        Ok(Explanation::parse(&text)?)
    }

    /// Rewrite a passage in plain language.
    pub async fn rephrase_text(&self, text: &str) -> Result<String, AnalysisError> {
        self.try_rephrase(text).await.map_err(|e| {
            log::error!("Error calling Gemini API for rephrasing: {e}");
            AnalysisError::RephraseFailed
        })
    }

    async fn try_rephrase(&self, text: &str) -> Result<String, Failure> {
        if text.trim().is_empty() {
            return Err(Failure::EmptyInput);
        }
        let request = GenerateRequest {
            model: self.rephrase_model.clone(),
            parts: vec![Part::Text(rephrase_prompt(text))],
            system_instruction: Some(REPHRASE_SYSTEM_INSTRUCTION.to_string()),
            temperature: REPHRASE_TEMPERATURE,
            response_schema: None,
        };
        Ok(self.model.generate_content(request).await?)
    }
}
