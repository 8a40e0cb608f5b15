use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use scholarsight_core::{
    AnalysisState, Config, GeminiClient, Overrides, PaperAssistant, PaperFile,
    REPHRASE_FAILED_MESSAGE, SessionState, format_file_size,
};

mod render;

/// ScholarSight - structured breakdowns of research papers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Gemini API key (overrides GEMINI_API_KEY / API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model used for paper analysis
    #[arg(long, global = true)]
    explain_model: Option<String>,

    /// Model used to simplify text
    #[arg(long, global = true)]
    rephrase_model: Option<String>,

    /// Path to a config file (default: <config dir>/scholarsight/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            explain_model: self.explain_model.clone(),
            rephrase_model: self.rephrase_model.clone(),
            endpoint: None,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explain a research paper PDF
    Explain {
        /// Path to the PDF file
        pdf: PathBuf,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a passage in plain language
    Simplify {
        /// Text to simplify (read from stdin when omitted)
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();

    let config = Config::load(cli.overrides(), cli.config.as_deref())?;
    tracing::info!(
        explain_model = %config.explain_model,
        rephrase_model = %config.rephrase_model,
        timeout_secs = config.timeout_secs,
        "resolved configuration"
    );
    let assistant = PaperAssistant::new(GeminiClient::new(&config)?, &config);

    match cli.command {
        Command::Explain { pdf, json } => explain(&assistant, pdf, json, color).await,
        Command::Simplify { text } => simplify(&assistant, text, color).await,
    }
}

async fn explain(
    assistant: &PaperAssistant<GeminiClient>,
    pdf: PathBuf,
    json: bool,
    color: bool,
) -> anyhow::Result<()> {
    let file = PaperFile::from_path(&pdf)
        .with_context(|| format!("PDF file not found: {}", pdf.display()))?;

    let mut session = SessionState::new();
    session.set_file(file)?;
    let ticket = session.submit()?;
    tracing::debug!(
        file = %ticket.file.name(),
        bytes = ticket.file.size(),
        generation = ?ticket.generation,
        "submitting paper"
    );

    let spinner = spinner(format!(
        "Analyzing {} ({})...",
        ticket.file.name(),
        format_file_size(ticket.file.size())
    ));
    let result = assistant.explain_paper(&ticket.file).await;
    spinner.finish_and_clear();
    if let Err(e) = &result {
        tracing::warn!("analysis failed: {e}");
    }
    session.finish_analysis(ticket.generation, result);

    match session.analysis() {
        AnalysisState::Success(explanation) if json => {
            println!("{}", serde_json::to_string_pretty(explanation)?);
        }
        AnalysisState::Success(explanation) => {
            print!("{}", render::explanation(explanation, color));
        }
        AnalysisState::Error(message) => anyhow::bail!("{message}"),
        AnalysisState::Idle | AnalysisState::Loading => {
            anyhow::bail!("analysis did not complete")
        }
    }
    Ok(())
}

async fn simplify(
    assistant: &PaperAssistant<GeminiClient>,
    text: Option<String>,
    color: bool,
) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            buf
        }
    };
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("No text to simplify.");
    }

    let spinner = spinner("Simplifying...".to_string());
    let result = assistant.rephrase_text(text).await;
    spinner.finish_and_clear();

    let simplified = result.map_err(|e| {
        tracing::warn!("simplify failed: {e}");
        anyhow::anyhow!(REPHRASE_FAILED_MESSAGE)
    })?;
    print!("{}", render::simplified(&simplified, color));
    Ok(())
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal.
fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "scholarsight",
            "simplify",
            "some text",
            "--api-key",
            "k",
            "--rephrase-model",
            "gemini-2.5-pro",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.api_key.as_deref(), Some("k"));
        assert_eq!(overrides.rephrase_model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(overrides.explain_model, None);
        assert!(matches!(cli.command, Command::Simplify { text: Some(ref t) } if t == "some text"));
    }
}
