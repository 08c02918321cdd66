use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;

use smartlearn_core::{
    Provider, ResolveRequest, TranscriptResolver, TutorClient, VideoSource, WhisperRecognizer,
    format_quiz_readable, get_cache_dir, get_model_dir, get_transcript_path,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => Provider::Gemini,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
        }
    }
}

#[derive(Parser)]
#[command(name = "smartlearn")]
#[command(about = "Resolve a video transcript and generate an AI-powered quiz")]
struct Cli {
    /// Video URL or 11-character YouTube id
    url: String,

    /// Quiz difficulty
    #[arg(short, long, default_value = "medium")]
    difficulty: String,

    /// Learner state hint passed to the quiz generator
    #[arg(short, long, default_value = "engaged")]
    learner_state: String,

    /// AI provider for quiz generation
    #[arg(short, long, default_value = "gemini")]
    provider: CliProvider,

    /// Force re-processing even if a cached transcript exists
    #[arg(short, long)]
    force: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();

    // Validate API key early
    if let Err(e) = provider.validate_api_key() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    let source = VideoSource::parse(&cli.url)?;

    // Setup cache directory
    let cache_dir = get_cache_dir(source.cache_key());
    fs::create_dir_all(&cache_dir).await?;

    println!(
        "\n{}  {}\n",
        style("smartlearn").cyan().bold(),
        style("Quiz Generator").dim()
    );

    // Step 1: Resolve transcript (check disk cache)
    let transcript_path = get_transcript_path(&cache_dir);
    let transcript = if !cli.force && transcript_path.exists() {
        let transcript = fs::read_to_string(&transcript_path).await?;
        println!(
            "{} Transcript resolved: {} chars {}",
            style("✓").green().bold(),
            transcript.len(),
            style("(cached)").dim()
        );
        transcript
    } else {
        let spinner = create_spinner("Resolving transcript...");
        let model_path = std::env::var("WHISPER_MODEL")
            .map(Into::into)
            .unwrap_or_else(|_| get_model_dir().join("ggml-base.en.bin"));
        let recognizer = Arc::new(WhisperRecognizer::new(model_path));
        let resolver = TranscriptResolver::with_default_strategies(recognizer);

        let request = ResolveRequest::new(source).with_refresh(cli.force);
        let transcript = resolver.resolve(&request).await?;
        fs::write(&transcript_path, &transcript).await?;
        spinner.finish_with_message(format!(
            "{} Transcript resolved: {} chars",
            style("✓").green().bold(),
            transcript.len()
        ));
        transcript
    };

    // Step 2: Generate quiz
    let spinner = create_spinner(&format!("Generating quiz with {}...", provider.name()));
    let tutor = TutorClient::new(provider);
    let questions = tutor
        .generate_quiz(&transcript, &cli.learner_state, &cli.difficulty)
        .await?;
    spinner.finish_with_message(format!(
        "{} Quiz generated: {} questions",
        style("✓").green().bold(),
        questions.len()
    ));

    println!("\n{}", style("─".repeat(60)).dim());
    println!("{}", format_quiz_readable(&questions));

    Ok(())
}
