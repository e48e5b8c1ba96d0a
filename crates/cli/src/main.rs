mod settings;

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use speech_bridge_core::inference::infrastructure::whisper_engine::WhisperEngine;
use speech_bridge_core::session::inference_session::InferenceRequest;
use speech_bridge_core::session::session_logger::{LogSessionLogger, SessionLogger};
use speech_bridge_core::session::session_pool::{SessionPool, TranscriptionRequest};
use speech_bridge_core::session::session_registry::SessionRegistry;
use speech_bridge_core::shared::constants::WHISPER_SAMPLE_RATE;

use settings::Settings;

/// Transcribe raw 16-bit little-endian mono PCM with a whisper model.
#[derive(Parser)]
#[command(name = "speech-bridge")]
struct Cli {
    /// Raw s16le PCM file.
    audio: PathBuf,

    /// Whisper ggml model file (falls back to the settings file).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Sample rate of the input; audio is not resampled.
    #[arg(long, default_value_t = WHISPER_SAMPLE_RATE)]
    sample_rate: u32,

    /// Spoken language code (e.g. "en"); omitted or unknown codes auto-detect.
    #[arg(long)]
    source_lang: Option<String>,

    /// Target language code passed through to the bridge.
    #[arg(long)]
    target_lang: Option<String>,

    /// Ask the engine to translate into English.
    #[arg(long)]
    translate: bool,

    /// Worker threads (0 = all available cores).
    #[arg(long)]
    threads: Option<i32>,

    /// Print the bridge payload verbatim instead of formatted fields.
    #[arg(long)]
    raw: bool,

    /// Settings file (defaults to the per-user config location).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref());

    let model = cli
        .model
        .clone()
        .or_else(|| settings.model_path.clone())
        .ok_or("No model given: pass --model or set model_path in the settings file")?;
    if !cli.audio.exists() {
        return Err(format!("Audio file not found: {}", cli.audio.display()).into());
    }
    let audio = fs::read(&cli.audio)?;

    let logger = Arc::new(LogSessionLogger::new());
    let registry = Arc::new(SessionRegistry::new(
        Arc::new(WhisperEngine::default()),
        logger.clone(),
    ));

    let request = TranscriptionRequest {
        model_path: model,
        sample_rate: cli.sample_rate,
        source_language: cli.source_lang.or(settings.source_language),
        target_language: cli.target_lang.or(settings.target_language),
        translate: cli.translate || settings.translate,
        thread_count: cli.threads.unwrap_or(settings.threads),
    };

    if cli.raw {
        run_raw(&registry, audio, &request)?;
    } else {
        run_formatted(registry, audio, &request)?;
    }

    logger.summary();
    Ok(())
}

fn run_raw(
    registry: &SessionRegistry,
    audio: Vec<u8>,
    request: &TranscriptionRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = registry.init(&request.model_path.to_string_lossy(), request.thread_count);
    if handle.is_null() {
        return Err(format!(
            "Failed to load model: {}",
            request.model_path.display()
        )
        .into());
    }

    let payload = registry.process(
        handle,
        &InferenceRequest {
            audio,
            sample_rate: request.sample_rate,
            source_language: request.source_language.clone(),
            target_language: request.target_language.clone(),
            translate: request.translate,
            thread_override: request.thread_count,
        },
    );
    registry.release(handle);

    println!("{payload}");
    Ok(())
}

fn run_formatted(
    registry: Arc<SessionRegistry>,
    audio: Vec<u8>,
    request: &TranscriptionRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = SessionPool::new(registry);
    let outcome = pool.transcribe(audio, request);
    pool.clear();
    let transcription = outcome?;

    println!("Transcript:  {}", transcription.transcript.trim());
    if let Some(translation) = &transcription.translation {
        println!("Translation: {}", translation.trim());
    }
    match &transcription.detected_language {
        Some(code) => println!("Language:    {code}"),
        None => println!("Language:    (unknown)"),
    }
    Ok(())
}
