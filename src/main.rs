use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use void_whisper::api::ApiServer;
use void_whisper::{ChatCompletions, Config, Persona, SpeechToText, TextToSpeech, TurnEngine};

/// Void Whisper - voice and text chat gateway with spoken replies
#[derive(Parser)]
#[command(name = "void-whisper", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "VOID_PORT", default_value = "8808")]
    port: u16,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Credentials may live in a .env file next to the binary
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,void_whisper=info",
        1 => "info,void_whisper=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Missing credential halts here, before any turn is accepted
    let config = Config::from_env()?;
    let api_key = config.api_key.expose_secret().to_string();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    let transcriber = SpeechToText::new(
        client.clone(),
        config.api_base.clone(),
        api_key.clone(),
        config.stt.model.clone(),
    )?;
    let completer = ChatCompletions::new(
        client.clone(),
        config.api_base.clone(),
        api_key.clone(),
        &config.llm,
    )?;
    let synthesizer = TextToSpeech::new(
        client,
        config.api_base.clone(),
        api_key,
        config.tts.model.clone(),
        config.tts.voice.clone(),
    )?;

    let persona = Persona::void_whisper();
    tracing::info!(
        persona = %persona.name,
        llm_model = %config.llm.model,
        stt_model = %config.stt.model,
        tts_model = %config.tts.model,
        "starting gateway"
    );

    let engine = TurnEngine::new(
        Arc::new(transcriber),
        Arc::new(completer),
        Arc::new(synthesizer),
        persona,
    );

    ApiServer::new(engine, cli.port).run().await?;

    Ok(())
}
