//! Voice Navigation Console
//!
//! Drives the voice session controller from a terminal. Utterances and
//! navigation are printed; recognition is fed by typing the transcript.
//!
//! Usage:
//!   cargo run --bin voice-console -- [--preferences PATH] [--verbose] [--enable]
//!
//! Commands:
//!   :voice        toggle voice navigation
//!   :listen       open a recognition session
//!   :stop         cancel the open session
//!   :lang <code>  switch language (en, hi, ta, ml, pa)
//!   :say <text>   speak text in the current language
//!   :state        print the current state
//!   :quit         exit
//! Any other line is delivered as the transcript of the open session.

use anyhow::Context;
use clap::Parser;
use logger_redacted::{init_tracing, LoggerConfig, PiiRedactor};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use voice_navigation_service::locale::{FilePreferenceStore, LocaleCatalog, LocaleCode, LocaleStore};
use voice_navigation_service::providers::console::{ConsoleSynthesizer, LoggingNavigator};
use voice_navigation_service::providers::scripted::ScriptedRecognizer;
use voice_navigation_service::speech::RecognitionOutcome;
use voice_navigation_service::{registry, VoiceConfig, VoiceEvent, VoiceParts};

#[derive(Parser, Debug)]
#[command(name = "voice-console")]
#[command(about = "Drive MediTech voice navigation from the terminal")]
struct Args {
    /// Preference file holding the selected language
    #[arg(long, env = "VOICE_PREFERENCES_PATH")]
    preferences: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    verbose: bool,

    /// Start with voice navigation enabled
    #[arg(long)]
    enable: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut logger_config = LoggerConfig::from_env();
    if args.verbose {
        logger_config = logger_config.with_log_level("debug");
    }
    init_tracing(&logger_config).context("failed to initialise logging")?;

    let mut config = VoiceConfig::from_env().context("invalid voice configuration")?;
    if let Some(path) = args.preferences {
        config.preferences_path = path;
    }
    if args.enable {
        config.voice_enabled = true;
    }

    let catalog = LocaleCatalog::builtin().context("failed to load locale catalog")?;
    let preferences = FilePreferenceStore::new(&config.preferences_path);
    let locale = Arc::new(LocaleStore::open(Arc::new(preferences), Arc::new(catalog)));
    let recognizer = Arc::new(ScriptedRecognizer::new());

    let redactor = PiiRedactor::new(logger_config.redaction());
    let parts = VoiceParts::new(
        locale,
        Arc::new(ConsoleSynthesizer::new()),
        recognizer.clone(),
        Arc::new(LoggingNavigator::new()),
    )
    .with_redactor(redactor.clone());

    let voice = registry::install(parts, config)?;
    info!(
        locale = %voice.get_locale(),
        language = voice.get_locale().english_name(),
        "🎙️ Voice console ready, type :quit to exit"
    );

    tokio::spawn(log_events(voice.subscribe(), redactor));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            ":quit" => break,
            ":voice" => voice.toggle_voice(),
            ":listen" => voice.start_listening(),
            ":stop" => voice.stop_listening(),
            ":state" => println!(
                "state={} locale={} transcript={:?}",
                voice.state(),
                voice.get_locale(),
                voice.transcript()
            ),
            ":lang" => {
                if !voice.select_language(rest.trim()) {
                    let supported: Vec<&str> = LocaleCode::ALL.iter().map(|l| l.code()).collect();
                    println!("Unsupported language, choose one of: {}", supported.join(", "));
                }
            }
            ":say" => {
                voice.speak(rest.trim());
            }
            _ if command.starts_with(':') => println!("Unknown command: {}", command),
            _ => {
                if !recognizer.try_respond(RecognitionOutcome::Transcript(line.to_string())) {
                    println!("Not listening, type :listen first");
                }
            }
        }
    }

    registry::reset();
    info!("Voice console stopped");
    Ok(())
}

async fn log_events(mut events: broadcast::Receiver<VoiceEvent>, redactor: PiiRedactor) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let VoiceEvent::StateChanged { state } = &event {
                    println!("[{}]", state);
                }
                match serde_json::to_string(&event) {
                    Ok(json) => debug!(event = %redactor.redact(&json), "Voice event"),
                    Err(e) => warn!(error = %e, "Could not serialize voice event"),
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event log fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}
