//! Terminal-backed providers for running the voice layer outside a browser.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::SpeechSynthesizer;
use crate::navigation::{Navigator, Route};
use crate::speech::{SpeechOutcome, Utterance};

/// "Speaks" by printing the utterance to stdout
#[derive(Debug, Default, Clone)]
pub struct ConsoleSynthesizer;

impl ConsoleSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechSynthesizer for ConsoleSynthesizer {
    fn is_available(&self) -> bool {
        true
    }

    async fn speak(&self, utterance: &Utterance, cancel: CancellationToken) -> SpeechOutcome {
        if cancel.is_cancelled() {
            return SpeechOutcome::Cancelled;
        }
        println!("🔊 [{}] {}", utterance.speech_tag(), utterance.text);
        SpeechOutcome::Completed
    }
}

/// Prints the destination instead of changing a page
#[derive(Debug, Default, Clone)]
pub struct LoggingNavigator;

impl LoggingNavigator {
    pub fn new() -> Self {
        Self
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: &Route) {
        info!(path = %route.path(), "Navigating");
        println!("➡️  {}", route.path());
    }
}
