use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};

use voice_navigation_service::locale::{LocaleCatalog, LocaleStore, MemoryPreferenceStore};
use voice_navigation_service::providers::unavailable::NoSpeechSupport;
use voice_navigation_service::providers::scripted::RecordingNavigator;
use voice_navigation_service::{registry, VoiceConfig, VoiceError, VoiceParts, VoiceSessionState};

fn parts() -> VoiceParts {
    let locale = Arc::new(LocaleStore::open(
        Arc::new(MemoryPreferenceStore::new()),
        Arc::new(LocaleCatalog::builtin().unwrap()),
    ));
    VoiceParts::new(
        locale,
        Arc::new(NoSpeechSupport),
        Arc::new(NoSpeechSupport),
        Arc::new(RecordingNavigator::new()),
    )
}

// Single test: the registry is process-wide state
#[test]
fn test_registry_lifecycle() {
    assert!(registry::current().is_none());
    assert!(!registry::reset());

    let config = VoiceConfig {
        voice_enabled: true,
        ..VoiceConfig::default()
    };
    let installed = assert_ok!(registry::install(parts(), config));
    assert_eq!(installed.state(), VoiceSessionState::Idle);

    let err = assert_err!(registry::install(parts(), VoiceConfig::default()));
    assert!(matches!(err, VoiceError::AlreadyInitialized));

    let current = registry::current().unwrap();
    assert!(current.set_locale("hi"));
    assert_eq!(installed.get_locale().code(), "hi");

    assert!(registry::reset());
    assert!(registry::current().is_none());
    assert_eq!(installed.state(), VoiceSessionState::Disabled);
    assert_ok!(registry::install(parts(), VoiceConfig::default()));
}
