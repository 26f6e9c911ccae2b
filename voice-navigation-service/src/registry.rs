//! Process-wide controller slot.
//!
//! UI collaborators that cannot be handed a controller directly look it up
//! here. `install` and `reset` bracket its lifetime explicitly.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::debug;

use crate::config::VoiceConfig;
use crate::controller::{VoiceParts, VoiceSessionController};
use crate::error::{VoiceError, VoiceResult};

lazy_static! {
    static ref CONTROLLER: RwLock<Option<VoiceSessionController>> = RwLock::new(None);
}

/// Build the controller and make it the process-wide instance.
///
/// # Errors
///
/// Returns [`VoiceError::AlreadyInitialized`] if one is already installed.
pub fn install(parts: VoiceParts, config: VoiceConfig) -> VoiceResult<VoiceSessionController> {
    let mut slot = CONTROLLER.write();
    if slot.is_some() {
        return Err(VoiceError::AlreadyInitialized);
    }

    let controller = VoiceSessionController::init(parts, config);
    *slot = Some(controller.clone());
    debug!("Voice session controller installed");
    Ok(controller)
}

pub fn current() -> Option<VoiceSessionController> {
    CONTROLLER.read().clone()
}

/// Reset and remove the installed controller. Returns false if none was installed.
pub fn reset() -> bool {
    let removed = CONTROLLER.write().take();
    match removed {
        Some(controller) => {
            controller.reset();
            true
        }
        None => false,
    }
}
