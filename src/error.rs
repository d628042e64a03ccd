//! Error types
//!
//! `ControllerError` covers a single toggle and is never fatal; `AppError`
//! covers startup and ends the process.

use thiserror::Error;

use crate::flags::AppearanceFlags;

/// Result type alias for startup and event loop code
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of one read-modify-write cycle on the taskbar state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// No window with the taskbar class exists (Explorer not running)
    #[error("Could not find the main taskbar window ('{class}')")]
    TaskbarNotFound { class: String },

    /// `ABM_SETSTATE` returned zero
    #[error("Shell rejected taskbar state ({requested})")]
    StateSetFailed { requested: AppearanceFlags },
}

/// Startup failures
#[derive(Error, Debug)]
pub enum AppError {
    #[error("This program requires Windows to function")]
    PlatformUnsupported,

    #[error("Another instance is already running")]
    AlreadyRunning,

    #[error("Invalid hotkey: {0}")]
    InvalidHotkey(String),

    #[error("Failed to register hotkey: {0}")]
    HotkeyRegistrationFailed(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("Failed to install interrupt handler: {0}")]
    SignalHandler(String),

    #[error("Failed to start toggle worker: {0}")]
    Worker(#[from] std::io::Error),

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

impl AppError {
    /// Extra lines printed after the error to help the user recover
    pub fn guidance(&self) -> &'static [&'static str] {
        match self {
            AppError::HotkeyRegistrationFailed(_) => &[
                "This likely means the combination is already taken by another application,",
                "or the hook needs elevated rights.",
                "Try running from a terminal launched 'As Administrator'.",
            ],
            AppError::AlreadyRunning => &["Stop the other instance before starting a new one."],
            AppError::InvalidHotkey(_) => {
                &["Use a form like 'ctrl+alt+t': modifiers joined by '+' and exactly one key."]
            }
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_errors_convert_into_app_errors() {
        let err: AppError = ControllerError::TaskbarNotFound {
            class: "Shell_TrayWnd".into(),
        }
        .into();
        assert!(matches!(err, AppError::Controller(_)));
        assert_eq!(
            err.to_string(),
            "Could not find the main taskbar window ('Shell_TrayWnd')"
        );
    }

    #[test]
    fn registration_failure_carries_guidance() {
        let err = AppError::HotkeyRegistrationFailed("in use".into());
        assert!(err.guidance().iter().any(|l| l.contains("Administrator")));
        assert!(AppError::PlatformUnsupported.guidance().is_empty());
    }
}
