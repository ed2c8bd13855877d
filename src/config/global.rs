//! Process-wide settings, written once at start-up.

use once_cell::sync::OnceCell;

use super::settings::Settings;
use crate::errors::{AppError, AppResult};

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Install the settings for the rest of the process lifetime.
///
/// # Errors
/// `AlreadyInitialized` if settings were installed before.
pub fn install(settings: Settings) -> AppResult<&'static Settings> {
    SETTINGS
        .set(settings)
        .map_err(|_| AppError::AlreadyInitialized)?;
    current()
}

/// Load from the environment and install in one step.
pub fn init_from_env() -> AppResult<&'static Settings> {
    install(Settings::from_env()?)
}

pub fn get() -> Option<&'static Settings> {
    SETTINGS.get()
}

/// Installed settings, or `NotInitialized`.
pub fn current() -> AppResult<&'static Settings> {
    SETTINGS.get().ok_or(AppError::NotInitialized)
}
