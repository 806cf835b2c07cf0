use iced::Color;

use crate::theme::{SERIES_DANGER, SERIES_INFO, SERIES_SUCCESS, SERIES_WARNING};

/// Severity of a status banner entry. Mirrors the log level the entry is
/// also emitted at, so nothing is surfaced in the UI without a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn color(self) -> Color {
        match self {
            StatusLevel::Info => SERIES_INFO,
            StatusLevel::Success => SERIES_SUCCESS,
            StatusLevel::Warning => SERIES_WARNING,
            StatusLevel::Error => SERIES_DANGER,
        }
    }
}

/// Latest non-blocking status shown at the top of the dashboard.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub level: StatusLevel,
    pub message: String,
}

impl StatusLine {
    pub fn new(level: StatusLevel, message: impl Into<String>) -> Self {
        let message = message.into();

        match level {
            StatusLevel::Info | StatusLevel::Success => log::info!("{message}"),
            StatusLevel::Warning => log::warn!("{message}"),
            StatusLevel::Error => log::error!("{message}"),
        }

        Self { level, message }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, message)
    }
}
