//! Error types for the chat client.

use crate::onboarding::Stage;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors parsing a command typed at the prompt.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command {0} needs a value")]
    MissingValue(&'static str),

    #[error("Invalid value for {command}: {value}")]
    InvalidValue { command: &'static str, value: String },
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Caller mistakes when driving the onboarding flow.
///
/// These never come from user input; guard failures are reported as
/// [`ValidationError`] status messages instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Field {field} is not part of the {stage} form")]
    FieldUnavailable { field: &'static str, stage: Stage },

    #[error("Trigger {trigger} is not available on the {stage} form")]
    TriggerUnavailable { trigger: &'static str, stage: Stage },

    #[error("Onboarding session has been torn down")]
    TornDown,
}

/// Guard failures shown to the user.
///
/// The `Display` output is the exact text rendered in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Please enter a valid full name (letters, spaces, hyphens, apostrophes only).")]
    InvalidName,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be 4 to 8 characters long.")]
    PasswordLength,

    #[error("You must agree to the Terms and Conditions.")]
    TermsNotAccepted,

    #[error("Please enter some info to get a bio suggestion.")]
    EmptyBioPrompt,

    #[error("Please enter or accept a bio before continuing.")]
    EmptyBio,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
