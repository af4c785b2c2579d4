use miette::Diagnostic;
use thiserror::Error;

use crate::auth::AuthError;
use crate::voice::VoiceError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Failed to connect to API server")]
    #[diagnostic(
        code(gyanrich::cli::connection_failed),
        help(
            "Is the server running? Try: gyanrich serve\nOr set GYANRICH_API_URL to point to the correct server."
        )
    )]
    ConnectionFailed {
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from API server: {message}")]
    #[diagnostic(
        code(gyanrich::cli::invalid_response),
        help("The server returned data in an unexpected format. This might indicate a version mismatch.")
    )]
    InvalidResponse { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(gyanrich::cli::api_error))]
    ApiError { status: u16, message: String },

    #[error("This command needs the admin password")]
    #[diagnostic(
        code(gyanrich::cli::password_required),
        help("Pass --password or set GYANRICH_ADMIN_PASSWORD")
    )]
    PasswordRequired,

    #[error("Invalid argument: {message}")]
    #[diagnostic(code(gyanrich::cli::invalid_argument))]
    InvalidArgument { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Voice(#[from] VoiceError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(gyanrich::cli::io))]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CliError::ConnectionFailed { source: e }
        } else {
            CliError::InvalidResponse {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
