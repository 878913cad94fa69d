//! Error types for the redirection console.

use std::fmt;
use thiserror::Error;

/// Identifier and rule-table errors
#[derive(Debug, Error)]
pub enum IdentifierError {
    #[error("Identifier {input:?} has {len} characters, expected 12")]
    Length { input: String, len: usize },

    #[error("Identifier {0:?} is not hexadecimal")]
    NotHex(String),

    #[error("Invalid classification rule {pattern:?}: {reason}")]
    InvalidRule { pattern: String, reason: String },
}

/// Transport and authentication errors talking to the redirection service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Remote fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Transport setup failed: {0}")]
    Setup(String),
}

impl ServiceError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ServiceError::Unauthorized(_))
    }
}

/// Error code carried by a failed service reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceFault {
    MalformedIdentifier,
    UnknownIdentifier,
    OwnedByOtherUser,
    /// Failure tag with no code.
    Unspecified,
    /// Any code not in the table, shown verbatim.
    Other(String),
}

impl ServiceFault {
    pub fn from_code(code: &str) -> Self {
        match code {
            "Error:malformed_mac" => ServiceFault::MalformedIdentifier,
            "Error:no_such_mac" => ServiceFault::UnknownIdentifier,
            "Error:owned_by_other_user" => ServiceFault::OwnedByOtherUser,
            other => ServiceFault::Other(other.to_string()),
        }
    }

    /// Wire code, if the fault carried one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ServiceFault::MalformedIdentifier => Some("Error:malformed_mac"),
            ServiceFault::UnknownIdentifier => Some("Error:no_such_mac"),
            ServiceFault::OwnedByOtherUser => Some("Error:owned_by_other_user"),
            ServiceFault::Unspecified => None,
            ServiceFault::Other(code) => Some(code),
        }
    }
}

impl fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceFault::MalformedIdentifier => f.write_str("Invalid MAC address"),
            ServiceFault::UnknownIdentifier => f.write_str("MAC address not registered."),
            ServiceFault::OwnedByOtherUser => {
                f.write_str("MAC address is owned by another user.")
            }
            ServiceFault::Unspecified => f.write_str("The redirection service rejected the request."),
            ServiceFault::Other(code) => f.write_str(code),
        }
    }
}

/// Settings file errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot determine the home directory")]
    NoHomeDir,

    #[error("Default setting not found: {0}")]
    UnknownSetting(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

/// Credential gate errors. Any of these ends the process before the console starts.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read credentials: {0}")]
    Prompt(String),

    #[error("Three wrong passwords provided. Exiting.")]
    TooManyAttempts,

    #[error("Could not create the service client: {0}")]
    Connect(#[source] ServiceError),
}

/// Errors reported for a single console command. None of these end the session.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Wrong argument count or shape; carries the usage hint.
    #[error("Wrong arguments. Use {0}")]
    Usage(&'static str),

    #[error("*** Unknown syntax: {0}")]
    UnknownCommand(String),

    #[error("{0} does not seem to be a valid snom MAC address.")]
    InvalidIdentifier(String),

    #[error("Error: model {0} not found")]
    UnknownModel(String),

    #[error("ERROR: Default url not defined, please define it using 'defaults url <url>'")]
    MissingDefaultUrl,

    #[error("Phone already registered, use 'remove' or 'update' command")]
    AlreadyRegistered(String),

    #[error("Unknown variable {0}")]
    UnknownVariable(String),

    #[error("No help on {0}")]
    NoHelp(String),

    #[error("{0}")]
    Service(ServiceFault),

    #[error("{0}")]
    Transport(#[from] ServiceError),

    #[error("{0}")]
    Settings(#[from] SettingsError),
}

impl From<ServiceFault> for CommandError {
    fn from(fault: ServiceFault) -> Self {
        CommandError::Service(fault)
    }
}

impl CommandError {
    /// True for errors raised before any remote call was attempted.
    pub fn is_local(&self) -> bool {
        !matches!(self, CommandError::Service(_) | CommandError::Transport(_))
    }
}
