//! Credential gate.
//!
//! A session starts only after the service accepts the operator's credentials
//! (`network.echo`). The operator gets three password prompts; a password stored
//! in the settings file is tried first and does not use up a prompt.

use crate::error::{AuthError, ServiceError};
use crate::service::RedirectionService;
use crate::settings::Settings;
use std::fmt;
use tracing::{info, warn};

/// Prompted password attempts before the process gives up.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Message sent with the validation echo.
pub const PING: &str = "ping";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where usernames and passwords come from.
pub trait CredentialSource {
    fn username(&mut self) -> Result<String, AuthError>;
    fn password(&mut self) -> Result<String, AuthError>;
    /// Told why an attempt was refused.
    fn rejected(&mut self, reason: &str);
}

/// Interactive prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalCredentials;

impl CredentialSource for TerminalCredentials {
    fn username(&mut self) -> Result<String, AuthError> {
        dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AuthError::Prompt(e.to_string()))
    }

    fn password(&mut self) -> Result<String, AuthError> {
        dialoguer::Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| AuthError::Prompt(e.to_string()))
    }

    fn rejected(&mut self, reason: &str) {
        eprintln!("{}", reason);
    }
}

/// Outcome of one login attempt.
enum Attempt<S> {
    Accepted(S),
    Refused(ServiceError),
}

fn attempt<S, F>(credentials: &Credentials, connect: &mut F) -> Result<Attempt<S>, AuthError>
where
    S: RedirectionService,
    F: FnMut(&Credentials) -> Result<S, ServiceError>,
{
    // Client setup failures are fatal, not a refused credential.
    let service = connect(credentials).map_err(AuthError::Connect)?;
    match service.echo(PING) {
        Ok(_) => Ok(Attempt::Accepted(service)),
        Err(e) => Ok(Attempt::Refused(e)),
    }
}

/// Resolve credentials and return a service handle the remote end accepted.
///
/// `connect` builds a service for a credential pair; it is called once per
/// attempt. Returns [`AuthError::TooManyAttempts`] after the third refused
/// prompt.
pub fn authenticate<S, F>(
    settings: &Settings,
    source: &mut dyn CredentialSource,
    mut connect: F,
) -> Result<(Credentials, S), AuthError>
where
    S: RedirectionService,
    F: FnMut(&Credentials) -> Result<S, ServiceError>,
{
    let username = if settings.username.is_empty() {
        source.username()?.trim().to_string()
    } else {
        settings.username.clone()
    };

    if !settings.password.is_empty() {
        let credentials = Credentials::new(username.clone(), settings.password.clone());
        match attempt(&credentials, &mut connect)? {
            Attempt::Accepted(service) => {
                info!(username = %username, "Stored credentials accepted");
                return Ok((credentials, service));
            }
            Attempt::Refused(e) => {
                warn!(username = %username, error = %e, "Stored password refused");
                source.rejected(&format!("Stored password refused: {}", e));
            }
        }
    }

    for attempt_no in 1..=MAX_PASSWORD_ATTEMPTS {
        let password = source.password()?;
        if password.is_empty() {
            source.rejected("Empty password.");
            continue;
        }
        let credentials = Credentials::new(username.clone(), password);
        match attempt(&credentials, &mut connect)? {
            Attempt::Accepted(service) => {
                info!(username = %username, attempt = attempt_no, "Credentials accepted");
                return Ok((credentials, service));
            }
            Attempt::Refused(e) => {
                warn!(username = %username, attempt = attempt_no, error = %e, "Password refused");
                source.rejected(&format!("Error: {}", e));
            }
        }
    }

    Err(AuthError::TooManyAttempts)
}
