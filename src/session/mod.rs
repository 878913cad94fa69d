//! Command Interpreter
//!
//! One [`Session`] per authenticated operator. Each input line is trimmed,
//! recorded in history, split on whitespace, and its argument tokens have
//! `%name` references substituted before the verb runs. Command failures are
//! returned as [`CommandError`] and never end the session.

pub mod command;
pub mod presentation;

use crate::auth::Credentials;
use crate::device::{self, HardwareIdentifier, Model};
use crate::error::{CommandError, SettingsError};
use crate::service::{Redirection, RedirectionService, Reply};
use crate::settings::{Settings, SettingsFile};
use crate::vars::VariableStore;
use command::Verb;
use presentation::PhoneRow;
use tracing::{debug, info, warn};

pub use command::{VerbHelp, VERBS};

/// What the console loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print the text (if any) and read the next line.
    Continue(String),
    Exit,
}

/// Interpreter state for one operator.
pub struct Session<S> {
    service: S,
    vars: VariableStore,
    settings: Settings,
    settings_file: SettingsFile,
    history: Vec<String>,
}

impl<S: RedirectionService> Session<S> {
    pub fn new(
        service: S,
        settings: Settings,
        vars: VariableStore,
        settings_file: SettingsFile,
    ) -> Self {
        Self {
            service,
            vars,
            settings,
            settings_file,
            history: Vec::new(),
        }
    }

    /// Session for an operator the credential gate accepted. The accepted
    /// credentials replace the loaded username and password, so `defaults store`
    /// persists them.
    pub fn authenticated(
        service: S,
        credentials: &Credentials,
        mut settings: Settings,
        vars: VariableStore,
        settings_file: SettingsFile,
    ) -> Self {
        settings.username = credentials.username.clone();
        settings.password = credentials.password.clone();
        Self::new(service, settings, vars, settings_file)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Run one input line.
    pub fn execute(&mut self, line: &str) -> Result<Flow, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue(String::new()));
        }
        self.history.push(line.to_string());

        let mut tokens = line.split_whitespace();
        let Some(verb_token) = tokens.next() else {
            return Ok(Flow::Continue(String::new()));
        };
        let args = self.vars.resolve_all(tokens);
        let verb = Verb::parse(verb_token)
            .ok_or_else(|| CommandError::UnknownCommand(verb_token.to_string()))?;
        debug!(verb = verb.name(), args = args.len(), "Dispatching command");

        let output = match verb {
            Verb::Exit => return Ok(Flow::Exit),
            Verb::List => self.list(&args)?,
            Verb::Add => self.add(&args)?,
            Verb::Update => self.update(&args)?,
            Verb::Remove => self.remove(&args)?,
            Verb::Check => self.check(&args)?,
            Verb::Type => type_of(&args)?,
            Verb::Set => self.set(&args)?,
            Verb::Print => self.print(&args)?,
            Verb::Defaults => self.defaults(&args)?,
            Verb::History => self.history.join("\n"),
            Verb::Version => format!("Version: {}", env!("CARGO_PKG_VERSION")),
            Verb::Help => help(&args)?,
        };
        Ok(Flow::Continue(output))
    }

    fn list(&self, args: &[String]) -> Result<String, CommandError> {
        let usage = CommandError::Usage(Verb::List.usage());
        let (selector, url) = match args {
            [selector] => (selector.as_str(), None),
            [selector, url] => (selector.as_str(), Some(url.as_str())),
            _ => return Err(usage),
        };

        if selector == "all" {
            return self.list_all();
        }

        let model: Model = selector
            .parse()
            .map_err(|_| CommandError::UnknownModel(selector.to_string()))?;
        let ids = self.service.list(model, url)?.into_result()?;
        if ids.is_empty() {
            return Ok(match url {
                Some(url) => format!(
                    "No phones of type {} redirected to {} registered for this user.",
                    model, url
                ),
                None => format!("No phones of type {} registered for this user.", model),
            });
        }
        self.phone_table(&ids)
    }

    fn list_all(&self) -> Result<String, CommandError> {
        let mut ids = Vec::new();
        for model in Model::ALL {
            let found = self.service.list(model, None)?.into_result()?;
            debug!(model = %model, count = found.len(), "Listed model");
            ids.extend(found);
        }
        if ids.is_empty() {
            return Ok("No phones registered for this user.".to_string());
        }
        self.phone_table(&ids)
    }

    fn phone_table(&self, ids: &[String]) -> Result<String, CommandError> {
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            let row = match self.service.get_redirection(id)? {
                Reply::Success(redirection) => PhoneRow::new(id.as_str(), redirection),
                Reply::Failure(fault) => {
                    warn!(id = %id, fault = %fault, "Redirection lookup failed");
                    PhoneRow::new(
                        id.as_str(),
                        Redirection {
                            owner: String::new(),
                            target: format!("error: {}", fault),
                        },
                    )
                }
            };
            rows.push(row);
        }
        Ok(presentation::format_phone_table(&rows))
    }

    fn add(&self, args: &[String]) -> Result<String, CommandError> {
        let (raw, url) = match args {
            [raw] => {
                if !self.settings.has_url() {
                    return Err(CommandError::MissingDefaultUrl);
                }
                (raw.as_str(), self.settings.url.as_str())
            }
            [raw, url] => (raw.as_str(), url.as_str()),
            _ => return Err(CommandError::Usage(Verb::Add.usage())),
        };
        let (id, model) = checked_identifier(raw)?;

        if self.service.check(id.as_str())?.is_success() {
            return Err(CommandError::AlreadyRegistered(id.to_string()));
        }
        self.service.register(id.as_str(), url)?.into_result()?;
        info!(id = %id, url, "Registered redirection");
        Ok(format!(
            "Redirection to {} for {} with MAC address {} has been successfully registered.",
            url, model, id
        ))
    }

    /// Deregister then register. A deregister fault does not stop the register
    /// step, and a failed register leaves the phone deregistered.
    fn update(&self, args: &[String]) -> Result<String, CommandError> {
        let [raw, url] = args else {
            return Err(CommandError::Usage(Verb::Update.usage()));
        };
        let (id, model) = checked_identifier(raw)?;

        if let Reply::Failure(fault) = self.service.deregister(id.as_str())? {
            debug!(id = %id, fault = %fault, "Deregister before update failed");
        }
        self.service.register(id.as_str(), url)?.into_result()?;
        info!(id = %id, url = %url, "Updated redirection");
        Ok(format!(
            "Redirection to {} for {} with MAC address {} has been successfully updated.",
            url, model, id
        ))
    }

    fn remove(&self, args: &[String]) -> Result<String, CommandError> {
        let [raw] = args else {
            return Err(CommandError::Usage(Verb::Remove.usage()));
        };
        let (id, model) = checked_identifier(raw)?;

        self.service.deregister(id.as_str())?.into_result()?;
        info!(id = %id, "Removed redirection");
        Ok(format!(
            "Successfully removed redirection for {} with MAC address {}.",
            model, id
        ))
    }

    fn check(&self, args: &[String]) -> Result<String, CommandError> {
        let [raw] = args else {
            return Err(CommandError::Usage(Verb::Check.usage()));
        };
        let id = raw.to_ascii_uppercase();

        self.service.check(&id)?.into_result()?;
        let model = device::classify(&id)
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        match self.service.get_redirection(&id)? {
            Reply::Success(redirection) => {
                Ok(presentation::format_check_report(&model, &id, &redirection))
            }
            Reply::Failure(fault) => Ok(format!(
                "{} with MAC address {} is registered.\n\tError getting the redirection target: {}",
                model, id, fault
            )),
        }
    }

    fn set(&mut self, args: &[String]) -> Result<String, CommandError> {
        let [name, value] = args else {
            return Err(CommandError::Usage(Verb::Set.usage()));
        };
        self.vars.set(name.as_str(), value.as_str());
        Ok(String::new())
    }

    fn print(&self, args: &[String]) -> Result<String, CommandError> {
        let [name] = args else {
            return Err(CommandError::Usage(Verb::Print.usage()));
        };
        if name == "all" {
            return Ok(presentation::format_variables(&self.vars));
        }
        self.vars
            .get(name)
            .map(|value| format!("{} = {}", name, value))
            .ok_or_else(|| CommandError::UnknownVariable(name.to_string()))
    }

    fn defaults(&mut self, args: &[String]) -> Result<String, CommandError> {
        match args {
            [action] if action == "print" => Ok(presentation::format_settings(&self.settings)),
            [action] if action == "store" => {
                self.store_settings()?;
                Ok(format!(
                    "Defaults written to {}",
                    self.settings_file.path().display()
                ))
            }
            [name] => {
                self.settings.clear(name)?;
                self.store_settings()?;
                Ok(format!("Removed value for {}", name))
            }
            [name, value] => {
                self.settings.set(name, value)?;
                self.store_settings()?;
                let shown = if name == "password" { "********" } else { value.as_str() };
                Ok(format!("Changed default value {} to {}", name, shown))
            }
            _ => Err(CommandError::Usage(Verb::Defaults.usage())),
        }
    }

    fn store_settings(&self) -> Result<(), SettingsError> {
        self.settings_file.store(&self.settings, &self.vars)
    }
}

/// Parse, validate and classify an identifier argument. No remote call is made
/// for an invalid identifier.
fn checked_identifier(raw: &str) -> Result<(HardwareIdentifier, Model), CommandError> {
    let invalid = || CommandError::InvalidIdentifier(raw.to_string());
    if !device::validate(raw) {
        return Err(invalid());
    }
    let id = HardwareIdentifier::parse(raw).map_err(|_| invalid())?;
    let model = device::builtin().classify(&id).ok_or_else(invalid)?;
    Ok((id, model))
}

fn type_of(args: &[String]) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage(Verb::Type.usage()));
    }
    Ok(args
        .iter()
        .map(|raw| {
            let label = device::classify(raw)
                .map(|m| m.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("{}: {}", raw.to_ascii_uppercase(), label)
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

fn help(args: &[String]) -> Result<String, CommandError> {
    match args {
        [] => Ok(presentation::format_help_index()),
        [topic] => Verb::parse(topic)
            .map(|verb| presentation::format_verb_help(verb.entry()))
            .ok_or_else(|| CommandError::NoHelp(topic.to_string())),
        _ => Err(CommandError::Usage(Verb::Help.usage())),
    }
}
