//! Persisted operator defaults.
//!
//! The settings file is a flat list of `name|value` lines. When `savelocals` is
//! on, a `=====` line follows and the session variables are written after it in
//! the same format. Unreadable lines are skipped on load.

use crate::error::SettingsError;
use crate::vars::VariableStore;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Line separating defaults from the variable snapshot.
pub const SECTION_SEPARATOR: &str = "=====";

/// File name of the settings file in the home directory.
pub const SETTINGS_FILE_NAME: &str = ".redirect-console";

/// Setting names, in file order.
pub const SETTING_NAMES: [&str; 4] = ["username", "password", "url", "savelocals"];

/// Operator defaults record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub username: String,
    pub password: String,
    /// Default target for `add` when no URL is given.
    pub url: String,
    /// Persist session variables along with the defaults.
    pub save_locals: bool,
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Settings {
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            "username" => Some(self.username.clone()),
            "password" => Some(self.password.clone()),
            "url" => Some(self.url.clone()),
            "savelocals" => Some(if self.save_locals { "1" } else { "0" }.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), SettingsError> {
        match name {
            "username" => self.username = value.to_string(),
            "password" => self.password = value.to_string(),
            "url" => self.url = value.to_string(),
            "savelocals" => self.save_locals = parse_flag(value),
            other => return Err(SettingsError::UnknownSetting(other.to_string())),
        }
        Ok(())
    }

    /// Reset a setting to its empty value.
    pub fn clear(&mut self, name: &str) -> Result<(), SettingsError> {
        self.set(name, "")
    }

    /// (name, value) pairs in file order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        SETTING_NAMES
            .iter()
            .map(|name| (*name, self.get(name).unwrap_or_default()))
            .collect()
    }

    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Render the file contents.
pub fn render(settings: &Settings, vars: &VariableStore) -> String {
    let mut lines: Vec<String> = settings
        .entries()
        .into_iter()
        .map(|(name, value)| format!("{}|{}", name, value))
        .collect();
    if settings.save_locals {
        lines.push(SECTION_SEPARATOR.to_string());
        lines.extend(vars.iter().map(|(name, value)| format!("{}|{}", name, value)));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Parse file contents. Values keep everything after the first `|`.
pub fn parse(contents: &str) -> (Settings, VariableStore) {
    let mut settings = Settings::default();
    let mut vars = VariableStore::new();
    let mut in_defaults = true;

    for (lineno, line) in contents.lines().enumerate() {
        if line.trim() == SECTION_SEPARATOR {
            in_defaults = false;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once('|') else {
            warn!(line = lineno + 1, "Skipping malformed settings line");
            continue;
        };
        let value = value.trim();
        if in_defaults {
            if settings.set(name, value).is_err() {
                warn!(line = lineno + 1, name, "Skipping unknown setting");
            }
        } else {
            vars.set(name, value);
        }
    }
    (settings, vars)
}

/// Location of the settings file on disk.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.redirect-console`
    pub fn in_home_dir() -> Result<Self, SettingsError> {
        let dirs = directories::BaseDirs::new().ok_or(SettingsError::NoHomeDir)?;
        Ok(Self::new(dirs.home_dir().join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file; a missing file yields empty defaults.
    pub fn load(&self) -> Result<(Settings, VariableStore), SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!(path = %self.path.display(), "Loaded settings");
                Ok(parse(&contents))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file");
                Ok((Settings::default(), VariableStore::new()))
            }
            Err(e) => Err(SettingsError::Io(e)),
        }
    }

    /// Overwrite the file. The password is stored in clear text, so the file is
    /// created readable by its owner only.
    pub fn store(&self, settings: &Settings, vars: &VariableStore) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(render(settings, vars).as_bytes())?;
        debug!(path = %self.path.display(), "Stored settings");
        Ok(())
    }
}
