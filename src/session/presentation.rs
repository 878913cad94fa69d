//! Text formatters for command results.

use crate::service::Redirection;
use crate::session::command::{VerbHelp, VERBS};
use crate::settings::Settings;
use crate::vars::VariableStore;
use comfy_table::Table;

/// One row of the `list` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRow {
    pub id: String,
    pub owner: String,
    pub target: String,
}

impl PhoneRow {
    pub fn new(id: impl Into<String>, redirection: Redirection) -> Self {
        Self {
            id: id.into(),
            owner: redirection.owner,
            target: redirection.target,
        }
    }
}

pub fn format_phone_table(rows: &[PhoneRow]) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["MAC address", "Company", "URL"]);
    for row in rows {
        table.add_row(vec![&row.id, &row.owner, &row.target]);
    }
    table.to_string()
}

/// `check` report for a registered identifier.
pub fn format_check_report(model: &str, id: &str, redirection: &Redirection) -> String {
    let mut lines = vec![format!("{} with MAC address {} is registered.", model, id)];
    if !redirection.owner.is_empty() {
        lines.push(format!("\tMac is owned by {}", redirection.owner));
    }
    if redirection.is_redirected() {
        lines.push(format!(
            "\tCurrent redirection target is: {}",
            redirection.target
        ));
    } else {
        lines.push("\tThe phone is not redirected.".to_string());
    }
    lines.join("\n")
}

/// `defaults print`. The password is masked.
pub fn format_settings(settings: &Settings) -> String {
    settings
        .entries()
        .into_iter()
        .map(|(name, value)| {
            let shown = if name == "password" && !value.is_empty() {
                "*".repeat(8)
            } else {
                value
            };
            format!("{:<10} => {}", name, shown)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_variables(vars: &VariableStore) -> String {
    if vars.is_empty() {
        return "No local variables defined. Use 'set var_name var_value' to define variables."
            .to_string();
    }
    let mut lines = vec!["Local variables:".to_string()];
    lines.extend(
        vars.iter()
            .map(|(name, value)| format!("  {:<10} = {}", name, value)),
    );
    lines.join("\n")
}

pub fn format_help_index() -> String {
    let width = VERBS.iter().map(|entry| entry.name.len()).max().unwrap_or(0);
    let mut lines = vec![
        "Documented commands (type help <command>):".to_string(),
        String::new(),
    ];
    lines.extend(
        VERBS
            .iter()
            .map(|entry| format!("  {:<width$}  {}", entry.name, entry.summary, width = width)),
    );
    lines.join("\n")
}

pub fn format_verb_help(entry: &VerbHelp) -> String {
    format!("{}\n{}", entry.summary, entry.details)
}
