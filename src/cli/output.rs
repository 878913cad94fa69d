//! CLI output: error mapping from command errors to console text.

use crate::error::CommandError;
use owo_colors::OwoColorize;

/// Map a command error to the line shown to the operator.
pub fn map_error(e: &CommandError) -> String {
    e.to_string()
}

/// Same as [`map_error`], highlighted for terminals. Local errors (bad input)
/// are yellow, remote ones red.
pub fn render_error(e: &CommandError, color: bool) -> String {
    let text = map_error(e);
    if !color {
        return text;
    }
    if e.is_local() {
        format!("{}", text.yellow())
    } else {
        format!("{}", text.red())
    }
}
