//! CLI domain: parse, console loop, and output only.
//! Command semantics live in [`crate::session`].

mod console;
mod output;
mod parse;

pub use console::{banner, prompt, run_interactive, run_once};
pub use output::{map_error, render_error};
pub use parse::Cli;
