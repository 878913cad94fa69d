//! Console loop: reads lines, runs them through a [`Session`], prints results.

use crate::cli::output::render_error;
use crate::error::CommandError;
use crate::service::RedirectionService;
use crate::session::{Flow, Session};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use tracing::{debug, error};

/// Startup banner.
pub fn banner(color: bool) -> String {
    let title = format!(
        "Snom Redirection Server Console Ver. {}",
        env!("CARGO_PKG_VERSION")
    );
    if color {
        format!("{}", title.bold())
    } else {
        title
    }
}

/// Prompt shown before each line.
pub fn prompt(username: &str) -> String {
    format!("{}%> ", username)
}

/// Interactive loop. Ends on `exit` or end of input; command errors are printed
/// and the loop continues.
pub fn run_interactive<S, R, W>(
    session: &mut Session<S>,
    username: &str,
    input: R,
    out: &mut W,
    color: bool,
) -> io::Result<()>
where
    S: RedirectionService,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", banner(color))?;
    let prompt = prompt(username);
    let mut input = input;
    let mut buf = Vec::new();
    loop {
        write!(out, "{}", prompt)?;
        out.flush()?;
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(out)?;
            debug!("End of input");
            break;
        }
        // Undecodable bytes become U+FFFD; the line then fails as a normal command.
        let line = String::from_utf8_lossy(&buf);
        match session.execute(&line) {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue(text)) => {
                if !text.is_empty() {
                    writeln!(out, "{}", text)?;
                }
            }
            Err(e) => {
                error!(error = %e, "Command failed");
                writeln!(out, "{}", render_error(&e, color))?;
            }
        }
    }
    Ok(())
}

/// Run a single command given on the command line and return its output.
/// Writing the output is left to the caller.
pub fn run_once<S>(session: &mut Session<S>, words: &[String]) -> Result<String, CommandError>
where
    S: RedirectionService,
{
    let line = words.join(" ");
    match session.execute(&line)? {
        Flow::Continue(text) => Ok(text),
        Flow::Exit => Ok(String::new()),
    }
}
