pub mod auth;
pub mod communities;
pub mod posts;

use std::io::{self, BufRead, Write};

/// Use the flag value, or read one line from stdin
pub(crate) fn password_or_prompt(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}
