//! Interactive fallback when no URL is given on the command line.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

pub const PROMPT: &str = "Enter the URL of the page to download media from: ";

/// Asks for a URL on `output` and reads one line from `input`.
pub fn prompt_for_url<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read URL from stdin")?;
    let url = line.trim();
    if url.is_empty() {
        bail!("no URL given");
    }
    Ok(url.to_string())
}
