use anyhow::{bail, Context, Result};
use log::{error, info};
use std::fs;
use std::io::{self, BufRead, Write};

use crate::config::Config;

/// Resolve the daily message. The cache file always wins if it exists;
/// otherwise the operator is prompted once, before any scheduling is set up.
pub fn resolve(config: &Config) -> Result<String> {
    if config.message_file.exists() {
        let msg = fs::read_to_string(&config.message_file)
            .with_context(|| format!("Failed to read {}", config.message_file.display()))?;
        info!("Loaded message from {}", config.message_file.display());
        return Ok(msg.trim().to_string());
    }

    println!("Enter your daily message. Finish with an empty line (press Enter twice):");
    let msg = read_multiline(&mut io::stdin().lock())?;

    if msg.is_empty() {
        error!("No message entered by user.");
        bail!("No message entered. Exiting.");
    }

    let save = prompt_yes_no(&format!(
        "Save message to {} for reuse? (y/n): ",
        config.message_file.display()
    ))?;
    if save {
        // A failed save is logged but never aborts resolution
        match fs::write(&config.message_file, &msg) {
            Ok(()) => info!("Saved message to {}", config.message_file.display()),
            Err(e) => error!(
                "Failed to save message to {}: {}",
                config.message_file.display(),
                e
            ),
        }
    }

    Ok(msg)
}

/// Read lines until the first empty line, joined with newlines and trimmed.
pub fn read_multiline(input: &mut impl BufRead) -> Result<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in input.lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }

    Ok(lines.join("\n").trim().to_string())
}

pub fn prompt_yes_no(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    read_yes_no(&mut io::stdin().lock())
}

pub fn read_yes_no(input: &mut impl BufRead) -> Result<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
