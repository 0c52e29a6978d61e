//! Output formatting utilities for CLI commands

use is_terminal::IsTerminal;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Wrap `text` in an ANSI color when stderr is a terminal.
pub fn color(code: &str, text: &str) -> String {
    if io::stderr().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), String> {
    if let Some(path) = path {
        fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path.display(), e))?;
    } else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| format!("Failed to write to stdout: {}", e))?;
    }
    Ok(())
}

/// Report a per-document problem on stderr.
pub fn warn(path: &Path, msg: impl std::fmt::Display) {
    eprintln!("{} {}: {}", color("33", "warn"), path.display(), msg);
}

/// Report a per-document failure on stderr.
pub fn fail(path: &Path, msg: impl std::fmt::Display) {
    eprintln!("{} {}: {}", color("31", "error"), path.display(), msg);
}
