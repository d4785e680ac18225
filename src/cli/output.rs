//! Output handlers for generated prompts.
//!
//! This module prints the prompt, copies it to the clipboard and opens the
//! page where it can be used.

use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Error type for output operations.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Failed to copy content to the system clipboard.
    #[error("Failed to copy to clipboard: {0}")]
    ClipboardError(String),
    /// Failed to launch the browser.
    #[error("Failed to open browser: {0}")]
    BrowserError(#[from] io::Error),
}

/// Paste shortcut shown in instructions.
#[cfg(target_os = "macos")]
const PASTE_SHORTCUT: &str = "Cmd+V";
#[cfg(not(target_os = "macos"))]
const PASTE_SHORTCUT: &str = "Ctrl+V";

/// Print the prompt header and body.
pub fn write_prompt(out: &mut impl Write, prompt: &str) -> io::Result<()> {
    writeln!(out, "Prompt:\n{prompt}")
}

/// Print where the prompt can be used, for runs without `--open`.
pub fn write_usage_hint(out: &mut impl Write, studio_url: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "You can use the prompt at: {studio_url}")?;
    writeln!(out, "Or run with --open to automatically open it in your browser.")?;
    writeln!(out)
}

/// Print paste instructions after a successful clipboard copy.
pub fn write_paste_instructions(out: &mut impl Write, studio_url: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Prompt copied to clipboard! At Google AI Studio:")?;
    writeln!(out, "1. Paste the prompt ({PASTE_SHORTCUT})")?;
    writeln!(out, "2. Check 'Run settings' for Aspect Ratio and other options")?;
    writeln!(out, "3. Click 'Run' to generate")?;
    writeln!(out)?;
    writeln!(out, "{studio_url}")?;
    writeln!(out)
}

/// Print manual instructions when the clipboard is unavailable.
pub fn write_manual_instructions(
    out: &mut impl Write,
    prompt: &str,
    studio_url: &str,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Please copy and paste this prompt:")?;
    writeln!(out)?;
    writeln!(out, "{prompt}")?;
    writeln!(out, "Then go to: {studio_url}")?;
    writeln!(out)
}

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), OutputError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| OutputError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| OutputError::ClipboardError(e.to_string()))?;
    log::debug!("copied {} characters to clipboard", text.len());
    Ok(())
}

/// Open a URL in the default browser without waiting for it.
pub fn open_browser(url: &str) -> Result<(), OutputError> {
    browser_command(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    log::debug!("opened {url}");
    Ok(())
}

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg("--").arg(url);
    command
}

#[cfg(target_os = "windows")]
fn browser_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn browser_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

/// Copy the prompt and open the studio page, printing what happened.
///
/// Clipboard and browser failures are reported but never fatal.
pub fn open_with_prompt(out: &mut impl Write, prompt: &str, studio_url: &str) -> io::Result<()> {
    match copy_to_clipboard(prompt) {
        Ok(()) => {
            open_or_report(out, studio_url)?;
            write_paste_instructions(out, studio_url)
        }
        Err(e) => {
            writeln!(out, "Could not copy to clipboard: {e}")?;
            open_or_report(out, studio_url)?;
            write_manual_instructions(out, prompt, studio_url)
        }
    }
}

fn open_or_report(out: &mut impl Write, url: &str) -> io::Result<()> {
    if let Err(e) = open_browser(url) {
        log::warn!("{e}");
        writeln!(out, "Could not open browser: {e}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://aistudio.google.com/prompts/new_image";

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_prompt() {
        let text = render(|out| write_prompt(out, "A cat on a mat."));
        assert_eq!(text, "Prompt:\nA cat on a mat.\n");
    }

    #[test]
    fn test_usage_hint_mentions_url_and_flag() {
        let text = render(|out| write_usage_hint(out, URL));
        assert!(text.starts_with('\n'));
        assert!(text.contains(&format!("You can use the prompt at: {URL}")));
        assert!(text.contains("--open"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_paste_instructions() {
        let text = render(|out| write_paste_instructions(out, URL));
        assert!(text.contains("Prompt copied to clipboard!"));
        assert!(text.contains(PASTE_SHORTCUT));
        assert!(text.contains("3. Click 'Run' to generate"));
        assert!(text.contains(URL));
    }

    #[test]
    fn test_manual_instructions_include_prompt() {
        let text = render(|out| write_manual_instructions(out, "A dog.", URL));
        assert!(text.contains("Please copy and paste this prompt:\n\nA dog.\n"));
        assert!(text.contains(&format!("Then go to: {URL}")));
    }

    #[test]
    fn test_output_error_display() {
        let err = OutputError::ClipboardError("no display".to_string());
        assert!(err.to_string().contains("Failed to copy to clipboard"));
        assert!(err.to_string().contains("no display"));

        let io_err = OutputError::BrowserError(io::Error::new(
            io::ErrorKind::NotFound,
            "xdg-open not found",
        ));
        assert!(io_err.to_string().contains("Failed to open browser"));
    }

    // Clipboard and browser calls need a desktop session, so they are not
    // exercised here.
}
