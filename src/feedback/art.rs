//! Spinner frame definitions and status glyphs.
//!
//! Provides the named frame sequences a spinner can be built from, plus
//! the glyphs and colour codes used for the final status line.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Name of the frame set used when a requested name is unknown.
pub const DEFAULT_SPINNER: &str = "dots";

/// Glyph printed before a success message.
pub const SUCCESS_GLYPH: &str = "✔";

/// Glyph printed before a failure message.
pub const FAILURE_GLYPH: &str = "✖";

/// Bright green foreground.
pub const GREEN: &str = "\x1b[92m";

/// Bright red foreground.
pub const RED: &str = "\x1b[91m";

/// Reset all attributes.
pub const RESET: &str = "\x1b[0m";

/// Spinner frame sequences for different animation styles.
pub static SPINNERS: LazyLock<HashMap<&'static str, Vec<&'static str>>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "dots",
        vec!["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
    );
    m.insert("line", vec!["-", "\\", "|", "/"]);
    m.insert("triangle", vec!["◢", "◣", "◤", "◥"]);
    m.insert("arrow", vec!["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"]);
    m
});

/// Get the full frame sequence for a named spinner.
///
/// Falls back to the 'dots' spinner if the name is unknown.
pub fn get_spinner_frames(name: &str) -> &'static [&'static str] {
    SPINNERS
        .get(name)
        .or_else(|| SPINNERS.get(DEFAULT_SPINNER))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Get a spinner frame by name and index.
///
/// The index wraps around the frame sequence, so you can increment
/// indefinitely and the frames will cycle.
///
/// # Arguments
///
/// * `name` - Name of the spinner (dots, line, triangle, arrow).
/// * `index` - Frame index, will wrap around frame count.
pub fn get_spinner_frame(name: &str, index: usize) -> &'static str {
    let frames = get_spinner_frames(name);
    frames[index % frames.len()]
}

/// Names of all registered spinners, sorted.
pub fn spinner_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = SPINNERS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Wrap a glyph in a colour, leaving the surrounding text untouched.
pub fn colorize(color: &str, glyph: &str) -> String {
    format!("{color}{glyph}{RESET}")
}
