//! Inline spinner for showing progress during long-running operations.
//!
//! The spinner runs in a background thread and updates the terminal with
//! an animated frame and label while the caller blocks on something else.
//! Stopping it joins the thread before the line is cleared, so no late
//! frame can land after the final status line.

use std::fmt::Display;
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::{cursor, queue};

use super::art::{colorize, get_spinner_frames, FAILURE_GLYPH, GREEN, RED, SUCCESS_GLYPH};
use super::safety_net::{self, CursorRestore};

/// Default time between frames.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(80);

/// Message printed when a scoped operation succeeds.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Done.";

/// Message printed when a scoped operation fails without a description.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed.";

/// Upper bound on how long a stop request waits to be noticed.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Attempts made by the safety net to take the render lock.
const RESTORE_LOCK_ATTEMPTS: u32 = 50;

/// Which glyphs a spinner cycles through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frames {
    /// A frame set from the built-in registry, looked up by name.
    Named(String),
    /// A caller-supplied frame sequence.
    Custom(Vec<String>),
}

impl Frames {
    /// Resolve to a concrete, non-empty frame list.
    ///
    /// Unknown names and empty custom sequences fall back to 'dots'.
    pub fn resolve(&self) -> Vec<String> {
        match self {
            Frames::Custom(frames) if !frames.is_empty() => frames.clone(),
            Frames::Custom(_) => named_frames(""),
            Frames::Named(name) => named_frames(name),
        }
    }
}

impl Default for Frames {
    fn default() -> Self {
        Frames::Named(super::art::DEFAULT_SPINNER.to_string())
    }
}

impl From<&str> for Frames {
    fn from(name: &str) -> Self {
        Frames::Named(name.to_string())
    }
}

fn named_frames(name: &str) -> Vec<String> {
    get_spinner_frames(name)
        .iter()
        .map(|frame| (*frame).to_string())
        .collect()
}

/// Construction-time settings for a [`Spinner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerConfig {
    /// Text shown beside the frame.
    pub label: String,
    /// Frame set to animate.
    pub frames: Frames,
    /// Minimum time between frame advances.
    pub interval: Duration,
}

impl SpinnerConfig {
    /// Settings with the given label and default frames and interval.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Use a different frame set.
    pub fn frames(mut self, frames: impl Into<Frames>) -> Self {
        self.frames = frames.into();
        self
    }

    /// Use a different frame interval.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            label: "Loading...".to_string(),
            frames: Frames::default(),
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Output state guarded by the render lock.
struct Terminal<W> {
    out: W,
    last_width: usize,
    cursor_hidden: bool,
}

impl<W: Write> Terminal<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            last_width: 0,
            cursor_hidden: false,
        }
    }

    /// Overwrite the current line, blanking whatever the last render left.
    fn render(&mut self, line: &str) {
        let width = line.chars().count();
        let pad = self.last_width.saturating_sub(width);
        let _ = write!(self.out, "\r{line}{:pad$}\r", "");
        let _ = self.out.flush();
        self.last_width = width;
    }

    fn clear(&mut self) {
        self.render("");
        self.last_width = 0;
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        if self.cursor_hidden {
            return Ok(());
        }
        self.cursor_hidden = true;
        queue!(self.out, cursor::Hide)?;
        self.out.flush()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        if !self.cursor_hidden {
            return Ok(());
        }
        self.cursor_hidden = false;
        queue!(self.out, cursor::Show)?;
        self.out.flush()
    }

    /// Blank the line and show the cursor, if this spinner hid it.
    fn restore(&mut self) -> io::Result<()> {
        if !self.cursor_hidden {
            return Ok(());
        }
        self.clear();
        self.show_cursor()
    }

    fn status(&mut self, glyph: &str, message: &str, blank_line: bool) {
        let trailer = if blank_line { "\n" } else { "" };
        let _ = writeln!(self.out, "{glyph} {message}{trailer}");
        let _ = self.out.flush();
    }
}

/// State shared between the spinner handle and its animation thread.
struct Inner<W> {
    frames: Vec<String>,
    label: String,
    interval: Duration,
    stop: AtomicBool,
    terminal: Mutex<Terminal<W>>,
}

impl<W: Write> Inner<W> {
    fn terminal(&self) -> MutexGuard<'_, Terminal<W>> {
        self.terminal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn frame(&self, counter: usize) -> &str {
        &self.frames[counter % self.frames.len()]
    }

    fn animate(&self) {
        let mut counter = 0usize;
        loop {
            let line = format!("{} {}", self.frame(counter), self.label);
            {
                let mut terminal = self.terminal();
                // Checked under the lock so a restore is never drawn over
                if self.stop.load(Ordering::SeqCst) {
                    return;
                }
                terminal.render(&line);
            }
            counter = counter.wrapping_add(1);
            self.pause();
        }
    }

    /// Sleep for one interval, waking early if a stop is requested.
    fn pause(&self) {
        let deadline = Instant::now() + self.interval;
        loop {
            if self.stop.load(Ordering::SeqCst) {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}

impl<W: Write + Send> CursorRestore for Inner<W> {
    fn restore_cursor(&self) -> io::Result<()> {
        self.stop.store(true, Ordering::SeqCst);

        // May run on the thread that holds the lock (panic hook), so never block
        for _ in 0..RESTORE_LOCK_ATTEMPTS {
            match self.terminal.try_lock() {
                Ok(mut terminal) => return terminal.restore(),
                Err(TryLockError::Poisoned(poisoned)) => {
                    return poisoned.into_inner().restore();
                }
                Err(TryLockError::WouldBlock) => thread::sleep(Duration::from_millis(2)),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            "spinner output is locked",
        ))
    }
}

/// An animated progress indicator for one blocking operation.
///
/// The spinner runs in a background thread and updates its output with
/// an animated frame and label. Call `succeed()`, `fail()` or `stop()` to
/// end it, or wrap the work in [`Spinner::scoped`].
///
/// # Example
///
/// ```ignore
/// let mut spinner = Spinner::new(SpinnerConfig::new("Loading..."));
/// let body = spinner.scoped(|| fetch())?;
/// ```
pub struct Spinner<W: Write + Send + 'static = Stdout> {
    inner: Arc<Inner<W>>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner<Stdout> {
    /// Create a spinner that writes to stdout.
    pub fn new(config: SpinnerConfig) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl<W: Write + Send + 'static> Spinner<W> {
    /// Create a spinner that writes to the given sink.
    ///
    /// The instance is registered with the process-wide safety net.
    pub fn with_output(config: SpinnerConfig, out: W) -> Self {
        let inner = Arc::new(Inner {
            frames: config.frames.resolve(),
            label: config.label,
            interval: config.interval,
            stop: AtomicBool::new(false),
            terminal: Mutex::new(Terminal::new(out)),
        });

        let erased: Arc<dyn CursorRestore> = inner.clone();
        safety_net::register(Arc::downgrade(&erased));

        Self {
            inner,
            handle: None,
        }
    }

    /// Whether the animation thread is active.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// The label shown beside the frame.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// The resolved frame sequence.
    pub fn frames(&self) -> &[String] {
        &self.inner.frames
    }

    /// Time between frame advances.
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Hide the cursor and start animating. No-op if already running.
    pub fn start(&mut self) -> &mut Self {
        if self.is_running() {
            return self;
        }

        self.inner.stop.store(false, Ordering::SeqCst);
        let _ = self.inner.terminal().hide_cursor();

        let inner = Arc::clone(&self.inner);
        let spawned = thread::Builder::new()
            .name("spinner".to_string())
            .spawn(move || inner.animate());

        match spawned {
            Ok(handle) => {
                log::debug!("spinner started: {}", self.inner.label);
                self.handle = Some(handle);
            }
            Err(e) => {
                log::warn!("could not start spinner thread: {e}");
                let _ = self.inner.terminal().show_cursor();
            }
        }
        self
    }

    /// Stop animating, clear the line and show the cursor.
    ///
    /// Does not return until the animation thread has exited. Safe to call
    /// when not running.
    pub fn stop(&mut self) {
        self.inner.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("spinner thread panicked");
            }
            log::debug!("spinner stopped: {}", self.inner.label);
        }

        let mut terminal = self.inner.terminal();
        terminal.clear();
        let _ = terminal.show_cursor();
    }

    /// Stop and print a success line followed by a blank line.
    pub fn succeed(&mut self, message: &str) {
        self.stop();
        self.inner
            .terminal()
            .status(&colorize(GREEN, SUCCESS_GLYPH), message, true);
    }

    /// Stop and print a failure line.
    pub fn fail(&mut self, message: &str) {
        self.stop();
        self.inner
            .terminal()
            .status(&colorize(RED, FAILURE_GLYPH), message, false);
    }

    /// Run `op` with the spinner animating, then report its outcome.
    ///
    /// `Ok` prints the default success line. `Err` prints the error's
    /// description (or a default when it is empty) as a failure line. The
    /// result is returned unchanged either way. A panic inside `op` still
    /// stops the spinner and prints the failure line while unwinding.
    pub fn scoped<T, E, F>(&mut self, op: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.start();
        let guard = UnwindGuard(self);
        let result = op();

        match &result {
            Ok(_) => guard.0.succeed(DEFAULT_SUCCESS_MESSAGE),
            Err(e) => {
                let description = e.to_string();
                if description.is_empty() {
                    guard.0.fail(DEFAULT_FAILURE_MESSAGE);
                } else {
                    guard.0.fail(&description);
                }
            }
        }

        result
    }
}

impl<W: Write + Send + 'static> Drop for Spinner<W> {
    fn drop(&mut self) {
        if !self.is_running() {
            return;
        }
        if thread::panicking() {
            self.fail(DEFAULT_FAILURE_MESSAGE);
        } else {
            self.stop();
        }
    }
}

/// Reports failure if the scoped operation unwinds.
struct UnwindGuard<'a, W: Write + Send + 'static>(&'a mut Spinner<W>);

impl<W: Write + Send + 'static> Drop for UnwindGuard<'_, W> {
    fn drop(&mut self) {
        if thread::panicking() && self.0.is_running() {
            self.0.fail(DEFAULT_FAILURE_MESSAGE);
        }
    }
}
