//! Cursor safety net tests.
//!
//! These live in their own test binary because the registry is
//! process-wide state.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rprompt::feedback::safety_net;
use rprompt::{Spinner, SpinnerConfig};

const HIDE: &str = "\x1b[?25l";
const SHOW: &str = "\x1b[?25h";

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn running_spinner(label: &str) -> (Spinner<SharedBuffer>, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let mut spinner = Spinner::with_output(
        SpinnerConfig::new(label).interval(Duration::from_millis(10)),
        buffer.clone(),
    );
    spinner.start();
    thread::sleep(Duration::from_millis(30));
    (spinner, buffer)
}

fn cursor_visible(output: &str) -> bool {
    match (output.rfind(HIDE), output.rfind(SHOW)) {
        (Some(hide), Some(show)) => show > hide,
        (None, _) => true,
        (Some(_), None) => false,
    }
}

#[test]
fn test_cleanup_hook_alone_restores_running_spinners() {
    let (first, first_out) = running_spinner("first");
    let (second, second_out) = running_spinner("second");
    assert!(first_out.contents().contains(HIDE));

    // Simulates abrupt exit: only the hook runs, stop() never does
    safety_net::restore_all();

    assert!(cursor_visible(&first_out.contents()));
    assert!(cursor_visible(&second_out.contents()));
    assert!(first.is_running());
    assert!(second.is_running());
}

#[test]
fn test_cleanup_hook_blanks_line_and_halts_animation() {
    let (mut spinner, buffer) = running_spinner("Analyzing image with Gemini");

    safety_net::restore_all();
    thread::sleep(Duration::from_millis(50));

    let output = buffer.contents();
    let last_show = output.rfind(SHOW).expect("cursor shown");
    let (before, after) = output.split_at(last_show);
    assert!(!after[SHOW.len()..].contains("Analyzing"));

    // The last frame drawn is blanked before the cursor comes back
    if let Some(last_frame) = before.rfind("Analyzing") {
        let blank = " ".repeat("⠋ Analyzing image with Gemini".chars().count());
        assert!(before[last_frame..].ends_with(&format!("\r{blank}\r")));
    }

    spinner.stop();
    assert!(cursor_visible(&buffer.contents()));
}

#[test]
fn test_cleanup_hook_is_idempotent() {
    let (mut spinner, buffer) = running_spinner("twice");

    safety_net::restore_all();
    let after_first = buffer.contents().matches(SHOW).count();
    safety_net::restore_all();
    let after_second = buffer.contents().matches(SHOW).count();

    assert_eq!(after_first, after_second);
    spinner.stop();
    assert!(cursor_visible(&buffer.contents()));
}

#[test]
fn test_cleanup_tolerates_already_stopped_spinners() {
    let (mut spinner, buffer) = running_spinner("stopped");
    spinner.succeed("ok");
    let before = buffer.contents();

    safety_net::restore_all();

    assert_eq!(buffer.contents(), before);
}

#[test]
fn test_spinners_are_registered() {
    let (_spinner, _buffer) = running_spinner("registered");
    assert!(safety_net::live_instances() >= 1);
}

#[test]
fn test_exit_guard_restores_on_drop() {
    let (_spinner, buffer) = running_spinner("guarded");
    {
        let _guard = safety_net::install_hooks();
    }
    assert!(cursor_visible(&buffer.contents()));
}
