//! Terminal progress feedback.
//!
//! This module provides the inline spinner shown while a blocking call is in
//! flight, the frame sets it animates, and the process-wide safety net that
//! keeps the cursor from being left hidden.

mod art;
pub mod safety_net;
mod spinner;

pub use art::{get_spinner_frame, get_spinner_frames, spinner_names, DEFAULT_SPINNER, SPINNERS};
pub use spinner::{
    Frames, Spinner, SpinnerConfig, DEFAULT_FAILURE_MESSAGE, DEFAULT_INTERVAL,
    DEFAULT_SUCCESS_MESSAGE,
};
