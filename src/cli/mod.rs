//! CLI arguments and command dispatch.
//!
//! This module contains the clap CLI definition and the describe command.

pub mod describe;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::feedback::spinner_names;

pub use describe::{describe, DescribeError, DescribeOptions};

/// Generate descriptive prompts from images using Google Gemini.
///
/// Sends the image to a vision model and prints a single-paragraph prompt
/// that could be used to recreate it.
#[derive(Parser, Debug)]
#[command(name = "rprompt")]
#[command(author, version = crate::VERSION, about, long_about = None)]
#[command(override_usage = "rprompt <IMAGE> [--open]")]
pub struct Cli {
    /// Path to the image file.
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Copy prompt to clipboard and open Google AI Studio in browser.
    #[arg(long)]
    pub open: bool,

    /// Vision model to use (overrides config).
    #[arg(short = 'm', long, env = "RPROMPT_MODEL")]
    pub model: Option<String>,

    /// Spinner style while waiting.
    #[arg(long, value_parser = spinner_names())]
    pub spinner: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Describe options for the given image.
    pub fn describe_options(&self, image: PathBuf) -> DescribeOptions {
        DescribeOptions {
            image,
            open: self.open,
            model: self.model.clone(),
            spinner: self.spinner.clone(),
            config: self.config.clone(),
        }
    }
}
