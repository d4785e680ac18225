//! Describe command implementation.
//!
//! Loads configuration, validates the image, asks the vision model for a
//! description while a spinner runs, then prints or hands off the result.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cli::output::{open_with_prompt, write_prompt, write_usage_hint};
use crate::config::{self, ConfigError, RpromptConfig, SpinnerSettings};
use crate::feedback::Spinner;
use crate::vision::{
    load_image, GeminiClient, ImageError, VisionError, VisionModel, DESCRIBE_INSTRUCTION,
};

/// Result type for describe command operations.
pub type DescribeResult<T = ()> = Result<T, DescribeError>;

/// Error type for describe command operations.
#[derive(Debug, thiserror::Error)]
pub enum DescribeError {
    /// Configuration could not be loaded or is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The image is missing or unreadable.
    #[error(transparent)]
    Image(#[from] ImageError),
    /// The vision request failed.
    #[error(transparent)]
    Vision(#[from] VisionError),
    /// Writing the result to the terminal failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Options for the describe command.
#[derive(Debug, Clone, Default)]
pub struct DescribeOptions {
    /// Image to describe.
    pub image: PathBuf,
    /// Copy to clipboard and open the studio page.
    pub open: bool,
    /// Override the configured model.
    pub model: Option<String>,
    /// Override the configured spinner style.
    pub spinner: Option<String>,
    /// Config file to use instead of the default location.
    pub config: Option<PathBuf>,
}

/// Apply command-line overrides on top of loaded config.
pub fn apply_overrides(config: &mut RpromptConfig, options: &DescribeOptions) {
    if let Some(model) = &options.model {
        config.model = model.clone();
    }
    if let Some(style) = &options.spinner {
        config.spinner.style = style.clone();
    }
}

/// Label shown while waiting on `model`.
pub fn spinner_label(model: &dyn VisionModel) -> String {
    format!("Analyzing image with {}", model.name())
}

/// Ask `model` to describe the image at `path`, animating `spinner` meanwhile.
///
/// Image validation happens before the spinner starts. Vision errors are
/// reported on the spinner line and then returned.
pub fn generate_prompt<W>(
    model: &dyn VisionModel,
    path: &Path,
    spinner: &mut Spinner<W>,
) -> DescribeResult<String>
where
    W: Write + Send + 'static,
{
    let image = load_image(path)?;
    let prompt = spinner.scoped(|| model.describe(&image, DESCRIBE_INSTRUCTION))?;
    Ok(prompt)
}

/// Build a stdout spinner from settings.
fn stdout_spinner(settings: &SpinnerSettings, model: &dyn VisionModel) -> Spinner {
    Spinner::new(settings.to_spinner_config(spinner_label(model)))
}

/// Execute the describe command.
pub fn describe(options: DescribeOptions) -> DescribeResult {
    config::load_env_file();

    let mut config = RpromptConfig::load(options.config.as_deref())?;
    apply_overrides(&mut config, &options);

    let api_key = config::api_key()?;
    let client = GeminiClient::new(api_key, &config.model, &config.api_base_url)?;
    log::debug!("using model {}", client.model());

    let mut spinner = stdout_spinner(&config.spinner, &client);
    let prompt = generate_prompt(&client, &options.image, &mut spinner)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_prompt(&mut out, &prompt)?;
    if options.open {
        open_with_prompt(&mut out, &prompt, &config.studio_url)?;
    } else {
        write_usage_hint(&mut out, &config.studio_url)?;
    }
    Ok(())
}
