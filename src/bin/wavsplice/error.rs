use thiserror::Error;

#[derive(Error, Debug)]
/// Internal enum.
pub enum CliError {
    #[error("{0}")]
    /// Internal variant.
    Message(String),

    #[error("input not found: {0}")]
    /// Internal variant.
    InputNotFound(String),

    #[error("output path required when reading from stdin")]
    /// Internal variant.
    OutputRequired,

    #[error(transparent)]
    /// Internal variant.
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// Internal variant.
    Wave(#[from] wavsplice::Error),

    #[error(transparent)]
    /// Internal variant.
    Settings(#[from] wavsplice::settings::SettingsError),
}

/// Internal type alias.
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Internal helper method.
    pub fn user_message(&self) -> String {
        match self {
            Self::Message(msg) => msg.clone(),
            Self::InputNotFound(path) => format!("input not found: {path}"),
            Self::OutputRequired => {
                "output path required when reading from stdin; pass -o <PATH> or -o -".to_string()
            }
            Self::Io(err) => format!("I/O error: {err}"),
            Self::Wave(err) => format!("invalid wave data: {err}"),
            Self::Settings(err) => format!("failed to load settings: {err}"),
        }
    }
}
