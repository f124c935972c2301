use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombinerError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No root directory configured")]
    MissingRoot,

    #[error("Failed to read exclusions file {}: {source}", path.display())]
    Exclusions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for CombinerError {
    fn user_message(&self) -> String {
        match self {
            CombinerError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            CombinerError::MissingRoot => {
                "No root directory was given to combine".to_string()
            }
            CombinerError::Exclusions { path, source } => {
                format!(
                    "Could not read exclusions from {}: {}",
                    path.display(),
                    source
                )
            }
            CombinerError::WriteArtifact { path, source } => {
                format!("Could not write output file {}: {}", path.display(), source)
            }
            CombinerError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        let suggestion = match self {
            CombinerError::Config { .. } => {
                "Check your configuration file syntax and ensure all required fields are present."
            }
            CombinerError::MissingRoot => {
                "Pass a directory argument, set BASE_PATH, or set `root` under [source]."
            }
            CombinerError::Exclusions { .. } => {
                "Make sure the exclusions file is readable, or point --exclusions-file elsewhere."
            }
            CombinerError::WriteArtifact { .. } => {
                "Check write permission on the output directory, or pick another with --output-dir."
            }
            CombinerError::Logging { .. } => {
                "Check the log level and that the log directory is writable, or use --no-log-file."
            }
            _ => return None,
        };
        Some(suggestion.to_string())
    }
}

impl From<toml::de::Error> for CombinerError {
    fn from(error: toml::de::Error) -> Self {
        CombinerError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CombinerError>;
