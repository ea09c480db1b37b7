use std::fmt;
use thiserror::Error;

/// Stage of a category import run, reported alongside fatal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Locate,
    Extract,
    Provision,
    Parse,
    Folder,
    Map,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Locate => "locate markup file",
            Stage::Extract => "extract markup content",
            Stage::Provision => "provision image path",
            Stage::Parse => "parse markup",
            Stage::Folder => "get or create folder",
            Stage::Map => "map records",
            Stage::Persist => "persist documents",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Markup error: {message}")]
    MarkupError { message: String },

    #[error("Malformed archive: {message}")]
    MalformedArchive { message: String },

    #[error("Markup file {directory}/{file_name} for {category} not found in archive")]
    MissingMarkupFile {
        category: String,
        directory: String,
        file_name: String,
    },

    #[error("Remote {operation} failed for '{target}': {message}")]
    RemoteError {
        operation: String,
        target: String,
        message: String,
    },

    #[error("Import of {category} failed while trying to {stage}: {source}")]
    StageError {
        category: String,
        stage: Stage,
        #[source]
        source: Box<ImportError>,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ImportError {
    pub fn remote(
        operation: impl Into<String>,
        target: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        ImportError::RemoteError {
            operation: operation.into(),
            target: target.into(),
            message: message.to_string(),
        }
    }

    pub fn at_stage(self, category: impl Into<String>, stage: Stage) -> Self {
        ImportError::StageError {
            category: category.into(),
            stage,
            source: Box::new(self),
        }
    }

    /// Failing stage, when the error was raised by a category run.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ImportError::StageError { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ImportError::StageError { source, .. } => source.severity(),
            ImportError::RemoteError { .. } => ErrorSeverity::Medium,
            ImportError::MissingMarkupFile { .. } | ImportError::MarkupError { .. } => {
                ErrorSeverity::High
            }
            ImportError::ConfigError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => ErrorSeverity::High,
            ImportError::MalformedArchive { .. } | ImportError::ZipError(_) => {
                ErrorSeverity::Critical
            }
            ImportError::IoError(_) | ImportError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ImportError::StageError { source, .. } => source.recovery_suggestion(),
            ImportError::MissingMarkupFile { file_name, .. } => format!(
                "Make sure the archive is a complete OggDude data export containing {}",
                file_name
            ),
            ImportError::MalformedArchive { .. } | ImportError::ZipError(_) => {
                "Re-export the data archive and check that it is a valid zip file".to_string()
            }
            ImportError::MarkupError { .. } => {
                "The markup file is not well-formed; re-export it from the generator".to_string()
            }
            ImportError::RemoteError { .. } => {
                "Check storage permissions and free space, then re-run the import".to_string()
            }
            ImportError::ConfigError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => {
                "Review the command line flags and the configuration file".to_string()
            }
            ImportError::IoError(_) | ImportError::SerializationError(_) => {
                "Check that the data root is readable and writable".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
