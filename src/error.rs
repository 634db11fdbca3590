use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// The user or machine PATH could not be read or written.
    #[error("Cannot {action} environment: {source}")]
    EnvironmentAccess {
        action: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("PATH still contains {0} after removal")]
    Verification(String),
    #[error("{0} is only supported on Windows")]
    Unsupported(&'static str),
    #[error("Unable to determine the install directory (LOCALAPPDATA/USERPROFILE not found)")]
    InstallDirUnavailable,
    #[error("{} not found", .0.display())]
    SourceMissing(PathBuf),
    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg_attr(not(windows), allow(dead_code))]
impl SetupError {
    pub fn env_read(source: io::Error) -> Self {
        SetupError::EnvironmentAccess {
            action: "read",
            source,
        }
    }

    pub fn env_write(source: io::Error) -> Self {
        SetupError::EnvironmentAccess {
            action: "write",
            source,
        }
    }
}
