use crate::error::SetupError;
use std::path::PathBuf;

/// Persistent PATH store. The user value is read and written as one opaque
/// string; the machine value is only ever read.
pub trait EnvStore {
    fn user_path(&self) -> Result<Option<String>, SetupError>;
    fn set_user_path(&self, value: &str) -> Result<(), SetupError>;
    fn machine_path(&self) -> Result<Option<String>, SetupError>;
}

/// Environment of the running process.
pub trait ProcessEnv {
    fn var(&self, name: &str) -> Option<String>;
    fn set_var(&self, name: &str, value: &str);
}

pub trait ProcessControl {
    /// Force-terminates every process running `image_name`. Returns whether
    /// anything was running.
    fn terminate(&self, image_name: &str) -> Result<bool, SetupError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
    pub install_dir: PathBuf,
    pub version: String,
    pub path_registered: bool,
    pub desktop_shortcut: bool,
}

/// Installer bookkeeping, used to find a previous installation.
pub trait InstallRegistry {
    fn load(&self) -> Result<Option<InstallRecord>, SetupError>;
    fn save(&self, record: &InstallRecord) -> Result<(), SetupError>;
    fn remove(&self) -> Result<(), SetupError>;
}
