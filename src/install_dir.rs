use crate::config::{Setting, Source};
use crate::error::SetupError;
use crate::ports::InstallRecord;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirOrigin {
    Configured(Source),
    PreviousInstall,
    Default,
}

impl fmt::Display for DirOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirOrigin::Configured(source) => write!(f, "{}", source),
            DirOrigin::PreviousInstall => f.write_str("previous install"),
            DirOrigin::Default => f.write_str("default"),
        }
    }
}

/// `%LOCALAPPDATA%\Programs\WinHtop`.
pub fn default_install_dir() -> Result<PathBuf, SetupError> {
    let local = dirs::data_local_dir()
        .or_else(|| env::var("LOCALAPPDATA").ok().map(PathBuf::from))
        .or_else(|| {
            env::var("USERPROFILE")
                .ok()
                .map(|profile| PathBuf::from(profile).join("AppData").join("Local"))
        })
        .ok_or(SetupError::InstallDirUnavailable)?;
    Ok(local.join("Programs").join(crate::PRODUCT_NAME))
}

/// Explicit configuration wins, then the location of an earlier install,
/// then the per-user default.
pub fn resolve_install_dir(
    configured: Option<&Setting<PathBuf>>,
    previous: Option<&InstallRecord>,
) -> Result<(PathBuf, DirOrigin), SetupError> {
    let (dir, origin) = match (configured, previous) {
        (Some(setting), _) => (setting.value.clone(), DirOrigin::Configured(setting.source)),
        (None, Some(record)) => (record.install_dir.clone(), DirOrigin::PreviousInstall),
        (None, None) => (default_install_dir()?, DirOrigin::Default),
    };
    Ok((absolute(&dir)?, origin))
}

fn absolute(dir: &Path) -> Result<PathBuf, SetupError> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(dir))
    }
}
