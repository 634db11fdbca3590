#[cfg(test)]
pub mod memory;
#[cfg_attr(not(windows), allow(dead_code))]
pub mod process_control;
#[cfg_attr(not(windows), allow(dead_code))]
pub mod process_env;
#[cfg(windows)]
pub mod registry_env;
#[cfg_attr(not(windows), allow(dead_code))]
pub mod registry_values;
#[cfg(windows)]
pub mod uninstall_entry;

use crate::error::SetupError;
use crate::use_cases::SetupService;

/// Service wired to the registry and the live process environment.
#[cfg(windows)]
pub fn system_service() -> Result<SetupService, SetupError> {
    Ok(SetupService::new(
        Box::new(registry_env::RegistryEnvStore::new()),
        Box::new(process_env::CurrentProcessEnv),
        Box::new(process_control::SystemProcessControl),
        Box::new(uninstall_entry::UninstallEntry::new()),
    ))
}

#[cfg(not(windows))]
pub fn system_service() -> Result<SetupService, SetupError> {
    Err(SetupError::Unsupported("Changing the user PATH"))
}
