use super::registry_values::{
    uninstall_command, EntryValues, ADD_TO_PATH_FLAG, DISPLAY_VERSION, INSTALL_LOCATION,
    SHORTCUT_FLAG,
};
use crate::error::SetupError;
use crate::ports::{InstallRecord, InstallRegistry};
use crate::PRODUCT_NAME;
use std::io;
use winreg::enums::*;
use winreg::RegKey;

const UNINSTALL_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Uninstall\WinHtop";

/// Per-user "Apps & features" entry under HKCU. Doubles as the record of
/// where a previous installation lives.
pub struct UninstallEntry {
    key: String,
}

impl UninstallEntry {
    pub fn new() -> Self {
        Self::at(UNINSTALL_KEY)
    }

    /// Entry stored under another HKCU subkey.
    pub fn at(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }
}

fn optional<T>(result: io::Result<T>) -> Result<Option<T>, SetupError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl InstallRegistry for UninstallEntry {
    fn load(&self) -> Result<Option<InstallRecord>, SetupError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let Some(key) = optional(hkcu.open_subkey_with_flags(&self.key, KEY_READ))? else {
            return Ok(None);
        };

        let values = EntryValues {
            location: optional(key.get_value(INSTALL_LOCATION))?,
            version: optional(key.get_value(DISPLAY_VERSION))?,
            add_to_path: optional(key.get_value(ADD_TO_PATH_FLAG))?,
            desktop_shortcut: optional(key.get_value(SHORTCUT_FLAG))?,
        };
        Ok(values.into_record())
    }

    fn save(&self, record: &InstallRecord) -> Result<(), SetupError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let (key, _) = hkcu.create_subkey(&self.key)?;

        let location = record.install_dir.display().to_string();
        key.set_value("DisplayName", &PRODUCT_NAME)?;
        key.set_value(DISPLAY_VERSION, &record.version)?;
        key.set_value("Publisher", &PRODUCT_NAME)?;
        key.set_value(INSTALL_LOCATION, &location)?;
        key.set_value("UninstallString", &uninstall_command(&record.install_dir))?;
        key.set_value("NoModify", &1u32)?;
        key.set_value("NoRepair", &1u32)?;
        key.set_value(ADD_TO_PATH_FLAG, &u32::from(record.path_registered))?;
        key.set_value(SHORTCUT_FLAG, &u32::from(record.desktop_shortcut))?;
        Ok(())
    }

    fn remove(&self) -> Result<(), SetupError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        match hkcu.delete_subkey_all(&self.key) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
