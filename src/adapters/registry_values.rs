//! Value-level rules shared by the registry adapters. Kept free of `winreg`
//! so they are checked on every platform.

use crate::ports::InstallRecord;
use crate::SETUP_EXE;
use std::path::{Path, PathBuf};

pub const INSTALL_LOCATION: &str = "InstallLocation";
pub const DISPLAY_VERSION: &str = "DisplayVersion";
pub const ADD_TO_PATH_FLAG: &str = "WinHtopAddToPath";
pub const SHORTCUT_FLAG: &str = "WinHtopDesktopShortcut";

/// Whether a rewritten PATH must be stored as `REG_EXPAND_SZ`. An existing
/// expandable value stays expandable, and any `%VAR%` reference needs it.
pub fn path_value_expandable(existing_expandable: bool, value: &str) -> bool {
    existing_expandable || value.contains('%')
}

/// Raw values read from the uninstall entry. `None` means the value is absent.
#[derive(Debug, Default)]
pub struct EntryValues {
    pub location: Option<String>,
    pub version: Option<String>,
    pub add_to_path: Option<u32>,
    pub desktop_shortcut: Option<u32>,
}

impl EntryValues {
    /// An entry without a usable `InstallLocation` does not describe an
    /// installation. Missing flags read as off.
    pub fn into_record(self) -> Option<InstallRecord> {
        let location = self.location?;
        if location.trim().is_empty() {
            return None;
        }
        Some(InstallRecord {
            install_dir: PathBuf::from(location),
            version: self.version.unwrap_or_default(),
            path_registered: self.add_to_path.is_some_and(|v| v != 0),
            desktop_shortcut: self.desktop_shortcut.is_some_and(|v| v != 0),
        })
    }
}

pub fn uninstall_command(install_dir: &Path) -> String {
    format!("\"{}\" uninstall", install_dir.join(SETUP_EXE).display())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(location: &str) -> EntryValues {
        EntryValues {
            location: Some(location.to_string()),
            version: Some("0.3.0".to_string()),
            add_to_path: Some(1),
            desktop_shortcut: Some(0),
        }
    }

    #[test]
    fn test_expandable_kept_when_value_had_it() {
        assert!(path_value_expandable(true, r"C:\Tools"));
    }

    #[test]
    fn test_expandable_when_value_references_variables() {
        assert!(path_value_expandable(false, r"%USERPROFILE%\bin;C:\Tools"));
    }

    #[test]
    fn test_plain_value_stays_plain() {
        assert!(!path_value_expandable(false, r"C:\Tools;D:\WinHtop"));
        assert!(!path_value_expandable(false, ""));
    }

    #[test]
    fn test_entry_maps_to_record() {
        let record = values(r"C:\Users\me\AppData\Local\Programs\WinHtop")
            .into_record()
            .unwrap();
        assert_eq!(
            record.install_dir,
            PathBuf::from(r"C:\Users\me\AppData\Local\Programs\WinHtop")
        );
        assert_eq!(record.version, "0.3.0");
        assert!(record.path_registered);
        assert!(!record.desktop_shortcut);
    }

    #[test]
    fn test_entry_without_location_is_not_an_install() {
        let mut entry = values("");
        assert_eq!(entry.into_record(), None);

        entry = values("   ");
        assert_eq!(entry.into_record(), None);

        entry = values(r"C:\WinHtop");
        entry.location = None;
        assert_eq!(entry.into_record(), None);
    }

    #[test]
    fn test_missing_flags_read_as_off() {
        let record = EntryValues {
            location: Some(r"D:\WinHtop".to_string()),
            ..EntryValues::default()
        }
        .into_record()
        .unwrap();
        assert_eq!(record.version, "");
        assert!(!record.path_registered);
        assert!(!record.desktop_shortcut);
    }

    #[test]
    fn test_uninstall_command_quotes_path() {
        let command = uninstall_command(Path::new("Program Files"));
        assert!(command.starts_with('"'));
        assert!(command.ends_with("\" uninstall"));
        assert!(command.contains(SETUP_EXE));
    }
}
