use super::registry_values::path_value_expandable;
use crate::error::SetupError;
use crate::ports::EnvStore;
use std::io;
use winreg::enums::*;
use winreg::types::ToRegValue;
use winreg::RegKey;

const USER_ENV_KEY: &str = "Environment";
const MACHINE_ENV_KEY: &str = r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";
const PATH_VALUE: &str = "Path";

/// `HKCU\Environment` for writes, `HKLM\...\Session Manager\Environment` for
/// reads of the machine segment.
pub struct RegistryEnvStore;

impl RegistryEnvStore {
    pub fn new() -> Self {
        Self
    }
}

impl EnvStore for RegistryEnvStore {
    fn user_path(&self) -> Result<Option<String>, SetupError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let env = match hkcu.open_subkey_with_flags(USER_ENV_KEY, KEY_READ) {
            Ok(env) => env,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SetupError::env_read(err)),
        };
        read_path(&env)
    }

    fn set_user_path(&self, value: &str) -> Result<(), SetupError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let (env, _) = hkcu
            .create_subkey(USER_ENV_KEY)
            .map_err(SetupError::env_write)?;

        let expandable = write_path(&env, value)?;
        log::debug!("Wrote HKCU\\Environment\\Path (expandable: {})", expandable);

        broadcast_environment_change();
        Ok(())
    }

    fn machine_path(&self) -> Result<Option<String>, SetupError> {
        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let env = hklm
            .open_subkey_with_flags(MACHINE_ENV_KEY, KEY_READ)
            .map_err(SetupError::env_read)?;
        read_path(&env)
    }
}

fn read_path(key: &RegKey) -> Result<Option<String>, SetupError> {
    match key.get_value::<String, _>(PATH_VALUE) {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(SetupError::env_read(err)),
    }
}

/// Stores `value` as the key's Path and returns whether it went in as
/// `REG_EXPAND_SZ`.
fn write_path(key: &RegKey, value: &str) -> Result<bool, SetupError> {
    let existing_expandable = match key.get_raw_value(PATH_VALUE) {
        Ok(raw) => raw.vtype == REG_EXPAND_SZ,
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(err) => return Err(SetupError::env_read(err)),
    };
    let expandable = path_value_expandable(existing_expandable, value);

    let mut raw = value.to_string().to_reg_value();
    if expandable {
        raw.vtype = REG_EXPAND_SZ;
    }
    key.set_raw_value(PATH_VALUE, &raw)
        .map_err(SetupError::env_write)?;
    Ok(expandable)
}

/// Tells Explorer and other top-level windows to reload the environment so
/// processes they start afterwards inherit the new PATH.
fn broadcast_environment_change() {
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        SendMessageTimeoutW, HWND_BROADCAST, SMTO_ABORTIFHUNG, WM_SETTINGCHANGE,
    };

    let area: Vec<u16> = "Environment".encode_utf16().chain(Some(0)).collect();
    let mut result: usize = 0;
    let sent = unsafe {
        SendMessageTimeoutW(
            HWND_BROADCAST,
            WM_SETTINGCHANGE,
            0,
            area.as_ptr() as isize,
            SMTO_ABORTIFHUNG,
            5000,
            &mut result,
        )
    };
    if sent == 0 {
        log::warn!("Environment change broadcast timed out; new shells may need a fresh login");
    }
}
