use crate::error::SetupError;
use crate::install_dir::DirOrigin;
use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "setup.toml";

pub const ENV_INSTALL_DIR: &str = "WINHTOP_INSTALL_DIR";
pub const ENV_ADD_TO_PATH: &str = "WINHTOP_ADD_TO_PATH";
pub const ENV_DESKTOP_SHORTCUT: &str = "WINHTOP_DESKTOP_SHORTCUT";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    install: InstallSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstallSection {
    dir: Option<PathBuf>,
    add_to_path: Option<bool>,
    desktop_shortcut: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Default,
    File,
    Env,
    Flag,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::Default => "default",
            Source::File => "config file",
            Source::Env => "environment",
            Source::Flag => "command line",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Setting<T> {
    fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }
}

/// Values given on the command line. `None` defers to lower layers.
#[derive(Debug, Default)]
pub struct Overrides {
    pub install_dir: Option<PathBuf>,
    pub add_to_path: Option<bool>,
    pub desktop_shortcut: Option<bool>,
}

#[derive(Debug)]
pub struct SetupConfig {
    pub config_path: Option<PathBuf>,
    pub install_dir: Option<Setting<PathBuf>>,
    pub add_to_path: Setting<bool>,
    pub desktop_shortcut: Setting<bool>,
}

impl SetupConfig {
    /// Defaults, then `setup.toml`, then `WINHTOP_*` variables, then flags.
    pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self, SetupError> {
        let file = match explicit {
            Some(path) => Some((path.to_path_buf(), fs::read_to_string(path)?)),
            None => match default_config_path() {
                Some(path) => match fs::read_to_string(&path) {
                    Ok(text) => Some((path, text)),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => None,
                    Err(err) => return Err(err.into()),
                },
                None => None,
            },
        };

        Self::from_layers(file, |name| env::var(name).ok(), overrides)
    }

    fn from_layers<F>(
        file: Option<(PathBuf, String)>,
        lookup: F,
        overrides: &Overrides,
    ) -> Result<Self, SetupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SetupConfig {
            config_path: None,
            install_dir: None,
            add_to_path: Setting::new(false, Source::Default),
            desktop_shortcut: Setting::new(false, Source::Default),
        };

        if let Some((path, text)) = file {
            let parsed: ConfigFile = toml::from_str(&text).map_err(|err| SetupError::Config {
                path: path.clone(),
                message: err.message().to_string(),
            })?;
            let section = parsed.install;
            if let Some(dir) = section.dir {
                config.install_dir = Some(Setting::new(dir, Source::File));
            }
            if let Some(value) = section.add_to_path {
                config.add_to_path = Setting::new(value, Source::File);
            }
            if let Some(value) = section.desktop_shortcut {
                config.desktop_shortcut = Setting::new(value, Source::File);
            }
            config.config_path = Some(path);
        }

        if let Some(dir) = lookup(ENV_INSTALL_DIR).filter(|dir| !dir.trim().is_empty()) {
            config.install_dir = Some(Setting::new(PathBuf::from(dir), Source::Env));
        }
        if let Some(value) = env_bool(&lookup, ENV_ADD_TO_PATH)? {
            config.add_to_path = Setting::new(value, Source::Env);
        }
        if let Some(value) = env_bool(&lookup, ENV_DESKTOP_SHORTCUT)? {
            config.desktop_shortcut = Setting::new(value, Source::Env);
        }

        if let Some(dir) = &overrides.install_dir {
            config.install_dir = Some(Setting::new(dir.clone(), Source::Flag));
        }
        if let Some(value) = overrides.add_to_path {
            config.add_to_path = Setting::new(value, Source::Flag);
        }
        if let Some(value) = overrides.desktop_shortcut {
            config.desktop_shortcut = Setting::new(value, Source::Flag);
        }

        Ok(config)
    }
}

pub fn run_config(
    config: &SetupConfig,
    install_dir: &Path,
    origin: DirOrigin,
) -> Result<(), Box<dyn Error>> {
    let exe = env::current_exe()?;
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Binary: {}", exe.display());
    match &config.config_path {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none)"),
    }
    println!("Install dir: {} ({})", install_dir.display(), origin);
    println!(
        "Add to PATH: {} ({})",
        config.add_to_path.value, config.add_to_path.source
    );
    println!(
        "Desktop shortcut: {} ({})",
        config.desktop_shortcut.value, config.desktop_shortcut.source
    );

    for name in [ENV_INSTALL_DIR, ENV_ADD_TO_PATH, ENV_DESKTOP_SHORTCUT, crate::ENV_LOG] {
        if let Ok(value) = env::var(name) {
            println!("{}: {}", name, value);
        }
    }

    Ok(())
}

/// `setup.toml` next to the running setup executable.
pub fn default_config_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    Some(exe.parent()?.join(CONFIG_FILE))
}

fn env_bool<F>(lookup: &F, name: &str) -> Result<Option<bool>, SetupError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_bool(&raw).map(Some).ok_or_else(|| SetupError::Config {
        path: PathBuf::from(name),
        message: format!("expected true/false (or yes/no), got {:?}", raw),
    })
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
