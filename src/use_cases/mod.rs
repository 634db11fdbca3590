use crate::error::SetupError;
use crate::path_list;
use crate::ports::{EnvStore, InstallRecord, InstallRegistry, ProcessControl, ProcessEnv};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnregisterOutcome {
    /// Number of matching entries dropped.
    Removed(usize),
    NotPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    AlreadyVisible,
    Skipped,
}

#[derive(Debug)]
pub struct PathStatus {
    /// Matching entries in the persisted user PATH.
    pub user_entries: Result<usize, SetupError>,
    pub live: bool,
}

pub struct SetupService {
    env: Box<dyn EnvStore>,
    live: Box<dyn ProcessEnv>,
    processes: Box<dyn ProcessControl>,
    registry: Box<dyn InstallRegistry>,
}

impl SetupService {
    pub fn new(
        env: Box<dyn EnvStore>,
        live: Box<dyn ProcessEnv>,
        processes: Box<dyn ProcessControl>,
        registry: Box<dyn InstallRegistry>,
    ) -> Self {
        Self {
            env,
            live,
            processes,
            registry,
        }
    }

    /// Appends `dir` to the user PATH unless an equal entry already exists.
    pub fn register_path(&self, dir: &Path) -> Result<RegisterOutcome, SetupError> {
        let dir = dir_string(dir);
        let current = self.env.user_path()?.unwrap_or_default();
        let updated = path_list::append_entry(&current, &dir);
        if updated == current {
            log::debug!("User PATH already contains {}", dir);
            return Ok(RegisterOutcome::AlreadyPresent);
        }

        self.env.set_user_path(&updated)?;
        log::debug!("User PATH is now {}", updated);
        Ok(RegisterOutcome::Added)
    }

    /// Removes every entry equal to `dir` from the user PATH. Nothing is
    /// written when no entry matches.
    pub fn unregister_path(&self, dir: &Path) -> Result<UnregisterOutcome, SetupError> {
        let dir = dir_string(dir);
        let Some(current) = self.env.user_path()? else {
            return Ok(UnregisterOutcome::NotPresent);
        };

        let matches = path_list::count_entries(&current, &dir);
        if matches == 0 {
            log::debug!("User PATH does not contain {}", dir);
            return Ok(UnregisterOutcome::NotPresent);
        }

        let updated = path_list::remove_entry(&current, &dir);
        self.env.set_user_path(&updated)?;

        let after = self.env.user_path()?.unwrap_or_default();
        if path_list::contains_entry(&after, &dir) {
            return Err(SetupError::Verification(dir));
        }
        Ok(UnregisterOutcome::Removed(matches))
    }

    /// Rebuilds this process's PATH from the persisted machine and user
    /// values so `dir` is visible without a new login.
    pub fn refresh_path(&self, dir: &Path) -> RefreshOutcome {
        let dir = dir_string(dir);
        let live = self.live.var("PATH").unwrap_or_default();
        if path_list::contains_entry(&live, &dir) {
            return RefreshOutcome::AlreadyVisible;
        }

        let stored = self
            .env
            .machine_path()
            .and_then(|machine| Ok((machine, self.env.user_path()?)));
        let (machine, user) = match stored {
            Ok((machine, user)) => (machine.unwrap_or_default(), user.unwrap_or_default()),
            Err(err) => {
                log::warn!("Skipping PATH refresh: {}", err);
                return RefreshOutcome::Skipped;
            }
        };

        let merged = path_list::merge(&machine, &user);
        let expanded = path_list::expand_vars(&merged, |name| self.live.var(name));
        self.live.set_var("PATH", &expanded);
        RefreshOutcome::Refreshed
    }

    pub fn path_status(&self, dir: &Path) -> PathStatus {
        let dir = dir_string(dir);
        let user_entries = self
            .env
            .user_path()
            .map(|path| path_list::count_entries(&path.unwrap_or_default(), &dir));
        let live = path_list::contains_entry(&self.live.var("PATH").unwrap_or_default(), &dir);
        PathStatus { user_entries, live }
    }

    /// Stops running copies of `image_name` so their files can be replaced.
    pub fn terminate_running(&self, image_name: &str) {
        match self.processes.terminate(image_name) {
            Ok(true) => println!("Stopped running {}", image_name),
            Ok(false) => log::debug!("{} is not running", image_name),
            Err(err) => log::warn!("Could not stop {}: {}", image_name, err),
        }
    }

    pub fn previous_install(&self) -> Option<InstallRecord> {
        match self.registry.load() {
            Ok(record) => record,
            Err(err) => {
                log::warn!("Could not read previous install record: {}", err);
                None
            }
        }
    }

    pub fn record_install(&self, record: &InstallRecord) {
        if let Err(err) = self.registry.save(record) {
            log::warn!("Could not write install record: {}", err);
        }
    }

    pub fn forget_install(&self) {
        if let Err(err) = self.registry.remove() {
            log::warn!("Could not remove install record: {}", err);
        }
    }
}

fn dir_string(dir: &Path) -> String {
    dir.to_string_lossy().to_string()
}
