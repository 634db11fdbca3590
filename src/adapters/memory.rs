//! In-memory port implementations for tests.

use crate::error::SetupError;
use crate::ports::{EnvStore, InstallRecord, InstallRegistry, ProcessControl, ProcessEnv};
use crate::use_cases::SetupService;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

#[derive(Default)]
pub struct MemoryEnvStore {
    pub user: RefCell<Option<String>>,
    pub machine: RefCell<Option<String>>,
    pub writes: Cell<usize>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
}

impl MemoryEnvStore {
    pub fn with_paths(machine: &str, user: &str) -> Rc<Self> {
        Rc::new(Self {
            user: RefCell::new(Some(user.to_string())),
            machine: RefCell::new(Some(machine.to_string())),
            ..Self::default()
        })
    }

    pub fn user_value(&self) -> Option<String> {
        self.user.borrow().clone()
    }
}

fn denied() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "access denied")
}

impl EnvStore for Rc<MemoryEnvStore> {
    fn user_path(&self) -> Result<Option<String>, SetupError> {
        if self.fail_reads.get() {
            return Err(SetupError::env_read(denied()));
        }
        Ok(self.user.borrow().clone())
    }

    fn set_user_path(&self, value: &str) -> Result<(), SetupError> {
        if self.fail_writes.get() {
            return Err(SetupError::env_write(denied()));
        }
        self.writes.set(self.writes.get() + 1);
        *self.user.borrow_mut() = Some(value.to_string());
        Ok(())
    }

    fn machine_path(&self) -> Result<Option<String>, SetupError> {
        if self.fail_reads.get() {
            return Err(SetupError::env_read(denied()));
        }
        Ok(self.machine.borrow().clone())
    }
}

#[derive(Default)]
pub struct MemoryProcessEnv {
    pub vars: RefCell<HashMap<String, String>>,
}

impl MemoryProcessEnv {
    pub fn with_vars(vars: &[(&str, &str)]) -> Rc<Self> {
        let env = Self::default();
        for (name, value) in vars {
            env.vars
                .borrow_mut()
                .insert(name.to_string(), value.to_string());
        }
        Rc::new(env)
    }
}

impl ProcessEnv for Rc<MemoryProcessEnv> {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.borrow().get(name).cloned()
    }

    fn set_var(&self, name: &str, value: &str) {
        self.vars
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }
}

#[derive(Default)]
pub struct RecordingProcessControl {
    pub terminated: RefCell<Vec<String>>,
}

impl ProcessControl for Rc<RecordingProcessControl> {
    fn terminate(&self, image_name: &str) -> Result<bool, SetupError> {
        self.terminated.borrow_mut().push(image_name.to_string());
        Ok(false)
    }
}

#[derive(Default)]
pub struct MemoryInstallRegistry {
    pub record: RefCell<Option<InstallRecord>>,
}

impl InstallRegistry for Rc<MemoryInstallRegistry> {
    fn load(&self) -> Result<Option<InstallRecord>, SetupError> {
        Ok(self.record.borrow().clone())
    }

    fn save(&self, record: &InstallRecord) -> Result<(), SetupError> {
        *self.record.borrow_mut() = Some(record.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), SetupError> {
        self.record.borrow_mut().take();
        Ok(())
    }
}

/// Shared handles to every fake, so tests can inspect state after handing
/// boxed copies to a [`SetupService`].
pub struct Fakes {
    pub env: Rc<MemoryEnvStore>,
    pub live: Rc<MemoryProcessEnv>,
    pub processes: Rc<RecordingProcessControl>,
    pub registry: Rc<MemoryInstallRegistry>,
}

impl Fakes {
    pub fn new(machine: &str, user: &str) -> Self {
        Self {
            env: MemoryEnvStore::with_paths(machine, user),
            live: MemoryProcessEnv::with_vars(&[
                ("PATH", machine),
                ("SystemRoot", r"C:\Windows"),
            ]),
            processes: Rc::new(RecordingProcessControl::default()),
            registry: Rc::new(MemoryInstallRegistry::default()),
        }
    }

    pub fn service(&self) -> SetupService {
        SetupService::new(
            Box::new(self.env.clone()),
            Box::new(self.live.clone()),
            Box::new(self.processes.clone()),
            Box::new(self.registry.clone()),
        )
    }

    pub fn live_path(&self) -> String {
        self.live.var("PATH").unwrap_or_default()
    }
}
