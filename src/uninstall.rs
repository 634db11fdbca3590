use crate::error::SetupError;
use crate::shortcut;
use crate::use_cases::{SetupService, UnregisterOutcome};
use crate::util::{ps_quote, remove_dir_if_empty, remove_file_if_present};
use crate::{PRODUCT_EXE, SETUP_EXE};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct UninstallOptions {
    pub install_dir: PathBuf,
    pub remove_shortcut: bool,
    /// The running setup binary. When it lives inside `install_dir` its
    /// removal is deferred until this process exits.
    pub current_exe: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallStage {
    PathUnregistered,
    FilesRemoved,
    Complete,
}

#[derive(Debug)]
pub struct UninstallReport {
    pub stages: Vec<UninstallStage>,
    pub unregister: Option<UnregisterOutcome>,
    pub removed: Vec<PathBuf>,
    pub deferred: bool,
}

/// Takes the install directory off the user PATH, then deletes the installed
/// files. A PATH failure is logged and file removal still runs.
pub fn run_uninstall(
    service: &SetupService,
    options: &UninstallOptions,
) -> Result<UninstallReport, SetupError> {
    let install_dir = &options.install_dir;
    service.terminate_running(PRODUCT_EXE);

    let unregister = match service.unregister_path(install_dir) {
        Ok(outcome) => {
            match outcome {
                UnregisterOutcome::Removed(count) => {
                    println!("Removed from PATH: {} ({} entries)", install_dir.display(), count)
                }
                UnregisterOutcome::NotPresent => {
                    log::debug!("{} was not on PATH", install_dir.display())
                }
            }
            Some(outcome)
        }
        Err(err) => {
            log::warn!("Could not remove {} from PATH: {}", install_dir.display(), err);
            None
        }
    };

    let mut report = UninstallReport {
        stages: Vec::new(),
        unregister,
        removed: Vec::new(),
        deferred: false,
    };
    if report.unregister.is_some() {
        report.stages.push(UninstallStage::PathUnregistered);
    }

    let target_exe = install_dir.join(PRODUCT_EXE);
    if remove_file_if_present(&target_exe)? {
        println!("Removed {}", target_exe.display());
        report.removed.push(target_exe);
    } else {
        println!("Binary already removed: {}", target_exe.display());
    }

    if options.remove_shortcut {
        match shortcut::remove_desktop_shortcut() {
            Ok(Some(link)) => {
                println!("Removed {}", link.display());
                report.removed.push(link);
            }
            Ok(None) => {}
            Err(err) => log::warn!("Could not remove desktop shortcut: {}", err),
        }
    }

    let setup_exe = install_dir.join(SETUP_EXE);
    if same_file(&options.current_exe, &setup_exe) {
        schedule_removal(&setup_exe, install_dir)?;
        report.deferred = true;
        println!("Uninstall will finish after this process exits.");
    } else {
        if remove_file_if_present(&setup_exe)? {
            report.removed.push(setup_exe);
        }
        if remove_dir_if_empty(install_dir)? {
            log::debug!("Removed {}", install_dir.display());
        } else {
            println!("Kept {} (not empty)", install_dir.display());
        }
    }

    report.stages.push(UninstallStage::FilesRemoved);
    service.forget_install();
    report.stages.push(UninstallStage::Complete);
    Ok(report)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// A running executable cannot delete itself on Windows. A detached
/// PowerShell outlives this process and finishes the cleanup.
fn schedule_removal(target: &Path, install_dir: &Path) -> Result<(), SetupError> {
    let script = removal_script(std::process::id(), target, install_dir);
    Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", &script])
        .spawn()?;
    Ok(())
}

/// Waits for `pid` to exit, deletes `target`, then deletes `install_dir`
/// only if it ended up empty.
fn removal_script(pid: u32, target: &Path, install_dir: &Path) -> String {
    let target = ps_quote(&target.display().to_string());
    let dir = ps_quote(&install_dir.display().to_string());
    [
        format!("Wait-Process -Id {} -ErrorAction SilentlyContinue", pid),
        format!("Remove-Item -LiteralPath {} -Force -ErrorAction SilentlyContinue", target),
        format!(
            "if (-not (Get-ChildItem -LiteralPath {dir} -Force -ErrorAction SilentlyContinue)) \
             {{ Remove-Item -LiteralPath {dir} -Force -ErrorAction SilentlyContinue }}"
        ),
    ]
    .join("; ")
}
