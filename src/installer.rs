use crate::error::SetupError;
use crate::ports::InstallRecord;
use crate::shortcut;
use crate::use_cases::{RefreshOutcome, RegisterOutcome, SetupService};
use crate::{PRODUCT_EXE, SETUP_EXE};
use std::fs;
use std::path::{Path, PathBuf};

pub struct InstallOptions {
    pub source_exe: PathBuf,
    /// Setup binary to leave in the install directory as the uninstaller.
    pub setup_exe: Option<PathBuf>,
    pub install_dir: PathBuf,
    pub add_to_path: bool,
    pub desktop_shortcut: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    FilesCopied,
    PathRegistered,
    Refreshed,
    Complete,
}

#[derive(Debug)]
pub struct InstallReport {
    pub target_exe: PathBuf,
    pub stages: Vec<InstallStage>,
    pub register: Option<RegisterOutcome>,
    pub refresh: Option<RefreshOutcome>,
    pub shortcut: Option<PathBuf>,
}

/// Places the product in `install_dir` and, when asked, puts that directory
/// on the user PATH. PATH problems are logged and never fail the install.
pub fn run_install(
    service: &SetupService,
    options: &InstallOptions,
) -> Result<InstallReport, SetupError> {
    if !options.source_exe.is_file() {
        return Err(SetupError::SourceMissing(options.source_exe.clone()));
    }

    service.terminate_running(PRODUCT_EXE);

    let install_dir = &options.install_dir;
    fs::create_dir_all(install_dir)?;
    let target_exe = install_dir.join(PRODUCT_EXE);
    copy_over(&options.source_exe, &target_exe)?;
    if let Some(setup_exe) = &options.setup_exe {
        copy_over(setup_exe, &install_dir.join(SETUP_EXE))?;
    }

    let mut report = InstallReport {
        target_exe,
        stages: vec![InstallStage::FilesCopied],
        register: None,
        refresh: None,
        shortcut: None,
    };

    if options.add_to_path {
        match service.register_path(install_dir) {
            Ok(outcome) => {
                match outcome {
                    RegisterOutcome::Added => println!("Added to PATH: {}", install_dir.display()),
                    RegisterOutcome::AlreadyPresent => {
                        println!("PATH already contains: {}", install_dir.display())
                    }
                }
                report.register = Some(outcome);
                report.stages.push(InstallStage::PathRegistered);
            }
            Err(err) => log::warn!("Could not add {} to PATH: {}", install_dir.display(), err),
        }
    }

    report.refresh = Some(service.refresh_path(install_dir));
    report.stages.push(InstallStage::Refreshed);

    if options.desktop_shortcut {
        match shortcut::create_desktop_shortcut(&report.target_exe, install_dir) {
            Ok(link) => {
                println!("Created shortcut {}", link.display());
                report.shortcut = Some(link);
            }
            Err(err) => log::warn!("Could not create desktop shortcut: {}", err),
        }
    }

    let path_registered = matches!(service.path_status(install_dir).user_entries, Ok(n) if n > 0);
    service.record_install(&InstallRecord {
        install_dir: install_dir.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        path_registered,
        desktop_shortcut: report.shortcut.is_some(),
    });

    report.stages.push(InstallStage::Complete);
    Ok(report)
}

/// What to tell the user once files are in place. Without the PATH option
/// the directory is only on PATH if an earlier install put it there.
pub fn next_step(add_to_path: bool, target_exe: &Path) -> String {
    if add_to_path {
        "Open a new terminal and run `winhtop`.".to_string()
    } else {
        format!("Run it with \"{}\".", target_exe.display())
    }
}

/// Overwrites `target`, skipping the copy when both name the same file.
fn copy_over(source: &Path, target: &Path) -> Result<(), SetupError> {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(source), fs::canonicalize(target)) {
        if a == b {
            log::debug!("{} is already in place", target.display());
            return Ok(());
        }
    }
    fs::copy(source, target)?;
    log::debug!("Copied {} -> {}", source.display(), target.display());
    Ok(())
}
