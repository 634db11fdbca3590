mod adapters;
mod completion;
mod config;
mod doctor;
mod error;
mod install_dir;
mod installer;
mod path_list;
mod ports;
mod shortcut;
mod uninstall;
mod use_cases;
mod util;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use config::{Overrides, SetupConfig};
use installer::InstallOptions;
use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use uninstall::UninstallOptions;

pub const PRODUCT_NAME: &str = "WinHtop";
pub const PRODUCT_EXE: &str = "WinHtop.exe";
pub const SETUP_EXE: &str = "winhtop-setup.exe";
pub const ENV_LOG: &str = "WINHTOP_SETUP_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "winhtop-setup",
    version,
    about = "Install or remove WinHtop for the current user"
)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to setup.toml next to this program)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Copy WinHtop into the install directory (default)
    Install(InstallArgs),
    /// Remove WinHtop and its PATH entry
    Uninstall(DirArgs),
    /// Check the installation and PATH
    #[command(alias = "doctor")]
    Status(DirArgs),
    /// Show resolved settings
    #[command(alias = "env")]
    Config(DirArgs),
    /// Generate shell completion
    Completion {
        shell: Shell,
    },
}

#[derive(Debug, Default, Args)]
struct InstallArgs {
    /// WinHtop.exe to install (defaults to the one next to this program)
    #[arg(long, value_name = "EXE")]
    source: Option<PathBuf>,

    #[command(flatten)]
    dir: DirArgs,

    /// Add the install directory to the user PATH
    #[arg(long, overrides_with = "no_add_to_path")]
    add_to_path: bool,

    /// Leave the user PATH untouched
    #[arg(long, overrides_with = "add_to_path")]
    no_add_to_path: bool,

    /// Create a desktop shortcut
    #[arg(long)]
    desktop_shortcut: bool,
}

#[derive(Debug, Default, Args)]
struct DirArgs {
    /// Install directory (defaults to %LOCALAPPDATA%\Programs\WinHtop)
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl InstallArgs {
    fn overrides(&self) -> Overrides {
        let add_to_path = match (self.add_to_path, self.no_add_to_path) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Overrides {
            install_dir: self.dir.dir.clone(),
            add_to_path,
            desktop_shortcut: self.desktop_shortcut.then_some(true),
        }
    }
}

impl DirArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            install_dir: self.dir.clone(),
            ..Overrides::default()
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(ENV_LOG, level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config_file = cli.config.as_deref();

    match cli.command.unwrap_or(Command::Install(InstallArgs::default())) {
        Command::Install(args) => run_install(&args, config_file),
        Command::Uninstall(args) => run_uninstall(&args, config_file),
        Command::Status(args) => run_status(&args, config_file),
        Command::Config(args) => run_config(&args, config_file),
        Command::Completion { shell } => {
            completion::run_completion(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn run_install(args: &InstallArgs, config_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = SetupConfig::load(config_file, &args.overrides())?;
    let service = adapters::system_service()?;
    let previous = service.previous_install();
    let (install_dir, origin) =
        install_dir::resolve_install_dir(config.install_dir.as_ref(), previous.as_ref())?;
    log::debug!("Install directory {} ({})", install_dir.display(), origin);

    if let Some(previous) = &previous {
        if previous.install_dir == install_dir {
            println!("Upgrading existing installation in {}", install_dir.display());
        } else {
            log::warn!(
                "Previous installation in {} is left in place",
                previous.install_dir.display()
            );
        }
    }

    let installer_exe = env::current_exe()?;
    let installer_dir = installer_exe
        .parent()
        .ok_or("Unable to determine installer directory")?;
    let source_exe = args
        .source
        .clone()
        .unwrap_or_else(|| installer_dir.join(PRODUCT_EXE));

    let options = InstallOptions {
        source_exe,
        setup_exe: Some(installer_exe.clone()),
        install_dir,
        add_to_path: config.add_to_path.value,
        desktop_shortcut: config.desktop_shortcut.value,
    };
    let report = installer::run_install(&service, &options)?;
    log::debug!(
        "Install stages {:?}, PATH {:?}, refresh {:?}",
        report.stages,
        report.register,
        report.refresh
    );

    println!("Installed to {}", report.target_exe.display());
    println!(
        "{}",
        installer::next_step(options.add_to_path, &report.target_exe)
    );
    Ok(())
}

fn run_uninstall(args: &DirArgs, config_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = SetupConfig::load(config_file, &args.overrides())?;
    let service = adapters::system_service()?;
    let previous = service.previous_install();
    let (install_dir, _) =
        install_dir::resolve_install_dir(config.install_dir.as_ref(), previous.as_ref())?;

    let options = UninstallOptions {
        install_dir,
        remove_shortcut: previous.map_or(true, |record| record.desktop_shortcut),
        current_exe: env::current_exe()?,
    };
    let report = uninstall::run_uninstall(&service, &options)?;
    log::debug!(
        "Uninstall stages {:?}, PATH {:?}, removed {:?}",
        report.stages,
        report.unregister,
        report.removed
    );
    if !report.deferred {
        println!("{} uninstalled.", PRODUCT_NAME);
    }
    Ok(())
}

fn run_status(args: &DirArgs, config_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = SetupConfig::load(config_file, &args.overrides())?;
    let service = adapters::system_service()?;
    let previous = service.previous_install();
    let (install_dir, _) =
        install_dir::resolve_install_dir(config.install_dir.as_ref(), previous.as_ref())?;
    doctor::run_status(&service, &install_dir, previous.as_ref())
}

fn run_config(args: &DirArgs, config_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = SetupConfig::load(config_file, &args.overrides())?;
    let previous = match adapters::system_service() {
        Ok(service) => service.previous_install(),
        Err(err) => {
            log::debug!("{}", err);
            None
        }
    };
    let (install_dir, origin) =
        install_dir::resolve_install_dir(config.install_dir.as_ref(), previous.as_ref())?;
    config::run_config(&config, &install_dir, origin)
}
