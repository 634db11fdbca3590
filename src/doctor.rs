use crate::ports::InstallRecord;
use crate::use_cases::SetupService;
use crate::{PRODUCT_EXE, SETUP_EXE};
use std::error::Error;
use std::path::Path;

pub fn run_status(
    service: &SetupService,
    install_dir: &Path,
    record: Option<&InstallRecord>,
) -> Result<(), Box<dyn Error>> {
    let mut ok = true;

    println!("Install:");
    match record {
        Some(record) => println!(
            "  record: OK - version {} in {} (add to PATH: {}, shortcut: {})",
            record.version,
            record.install_dir.display(),
            record.path_registered,
            record.desktop_shortcut
        ),
        None => println!("  record: WARN - no installation recorded"),
    }
    ok &= print_file("executable", &install_dir.join(PRODUCT_EXE), true);
    print_file("uninstaller", &install_dir.join(SETUP_EXE), false);

    println!("PATH:");
    let status = service.path_status(install_dir);
    match status.user_entries {
        Ok(0) => println!("  user: WARN - {} is not on PATH", install_dir.display()),
        Ok(1) => println!("  user: OK - {}", install_dir.display()),
        Ok(count) => println!(
            "  user: WARN - {} is listed {} times",
            install_dir.display(),
            count
        ),
        Err(err) => println!("  user: ERROR - {}", err),
    }
    if status.live {
        println!("  session: OK");
    } else {
        println!("  session: WARN - not visible here; open a new terminal");
    }

    if !ok {
        println!("WinHtop is not installed.");
        std::process::exit(1);
    }

    println!("WinHtop is installed.");
    Ok(())
}

fn print_file(label: &str, path: &Path, required: bool) -> bool {
    if path.is_file() {
        println!("  {}: OK - {}", label, path.display());
        true
    } else if required {
        println!("  {}: ERROR - {} not found", label, path.display());
        false
    } else {
        println!("  {}: WARN - {} not found", label, path.display());
        true
    }
}
