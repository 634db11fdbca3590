use crate::util::{ps_quote, remove_file_if_present};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn desktop_shortcut_path() -> Option<PathBuf> {
    dirs::desktop_dir().map(|desktop| desktop.join(format!("{}.lnk", crate::PRODUCT_NAME)))
}

pub fn shortcut_script(link: &Path, target: &Path, working_dir: &Path) -> String {
    format!(
        "$shell = New-Object -ComObject WScript.Shell; \
         $link = $shell.CreateShortcut({link}); \
         $link.TargetPath = {target}; \
         $link.WorkingDirectory = {dir}; \
         $link.IconLocation = {icon}; \
         $link.Save()",
        link = ps_quote(&link.display().to_string()),
        target = ps_quote(&target.display().to_string()),
        dir = ps_quote(&working_dir.display().to_string()),
        icon = ps_quote(&format!("{},0", target.display())),
    )
}

pub fn create_desktop_shortcut(
    target: &Path,
    working_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let link = desktop_shortcut_path().ok_or("Desktop folder not found")?;
    let script = shortcut_script(&link, target, working_dir);
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", &script])
        .output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("Shortcut creation failed: {}", stderr.trim()).into());
    }
    Ok(link)
}

pub fn remove_desktop_shortcut() -> Result<Option<PathBuf>, Box<dyn Error>> {
    let Some(link) = desktop_shortcut_path() else {
        return Ok(None);
    };
    if remove_file_if_present(&link)? {
        Ok(Some(link))
    } else {
        Ok(None)
    }
}
