use crate::error::SetupError;
use crate::ports::ProcessControl;
use std::process::Command;

pub struct SystemProcessControl;

#[cfg(windows)]
impl ProcessControl for SystemProcessControl {
    fn terminate(&self, image_name: &str) -> Result<bool, SetupError> {
        let output = Command::new("taskkill")
            .args(["/F", "/T", "/IM", image_name])
            .output()?;

        if output.status.success() {
            return Ok(true);
        }

        // 128: no process with that image name.
        match output.status.code() {
            Some(128) => Ok(false),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                log::warn!("taskkill {} failed: {}", image_name, stderr.trim());
                Ok(false)
            }
        }
    }
}

#[cfg(not(windows))]
impl ProcessControl for SystemProcessControl {
    fn terminate(&self, image_name: &str) -> Result<bool, SetupError> {
        let status = Command::new("pkill").args(["-KILL", "-x", image_name]).status()?;
        Ok(status.success())
    }
}
