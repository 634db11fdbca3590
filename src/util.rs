use std::fs;
use std::io;
use std::path::Path;

/// Quote a string for use in PowerShell commands.
pub fn ps_quote(input: &str) -> String {
    format!("'{}'", input.replace('\'', "''"))
}

/// Removes `path` if it exists. Returns whether anything was deleted.
pub fn remove_file_if_present(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Removes `dir` only when it is empty. Missing directories count as removed.
pub fn remove_dir_if_empty(dir: &Path) -> io::Result<bool> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(err),
    };
    if entries.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ps_quote_simple() {
        assert_eq!(ps_quote("hello"), "'hello'");
    }

    #[test]
    fn test_ps_quote_with_single_quote() {
        assert_eq!(ps_quote(r"C:\Users\O'Neil"), r"'C:\Users\O''Neil'");
    }

    #[test]
    fn test_ps_quote_empty() {
        assert_eq!(ps_quote(""), "''");
    }

    #[test]
    fn test_remove_dir_if_empty() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("bin");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("keep.txt"), "x").unwrap();

        assert!(!remove_dir_if_empty(&dir).unwrap());
        assert!(dir.exists());

        fs::remove_file(dir.join("keep.txt")).unwrap();
        assert!(remove_dir_if_empty(&dir).unwrap());
        assert!(!dir.exists());
        assert!(remove_dir_if_empty(&dir).unwrap());
    }

    #[test]
    fn test_remove_file_if_present() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("WinHtop.exe");
        fs::write(&file, "bin").unwrap();

        assert!(remove_file_if_present(&file).unwrap());
        assert!(!remove_file_if_present(&file).unwrap());
    }
}
