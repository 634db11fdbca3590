//! String handling for ';'-delimited PATH values.
//!
//! Every function here works on whole entries. Entries that do not match the
//! directory are carried over untouched, empty segments included, so that
//! removing a freshly appended entry restores the original value exactly.

pub const SEPARATOR: char = ';';

/// Comparison key for a single PATH entry.
pub fn normalize_entry(entry: &str) -> String {
    entry
        .trim()
        .trim_matches('"')
        .trim_end_matches('\\')
        .to_lowercase()
}

pub fn same_entry(entry: &str, dir: &str) -> bool {
    let dir = normalize_entry(dir);
    !dir.is_empty() && normalize_entry(entry) == dir
}

pub fn contains_entry(path: &str, dir: &str) -> bool {
    path.split(SEPARATOR).any(|entry| same_entry(entry, dir))
}

pub fn count_entries(path: &str, dir: &str) -> usize {
    path.split(SEPARATOR)
        .filter(|entry| same_entry(entry, dir))
        .count()
}

/// Returns `path` with `dir` appended, or `path` unchanged when it already
/// lists `dir`.
pub fn append_entry(path: &str, dir: &str) -> String {
    if normalize_entry(dir).is_empty() || contains_entry(path, dir) {
        return path.to_string();
    }

    if path.is_empty() {
        dir.to_string()
    } else {
        format!("{}{}{}", path, SEPARATOR, dir)
    }
}

/// Drops every entry equal to `dir`, wherever it sits.
pub fn remove_entry(path: &str, dir: &str) -> String {
    path.split(SEPARATOR)
        .filter(|entry| !same_entry(entry, dir))
        .collect::<Vec<_>>()
        .join(";")
}

/// Machine segment first, then the user segment, as Windows composes the
/// PATH of a new logon session.
pub fn merge(machine: &str, user: &str) -> String {
    [machine, user]
        .iter()
        .map(|segment| segment.trim_matches(SEPARATOR))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(";")
}

/// Expands `%NAME%` references. Unknown names stay verbatim.
pub fn expand_vars<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('%') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let name = &after[..end];
        let expanded = if name.is_empty() { None } else { lookup(name) };
        match expanded {
            Some(value) => {
                out.push_str(&value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                out.push_str(name);
                rest = &after[end..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIR: &str = r"C:\Users\X\AppData\Local\Programs\WinHtop";

    /// Substring removal of `";" + dir`, kept to pin down why it is not used.
    fn remove_entry_legacy(path: &str, dir: &str) -> String {
        path.replace(&format!(";{}", dir), "")
    }

    fn samples() -> Vec<&'static str> {
        vec![
            "",
            r"C:\Windows",
            r"C:\Windows;C:\Windows\System32",
            r"C:\Windows;;C:\Tools;",
            r"%USERPROFILE%\.cargo\bin;C:\Python312",
            r"C:\Users\X\AppData\Local\Programs\WinHtopBeta;C:\Users\X\AppData\Local\Programs",
        ]
    }

    #[test]
    fn test_scenario_register_then_unregister() {
        let original = r"C:\Windows;C:\Windows\System32";
        let registered = append_entry(original, DIR);
        assert_eq!(
            registered,
            r"C:\Windows;C:\Windows\System32;C:\Users\X\AppData\Local\Programs\WinHtop"
        );
        assert_eq!(remove_entry(&registered, DIR), original);
    }

    #[test]
    fn test_remove_single_entry_leaves_empty() {
        assert_eq!(remove_entry(DIR, DIR), "");
    }

    #[test]
    fn test_legacy_removal_misses_first_entry() {
        assert_eq!(remove_entry_legacy(DIR, DIR), DIR);
        let leading = format!(r"{};C:\Windows", DIR);
        assert_eq!(remove_entry_legacy(&leading, DIR), leading);
        assert_eq!(remove_entry(&leading, DIR), r"C:\Windows");
    }

    #[test]
    fn test_legacy_removal_truncates_unrelated_entries() {
        let path = format!(r"C:\Windows;{}Beta", DIR);
        assert_eq!(remove_entry_legacy(&path, DIR), r"C:\WindowsBeta");
        assert_eq!(remove_entry(&path, DIR), path);
    }

    #[test]
    fn test_append_is_idempotent() {
        for path in samples() {
            let once = append_entry(path, DIR);
            assert_eq!(append_entry(&once, DIR), once, "path: {:?}", path);
        }
    }

    #[test]
    fn test_append_adds_exactly_one_entry() {
        for path in samples() {
            let registered = append_entry(path, DIR);
            assert_eq!(count_entries(&registered, DIR), 1, "path: {:?}", path);
        }
    }

    #[test]
    fn test_round_trip_restores_original() {
        for path in samples() {
            let registered = append_entry(path, DIR);
            assert_eq!(remove_entry(&registered, DIR), path, "path: {:?}", path);
        }
    }

    #[test]
    fn test_append_to_empty_path() {
        assert_eq!(append_entry("", DIR), DIR);
    }

    #[test]
    fn test_append_skips_equivalent_spelling() {
        let path = r#"C:\Windows;"c:\users\x\appdata\local\programs\winhtop\""#;
        assert_eq!(append_entry(path, DIR), path);
    }

    #[test]
    fn test_remove_any_position() {
        let first = format!(r"{};C:\A;C:\B", DIR);
        let middle = format!(r"C:\A;{};C:\B", DIR);
        let last = format!(r"C:\A;C:\B;{}", DIR);
        for path in [first, middle, last] {
            assert_eq!(remove_entry(&path, DIR), r"C:\A;C:\B");
        }
    }

    #[test]
    fn test_remove_all_duplicates() {
        let path = format!(r"{dir};C:\A;{dir}\;C:\B;{upper}", dir = DIR, upper = DIR.to_uppercase());
        assert_eq!(remove_entry(&path, DIR), r"C:\A;C:\B");
    }

    #[test]
    fn test_remove_without_match_is_identity() {
        let path = r"C:\Windows;;C:\Tools;";
        assert_eq!(remove_entry(path, DIR), path);
    }

    #[test]
    fn test_empty_dir_never_matches() {
        assert!(!contains_entry("C:\\A;;C:\\B", ""));
        assert_eq!(append_entry("C:\\A", ""), "C:\\A");
        assert_eq!(remove_entry("C:\\A;;C:\\B", ""), "C:\\A;;C:\\B");
    }

    #[test]
    fn test_merge_machine_then_user() {
        assert_eq!(merge(r"C:\Windows;", r"C:\Tools"), r"C:\Windows;C:\Tools");
        assert_eq!(merge("", r"C:\Tools"), r"C:\Tools");
        assert_eq!(merge(r"C:\Windows", ""), r"C:\Windows");
        assert_eq!(merge("", ""), "");
    }

    #[test]
    fn test_expand_vars_known_and_unknown() {
        let lookup = |name: &str| match name {
            "USERPROFILE" => Some(r"C:\Users\X".to_string()),
            _ => None,
        };
        assert_eq!(
            expand_vars(r"%USERPROFILE%\bin;%MISSING%\bin", lookup),
            r"C:\Users\X\bin;%MISSING%\bin"
        );
        assert_eq!(expand_vars("100%", lookup), "100%");
        assert_eq!(expand_vars("%%", lookup), "%%");
        assert_eq!(expand_vars(r"C:\plain", lookup), r"C:\plain");
    }
}
