use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// Leaves the input untouched when it does not start with `~` or when the
/// home directory cannot be determined.
pub fn expand_home(input: &str) -> PathBuf {
    let trimmed = input.trim();
    let rest = if trimmed == "~" {
        Some("")
    } else {
        trimmed
            .strip_prefix("~/")
            .or_else(|| trimmed.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(trimmed),
    }
}

/// Short display name for a source file: its file name, or the whole path
/// when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
