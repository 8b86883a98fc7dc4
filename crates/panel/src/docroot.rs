//! Document root composition.
//!
//! A hosting domain's document root is assigned by the remote on creation.
//! Users may ask for a subdirectory below it (`root_subdir`) instead of an
//! absolute override. The remote only knows the absolute path, so the last
//! applied subdirectory is remembered in state and stripped off again before
//! a new one is appended.

use crate::errors::{PanelError, PanelResult};

/// Appends `subdir` below `base`.
///
/// Leading and trailing slashes of `subdir` are ignored; an empty `subdir`
/// returns `base` unchanged. Duplicate separators and `.` segments in the
/// result are collapsed.
pub fn combine(base: &str, subdir: &str) -> String {
    let subdir = subdir.trim_matches('/');
    if subdir.is_empty() {
        return base.to_string();
    }
    normalize(&format!("{base}/{subdir}"))
}

/// Removes a previously applied `/<previous>` suffix from `current`.
///
/// Returns `current` unchanged when the suffix is absent or `previous` is
/// empty.
pub fn strip_subdir(current: &str, previous: &str) -> String {
    let previous = previous.trim_matches('/');
    if previous.is_empty() {
        return current.to_string();
    }
    let current_trimmed = current.trim_end_matches('/');
    match current_trimmed.strip_suffix(previous) {
        Some(rest) if rest.ends_with('/') => {
            let base = rest.trim_end_matches('/');
            if base.is_empty() {
                "/".to_string()
            } else {
                base.to_string()
            }
        }
        _ => current.to_string(),
    }
}

/// Strips `previous` from `current`, then appends `next`.
pub fn recompose(current: &str, previous: Option<&str>, next: Option<&str>) -> String {
    let base = strip_subdir(current, previous.unwrap_or_default());
    combine(&base, next.unwrap_or_default())
}

/// Rejects a record that sets both an absolute document root and a
/// subdirectory.
pub fn validate_overrides(document_root: Option<&str>, root_subdir: Option<&str>) -> PanelResult<()> {
    let given = |v: Option<&str>| v.is_some_and(|v| !v.trim().is_empty());
    if given(document_root) && given(root_subdir) {
        return Err(PanelError::validation(
            "document_root and root_subdir are mutually exclusive",
        ));
    }
    Ok(())
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}
