//! Ref name validation following git-style conventions.
//!
//! Ref names become filesystem paths under `refs/heads/`, so the rules
//! exist to rule out path traversal and filesystem ambiguity:
//! - Must be non-empty
//! - Must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - Must not contain `..` (double dot) or `@{`
//! - Must not start or end with `.` or `/`
//! - Must not end with `.lock`
//! - Must not contain consecutive slashes (`//`)
//! - Components between slashes must be non-empty and not start with `.`

use crate::error::{RefError, RefResult};

/// Characters that are forbidden anywhere in a ref name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a ref name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use vellum_refs::names::validate_ref_name;
///
/// assert!(validate_ref_name("main").is_ok());
/// assert!(validate_ref_name("feature/auth").is_ok());
/// assert!(validate_ref_name("").is_err());
/// assert!(validate_ref_name("bad..name").is_err());
/// ```
pub fn validate_ref_name(name: &str) -> RefResult<()> {
    if name.is_empty() {
        return Err(RefError::InvalidRef {
            name: name.to_string(),
            reason: "ref name must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(RefError::InvalidRef {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    // `..` is parent traversal once the name becomes a path.
    if name.contains("..") {
        return Err(RefError::InvalidRef {
            name: name.to_string(),
            reason: "must not contain '..'".into(),
        });
    }

    if name.contains("@{") {
        return Err(RefError::InvalidRef {
            name: name.to_string(),
            reason: "must not contain '@{'".into(),
        });
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(RefError::InvalidRef {
            name: name.to_string(),
            reason: "must not start or end with '.'".into(),
        });
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(RefError::InvalidRef {
            name: name.to_string(),
            reason: "must not start or end with '/'".into(),
        });
    }

    if name.ends_with(".lock") {
        return Err(RefError::InvalidRef {
            name: name.to_string(),
            reason: "must not end with '.lock'".into(),
        });
    }

    if name.contains("//") {
        return Err(RefError::InvalidRef {
            name: name.to_string(),
            reason: "must not contain consecutive slashes '//'".into(),
        });
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err(RefError::InvalidRef {
                name: name.to_string(),
                reason: format!("component must not start with '.': {component:?}"),
            });
        }
    }

    Ok(())
}
