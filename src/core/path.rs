//! Slash-delimited state paths.
//!
//! A path such as `"A/B/C"` names the state `C`, child of `B`, child of the
//! top-level state `A`. The separator never appears inside a leaf name.

use thiserror::Error;

/// Separator between a parent's name and its child's name.
pub const SEPARATOR: char = '/';

/// Problems with a declared state path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("state path is empty")]
    Empty,

    #[error("state path '{path}' contains an empty segment")]
    EmptySegment { path: String },

    #[error("duplicate state '{path}'")]
    Duplicate { path: String },
}

/// Check that every segment of `path` is non-empty.
pub fn validate(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if path.split(SEPARATOR).any(str::is_empty) {
        return Err(PathError::EmptySegment {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Every prefix of `path`, outermost ancestor first, ending with `path` itself.
///
/// ```
/// use hfsm::core::path::lineage;
///
/// assert_eq!(lineage("A/B/C"), vec!["A", "A/B", "A/B/C"]);
/// assert_eq!(lineage("A"), vec!["A"]);
/// ```
pub fn lineage(path: &str) -> Vec<&str> {
    let mut prefixes: Vec<&str> = path
        .match_indices(SEPARATOR)
        .map(|(idx, _)| &path[..idx])
        .collect();
    prefixes.push(path);
    prefixes
}

/// The last segment of `path`.
pub fn leaf(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + SEPARATOR.len_utf8()..],
        None => path,
    }
}

/// Join leaf names, outermost first, into a full path.
pub fn join<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut full = String::new();
    for name in names {
        if !full.is_empty() {
            full.push(SEPARATOR);
        }
        full.push_str(name);
    }
    full
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lineage_lists_prefixes_outermost_first() {
        assert_eq!(lineage("A/B/C"), vec!["A", "A/B", "A/B/C"]);
    }

    #[test]
    fn lineage_of_top_level_state_is_itself() {
        assert_eq!(lineage("solid"), vec!["solid"]);
    }

    #[test]
    fn leaf_strips_ancestors() {
        assert_eq!(leaf("A/B/C"), "C");
        assert_eq!(leaf("A"), "A");
    }

    #[test]
    fn join_inverts_split() {
        assert_eq!(join(["X", "Y", "Z"]), "X/Y/Z");
        assert_eq!(join(["X"]), "X");
    }

    #[test]
    fn validate_rejects_empty_segments() {
        assert_eq!(validate(""), Err(PathError::Empty));
        assert!(matches!(
            validate("A//B"),
            Err(PathError::EmptySegment { .. })
        ));
        assert!(matches!(validate("/A"), Err(PathError::EmptySegment { .. })));
        assert!(matches!(validate("A/"), Err(PathError::EmptySegment { .. })));
        assert!(validate("A/B").is_ok());
    }
}
