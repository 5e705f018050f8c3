//! Relative-suffix computation
//!
//! A recursive copy reconstructs subtree shape by taking the portion of
//! each visited path that lies below the source root and appending it to
//! the destination root.

use crate::resolve::PathError;

/// Returns the remainder of `full` after removing the literal prefix `root`
///
/// The remainder keeps its leading slash, so appending it to another
/// root preserves the subtree shape. A `root` that is not a prefix of
/// `full` at offset 0 means the walker passed mismatched arguments;
/// that is fatal to the copy in progress, never silently recovered.
///
/// # Examples
///
/// ```
/// use fs_path::suffix_of;
///
/// assert_eq!(suffix_of("/src/sub/b.txt", "/src").unwrap(), "/sub/b.txt");
/// assert_eq!(suffix_of("/src", "/src").unwrap(), "");
/// assert!(suffix_of("/other/b.txt", "/src").is_err());
/// ```
pub fn suffix_of<'a>(full: &'a str, root: &str) -> Result<&'a str, PathError> {
    if full.starts_with(root) {
        Ok(&full[root.len()..])
    } else {
        Err(PathError::PrefixMismatch {
            path: full.to_string(),
            root: root.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_below_root() {
        assert_eq!(suffix_of("/src/a.txt", "/src").unwrap(), "/a.txt");
        assert_eq!(suffix_of("/src/sub/b.txt", "/src").unwrap(), "/sub/b.txt");
    }

    #[test]
    fn test_suffix_of_root_itself() {
        assert_eq!(suffix_of("/src", "/src").unwrap(), "");
    }

    #[test]
    fn test_suffix_round_trips() {
        let root = "/data/in";
        for rest in ["/a", "/a/b/c.txt", ""] {
            let full = format!("{}{}", root, rest);
            assert_eq!(suffix_of(&full, root).unwrap(), rest);
        }
    }

    #[test]
    fn test_mismatched_root_fails() {
        let result = suffix_of("/other/a.txt", "/src");
        assert_eq!(
            result,
            Err(PathError::PrefixMismatch {
                path: "/other/a.txt".to_string(),
                root: "/src".to_string(),
            })
        );
    }

    #[test]
    fn test_root_matching_midway_fails() {
        // The root must match at offset 0, not merely appear somewhere.
        assert!(suffix_of("/a/src/b.txt", "/src").is_err());
    }
}
