//! Path utilities.

/// Separator used for `folders` entries in the mapping document.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Split `text` on `separator` into its non-empty segments.
///
/// Leading, trailing and repeated separators never produce empty segments.
/// An empty separator yields the whole text as a single segment.
pub fn split_path(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        };
    }

    text.split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain() {
        assert_eq!(split_path("a/b/c", "/"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_drops_empty_segments() {
        assert_eq!(split_path("/test/test/", "/"), vec!["test", "test"]);
        assert_eq!(split_path("a//b///c", "/"), vec!["a", "b", "c"]);
        assert!(split_path("///", "/").is_empty());
    }

    #[test]
    fn test_split_empty_input() {
        assert!(split_path("", "/").is_empty());
        assert!(split_path("", "").is_empty());
    }

    #[test]
    fn test_split_without_separator() {
        assert_eq!(split_path("int32Scalar", "/"), vec!["int32Scalar"]);
        assert_eq!(split_path("int32Scalar", ""), vec!["int32Scalar"]);
    }

    #[test]
    fn test_split_multichar_separator() {
        assert_eq!(split_path("a::b::::c", "::"), vec!["a", "b", "c"]);
    }
}
