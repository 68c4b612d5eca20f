//! Path helpers shared by the file system actions.
//!
//! Paths handled here are storage paths: `/`-separated strings, not host
//! file system paths.

use regex::Regex;
use std::sync::OnceLock;

/// Path separator used by storage paths.
pub const SEPARATOR: char = '/';

/// Default pattern for files that do not count when deciding whether a
/// folder is empty.
pub const DEFAULT_IGNORED_FILES: &str = r"(?i)^readme(\.[a-z0-9]+)?$";

fn repeated_separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/{2,}").expect("valid separator pattern"))
}

/// Compiled `DEFAULT_IGNORED_FILES`.
pub fn default_ignored_files() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DEFAULT_IGNORED_FILES).expect("valid ignored-files pattern"))
}

/// Collapse repeated separators and strip a trailing one.
///
/// `normalize_path("/a//b/")` yields `"/a/b"`; `"/"` collapses to `""`.
pub fn normalize_path(path: &str) -> String {
    let collapsed = repeated_separators().replace_all(path, "/");
    collapsed.trim_end_matches(SEPARATOR).to_string()
}

/// Non-empty components of a path.
pub fn path_components(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|c| !c.is_empty()).collect()
}

/// Absolute form used as a storage key: `"a//b/"` becomes `"/a/b"`, the root
/// becomes `""`.
pub fn canonical_path(path: &str) -> String {
    path_components(path)
        .iter()
        .fold(String::new(), |acc, c| format!("{}/{}", acc, c))
}

/// Parent of a normalized path, `""` for top-level entries.
pub fn parent_path(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Last component of a path.
pub fn base_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Join a folder path and a child name.
pub fn join(folder: &str, name: &str) -> String {
    normalize_path(&format!("{}/{}", folder, name))
}

/// Derive a collision-avoiding sibling name by inserting
/// `-renamed-<timestamp>` before the extension.
///
/// A leading dot is part of the stem, so `.hidden` gets no extension.
pub fn renamed_name(path: &str, timestamp: i64) -> String {
    let path = normalize_path(path);
    let dir = parent_path(&path);
    let name = base_name(&path);

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    };

    let renamed = format!("{}-renamed-{}{}", stem, timestamp, ext);
    if path.starts_with(SEPARATOR) || !dir.is_empty() {
        format!("{}/{}", dir, renamed)
    } else {
        renamed
    }
}

/// Drop entries matching the ignored-files pattern from a listing.
pub fn filter_ignored(entries: Vec<String>, ignored: &Regex) -> Vec<String> {
    entries
        .into_iter()
        .filter(|name| !ignored.is_match(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/a//b/"), "/a/b");
        assert_eq!(normalize_path("a///b//c"), "a/b/c");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("//"), "");
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("/orchestra/2024"), "/orchestra/2024");
    }

    #[test]
    fn test_normalize_path_property() {
        let samples = [
            "", "/", "a", "a/", "//a//", "/a/b/c///", "///x//y", "x/y/z", "//////",
        ];
        for sample in samples {
            let normalized = normalize_path(sample);
            assert!(!normalized.contains("//"), "{:?} -> {:?}", sample, normalized);
            assert!(
                normalized.is_empty() || !normalized.ends_with('/'),
                "{:?} -> {:?}",
                sample,
                normalized
            );
        }
    }

    #[test]
    fn test_renamed_name() {
        assert_eq!(
            renamed_name("/scores/part.pdf", 1700000000),
            "/scores/part-renamed-1700000000.pdf"
        );
        assert_eq!(renamed_name("/scores", 42), "/scores-renamed-42");
        assert_eq!(renamed_name("/a/.hidden", 7), "/a/.hidden-renamed-7");
        assert_eq!(renamed_name("notes.tar.gz", 1), "notes.tar-renamed-1.gz");
    }

    #[test]
    fn test_components_and_parents() {
        assert_eq!(path_components("/a/b/c"), vec!["a", "b", "c"]);
        assert!(path_components("/").is_empty());
        assert_eq!(canonical_path("a//b/"), "/a/b");
        assert_eq!(canonical_path("/"), "");
        assert_eq!(parent_path("/a/b"), "/a");
        assert_eq!(parent_path("/a"), "");
        assert_eq!(base_name("/a/b.txt"), "b.txt");
        assert_eq!(join("/a", "b"), "/a/b");
    }

    #[test]
    fn test_filter_ignored() {
        let re = Regex::new(DEFAULT_IGNORED_FILES).unwrap();
        let entries = vec![
            "README".to_string(),
            "readme.md".to_string(),
            "Readme.TXT".to_string(),
            "score.pdf".to_string(),
        ];
        assert_eq!(filter_ignored(entries, &re), vec!["score.pdf".to_string()]);
    }
}
